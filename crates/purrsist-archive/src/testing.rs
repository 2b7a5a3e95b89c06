//! In-memory collaborators for unit tests.

use std::{
  convert::Infallible,
  path::{Path, PathBuf},
  sync::Mutex,
};

use chrono::{DateTime, TimeZone, Utc};
use purrsist_core::{
  Board, Post, PublicKey, Thread, Vote,
  content::{AddedEntry, ContentStore, KeyInfo, PublishedName},
  store::ForumStore,
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

const BASE: i64 = 1_600_000_000;

pub fn ts(offset: i64) -> DateTime<Utc> { Utc.timestamp_opt(BASE + offset, 0).unwrap() }

pub fn board(fp: &str, name: &str) -> Board {
  Board {
    fingerprint:       fp.into(),
    name:              name.into(),
    owner_fingerprint: "owner".into(),
    description:       String::new(),
    creation:          ts(0),
    language:          "en".into(),
    local_arrival:     ts(0),
  }
}

/// A thread owned by `"owner"`, arriving `arrival` seconds after the base time.
pub fn thread(fp: &str, board: &str, name: &str, body: &str, arrival: i64) -> Thread {
  Thread {
    fingerprint:       fp.into(),
    board_fingerprint: board.into(),
    name:              name.into(),
    body:              body.into(),
    link:              None,
    owner_fingerprint: "owner".into(),
    local_arrival:     ts(arrival),
  }
}

pub fn post(fp: &str, thread: &str, parent: &str, body: &str, created: i64) -> Post {
  Post {
    fingerprint:        fp.into(),
    board_fingerprint:  "b1".into(),
    thread_fingerprint: thread.into(),
    parent_fingerprint: parent.into(),
    body:               body.into(),
    owner_fingerprint:  format!("{fp}-author"),
    creation:           ts(created),
    local_arrival:      ts(created),
  }
}

pub fn vote(target: &str, kind: i64, class: i64) -> Vote {
  Vote {
    board_fingerprint:  "b1".into(),
    thread_fingerprint: "t1".into(),
    target_fingerprint: target.into(),
    kind,
    class,
  }
}

pub fn key(fp: &str, name: &str) -> PublicKey {
  PublicKey {
    fingerprint: fp.into(),
    name:        name.into(),
    key_type:    "ed25519".into(),
    public_key:  String::new(),
  }
}

// ─── MemoryForum ─────────────────────────────────────────────────────────────

/// A [`ForumStore`] over plain vectors. Posts keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryForum {
  pub boards:  Vec<Board>,
  pub threads: Vec<Thread>,
  pub posts:   Vec<Post>,
  pub votes:   Vec<Vote>,
  pub keys:    Vec<PublicKey>,
}

impl ForumStore for MemoryForum {
  type Error = Infallible;

  async fn list_boards(&self) -> Result<Vec<Board>, Infallible> {
    let mut boards = self.boards.clone();
    boards.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(boards)
  }

  async fn list_threads(&self, board: &str) -> Result<Vec<Thread>, Infallible> {
    let mut threads: Vec<_> =
      self.threads.iter().filter(|t| t.board_fingerprint == board).cloned().collect();
    threads.sort_by(|a, b| b.local_arrival.cmp(&a.local_arrival));
    Ok(threads)
  }

  async fn list_replies(&self, thread: &str, parent: &str) -> Result<Vec<Post>, Infallible> {
    Ok(
      self
        .posts
        .iter()
        .filter(|p| p.thread_fingerprint == thread && p.parent_fingerprint == parent)
        .cloned()
        .collect(),
    )
  }

  async fn list_votes(&self, target: &str) -> Result<Vec<Vote>, Infallible> {
    Ok(self.votes.iter().filter(|v| v.target_fingerprint == target).cloned().collect())
  }

  async fn get_public_key(&self, fingerprint: &str) -> Result<Option<PublicKey>, Infallible> {
    Ok(self.keys.iter().find(|k| k.fingerprint == fingerprint).cloned())
  }
}

// ─── FakeContent ─────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(pub String);

/// A [`ContentStore`] that records calls and fails on request.
#[derive(Debug, Default)]
pub struct FakeContent {
  pub keys:          Mutex<Vec<KeyInfo>>,
  pub fail_key_list: bool,
  pub fail_get:      bool,
  pub fail_add:      bool,
  pub empty_add:     bool,
  pub fail_pin_rm:   bool,
  pub fail_pin_add:  bool,
  /// Extra files `get` writes, relative to its destination.
  pub snapshot:      Vec<&'static str>,
  /// Operation log, e.g. `"add"`, `"publish /ipfs/bafyroot aether"`.
  pub calls:         Mutex<Vec<String>>,
  /// Directories passed to `add_dir`, with the files they held at the time.
  pub added:         Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl FakeContent {
  pub const ROOT_CID: &'static str = "bafyroot";

  fn log(&self, call: String) { self.calls.lock().unwrap().push(call); }

  pub fn calls(&self) -> Vec<String> { self.calls.lock().unwrap().clone() }

  pub fn called(&self, prefix: &str) -> bool { self.calls().iter().any(|c| c.starts_with(prefix)) }
}

fn list_files(root: &Path) -> Vec<String> {
  fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
    let Ok(read) = std::fs::read_dir(dir) else { return };
    for entry in read.flatten() {
      let path = entry.path();
      if path.is_dir() {
        walk(root, &path, out);
      } else if let Ok(rel) = path.strip_prefix(root) {
        out.push(rel.to_string_lossy().replace('\\', "/"));
      }
    }
  }
  let mut out = Vec::new();
  walk(root, root, &mut out);
  out.sort();
  out
}

impl ContentStore for FakeContent {
  type Error = FakeError;

  async fn add_dir(&self, dir: &Path) -> Result<Vec<AddedEntry>, FakeError> {
    self.log("add".into());
    self.added.lock().unwrap().push((dir.to_path_buf(), list_files(dir)));
    if self.fail_add {
      return Err(FakeError("add failed".into()));
    }
    if self.empty_add {
      return Ok(Vec::new());
    }
    Ok(vec![
      AddedEntry { path: "boards/index.html".into(), cid: "bafyindex".into() },
      AddedEntry { path: "boards".into(), cid: Self::ROOT_CID.into() },
    ])
  }

  async fn get(&self, path: &str, dest: &Path) -> Result<(), FakeError> {
    self.log(format!("get {path}"));
    // Leave partial output behind either way.
    std::fs::create_dir_all(dest.join("old-board/old-thread")).unwrap();
    std::fs::write(dest.join("old-board/old-thread/index.html"), "old").unwrap();
    for file in &self.snapshot {
      let path = dest.join(file);
      std::fs::create_dir_all(path.parent().unwrap()).unwrap();
      std::fs::write(path, "old").unwrap();
    }
    if self.fail_get {
      return Err(FakeError("resolve timed out".into()));
    }
    Ok(())
  }

  async fn key_list(&self) -> Result<Vec<KeyInfo>, FakeError> {
    self.log("key_list".into());
    if self.fail_key_list {
      return Err(FakeError("daemon offline".into()));
    }
    Ok(self.keys.lock().unwrap().clone())
  }

  async fn key_gen(&self, name: &str) -> Result<KeyInfo, FakeError> {
    self.log(format!("key_gen {name}"));
    let key = KeyInfo { name: name.into(), id: format!("k51{name}") };
    self.keys.lock().unwrap().push(key.clone());
    Ok(key)
  }

  async fn name_publish(&self, path: &str, key: &str) -> Result<PublishedName, FakeError> {
    self.log(format!("publish {path} {key}"));
    Ok(PublishedName { name: format!("k51{key}"), value: path.into() })
  }

  async fn pin_remote_rm(&self, service: &str, name: &str, force: bool) -> Result<(), FakeError> {
    self.log(format!("pin_rm {service} {name} {force}"));
    if self.fail_pin_rm {
      return Err(FakeError("no such pin".into()));
    }
    Ok(())
  }

  async fn pin_remote_add(&self, service: &str, cid: &str, name: &str) -> Result<(), FakeError> {
    self.log(format!("pin_add {service} {cid} {name}"));
    if self.fail_pin_add {
      return Err(FakeError("pin service refused".into()));
    }
    Ok(())
  }
}
