//! Integration tests for `SqliteStore` against an in-memory database.

use purrsist_core::{score, store::ForumStore};

use crate::SqliteStore;

const SEED: &str = "
INSERT INTO Boards VALUES
  ('b-rust',  'Rust',  'k-alice', 'All things rust', 1500000000, 'en', 1600000000),
  ('b-amiga', 'Amiga', 'k-bob',   NULL,              1500000000, NULL, 1600000000),
  ('b-zed',   'Zed',   'k-alice', '',                1500000000, 'fr', 1600000000);

INSERT INTO Threads VALUES
  ('t-old', 'b-rust', 'Old news',   'body',      '',                      'k-alice', 1600000100),
  ('t-new', 'b-rust', 'Fresh news', '# heading', 'https://x.test/a.png',  'k-bob',   1600000900),
  ('t-mid', 'b-rust', 'Middle',     NULL,        NULL,                    'k-carol', 1600000050),
  ('t-far', 'b-zed',  'Elsewhere',  'b',         NULL,                    'k-alice', 1600000000);

INSERT INTO Posts VALUES
  ('p1',  'b-rust', 't-new', 't-new', 'first',        'k-alice', 1600001000, 1600001000),
  ('p2',  'b-rust', 't-new', 't-new', 'second',       'k-carol', 1600002000, '2020-09-13 13:00:00'),
  ('p11', 'b-rust', 't-new', 'p1',    'reply to one', 'k-bob',   1600001500, 1600001500),
  ('px',  'b-rust', 't-old', 't-old', 'other thread', 'k-bob',   1600000500, 1600000500);

INSERT INTO Votes VALUES
  ('v1', 'b-rust', 't-new', 't-new', 1, 1),
  ('v2', 'b-rust', 't-new', 't-new', 1, 1),
  ('v3', 'b-rust', 't-new', 't-new', 2, 1),
  ('v4', 'b-rust', 't-new', 't-new', 1, 2),
  ('v5', 'b-rust', 't-new', 'p1',    2, 1);

INSERT INTO PublicKeys VALUES
  ('k-alice', 'alice', 'ed25519', 'AAAA'),
  ('k-bob',   NULL,    NULL,      NULL);
";

async fn store() -> SqliteStore {
  let s = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  s.execute_batch(SEED).await.expect("seed");
  s
}

// ─── Boards ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn boards_are_ordered_by_name() {
  let s = store().await;

  let names: Vec<_> = s
    .list_boards()
    .await
    .unwrap()
    .into_iter()
    .map(|b| b.name)
    .collect();
  assert_eq!(names, ["Amiga", "Rust", "Zed"]);
}

#[tokio::test]
async fn null_board_columns_decode_as_empty() {
  let s = store().await;

  let boards = s.list_boards().await.unwrap();
  let amiga = boards.iter().find(|b| b.fingerprint == "b-amiga").unwrap();
  assert_eq!(amiga.description, "");
  assert_eq!(amiga.language, "");
  assert_eq!(amiga.creation.timestamp(), 1_500_000_000);
}

// ─── Threads ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn threads_are_newest_first_and_scoped_to_board() {
  let s = store().await;

  let fps: Vec<_> = s
    .list_threads("b-rust")
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.fingerprint)
    .collect();
  assert_eq!(fps, ["t-new", "t-old", "t-mid"]);
}

#[tokio::test]
async fn empty_link_is_absent() {
  let s = store().await;

  let threads = s.list_threads("b-rust").await.unwrap();
  let by_fp = |fp: &str| threads.iter().find(|t| t.fingerprint == fp).unwrap().clone();

  assert_eq!(by_fp("t-old").link, None);
  assert_eq!(by_fp("t-mid").link, None);
  assert_eq!(by_fp("t-new").link.as_deref(), Some("https://x.test/a.png"));
  assert_eq!(by_fp("t-mid").body, "");
}

#[tokio::test]
async fn unknown_board_has_no_threads() {
  let s = store().await;
  assert!(s.list_threads("b-missing").await.unwrap().is_empty());
}

// ─── Posts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn top_level_replies_use_thread_as_parent() {
  let s = store().await;

  let replies = s.list_replies("t-new", "t-new").await.unwrap();
  let fps: Vec<_> = replies.iter().map(|p| p.fingerprint.as_str()).collect();
  assert_eq!(fps, ["p1", "p2"]);
  assert!(replies.iter().all(|p| p.is_top_level()));
  // Text timestamps decode alongside integer ones.
  assert_eq!(replies[1].local_arrival.timestamp(), 1_600_002_000);
}

#[tokio::test]
async fn nested_replies_by_parent() {
  let s = store().await;

  let replies = s.list_replies("t-new", "p1").await.unwrap();
  assert_eq!(replies.len(), 1);
  assert_eq!(replies[0].fingerprint, "p11");
  assert!(!replies[0].is_top_level());

  assert!(s.list_replies("t-new", "p11").await.unwrap().is_empty());
}

#[tokio::test]
async fn replies_do_not_leak_across_threads() {
  let s = store().await;
  assert!(s.list_replies("t-new", "t-old").await.unwrap().is_empty());
}

// ─── Votes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn votes_by_target() {
  let s = store().await;

  let thread_votes = s.list_votes("t-new").await.unwrap();
  assert_eq!(thread_votes.len(), 4);
  assert_eq!(score(&thread_votes), 1);

  let post_votes = s.list_votes("p1").await.unwrap();
  assert_eq!(score(&post_votes), -1);

  assert!(s.list_votes("p2").await.unwrap().is_empty());
}

// ─── Public keys ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn public_key_lookup() {
  let s = store().await;

  let alice = s.get_public_key("k-alice").await.unwrap().unwrap();
  assert_eq!(alice.name, "alice");
  assert_eq!(alice.key_type, "ed25519");

  let bob = s.get_public_key("k-bob").await.unwrap().unwrap();
  assert_eq!(bob.name, "");

  assert!(s.get_public_key("k-nobody").await.unwrap().is_none());
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn queries_run_on_spawned_tasks() {
  let s = store().await;

  let handle = tokio::spawn(async move { s.list_threads("b-rust").await });
  let threads = handle.await.unwrap().unwrap();
  assert_eq!(threads.len(), 3);
}

// ─── Open ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn open_missing_file_fails() {
  let dir = std::env::temp_dir().join("purrsist-store-sqlite-missing");
  let result = SqliteStore::open(dir.join("AetherDB.db")).await;
  assert!(result.is_err());
}
