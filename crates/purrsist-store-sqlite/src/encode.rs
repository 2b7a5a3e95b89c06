//! Decoding helpers between the Aether column representations and the
//! domain types in `purrsist-core`.
//!
//! The Aether backend stores timestamps as unix seconds, but databases that
//! went through other tooling carry them as text. Both are accepted. Text
//! columns are frequently NULL and decode to empty strings.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use purrsist_core::{Board, Post, PublicKey, Thread, Vote};
use rusqlite::types::Value;

use crate::{Error, Result};

// ─── Timestamps ──────────────────────────────────────────────────────────────

/// Decode a timestamp column that is either unix seconds or text.
pub fn decode_timestamp(column: &'static str, value: Value) -> Result<DateTime<Utc>> {
  match value {
    Value::Integer(secs) => Utc
      .timestamp_opt(secs, 0)
      .single()
      .ok_or_else(|| Error::DateParse(format!("{column}: {secs} is out of range"))),
    Value::Real(secs) => Utc
      .timestamp_opt(secs as i64, 0)
      .single()
      .ok_or_else(|| Error::DateParse(format!("{column}: {secs} is out of range"))),
    Value::Text(s) => decode_timestamp_text(column, &s),
    Value::Null => Err(Error::ColumnType { column, found: "null" }),
    Value::Blob(_) => Err(Error::ColumnType { column, found: "blob" }),
  }
}

fn decode_timestamp_text(column: &'static str, s: &str) -> Result<DateTime<Utc>> {
  let s = s.trim();
  if let Ok(secs) = s.parse::<i64>() {
    return decode_timestamp(column, Value::Integer(secs));
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  // "2021-03-04 10:11:12.123456+00:00" as written by Python ORMs.
  if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
    .map(|naive| naive.and_utc())
    .map_err(|e| Error::DateParse(format!("{column}: {s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `Boards` row.
pub struct RawBoard {
  pub fingerprint:   String,
  pub name:          String,
  pub owner:         String,
  pub description:   Option<String>,
  pub creation:      Value,
  pub language:      Option<String>,
  pub local_arrival: Value,
}

impl RawBoard {
  pub fn into_board(self) -> Result<Board> {
    Ok(Board {
      fingerprint:       self.fingerprint,
      name:              self.name,
      owner_fingerprint: self.owner,
      description:       self.description.unwrap_or_default(),
      creation:          decode_timestamp("Boards.Creation", self.creation)?,
      language:          self.language.unwrap_or_default(),
      local_arrival:     decode_timestamp("Boards.LocalArrival", self.local_arrival)?,
    })
  }
}

/// Raw values read directly from a `Threads` row.
pub struct RawThread {
  pub fingerprint:   String,
  pub board:         String,
  pub name:          String,
  pub body:          Option<String>,
  pub link:          Option<String>,
  pub owner:         String,
  pub local_arrival: Value,
}

impl RawThread {
  pub fn into_thread(self) -> Result<Thread> {
    Ok(Thread {
      fingerprint:       self.fingerprint,
      board_fingerprint: self.board,
      name:              self.name,
      body:              self.body.unwrap_or_default(),
      // Aether writes an empty string when a thread has no link.
      link:              self.link.filter(|l| !l.trim().is_empty()),
      owner_fingerprint: self.owner,
      local_arrival:     decode_timestamp("Threads.LocalArrival", self.local_arrival)?,
    })
  }
}

/// Raw values read directly from a `Posts` row.
pub struct RawPost {
  pub fingerprint:   String,
  pub board:         String,
  pub thread:        String,
  pub parent:        String,
  pub body:          Option<String>,
  pub owner:         String,
  pub creation:      Value,
  pub local_arrival: Value,
}

impl RawPost {
  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      fingerprint:        self.fingerprint,
      board_fingerprint:  self.board,
      thread_fingerprint: self.thread,
      parent_fingerprint: self.parent,
      body:               self.body.unwrap_or_default(),
      owner_fingerprint:  self.owner,
      creation:           decode_timestamp("Posts.Creation", self.creation)?,
      local_arrival:      decode_timestamp("Posts.LocalArrival", self.local_arrival)?,
    })
  }
}

/// Votes carry no timestamps, so rows map straight onto [`Vote`].
pub fn vote_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Vote> {
  Ok(Vote {
    board_fingerprint:  row.get(0)?,
    thread_fingerprint: row.get(1)?,
    target_fingerprint: row.get(2)?,
    kind:               row.get(3)?,
    class:              row.get(4)?,
  })
}

pub fn public_key_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PublicKey> {
  Ok(PublicKey {
    fingerprint: row.get(0)?,
    name:        row.get::<_, Option<String>>(1)?.unwrap_or_default(),
    key_type:    row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    public_key:  row.get::<_, Option<String>>(3)?.unwrap_or_default(),
  })
}
