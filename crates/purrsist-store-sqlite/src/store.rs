//! [`SqliteStore`], the SQLite implementation of [`ForumStore`].

use std::path::Path;

use rusqlite::{OpenFlags, OptionalExtension as _};

use purrsist_core::{
  Board, Post, PublicKey, Thread, Vote, store::ForumStore,
};

use crate::{
  Result,
  encode::{RawBoard, RawPost, RawThread, public_key_from_row, vote_from_row},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A read-only view of an Aether backend database.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open the database at `path` read-only. The file must already exist.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open_with_flags(
      path,
      OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .await?;
    tracing::debug!(path = %path.display(), "opened database read-only");
    Ok(Self { conn })
  }

  /// Open an empty in-memory store with the Aether table layout, useful
  /// for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn })
  }

  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ForumStore impl ─────────────────────────────────────────────────────────

impl ForumStore for SqliteStore {
  type Error = crate::Error;

  async fn list_boards(&self) -> Result<Vec<Board>> {
    let raws: Vec<RawBoard> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT Fingerprint, Name, Owner, Description, Creation, Language, LocalArrival
           FROM Boards
           ORDER BY Name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawBoard {
              fingerprint:   row.get(0)?,
              name:          row.get(1)?,
              owner:         row.get(2)?,
              description:   row.get(3)?,
              creation:      row.get(4)?,
              language:      row.get(5)?,
              local_arrival: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBoard::into_board).collect()
  }

  async fn list_threads(&self, board: &str) -> Result<Vec<Thread>> {
    let board = board.to_owned();

    let raws: Vec<RawThread> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT Fingerprint, Board, Name, Body, Link, Owner, LocalArrival
           FROM Threads
           WHERE Board = ?1
           ORDER BY LocalArrival DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![board], |row| {
            Ok(RawThread {
              fingerprint:   row.get(0)?,
              board:         row.get(1)?,
              name:          row.get(2)?,
              body:          row.get(3)?,
              link:          row.get(4)?,
              owner:         row.get(5)?,
              local_arrival: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawThread::into_thread).collect()
  }

  async fn list_replies(&self, thread: &str, parent: &str) -> Result<Vec<Post>> {
    let thread = thread.to_owned();
    let parent = parent.to_owned();

    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT Fingerprint, Board, Thread, Parent, Body, Owner, Creation, LocalArrival
           FROM Posts
           WHERE Thread = ?1 AND Parent = ?2
           ORDER BY Creation, rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![thread, parent], |row| {
            Ok(RawPost {
              fingerprint:   row.get(0)?,
              board:         row.get(1)?,
              thread:        row.get(2)?,
              parent:        row.get(3)?,
              body:          row.get(4)?,
              owner:         row.get(5)?,
              creation:      row.get(6)?,
              local_arrival: row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn list_votes(&self, target: &str) -> Result<Vec<Vote>> {
    let target = target.to_owned();

    let votes = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT Board, Thread, Target, Type, TypeClass FROM Votes WHERE Target = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![target], vote_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(votes)
  }

  async fn get_public_key(&self, fingerprint: &str) -> Result<Option<PublicKey>> {
    let fingerprint = fingerprint.to_owned();

    let key = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT Fingerprint, Name, Type, PublicKey FROM PublicKeys WHERE Fingerprint = ?1",
              rusqlite::params![fingerprint],
              public_key_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(key)
  }
}
