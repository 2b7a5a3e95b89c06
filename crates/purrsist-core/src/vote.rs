//! Vote scoring.

use crate::model::Vote;

/// The only vote category that contributes to displayed scores.
pub const CLASS_SIGNAL: i64 = 1;

pub const KIND_UPVOTE: i64 = 1;
pub const KIND_DOWNVOTE: i64 = 2;

/// Reduce the votes cast on a single target to a signed score.
///
/// Votes outside [`CLASS_SIGNAL`], or with an unknown polarity, count as 0.
pub fn score<'a>(votes: impl IntoIterator<Item = &'a Vote>) -> i64 {
  votes
    .into_iter()
    .filter(|v| v.class == CLASS_SIGNAL)
    .map(|v| match v.kind {
      KIND_UPVOTE => 1,
      KIND_DOWNVOTE => -1,
      _ => 0,
    })
    .sum()
}
