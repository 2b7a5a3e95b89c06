//! Board and thread selection.
//!
//! Precedence for a board, visited in name order:
//!
//! 1. the first rule whose explicit `fingerprint` equals the board's,
//! 2. otherwise the first fingerprint-less rule whose pattern matches the
//!    whole board name.
//!
//! A board is selected at most once per run.

use std::collections::HashSet;

use purrsist_core::{Board, Thread};
use regex::Regex;

use crate::{
  config::BoardRuleConfig,
  error::{Error, Result},
};

/// A compiled board rule.
#[derive(Debug, Clone)]
pub struct BoardRule {
  /// Anchored to the full board name.
  pub pattern:         Option<Regex>,
  pub fingerprint:     Option<String>,
  /// 0 = unlimited.
  pub max_threads:     usize,
  /// Unanchored; any match drops the thread.
  pub exclude_threads: Vec<Regex>,
}

impl BoardRule {
  pub fn compile(config: &BoardRuleConfig) -> Result<Self> {
    let fingerprint = config
      .fingerprint
      .as_deref()
      .map(str::trim)
      .filter(|f| !f.is_empty())
      .map(str::to_string);

    if config.pattern.is_none() && fingerprint.is_none() {
      return Err(Error::InvalidConfig(
        "board rule needs a pattern or a fingerprint".into(),
      ));
    }

    let pattern = config
      .pattern
      .as_deref()
      .map(|p| compile_regex(&format!("^(?:{p})$"), p))
      .transpose()?;

    let exclude_threads = config
      .exclude_threads
      .iter()
      .map(|p| compile_regex(p, p))
      .collect::<Result<_>>()?;

    Ok(Self {
      pattern,
      fingerprint,
      max_threads: config.max_threads,
      exclude_threads,
    })
  }

  fn matches_name(&self, name: &str) -> bool {
    self.fingerprint.is_none() && self.pattern.as_ref().is_some_and(|p| p.is_match(name))
  }

  fn excludes(&self, thread_name: &str) -> bool {
    self.exclude_threads.iter().any(|re| re.is_match(thread_name))
  }
}

fn compile_regex(source: &str, shown: &str) -> Result<Regex> {
  Regex::new(source).map_err(|e| Error::Pattern { pattern: shown.to_string(), source: e })
}

/// A board chosen for rendering, with the rule that chose it.
#[derive(Debug)]
pub struct Selection<'r> {
  pub board: Board,
  pub rule:  &'r BoardRule,
}

impl Selection<'_> {
  /// The fingerprint used for output paths and feed ids.
  pub fn fingerprint(&self) -> &str {
    self.rule.fingerprint.as_deref().unwrap_or(&self.board.fingerprint)
  }

  /// Apply exclusions, then the thread cap. `threads` arrive newest first and
  /// keep that order.
  pub fn pick_threads(&self, threads: Vec<Thread>) -> Vec<Thread> {
    let kept = threads.into_iter().filter(|t| {
      let excluded = self.rule.excludes(&t.name);
      if excluded {
        tracing::debug!(board = %self.board.fingerprint, thread = %t.fingerprint, "thread excluded");
      }
      !excluded
    });
    match self.rule.max_threads {
      0 => kept.collect(),
      n => kept.take(n).collect(),
    }
  }
}

/// Match `boards` (ordered by name) against `rules`.
pub fn select_boards(boards: Vec<Board>, rules: &[BoardRule]) -> Vec<Selection<'_>> {
  let mut consumed = HashSet::new();
  let mut selected = Vec::new();

  for board in boards {
    if consumed.contains(&board.fingerprint) {
      continue;
    }
    let explicit = rules
      .iter()
      .find(|r| r.fingerprint.as_deref() == Some(board.fingerprint.as_str()));
    let Some(rule) = explicit.or_else(|| rules.iter().find(|r| r.matches_name(&board.name)))
    else {
      tracing::trace!(board = %board.fingerprint, name = %board.name, "no rule matches");
      continue;
    };

    consumed.insert(board.fingerprint.clone());
    tracing::debug!(board = %board.fingerprint, name = %board.name, "board selected");
    selected.push(Selection { board, rule });
  }

  selected
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  fn board(fp: &str, name: &str) -> Board {
    let at = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
    Board {
      fingerprint:       fp.into(),
      name:              name.into(),
      owner_fingerprint: String::new(),
      description:       String::new(),
      creation:          at,
      language:          "en".into(),
      local_arrival:     at,
    }
  }

  fn thread(fp: &str, name: &str) -> Thread {
    Thread {
      fingerprint:       fp.into(),
      board_fingerprint: "b".into(),
      name:              name.into(),
      body:              String::new(),
      link:              None,
      owner_fingerprint: String::new(),
      local_arrival:     Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
    }
  }

  fn rule(pattern: Option<&str>, fingerprint: Option<&str>) -> BoardRule {
    BoardRule::compile(&BoardRuleConfig {
      pattern:         pattern.map(Into::into),
      fingerprint:     fingerprint.map(Into::into),
      max_threads:     0,
      exclude_threads: Vec::new(),
    })
    .unwrap()
  }

  #[test]
  fn explicit_fingerprint_beats_earlier_pattern() {
    let mut by_pattern = rule(Some("Rust"), None);
    by_pattern.max_threads = 5;
    let mut by_fp = rule(None, Some("b-rust"));
    by_fp.max_threads = 9;
    let rules = [by_pattern, by_fp];

    let selected = select_boards(vec![board("b-rust", "Rust")], &rules);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].rule.max_threads, 9);
  }

  #[test]
  fn first_explicit_rule_wins() {
    let mut first = rule(None, Some("b1"));
    first.max_threads = 1;
    let mut second = rule(None, Some("b1"));
    second.max_threads = 2;
    let rules = [first, second];

    let selected = select_boards(vec![board("b1", "One")], &rules);
    assert_eq!(selected[0].rule.max_threads, 1);
  }

  #[test]
  fn board_is_selected_once() {
    let rules = [rule(Some("Rust"), None), rule(Some("R.*"), None)];
    let boards = vec![board("b1", "Rust"), board("b1", "Rust")];
    assert_eq!(select_boards(boards, &rules).len(), 1);
  }

  #[test]
  fn unmatched_boards_are_excluded_and_patterns_are_anchored() {
    let rules = [rule(Some("Rust"), None)];
    let boards = vec![board("b1", "Rustaceans"), board("b2", "Trust"), board("b3", "Rust")];
    let selected = select_boards(boards, &rules);
    let names: Vec<_> = selected.iter().map(|s| s.board.name.as_str()).collect();
    assert_eq!(names, ["Rust"]);
  }

  #[test]
  fn alternation_is_anchored_as_a_whole() {
    let rules = [rule(Some("Rust|Go"), None)];
    let boards = vec![board("b1", "Gopher"), board("b2", "Go"), board("b3", "Rusty")];
    let selected = select_boards(boards, &rules);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].board.name, "Go");
  }

  #[test]
  fn fingerprint_rule_with_pattern_matches_only_by_fingerprint() {
    let rules = [rule(Some(".*"), Some("b9"))];
    let boards = vec![board("b1", "Anything"), board("b9", "Nine")];
    let selected = select_boards(boards, &rules);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].fingerprint(), "b9");
  }

  #[test]
  fn pattern_selection_uses_board_fingerprint() {
    let rules = [rule(Some("Rust"), None)];
    let selected = select_boards(vec![board("b1", "Rust")], &rules);
    assert_eq!(selected[0].fingerprint(), "b1");
  }

  #[test]
  fn exclusion_applies_before_cap() {
    let mut r = rule(Some("Rust"), None);
    r.max_threads = 2;
    r.exclude_threads = vec![Regex::new("(?i)giveaway").unwrap()];
    let rules = [r];
    let selected = select_boards(vec![board("b1", "Rust")], &rules);

    let threads = vec![
      thread("t1", "Free GIVEAWAY inside"),
      thread("t2", "Lifetimes"),
      thread("t3", "giveaway again"),
      thread("t4", "Traits"),
      thread("t5", "Macros"),
    ];
    let picked: Vec<_> = selected[0]
      .pick_threads(threads)
      .into_iter()
      .map(|t| t.fingerprint)
      .collect();
    assert_eq!(picked, ["t2", "t4"]);
  }

  #[test]
  fn zero_cap_is_unlimited() {
    let rules = [rule(Some("Rust"), None)];
    let selected = select_boards(vec![board("b1", "Rust")], &rules);
    let threads = (0..10).map(|i| thread(&format!("t{i}"), "x")).collect();
    assert_eq!(selected[0].pick_threads(threads).len(), 10);
  }

  #[test]
  fn rule_without_pattern_or_fingerprint_is_rejected() {
    let err = BoardRule::compile(&BoardRuleConfig {
      pattern:         None,
      fingerprint:     Some("  ".into()),
      max_threads:     0,
      exclude_threads: Vec::new(),
    })
    .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
  }

  #[test]
  fn invalid_pattern_is_rejected() {
    let err = BoardRule::compile(&BoardRuleConfig {
      pattern:         Some("(".into()),
      fingerprint:     None,
      max_threads:     0,
      exclude_threads: Vec::new(),
    })
    .unwrap_err();
    assert!(matches!(err, Error::Pattern { .. }));
  }
}
