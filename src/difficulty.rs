//! Streak-based difficulty control.
//!
//! `advance` is a pure transition: N correct answers in a row raise the level
//! by one, M incorrect in a row lower it by one. Reaching either threshold
//! resets both streaks, even when the level is already at the bound.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::validator::VerificationResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyPolicy {
  pub min_level: u8,
  pub max_level: u8,
  /// Consecutive correct answers that raise the level.
  pub raise_after: u32,
  /// Consecutive incorrect answers that lower the level.
  pub lower_after: u32,
}

impl DifficultyPolicy {
  pub fn clamp(&self, level: u8) -> u8 {
    level.clamp(self.min_level, self.max_level)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyState {
  pub level: u8,
  pub consecutive_correct: u32,
  pub consecutive_incorrect: u32,
  /// Set once a graded answer leaves the learner at the top level.
  pub mastered: bool,
}

impl DifficultyState {
  /// Fresh state at the policy's lowest level.
  pub fn new(policy: &DifficultyPolicy) -> Self {
    Self::at_level(policy.min_level)
  }

  pub fn at_level(level: u8) -> Self {
    Self { level, consecutive_correct: 0, consecutive_incorrect: 0, mastered: false }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelChange {
  Raised,
  Lowered,
  Unchanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
  pub state: DifficultyState,
  pub change: LevelChange,
  /// True only on the first transition that ends at `max_level`.
  pub mastery_reached: bool,
}

pub fn advance(state: &DifficultyState, policy: &DifficultyPolicy, correct: bool) -> Transition {
  let mut next = *state;
  let clamped = policy.clamp(next.level);
  if clamped != next.level {
    debug!(target: "difficulty", from = next.level, to = clamped, "Clamped level into policy bounds");
    next.level = clamped;
  }

  let mut change = LevelChange::Unchanged;

  if correct {
    next.consecutive_correct = next.consecutive_correct.saturating_add(1);
    next.consecutive_incorrect = 0;
    if next.consecutive_correct >= policy.raise_after.max(1) {
      next.consecutive_correct = 0;
      if next.level < policy.max_level {
        next.level += 1;
        change = LevelChange::Raised;
      }
    }
  } else {
    next.consecutive_incorrect = next.consecutive_incorrect.saturating_add(1);
    next.consecutive_correct = 0;
    if next.consecutive_incorrect >= policy.lower_after.max(1) {
      next.consecutive_incorrect = 0;
      if next.level > policy.min_level {
        next.level -= 1;
        change = LevelChange::Lowered;
      }
    }
  }

  // First answer that ends at the top level, whether by a raise, a clamp or a single-level policy.
  let mastery_reached = next.level == policy.max_level && !next.mastered;
  if mastery_reached {
    next.mastered = true;
  }

  if change != LevelChange::Unchanged || mastery_reached {
    debug!(target: "difficulty", from = state.level, to = next.level, ?change, mastery_reached, "Level changed");
  }
  Transition { state: next, change, mastery_reached }
}

/// `advance` driven by a validation result; only `Correct` counts as correct.
pub fn advance_with(state: &DifficultyState, policy: &DifficultyPolicy, result: &VerificationResult) -> Transition {
  advance(state, policy, result.is_correct())
}

#[cfg(test)]
mod tests {
  use super::*;

  const POLICY: DifficultyPolicy = DifficultyPolicy { min_level: 1, max_level: 3, raise_after: 3, lower_after: 2 };

  fn run(answers: &[bool]) -> DifficultyState {
    answers
      .iter()
      .fold(DifficultyState::new(&POLICY), |s, c| advance(&s, &POLICY, *c).state)
  }

  #[test]
  fn three_in_a_row_raises() {
    let s = run(&[true, true]);
    assert_eq!((s.level, s.consecutive_correct), (1, 2));
    let t = advance(&s, &POLICY, true);
    assert_eq!(t.change, LevelChange::Raised);
    assert_eq!(t.state.level, 2);
    assert_eq!(t.state.consecutive_correct, 0);
  }

  #[test]
  fn a_miss_resets_the_correct_streak() {
    let s = run(&[true, true, false, true, true]);
    assert_eq!(s.level, 1);
    assert_eq!(s.consecutive_correct, 2);
  }

  #[test]
  fn two_misses_lower_but_never_below_min() {
    let s = run(&[true, true, true, false, false]);
    assert_eq!(s.level, 1);
    let s = run(&[false, false, false]);
    assert_eq!(s.level, 1);
    assert_eq!(s.consecutive_incorrect, 1);
  }

  #[test]
  fn streaks_reset_at_the_bounds() {
    let t = advance(&run(&[false]), &POLICY, false);
    assert_eq!(t.change, LevelChange::Unchanged);
    assert_eq!((t.state.level, t.state.consecutive_correct, t.state.consecutive_incorrect), (1, 0, 0));

    let top = DifficultyState { level: 3, consecutive_correct: 2, consecutive_incorrect: 0, mastered: true };
    let t = advance(&top, &POLICY, true);
    assert_eq!(t.change, LevelChange::Unchanged);
    assert_eq!((t.state.level, t.state.consecutive_correct, t.state.consecutive_incorrect), (3, 0, 0));
    assert!(!t.mastery_reached);
  }

  #[test]
  fn single_level_policy_reports_mastery_on_first_answer() {
    let policy = DifficultyPolicy { min_level: 2, max_level: 2, ..POLICY };
    let t = advance(&DifficultyState::new(&policy), &policy, false);
    assert!(t.mastery_reached);
    assert!(t.state.mastered);
    assert!(!advance(&t.state, &policy, true).mastery_reached);
  }

  #[test]
  fn mastery_is_reported_once() {
    let policy = DifficultyPolicy { raise_after: 1, ..POLICY };
    let mut s = DifficultyState::new(&policy);
    let mut reports = 0;
    for correct in [true, true, false, true, true, true] {
      let t = advance(&s, &policy, correct);
      reports += t.mastery_reached as u32;
      s = t.state;
    }
    assert_eq!(reports, 1);
    assert!(s.mastered);
    assert_eq!(s.level, 3);
  }

  #[test]
  fn out_of_bounds_level_is_clamped_first() {
    let s = DifficultyState::at_level(5);
    let t = advance(&s, &POLICY, false);
    assert_eq!(t.state.level, 3);
    assert_eq!(t.change, LevelChange::Unchanged);
  }
}
