//! Number sequences: find the next term. Five levels, from small steps up to alternating rules.

use rand::Rng;

use crate::domain::{AnswerKey, Operands, SequenceRule};
use crate::number::Value;

pub(super) fn draw<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Operands {
  let (start, rule, shown) = match level {
    1 => (rng.gen_range(0..=20), SequenceRule::Add { step: rng.gen_range(2..=10) }, 4),
    2 => {
      let step = if rng.gen_bool(0.5) { rng.gen_range(11..=25) } else { -rng.gen_range(2..=9i64) };
      (rng.gen_range(50..=100), SequenceRule::Add { step }, 4)
    }
    3 => {
      if rng.gen_bool(0.5) {
        (rng.gen_range(100..=200), SequenceRule::Add { step: -rng.gen_range(11..=25i64) }, 4)
      } else {
        (rng.gen_range(1..=10), SequenceRule::Multiply { factor: 2 }, 4)
      }
    }
    4 => (rng.gen_range(2..=9), SequenceRule::Multiply { factor: rng.gen_range(2..=3) }, 4),
    _ => {
      let first = rng.gen_range(2..=9i64);
      let mut second = rng.gen_range(-9..=8i64);
      if second >= 0 {
        second += 1;
      }
      (rng.gen_range(10..=30), SequenceRule::Alternate { first, second }, 5)
    }
  };
  Operands::NumberSequence { start, rule, shown }
}

pub(super) fn violation(level: u8, start: i64, rule: &SequenceRule, shown: usize) -> Option<&'static str> {
  let fits = match (level, *rule) {
    (1, SequenceRule::Add { step }) => (2..=10).contains(&step) && (0..=20).contains(&start),
    (2, SequenceRule::Add { step }) => {
      ((11..=25).contains(&step) || (-9..=-2).contains(&step)) && (50..=100).contains(&start)
    }
    (3, SequenceRule::Add { step }) => (-25..=-11).contains(&step) && (100..=200).contains(&start),
    (3, SequenceRule::Multiply { factor }) => factor == 2 && (1..=10).contains(&start),
    (4, SequenceRule::Multiply { factor }) => (2..=3).contains(&factor) && (2..=9).contains(&start),
    (5, SequenceRule::Alternate { first, second }) => {
      first != second && first != 0 && second != 0 && (10..=30).contains(&start)
    }
    _ => false,
  };
  if !fits {
    return Some("rule does not match the level");
  }
  let expected_shown = if level >= 5 { 5 } else { 4 };
  if shown != expected_shown {
    return Some("wrong number of shown terms");
  }
  // the hidden next term counts too
  if (0..=shown).any(|i| rule.term(start, i) < 0) {
    return Some("sequence goes negative");
  }
  None
}

pub(super) fn solve(start: i64, rule: &SequenceRule, shown: usize) -> AnswerKey {
  AnswerKey::Single { value: Value::Whole(rule.term(start, shown)) }
}
