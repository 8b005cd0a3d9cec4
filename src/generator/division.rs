//! Division families: one-digit divisors with a remainder to interpret, and long division.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{AnswerKey, Operands};
use crate::number::Value;
use crate::seeds::{SHARED_ITEMS, SHARE_GROUPS};

fn remainder_dividends(level: u8) -> RangeInclusive<u64> {
  match level {
    1 => 10..=99,
    2 => 100..=999,
    _ => 1000..=9999,
  }
}

pub(super) fn draw_remainder<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Operands {
  Operands::DivideRemainder {
    dividend: rng.gen_range(remainder_dividends(level)),
    divisor: rng.gen_range(2..=9),
  }
}

pub(super) fn remainder_violation(level: u8, dividend: u64, divisor: u64) -> Option<&'static str> {
  if !(2..=9).contains(&divisor) {
    return Some("divisor must be a single digit from 2 to 9");
  }
  if !remainder_dividends(level).contains(&dividend) {
    return Some("dividend size does not match the level");
  }
  if level == 1 && dividend >= divisor * 10 {
    return Some("level 1 keeps the quotient to one digit");
  }
  if dividend % divisor == 0 {
    return Some("no remainder to interpret");
  }
  None
}

/// The question is "how many are left over?", so the answer is the remainder alone.
pub(super) fn solve_remainder(dividend: u64, divisor: u64) -> AnswerKey {
  AnswerKey::Single { value: Value::Whole((dividend % divisor) as i64) }
}

pub(super) fn narrate_remainder<R: Rng + ?Sized>(rng: &mut R) -> BTreeMap<String, String> {
  let item = SHARED_ITEMS.choose(rng).copied().unwrap_or("stickers");
  let group = SHARE_GROUPS.choose(rng).copied().unwrap_or("friends");
  BTreeMap::from([
    ("item".to_string(), item.to_string()),
    ("group".to_string(), group.to_string()),
  ])
}

fn long_ranges(level: u8) -> (RangeInclusive<u64>, RangeInclusive<u64>) {
  match level {
    1 => (20..=99, 2..=9),
    2 => (100..=999, 11..=99),
    _ => (1000..=9999, 101..=999),
  }
}

pub(super) fn draw_long<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Operands {
  let (dividends, divisors) = long_ranges(level);
  Operands::LongDivision {
    dividend: rng.gen_range(dividends),
    divisor: rng.gen_range(divisors),
  }
}

pub(super) fn long_violation(level: u8, dividend: u64, divisor: u64) -> Option<&'static str> {
  let (dividends, _) = long_ranges(level);
  let divisor_digits = match level {
    1 => 2..=9,
    2 => 10..=99,
    _ => 100..=999,
  };
  if !divisor_digits.contains(&divisor) {
    return Some("divisor size does not match the level");
  }
  if !dividends.contains(&dividend) {
    return Some("dividend size does not match the level");
  }
  if dividend / divisor < 2 {
    return Some("quotient below two");
  }
  None
}

pub(super) fn solve_long(dividend: u64, divisor: u64) -> AnswerKey {
  AnswerKey::QuotientRemainder { quotient: dividend / divisor, remainder: dividend % divisor }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fifty_eight_shared_by_seven_leaves_two() {
    assert_eq!(remainder_violation(1, 58, 7), None);
    assert_eq!(solve_remainder(58, 7), AnswerKey::Single { value: Value::Whole(2) });
  }

  #[test]
  fn remainder_family_rejects_exact_division() {
    assert_eq!(remainder_violation(1, 56, 7), Some("no remainder to interpret"));
    assert!(remainder_violation(1, 95, 7).is_some());
    assert!(remainder_violation(2, 58, 7).is_some());
  }

  #[test]
  fn long_division_ranges() {
    assert_eq!(long_violation(1, 87, 4), None);
    assert_eq!(long_violation(2, 754, 23), None);
    assert_eq!(long_violation(3, 8760, 125), None);
    assert!(long_violation(3, 1100, 999).is_some());
    assert_eq!(
      solve_long(8760, 125),
      AnswerKey::QuotientRemainder { quotient: 70, remainder: 10 }
    );
  }
}
