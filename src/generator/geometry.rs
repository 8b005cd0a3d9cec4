//! Rectangle area and perimeter.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{AnswerKey, Operands, PartKey};
use crate::number::Value;
use crate::seeds::LENGTH_UNITS;

fn sides(level: u8) -> RangeInclusive<u64> {
  match level {
    1 => 2..=10,
    2 => 6..=25,
    _ => 12..=60,
  }
}

pub(super) fn draw<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Operands {
  Operands::RectangleMeasures {
    width: rng.gen_range(sides(level)),
    height: rng.gen_range(sides(level)),
  }
}

pub(super) fn violation(level: u8, width: u64, height: u64) -> Option<&'static str> {
  let range = sides(level);
  if !range.contains(&width) || !range.contains(&height) {
    return Some("side length does not match the level");
  }
  if width == height {
    return Some("squares are a separate lesson");
  }
  // 4 × 4 and 3 × 6 style shapes blur the two measures
  if width * height == 2 * (width + height) {
    return Some("area equals perimeter");
  }
  None
}

pub(super) fn solve(width: u64, height: u64) -> AnswerKey {
  AnswerKey::MultiPart {
    parts: vec![
      PartKey { label: "area".into(), value: Value::Whole((width * height) as i64) },
      PartKey { label: "perimeter".into(), value: Value::Whole((2 * (width + height)) as i64) },
    ],
  }
}

pub(super) fn narrate<R: Rng + ?Sized>(rng: &mut R) -> BTreeMap<String, String> {
  let unit = LENGTH_UNITS.choose(rng).copied().unwrap_or("cm");
  BTreeMap::from([("unit".to_string(), unit.to_string())])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn area_and_perimeter() {
    assert_eq!(violation(2, 8, 12), None);
    let AnswerKey::MultiPart { parts } = solve(8, 12) else {
      panic!("expected multi-part");
    };
    assert_eq!(parts[0].value, Value::Whole(96));
    assert_eq!(parts[1].value, Value::Whole(40));
  }

  #[test]
  fn squares_and_coincident_measures_are_rejected() {
    assert!(violation(1, 5, 5).is_some());
    assert_eq!(violation(1, 3, 6), Some("area equals perimeter"));
  }
}
