//! Multiplication families: numbers ending in zero (multiple choice) and the area model.

use std::collections::BTreeMap;

use rand::Rng;

use super::distractors::{select, zero_product_candidates};
use crate::domain::{AnswerKey, Operands, PartKey};
use crate::number::Value;
use crate::util::{pow10, split_leading, strip_trailing_zeros};

pub(super) fn draw_zeros<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Operands {
  let (a, b) = match level {
    1 => (rng.gen_range(2..=9u64) * 10, rng.gen_range(2..=9u64) * 10),
    2 => (
      rng.gen_range(2..=9u64) * pow10(rng.gen_range(1..=2)),
      rng.gen_range(2..=9u64) * pow10(rng.gen_range(1..=2)),
    ),
    _ => {
      let big = rng.gen_range(11..=99u64) * pow10(rng.gen_range(1..=2));
      let small = rng.gen_range(2..=9u64) * pow10(rng.gen_range(1..=3));
      if rng.gen_bool(0.5) { (big, small) } else { (small, big) }
    }
  };
  Operands::MultiplyByZeros { a, b }
}

pub(super) fn zeros_violation(level: u8, a: u64, b: u64) -> Option<&'static str> {
  let (core_a, zeros_a) = strip_trailing_zeros(a);
  let (core_b, zeros_b) = strip_trailing_zeros(b);
  if zeros_a == 0 || zeros_b == 0 {
    return Some("both factors must end in zero");
  }
  if core_a < 2 || core_b < 2 {
    return Some("a factor of one hides the pattern");
  }
  let total = zeros_a + zeros_b;
  let widest = core_a.max(core_b);
  let fits = match level {
    1 => zeros_a == 1 && zeros_b == 1 && widest <= 9,
    2 => (3..=4).contains(&total) && widest <= 9,
    _ => (3..=5).contains(&total) && (10..=99).contains(&widest),
  };
  if !fits {
    return Some(match level {
      1 => "level 1 uses one zero on each single-digit factor",
      2 => "level 2 uses single-digit factors with three or four zeros",
      _ => "level 3 needs a two-digit factor and three to five zeros",
    });
  }
  None
}

pub(super) fn solve_zeros(a: u64, b: u64) -> AnswerKey {
  let correct = Value::Whole((a * b) as i64);
  AnswerKey::MultipleChoice {
    correct,
    distractors: select(correct, zero_product_candidates(a, b)),
  }
}

pub(super) fn draw_area<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Operands {
  let (a, b) = match level {
    1 => (rng.gen_range(11..=39), rng.gen_range(11..=39)),
    2 => (rng.gen_range(11..=99), rng.gen_range(11..=99)),
    _ => (rng.gen_range(101..=999), rng.gen_range(11..=99)),
  };
  Operands::AreaModel { a, b }
}

pub(super) fn area_violation(level: u8, a: u64, b: u64) -> Option<&'static str> {
  let in_range = match level {
    1 => (11..=39).contains(&a) && (11..=39).contains(&b),
    2 => (10..=99).contains(&a) && (10..=99).contains(&b),
    _ => (100..=999).contains(&a) && (10..=99).contains(&b),
  };
  if !in_range {
    return Some("factor size does not match the level");
  }
  if split_leading(a).1 == 0 || split_leading(b).1 == 0 {
    return Some("a sub-rectangle would have zero area");
  }
  None
}

/// Four partial products (leading × leading, leading × rest, rest × leading, rest × rest) and the total.
pub(super) fn solve_area(a: u64, b: u64) -> AnswerKey {
  let (a_hi, a_lo) = split_leading(a);
  let (b_hi, b_lo) = split_leading(b);
  let part = |x: u64, y: u64| PartKey { label: format!("{x} × {y}"), value: Value::Whole((x * y) as i64) };
  AnswerKey::MultiPart {
    parts: vec![
      part(a_hi, b_hi),
      part(a_hi, b_lo),
      part(a_lo, b_hi),
      part(a_lo, b_lo),
      PartKey { label: "total".into(), value: Value::Whole((a * b) as i64) },
    ],
  }
}

pub(super) fn narrate_area(a: u64, b: u64) -> BTreeMap<String, String> {
  let (a_hi, a_lo) = split_leading(a);
  let (b_hi, b_lo) = split_leading(b);
  BTreeMap::from([
    ("a_split".to_string(), format!("{a_hi} + {a_lo}")),
    ("b_split".to_string(), format!("{b_hi} + {b_lo}")),
  ])
}
