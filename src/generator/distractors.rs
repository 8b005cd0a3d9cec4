//! Multiple-choice distractors.
//!
//! Each strategy is a pure function of the correct computation. Candidates are
//! listed in priority order; [`select`] deduplicates them and caps the count.

use crate::domain::{Distractor, DistractorStrategy};
use crate::number::{Decimal, Value};
use crate::util::{digit_count, pow10, strip_trailing_zeros};

/// Distractors per multiple-choice problem (so four options in total).
pub const DISTRACTOR_COUNT: usize = 3;

/// Keep the first [`DISTRACTOR_COUNT`] candidates that are non-negative,
/// differ from `correct` and from each other.
pub fn select(correct: Value, candidates: impl IntoIterator<Item = Distractor>) -> Vec<Distractor> {
  let mut out: Vec<Distractor> = Vec::with_capacity(DISTRACTOR_COUNT);
  for candidate in candidates {
    if out.len() == DISTRACTOR_COUNT {
      break;
    }
    if candidate.value.is_negative()
      || candidate.value == correct
      || out.iter().any(|d| d.value == candidate.value)
    {
      continue;
    }
    out.push(candidate);
  }
  out
}

fn whole(value: u64, strategy: DistractorStrategy) -> Distractor {
  Distractor { value: Value::Whole(value as i64), strategy }
}

fn decimal(value: Decimal, strategy: DistractorStrategy) -> Distractor {
  Distractor { value: Value::Decimal(value), strategy }
}

/// Mistakes learners make multiplying numbers that end in zero, e.g. `90 × 300`.
pub fn zero_product_candidates(a: u64, b: u64) -> Vec<Distractor> {
  let product = a * b;
  let (core_a, zeros_a) = strip_trailing_zeros(a);
  let (core_b, zeros_b) = strip_trailing_zeros(b);
  let zeros = pow10(zeros_a + zeros_b);

  // "9 and 3 make 93"
  let concatenated = core_a * pow10(digit_count(core_b)) + core_b;
  let slipped = if core_a > 1 { core_a - 1 } else { core_a + 1 };

  vec![
    whole(product / 10, DistractorStrategy::WrongZeroCount),
    whole(product * 10, DistractorStrategy::WrongZeroCount),
    whole(a + b, DistractorStrategy::WrongOperation),
    whole(concatenated * zeros, DistractorStrategy::DigitConcatenation),
    whole(slipped * core_b * zeros, DistractorStrategy::OffByOne),
  ]
}

/// Mistakes moving the decimal point for `value × 10^power` (or `÷` when `divide`).
pub fn decimal_shift_candidates(value: Decimal, power: u32, divide: bool) -> Vec<Distractor> {
  let dir: i32 = if divide { -1 } else { 1 };
  let places = dir * power as i32;
  let short_or_far = if power > 1 { places - dir } else { places + 2 * dir };

  vec![
    decimal(value.shift(places + dir), DistractorStrategy::DecimalShift),
    decimal(value.shift(short_or_far), DistractorStrategy::DecimalShift),
    decimal(value.shift(-places), DistractorStrategy::WrongDirection),
    decimal(value.add(&Decimal::from_whole(pow10(power) as i64)), DistractorStrategy::WrongOperation),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_products_always_yield_three_distinct_distractors() {
    for (a, b) in [(90, 300), (20, 20), (10, 10), (120, 400), (2000, 30)] {
      let correct = Value::Whole((a * b) as i64);
      let picked = select(correct, zero_product_candidates(a, b));
      assert_eq!(picked.len(), DISTRACTOR_COUNT, "{a} × {b}");
      assert!(picked.iter().all(|d| d.value != correct));
    }
  }

  #[test]
  fn duplicate_candidates_are_skipped() {
    // 20 × 20: 400 / 10 == 20 + 20
    let picked = select(Value::Whole(400), zero_product_candidates(20, 20));
    let values: Vec<String> = picked.iter().map(|d| d.value.to_string()).collect();
    assert_eq!(values, vec!["40", "4000", "2200"]);
  }

  #[test]
  fn decimal_shift_distractors_differ_from_answer() {
    let value = Decimal::new(456, 2);
    let correct = Value::Decimal(value.shift(-2));
    let picked = select(correct, decimal_shift_candidates(value, 2, true));
    assert_eq!(picked.len(), DISTRACTOR_COUNT);
    assert_eq!(picked[0].strategy, DistractorStrategy::DecimalShift);
    assert_eq!(picked[0].value.to_string(), "0.00456");
    assert_eq!(picked[2].strategy, DistractorStrategy::WrongDirection);
    assert_eq!(picked[2].value.to_string(), "456");
  }
}
