//! Decimal families: column addition and multiplying or dividing by powers of ten.

use rand::Rng;

use super::distractors::{decimal_shift_candidates, select, DISTRACTOR_COUNT};
use crate::domain::{AnswerKey, Operands};
use crate::number::{Decimal, Value};

fn nonzero_last(units: i64) -> bool {
  units % 10 != 0
}

/// Units in `range` at `scale`, redrawn once if the last digit lands on zero.
fn draw_places<R: Rng + ?Sized>(range: std::ops::RangeInclusive<i64>, scale: u32, rng: &mut R) -> Decimal {
  let mut units = rng.gen_range(range.clone());
  if !nonzero_last(units) {
    units = rng.gen_range(range);
  }
  Decimal::new(units, scale)
}

pub(super) fn draw_add<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Operands {
  let (left, right) = match level {
    1 => (draw_places(1..=99, 1, rng), draw_places(1..=99, 1, rng)),
    2 => (draw_places(101..=999, 2, rng), draw_places(1..=999, 2, rng)),
    _ => {
      let fine = draw_places(1001..=9999, 3, rng);
      let coarse = if rng.gen_bool(0.5) {
        draw_places(11..=99, 1, rng)
      } else {
        draw_places(101..=999, 2, rng)
      };
      if rng.gen_bool(0.5) { (fine, coarse) } else { (coarse, fine) }
    }
  };
  Operands::DecimalAdd { left, right }
}

pub(super) fn add_violation(level: u8, left: &Decimal, right: &Decimal) -> Option<&'static str> {
  if left.units <= 0 || right.units <= 0 {
    return Some("addends must be positive");
  }
  if left.is_whole() || right.is_whole() {
    return Some("a whole-number addend skips the decimal point");
  }
  match level {
    1 => {
      if left.scale != 1 || right.scale != 1 || left.units > 99 || right.units > 99 {
        return Some("level 1 adds tenths below ten");
      }
    }
    2 => {
      if left.scale != 2 || right.scale != 2 {
        return Some("level 2 adds hundredths");
      }
      if !nonzero_last(left.units) && !nonzero_last(right.units) {
        return Some("both addends end in zero");
      }
    }
    _ => {
      if left.scale == right.scale {
        return Some("level 3 lines up different numbers of places");
      }
      let fine = if left.scale > right.scale { left } else { right };
      if fine.scale != 3 || !nonzero_last(fine.units) {
        return Some("level 3 needs a thousandths addend");
      }
    }
  }
  None
}

pub(super) fn solve_add(left: &Decimal, right: &Decimal) -> AnswerKey {
  AnswerKey::Single { value: Value::Decimal(left.add(right)) }
}

pub(super) fn draw_shift<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Operands {
  let (value, power, divide) = match level {
    1 => (draw_places(11..=99, 1, rng), rng.gen_range(1..=2), false),
    2 => (draw_places(101..=999, 2, rng), rng.gen_range(1..=2), rng.gen_bool(0.5)),
    _ => (draw_places(1001..=9999, 3, rng), rng.gen_range(1..=3), rng.gen_bool(0.5)),
  };
  Operands::DecimalShift { value, power, divide }
}

pub(super) fn shift_violation(level: u8, value: &Decimal, power: u32, divide: bool) -> Option<&'static str> {
  let (scale, units, powers) = match level {
    1 => (1, 11..=99, 1..=2),
    2 => (2, 101..=999, 1..=2),
    _ => (3, 1001..=9999, 1..=3),
  };
  if value.scale != scale || !units.contains(&value.units) || !nonzero_last(value.units) {
    return Some("value size does not match the level");
  }
  if !powers.contains(&power) {
    return Some("power of ten does not match the level");
  }
  if level == 1 && divide {
    return Some("level 1 only multiplies");
  }
  if select(shift_answer(value, power, divide), decimal_shift_candidates(*value, power, divide)).len()
    < DISTRACTOR_COUNT
  {
    return Some("not enough distinct distractors");
  }
  None
}

fn shift_answer(value: &Decimal, power: u32, divide: bool) -> Value {
  let places = if divide { -(power as i32) } else { power as i32 };
  Value::Decimal(value.shift(places))
}

pub(super) fn solve_shift(value: &Decimal, power: u32, divide: bool) -> AnswerKey {
  let correct = shift_answer(value, power, divide);
  AnswerKey::MultipleChoice {
    correct,
    distractors: select(correct, decimal_shift_candidates(*value, power, divide)),
  }
}
