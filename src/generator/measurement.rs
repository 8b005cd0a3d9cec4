//! Measurement families: converting between units and making change.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{AnswerKey, ConversionDirection, Operands, UnitPair};
use crate::number::{Decimal, Value};
use crate::seeds::SHOP_ITEMS;
use crate::util::{is_power_of_ten, round_up_to_friendly, trailing_zeros};

pub(super) fn draw_units<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Operands {
  let decimal_pairs: Vec<UnitPair> = UnitPair::ALL.into_iter().filter(|p| is_power_of_ten(p.ratio())).collect();
  let pair = if level >= 3 {
    decimal_pairs.choose(rng).copied().unwrap_or(UnitPair::MetreCentimetre)
  } else {
    UnitPair::ALL.choose(rng).copied().unwrap_or(UnitPair::MetreCentimetre)
  };
  let (major, minor, direction) = match level {
    1 => (rng.gen_range(2..=9), 0, ConversionDirection::ToMinor),
    2 => (rng.gen_range(1..=9), rng.gen_range(1..pair.ratio()), ConversionDirection::ToMinor),
    _ => (rng.gen_range(1..=9), rng.gen_range(1..pair.ratio()), ConversionDirection::ToMajor),
  };
  Operands::UnitConversion { pair, major, minor, direction }
}

pub(super) fn units_violation(
  level: u8,
  pair: UnitPair,
  major: u64,
  minor: u64,
  direction: ConversionDirection,
) -> Option<&'static str> {
  if minor >= pair.ratio() {
    return Some("minor part must be less than one major unit");
  }
  let fits = match level {
    1 => direction == ConversionDirection::ToMinor && minor == 0 && (2..=9).contains(&major),
    2 => direction == ConversionDirection::ToMinor && minor > 0 && (1..=9).contains(&major),
    _ => {
      direction == ConversionDirection::ToMajor
        && minor > 0
        && (1..=9).contains(&major)
        && is_power_of_ten(pair.ratio())
    }
  };
  if !fits {
    return Some("conversion does not match the level");
  }
  None
}

pub(super) fn solve_units(pair: UnitPair, major: u64, minor: u64, direction: ConversionDirection) -> AnswerKey {
  let total_minor = major * pair.ratio() + minor;
  let value = match direction {
    ConversionDirection::ToMinor => Value::Whole(total_minor as i64),
    ConversionDirection::ToMajor => {
      Value::Decimal(Decimal::new(total_minor as i64, trailing_zeros(pair.ratio())))
    }
  };
  AnswerKey::Single { value }
}

pub(super) fn narrate_units(pair: UnitPair, direction: ConversionDirection) -> BTreeMap<String, String> {
  let (from, to) = match direction {
    ConversionDirection::ToMinor => (pair.major(), pair.minor()),
    ConversionDirection::ToMajor => (pair.minor(), pair.major()),
  };
  BTreeMap::from([
    ("from_unit".to_string(), from.to_string()),
    ("to_unit".to_string(), to.to_string()),
  ])
}

const LEVEL_THREE_NOTES: [u64; 2] = [2000, 5000];

pub(super) fn draw_change<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Operands {
  let (price_cents, paid_cents) = match level {
    1 => (rng.gen_range(1..=19u64) * 5, 100),
    2 => {
      let price = rng.gen_range(101..=999);
      (price, round_up_to_friendly(price, &[500, 1000]).unwrap_or(1000))
    }
    _ => {
      let price = rng.gen_range(1001..=4999);
      let notes: Vec<u64> = LEVEL_THREE_NOTES.into_iter().filter(|n| *n >= price).collect();
      (price, notes.choose(rng).copied().unwrap_or(5000))
    }
  };
  Operands::MakingChange { price_cents, paid_cents }
}

pub(super) fn change_violation(level: u8, price_cents: u64, paid_cents: u64) -> Option<&'static str> {
  if paid_cents <= price_cents {
    return Some("no change due");
  }
  let fits = match level {
    1 => price_cents % 5 == 0 && (5..=95).contains(&price_cents) && paid_cents == 100,
    2 => {
      (101..=999).contains(&price_cents)
        && round_up_to_friendly(price_cents, &[500, 1000]) == Some(paid_cents)
    }
    _ => (1001..=4999).contains(&price_cents) && LEVEL_THREE_NOTES.contains(&paid_cents),
  };
  if !fits {
    return Some("amounts do not match the level");
  }
  None
}

pub(super) fn solve_change(price_cents: u64, paid_cents: u64) -> AnswerKey {
  AnswerKey::Single { value: Value::Decimal(Decimal::from_cents((paid_cents - price_cents) as i64)) }
}

pub(super) fn narrate_change<R: Rng + ?Sized>(rng: &mut R) -> BTreeMap<String, String> {
  let item = SHOP_ITEMS.choose(rng).copied().unwrap_or("a notebook");
  BTreeMap::from([
    ("item".to_string(), item.to_string()),
    ("currency".to_string(), "$".to_string()),
  ])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn metres_and_centimetres_to_metres() {
    let key = solve_units(UnitPair::MetreCentimetre, 3, 45, ConversionDirection::ToMajor);
    assert_eq!(key.display(), "3.45");
    let key = solve_units(UnitPair::KilogramGram, 3, 250, ConversionDirection::ToMinor);
    assert_eq!(key, AnswerKey::Single { value: Value::Whole(3250) });
  }

  #[test]
  fn hours_never_convert_to_decimals() {
    assert!(units_violation(3, UnitPair::HourMinute, 2, 30, ConversionDirection::ToMajor).is_some());
    assert_eq!(units_violation(2, UnitPair::HourMinute, 2, 30, ConversionDirection::ToMinor), None);
  }

  #[test]
  fn change_is_money_with_two_places() {
    assert_eq!(change_violation(2, 375, 500), None);
    assert_eq!(solve_change(375, 500).display(), "1.25");
    assert_eq!(solve_change(65, 100).display(), "0.35");
    assert!(change_violation(2, 375, 1000).is_some());
    assert_eq!(change_violation(1, 100, 100), Some("no change due"));
  }
}
