//! Built-in content: per-family fallback instances and the small word tables
//! used to fill narrative slots.

use crate::domain::{ConversionDirection, Operands, SequenceRule, TopicId, UnitPair};
use crate::number::{Decimal, Fraction};

/// Fixed, always-valid operands served when random sampling runs out of attempts.
///
/// Every entry satisfies the same constraints as a sampled instance of the
/// family at that level. Levels above the family's range reuse the top entry.
pub fn fallback_operands(topic: TopicId, level: u8) -> Operands {
  let tier = level.clamp(1, 3);
  match topic {
    TopicId::MultiplyByZeros => match tier {
      1 => Operands::MultiplyByZeros { a: 40, b: 60 },
      2 => Operands::MultiplyByZeros { a: 90, b: 300 },
      _ => Operands::MultiplyByZeros { a: 120, b: 400 },
    },
    TopicId::AreaModel => match tier {
      1 => Operands::AreaModel { a: 23, b: 14 },
      2 => Operands::AreaModel { a: 47, b: 36 },
      _ => Operands::AreaModel { a: 234, b: 56 },
    },
    TopicId::DivideRemainder => match tier {
      1 => Operands::DivideRemainder { dividend: 58, divisor: 7 },
      2 => Operands::DivideRemainder { dividend: 425, divisor: 6 },
      _ => Operands::DivideRemainder { dividend: 2347, divisor: 8 },
    },
    TopicId::LongDivision => match tier {
      1 => Operands::LongDivision { dividend: 87, divisor: 4 },
      2 => Operands::LongDivision { dividend: 754, divisor: 23 },
      _ => Operands::LongDivision { dividend: 8760, divisor: 125 },
    },
    TopicId::FractionSimplify => match tier {
      1 => Operands::FractionSimplify { fraction: Fraction::of(6, 8) },
      2 => Operands::FractionSimplify { fraction: Fraction::of(18, 24) },
      _ => Operands::FractionSimplify { fraction: Fraction::of(36, 84) },
    },
    TopicId::FractionAdd => match tier {
      1 => Operands::FractionAdd { left: Fraction::of(1, 5), right: Fraction::of(2, 5) },
      2 => Operands::FractionAdd { left: Fraction::of(1, 4), right: Fraction::of(3, 8) },
      _ => Operands::FractionAdd { left: Fraction::of(2, 3), right: Fraction::of(3, 4) },
    },
    TopicId::EquivalentFractions => match tier {
      1 => Operands::EquivalentFractions {
        base: Fraction::of(1, 2),
        options: fractions(&[(2, 4), (2, 3), (3, 6), (3, 5)]),
      },
      2 => Operands::EquivalentFractions {
        base: Fraction::of(2, 3),
        options: fractions(&[(4, 6), (3, 4), (6, 9), (4, 5), (5, 6)]),
      },
      _ => Operands::EquivalentFractions {
        base: Fraction::of(3, 4),
        options: fractions(&[(6, 8), (4, 5), (9, 12), (6, 7), (12, 16), (7, 8)]),
      },
    },
    TopicId::DecimalAdd => match tier {
      1 => Operands::DecimalAdd { left: Decimal::new(23, 1), right: Decimal::new(45, 1) },
      2 => Operands::DecimalAdd { left: Decimal::new(345, 2), right: Decimal::new(127, 2) },
      _ => Operands::DecimalAdd { left: Decimal::new(2375, 3), right: Decimal::new(14, 1) },
    },
    TopicId::DecimalShift => match tier {
      1 => Operands::DecimalShift { value: Decimal::new(37, 1), power: 1, divide: false },
      2 => Operands::DecimalShift { value: Decimal::new(456, 2), power: 2, divide: true },
      _ => Operands::DecimalShift { value: Decimal::new(1234, 3), power: 3, divide: false },
    },
    // Five levels; matched on the raw level rather than the tier.
    TopicId::NumberSequence => match level {
      0 | 1 => Operands::NumberSequence { start: 3, rule: SequenceRule::Add { step: 4 }, shown: 4 },
      2 => Operands::NumberSequence { start: 90, rule: SequenceRule::Add { step: -7 }, shown: 4 },
      3 => Operands::NumberSequence { start: 3, rule: SequenceRule::Multiply { factor: 2 }, shown: 4 },
      4 => Operands::NumberSequence { start: 2, rule: SequenceRule::Multiply { factor: 3 }, shown: 4 },
      _ => Operands::NumberSequence {
        start: 10,
        rule: SequenceRule::Alternate { first: 5, second: -2 },
        shown: 5,
      },
    },
    TopicId::RectangleMeasures => match tier {
      1 => Operands::RectangleMeasures { width: 3, height: 5 },
      2 => Operands::RectangleMeasures { width: 8, height: 12 },
      _ => Operands::RectangleMeasures { width: 15, height: 24 },
    },
    TopicId::UnitConversion => match tier {
      1 => Operands::UnitConversion {
        pair: UnitPair::MetreCentimetre,
        major: 4,
        minor: 0,
        direction: ConversionDirection::ToMinor,
      },
      2 => Operands::UnitConversion {
        pair: UnitPair::KilogramGram,
        major: 3,
        minor: 250,
        direction: ConversionDirection::ToMinor,
      },
      _ => Operands::UnitConversion {
        pair: UnitPair::MetreCentimetre,
        major: 3,
        minor: 45,
        direction: ConversionDirection::ToMajor,
      },
    },
    TopicId::MakingChange => match tier {
      1 => Operands::MakingChange { price_cents: 65, paid_cents: 100 },
      2 => Operands::MakingChange { price_cents: 375, paid_cents: 500 },
      _ => Operands::MakingChange { price_cents: 1260, paid_cents: 2000 },
    },
  }
}

fn fractions(pairs: &[(u64, u64)]) -> Vec<Fraction> {
  pairs.iter().map(|(n, d)| Fraction::of(*n, *d)).collect()
}

/// Things that get shared out in division stories.
pub const SHARED_ITEMS: &[&str] = &["stickers", "marbles", "cookies", "pencils", "stamps", "shells"];

/// Who or what receives an equal share.
pub const SHARE_GROUPS: &[&str] = &["friends", "bags", "boxes", "teams", "tables"];

/// Shop items for change-making stories.
pub const SHOP_ITEMS: &[&str] = &["a notebook", "a sandwich", "a toy car", "a comic", "a bus ticket"];

/// Length units for geometry drawings.
pub const LENGTH_UNITS: &[&str] = &["cm", "m", "in"];
