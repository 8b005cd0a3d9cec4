//! Domain models: topic families, typed operands, answer keys and the problem instance itself.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::number::{Decimal, Fraction, Value};

/// Registered problem families. Serialized as the kebab-case slug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopicId {
  MultiplyByZeros,
  AreaModel,
  DivideRemainder,
  LongDivision,
  FractionSimplify,
  FractionAdd,
  EquivalentFractions,
  DecimalAdd,
  DecimalShift,
  NumberSequence,
  RectangleMeasures,
  UnitConversion,
  MakingChange,
}

impl TopicId {
  pub const ALL: [TopicId; 13] = [
    TopicId::MultiplyByZeros,
    TopicId::AreaModel,
    TopicId::DivideRemainder,
    TopicId::LongDivision,
    TopicId::FractionSimplify,
    TopicId::FractionAdd,
    TopicId::EquivalentFractions,
    TopicId::DecimalAdd,
    TopicId::DecimalShift,
    TopicId::NumberSequence,
    TopicId::RectangleMeasures,
    TopicId::UnitConversion,
    TopicId::MakingChange,
  ];

  pub fn slug(&self) -> &'static str {
    match self {
      TopicId::MultiplyByZeros => "multiply-by-zeros",
      TopicId::AreaModel => "area-model",
      TopicId::DivideRemainder => "divide-remainder",
      TopicId::LongDivision => "long-division",
      TopicId::FractionSimplify => "fraction-simplify",
      TopicId::FractionAdd => "fraction-add",
      TopicId::EquivalentFractions => "equivalent-fractions",
      TopicId::DecimalAdd => "decimal-add",
      TopicId::DecimalShift => "decimal-shift",
      TopicId::NumberSequence => "number-sequence",
      TopicId::RectangleMeasures => "rectangle-measures",
      TopicId::UnitConversion => "unit-conversion",
      TopicId::MakingChange => "making-change",
    }
  }

  /// Levels the generator knows how to produce. Configuration may narrow this, never widen it.
  pub fn supported_levels(&self) -> (u8, u8) {
    match self {
      TopicId::NumberSequence => (1, 5),
      _ => (1, 3),
    }
  }
}

impl fmt::Display for TopicId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.slug())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown topic `{0}`")]
pub struct UnknownTopic(pub String);

impl FromStr for TopicId {
  type Err = UnknownTopic;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let slug = s.trim().to_ascii_lowercase();
    if let Some(topic) = TopicId::ALL.iter().find(|t| t.slug() == slug) {
      return Ok(*topic);
    }
    // Names the widgets used before the families were consolidated.
    match slug.as_str() {
      "multiply-numbers-ending-in-zero" => Ok(TopicId::MultiplyByZeros),
      "divide-by-one-digit" | "remainder-interpretation" => Ok(TopicId::DivideRemainder),
      "fraction-lowest-terms" => Ok(TopicId::FractionSimplify),
      _ => Err(UnknownTopic(s.to_string())),
    }
  }
}

/// Rule that produces each next term of a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SequenceRule {
  Add { step: i64 },
  Multiply { factor: i64 },
  /// Steps applied in turn: first, second, first, ...
  Alternate { first: i64, second: i64 },
}

impl SequenceRule {
  /// Term at `index` (0-based) starting from `start`.
  pub fn term(&self, start: i64, index: usize) -> i64 {
    let mut value = start;
    for i in 0..index {
      value = match *self {
        SequenceRule::Add { step } => value + step,
        SequenceRule::Multiply { factor } => value * factor,
        SequenceRule::Alternate { first, second } => value + if i % 2 == 0 { first } else { second },
      };
    }
    value
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitPair {
  MetreCentimetre,
  CentimetreMillimetre,
  KilometreMetre,
  KilogramGram,
  LitreMillilitre,
  HourMinute,
}

impl UnitPair {
  pub const ALL: [UnitPair; 6] = [
    UnitPair::MetreCentimetre,
    UnitPair::CentimetreMillimetre,
    UnitPair::KilometreMetre,
    UnitPair::KilogramGram,
    UnitPair::LitreMillilitre,
    UnitPair::HourMinute,
  ];

  /// How many minor units make one major unit.
  pub fn ratio(&self) -> u64 {
    match self {
      UnitPair::MetreCentimetre => 100,
      UnitPair::CentimetreMillimetre => 10,
      UnitPair::KilometreMetre | UnitPair::KilogramGram | UnitPair::LitreMillilitre => 1000,
      UnitPair::HourMinute => 60,
    }
  }

  pub fn major(&self) -> &'static str {
    match self {
      UnitPair::MetreCentimetre => "m",
      UnitPair::CentimetreMillimetre => "cm",
      UnitPair::KilometreMetre => "km",
      UnitPair::KilogramGram => "kg",
      UnitPair::LitreMillilitre => "L",
      UnitPair::HourMinute => "h",
    }
  }

  pub fn minor(&self) -> &'static str {
    match self {
      UnitPair::MetreCentimetre => "cm",
      UnitPair::CentimetreMillimetre => "mm",
      UnitPair::KilometreMetre => "m",
      UnitPair::KilogramGram => "g",
      UnitPair::LitreMillilitre => "mL",
      UnitPair::HourMinute => "min",
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionDirection {
  /// `3 m 45 cm -> ? cm`
  ToMinor,
  /// `345 cm -> ? m`
  ToMajor,
}

/// Typed operands, one variant per family.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "kebab-case")]
pub enum Operands {
  MultiplyByZeros { a: u64, b: u64 },
  AreaModel { a: u64, b: u64 },
  DivideRemainder { dividend: u64, divisor: u64 },
  LongDivision { dividend: u64, divisor: u64 },
  FractionSimplify { fraction: Fraction },
  FractionAdd { left: Fraction, right: Fraction },
  EquivalentFractions { base: Fraction, options: Vec<Fraction> },
  DecimalAdd { left: Decimal, right: Decimal },
  DecimalShift { value: Decimal, power: u32, divide: bool },
  NumberSequence { start: i64, rule: SequenceRule, shown: usize },
  RectangleMeasures { width: u64, height: u64 },
  UnitConversion { pair: UnitPair, major: u64, minor: u64, direction: ConversionDirection },
  MakingChange { price_cents: u64, paid_cents: u64 },
}

impl Operands {
  pub fn topic(&self) -> TopicId {
    match self {
      Operands::MultiplyByZeros { .. } => TopicId::MultiplyByZeros,
      Operands::AreaModel { .. } => TopicId::AreaModel,
      Operands::DivideRemainder { .. } => TopicId::DivideRemainder,
      Operands::LongDivision { .. } => TopicId::LongDivision,
      Operands::FractionSimplify { .. } => TopicId::FractionSimplify,
      Operands::FractionAdd { .. } => TopicId::FractionAdd,
      Operands::EquivalentFractions { .. } => TopicId::EquivalentFractions,
      Operands::DecimalAdd { .. } => TopicId::DecimalAdd,
      Operands::DecimalShift { .. } => TopicId::DecimalShift,
      Operands::NumberSequence { .. } => TopicId::NumberSequence,
      Operands::RectangleMeasures { .. } => TopicId::RectangleMeasures,
      Operands::UnitConversion { .. } => TopicId::UnitConversion,
      Operands::MakingChange { .. } => TopicId::MakingChange,
    }
  }

  /// The operands as an ordered sequence of values, in the order a widget shows them.
  pub fn values(&self) -> Vec<Value> {
    let whole = |n: u64| Value::Whole(n as i64);
    match self {
      Operands::MultiplyByZeros { a, b } | Operands::AreaModel { a, b } => vec![whole(*a), whole(*b)],
      Operands::DivideRemainder { dividend, divisor } | Operands::LongDivision { dividend, divisor } => {
        vec![whole(*dividend), whole(*divisor)]
      }
      Operands::FractionSimplify { fraction } => vec![Value::Fraction(*fraction)],
      Operands::FractionAdd { left, right } => vec![Value::Fraction(*left), Value::Fraction(*right)],
      Operands::EquivalentFractions { base, options } => std::iter::once(base)
        .chain(options.iter())
        .map(|f| Value::Fraction(*f))
        .collect(),
      Operands::DecimalAdd { left, right } => vec![Value::Decimal(*left), Value::Decimal(*right)],
      Operands::DecimalShift { value, power, .. } => vec![Value::Decimal(*value), whole(10u64.pow(*power))],
      Operands::NumberSequence { start, rule, shown } => {
        (0..*shown).map(|i| Value::Whole(rule.term(*start, i))).collect()
      }
      Operands::RectangleMeasures { width, height } => vec![whole(*width), whole(*height)],
      Operands::UnitConversion { pair, major, minor, direction } => match direction {
        ConversionDirection::ToMinor => vec![whole(*major), whole(*minor)],
        ConversionDirection::ToMajor => vec![whole(major * pair.ratio() + minor)],
      },
      Operands::MakingChange { price_cents, paid_cents } => vec![
        Value::Decimal(Decimal::from_cents(*price_cents as i64)),
        Value::Decimal(Decimal::from_cents(*paid_cents as i64)),
      ],
    }
  }
}

/// Named perturbation that produced a multiple-choice distractor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistractorStrategy {
  WrongZeroCount,
  WrongOperation,
  OffByOne,
  DigitConcatenation,
  DecimalShift,
  WrongDirection,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distractor {
  pub value: Value,
  pub strategy: DistractorStrategy,
}

/// One labelled field of a multi-part answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartKey {
  pub label: String,
  pub value: Value,
}

/// The canonical answer, by shape. The shape decides how the validator compares.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum AnswerKey {
  /// Rational equality with the value.
  Single { value: Value },
  /// Must be submitted in lowest terms; equivalent forms are flagged, not accepted.
  LowestTerms { fraction: Fraction },
  QuotientRemainder { quotient: u64, remainder: u64 },
  /// Every part must match, including a trailing total when present.
  MultiPart { parts: Vec<PartKey> },
  MultipleChoice { correct: Value, distractors: Vec<Distractor> },
  /// The learner must select exactly the indices in `correct`.
  MultiSelect { options: Vec<Fraction>, correct: BTreeSet<usize> },
}

impl AnswerKey {
  /// Multiple-choice options in display order (ascending); empty for other shapes.
  pub fn options(&self) -> Vec<Value> {
    match self {
      AnswerKey::MultipleChoice { correct, distractors } => {
        let mut options: Vec<Value> = std::iter::once(*correct)
          .chain(distractors.iter().map(|d| d.value))
          .collect();
        options.sort_by(|a, b| a.numeric_cmp(b));
        options
      }
      _ => Vec::new(),
    }
  }

  pub fn distractors(&self) -> &[Distractor] {
    match self {
      AnswerKey::MultipleChoice { distractors, .. } => distractors,
      _ => &[],
    }
  }

  /// Field labels for multi-part answers; empty otherwise.
  pub fn field_labels(&self) -> Vec<String> {
    match self {
      AnswerKey::MultiPart { parts } => parts.iter().map(|p| p.label.clone()).collect(),
      AnswerKey::QuotientRemainder { .. } => vec!["quotient".into(), "remainder".into()],
      _ => Vec::new(),
    }
  }

  /// Human-readable form of the expected answer, for feedback.
  pub fn display(&self) -> String {
    match self {
      AnswerKey::Single { value } => value.to_string(),
      AnswerKey::LowestTerms { fraction } => fraction.to_string(),
      AnswerKey::QuotientRemainder { quotient, remainder } => format!("{quotient} R {remainder}"),
      AnswerKey::MultiPart { parts } => parts
        .iter()
        .map(|p| format!("{} = {}", p.label, p.value))
        .collect::<Vec<_>>()
        .join("; "),
      AnswerKey::MultipleChoice { correct, .. } => correct.to_string(),
      AnswerKey::MultiSelect { options, correct } => correct
        .iter()
        .filter_map(|i| options.get(*i))
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", "),
    }
  }
}

/// Where did the operands come from?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ProblemSource {
  /// Random draw that met every constraint on attempt number `attempts`.
  Sampled { attempts: u32 },
  /// Attempt budget exhausted; the family's fixed instance for this level.
  Fallback,
}

/// One concrete question.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProblemInstance {
  pub id: Uuid,
  pub topic: TopicId,
  pub level: u8,
  pub operands: Operands,
  /// Template slots for the presentation layer (units, context labels). Opaque here.
  pub narrative_fields: BTreeMap<String, String>,
  pub correct_answer: AnswerKey,
  pub source: ProblemSource,
}

impl ProblemInstance {
  pub fn distractors(&self) -> &[Distractor] {
    self.correct_answer.distractors()
  }
}
