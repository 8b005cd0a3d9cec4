//! Problem generation.
//!
//! Each family draws operands for a level, checks them against its range and
//! non-degeneracy rules, and derives the answer key by formula. Sampling is
//! bounded; when the budget runs out the family's fixed instance from
//! [`crate::seeds`] is served instead.

mod decimals;
mod distractors;
mod division;
mod fractions;
mod geometry;
mod measurement;
mod multiplication;
mod sequences;

use std::collections::BTreeMap;

use rand::Rng;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{AnswerKey, Operands, ProblemInstance, ProblemSource, TopicId, UnknownTopic};
use crate::seeds::fallback_operands;

pub use distractors::DISTRACTOR_COUNT;

/// Attempts per problem before falling back to the fixed instance.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 40;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
  #[error(transparent)]
  UnknownTopic(#[from] UnknownTopic),
  #[error("level {level} is outside the {topic} range {min}..={max}")]
  LevelOutOfRange { topic: TopicId, level: u8, min: u8, max: u8 },
}

/// Sampling ran out of attempts. Recovered inside [`generate_with_attempts`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no valid {topic} instance at level {level} after {attempts} attempts")]
pub struct ConstraintUnsatisfiable {
  pub topic: TopicId,
  pub level: u8,
  pub attempts: u32,
}

pub fn generate<R: Rng + ?Sized>(topic: TopicId, level: u8, rng: &mut R) -> Result<ProblemInstance, GenerateError> {
  generate_with_attempts(topic, level, DEFAULT_MAX_ATTEMPTS, rng)
}

pub fn generate_by_slug<R: Rng + ?Sized>(slug: &str, level: u8, rng: &mut R) -> Result<ProblemInstance, GenerateError> {
  let topic: TopicId = slug.parse()?;
  generate(topic, level, rng)
}

pub fn generate_with_attempts<R: Rng + ?Sized>(
  topic: TopicId,
  level: u8,
  max_attempts: u32,
  rng: &mut R,
) -> Result<ProblemInstance, GenerateError> {
  let (min, max) = topic.supported_levels();
  if !(min..=max).contains(&level) {
    return Err(GenerateError::LevelOutOfRange { topic, level, min, max });
  }

  let (operands, source) = match sample_operands(topic, level, max_attempts, rng) {
    Ok((operands, attempts)) => {
      debug!(target: "problem", %topic, level, attempts, "Sampled operands");
      (operands, ProblemSource::Sampled { attempts })
    }
    Err(e) => {
      warn!(target: "problem", %topic, level, error = %e, source = "fallback", "Serving fixed fallback instance");
      (fallback_operands(topic, level), ProblemSource::Fallback)
    }
  };

  let id = draw_id(rng);
  let narrative_fields = operands.narrate(rng);
  let correct_answer = operands.solve();
  Ok(ProblemInstance { id, topic, level, operands, narrative_fields, correct_answer, source })
}

/// Draw until an instance passes [`Operands::violation`]; returns it with the attempt number.
pub fn sample_operands<R: Rng + ?Sized>(
  topic: TopicId,
  level: u8,
  max_attempts: u32,
  rng: &mut R,
) -> Result<(Operands, u32), ConstraintUnsatisfiable> {
  for attempt in 1..=max_attempts {
    let operands = draw(topic, level, rng);
    match operands.violation(level) {
      None => return Ok((operands, attempt)),
      Some(reason) => {
        debug!(target: "problem", %topic, level, attempt, reason, "Rejected draw");
      }
    }
  }
  Err(ConstraintUnsatisfiable { topic, level, attempts: max_attempts })
}

/// Ids come from the injected source so seeded sessions replay exactly.
fn draw_id<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
  let bytes: [u8; 16] = rng.gen();
  uuid::Builder::from_random_bytes(bytes).into_uuid()
}

fn draw<R: Rng + ?Sized>(topic: TopicId, level: u8, rng: &mut R) -> Operands {
  match topic {
    TopicId::MultiplyByZeros => multiplication::draw_zeros(level, rng),
    TopicId::AreaModel => multiplication::draw_area(level, rng),
    TopicId::DivideRemainder => division::draw_remainder(level, rng),
    TopicId::LongDivision => division::draw_long(level, rng),
    TopicId::FractionSimplify => fractions::draw_simplify(level, rng),
    TopicId::FractionAdd => fractions::draw_add(level, rng),
    TopicId::EquivalentFractions => fractions::draw_equivalent(level, rng),
    TopicId::DecimalAdd => decimals::draw_add(level, rng),
    TopicId::DecimalShift => decimals::draw_shift(level, rng),
    TopicId::NumberSequence => sequences::draw(level, rng),
    TopicId::RectangleMeasures => geometry::draw(level, rng),
    TopicId::UnitConversion => measurement::draw_units(level, rng),
    TopicId::MakingChange => measurement::draw_change(level, rng),
  }
}

impl Operands {
  /// Why these operands are not a valid instance at `level`, if they are not.
  pub fn violation(&self, level: u8) -> Option<&'static str> {
    match self {
      Operands::MultiplyByZeros { a, b } => multiplication::zeros_violation(level, *a, *b),
      Operands::AreaModel { a, b } => multiplication::area_violation(level, *a, *b),
      Operands::DivideRemainder { dividend, divisor } => division::remainder_violation(level, *dividend, *divisor),
      Operands::LongDivision { dividend, divisor } => division::long_violation(level, *dividend, *divisor),
      Operands::FractionSimplify { fraction } => fractions::simplify_violation(level, fraction),
      Operands::FractionAdd { left, right } => fractions::add_violation(level, left, right),
      Operands::EquivalentFractions { base, options } => fractions::equivalent_violation(level, base, options),
      Operands::DecimalAdd { left, right } => decimals::add_violation(level, left, right),
      Operands::DecimalShift { value, power, divide } => decimals::shift_violation(level, value, *power, *divide),
      Operands::NumberSequence { start, rule, shown } => sequences::violation(level, *start, rule, *shown),
      Operands::RectangleMeasures { width, height } => geometry::violation(level, *width, *height),
      Operands::UnitConversion { pair, major, minor, direction } => {
        measurement::units_violation(level, *pair, *major, *minor, *direction)
      }
      Operands::MakingChange { price_cents, paid_cents } => {
        measurement::change_violation(level, *price_cents, *paid_cents)
      }
    }
  }

  /// The answer key, computed by formula. Deterministic: distractors and option order included.
  pub fn solve(&self) -> AnswerKey {
    match self {
      Operands::MultiplyByZeros { a, b } => multiplication::solve_zeros(*a, *b),
      Operands::AreaModel { a, b } => multiplication::solve_area(*a, *b),
      Operands::DivideRemainder { dividend, divisor } => division::solve_remainder(*dividend, *divisor),
      Operands::LongDivision { dividend, divisor } => division::solve_long(*dividend, *divisor),
      Operands::FractionSimplify { fraction } => fractions::solve_simplify(fraction),
      Operands::FractionAdd { left, right } => fractions::solve_add(left, right),
      Operands::EquivalentFractions { base, options } => fractions::solve_equivalent(base, options),
      Operands::DecimalAdd { left, right } => decimals::solve_add(left, right),
      Operands::DecimalShift { value, power, divide } => decimals::solve_shift(value, *power, *divide),
      Operands::NumberSequence { start, rule, shown } => sequences::solve(*start, rule, *shown),
      Operands::RectangleMeasures { width, height } => geometry::solve(*width, *height),
      Operands::UnitConversion { pair, major, minor, direction } => {
        measurement::solve_units(*pair, *major, *minor, *direction)
      }
      Operands::MakingChange { price_cents, paid_cents } => measurement::solve_change(*price_cents, *paid_cents),
    }
  }

  fn narrate<R: Rng + ?Sized>(&self, rng: &mut R) -> BTreeMap<String, String> {
    match self {
      Operands::AreaModel { a, b } => multiplication::narrate_area(*a, *b),
      Operands::DivideRemainder { .. } => division::narrate_remainder(rng),
      Operands::DecimalShift { divide, .. } => {
        BTreeMap::from([("operation".to_string(), if *divide { "÷" } else { "×" }.to_string())])
      }
      Operands::RectangleMeasures { .. } => geometry::narrate(rng),
      Operands::UnitConversion { pair, direction, .. } => measurement::narrate_units(*pair, *direction),
      Operands::MakingChange { .. } => measurement::narrate_change(rng),
      _ => BTreeMap::new(),
    }
  }
}
