//! Fraction families: simplify to lowest terms, add, and pick every equivalent fraction.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{AnswerKey, Operands};
use crate::number::{Fraction, Value};

fn simplify_denominators(level: u8) -> RangeInclusive<u64> {
  match level {
    1 => 4..=12,
    2 => 10..=36,
    _ => 24..=100,
  }
}

pub(super) fn draw_simplify<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Operands {
  let denominator = rng.gen_range(simplify_denominators(level));
  let numerator = rng.gen_range(2..denominator);
  Operands::FractionSimplify { fraction: Fraction::of(numerator, denominator) }
}

pub(super) fn simplify_violation(level: u8, fraction: &Fraction) -> Option<&'static str> {
  if !fraction.is_proper() {
    return Some("not a proper fraction");
  }
  if !simplify_denominators(level).contains(&(fraction.denominator as u64)) {
    return Some("denominator size does not match the level");
  }
  if fraction.is_lowest_terms() {
    return Some("already in lowest terms");
  }
  None
}

pub(super) fn solve_simplify(fraction: &Fraction) -> AnswerKey {
  AnswerKey::LowestTerms { fraction: fraction.reduced() }
}

pub(super) fn draw_add<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Operands {
  let (d1, d2) = match level {
    1 => {
      let d = rng.gen_range(3..=12);
      (d, d)
    }
    2 => {
      let small = rng.gen_range(2..=6);
      let large = small * rng.gen_range(2..=3);
      if rng.gen_bool(0.5) { (small, large) } else { (large, small) }
    }
    _ => (rng.gen_range(2..=12), rng.gen_range(2..=12)),
  };
  Operands::FractionAdd {
    left: Fraction::of(rng.gen_range(1..d1), d1),
    right: Fraction::of(rng.gen_range(1..d2), d2),
  }
}

pub(super) fn add_violation(level: u8, left: &Fraction, right: &Fraction) -> Option<&'static str> {
  if !left.is_proper() || !right.is_proper() {
    return Some("addends must be proper fractions");
  }
  let (d1, d2) = (left.denominator, right.denominator);
  let (small, large) = (d1.min(d2), d1.max(d2));
  match level {
    1 => {
      if d1 != d2 || !(3..=12).contains(&d1) {
        return Some("level 1 uses like denominators");
      }
      if left.numerator + right.numerator > d1 {
        return Some("level 1 sums stay at or below one");
      }
    }
    2 => {
      if d1 == d2 || large % small != 0 || large > 18 {
        return Some("level 2 needs one denominator to be a multiple of the other");
      }
    }
    _ => {
      if d1 == d2 || large % small == 0 || large > 12 {
        return Some("level 3 needs unrelated denominators");
      }
    }
  }
  None
}

/// Any equivalent form of the sum is accepted, so the key holds the reduced one.
pub(super) fn solve_add(left: &Fraction, right: &Fraction) -> AnswerKey {
  AnswerKey::Single { value: Value::Fraction(left.add(right).reduced()) }
}

fn equivalent_shape(level: u8) -> (usize, RangeInclusive<u64>) {
  match level {
    1 => (4, 2..=6),
    2 => (5, 2..=10),
    _ => (6, 3..=12),
  }
}

/// A fraction that looks related to `n/d` but is not equal to it.
fn misconception<R: Rng + ?Sized>(n: u64, d: u64, rng: &mut R) -> Fraction {
  let k = rng.gen_range(2..=5);
  match rng.gen_range(0..4) {
    // add the same number to top and bottom
    0 => Fraction::of(n + k, d + k),
    // numerator slips by one
    1 => Fraction::of(n * k + 1, d * k),
    // scale only the numerator
    2 => Fraction::of(n * k, d),
    _ => Fraction::of(d * k, n * k),
  }
}

pub(super) fn draw_equivalent<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Operands {
  let (count, denominators) = equivalent_shape(level);
  let d = rng.gen_range(denominators);
  let n = rng.gen_range(1..d);
  let correct = rng.gen_range(1..count);

  let mut multipliers: Vec<u64> = (2..=6).collect();
  multipliers.shuffle(rng);

  let mut options: Vec<Fraction> = multipliers
    .iter()
    .take(correct)
    .map(|k| Fraction::of(n * k, d * k))
    .collect();
  while options.len() < count {
    options.push(misconception(n, d, rng));
  }
  options.shuffle(rng);

  Operands::EquivalentFractions { base: Fraction::of(n, d), options }
}

pub(super) fn equivalent_violation(level: u8, base: &Fraction, options: &[Fraction]) -> Option<&'static str> {
  let (count, denominators) = equivalent_shape(level);
  if !base.is_proper() || !base.is_lowest_terms() {
    return Some("base must be a proper fraction in lowest terms");
  }
  if !denominators.contains(&(base.denominator as u64)) {
    return Some("base denominator does not match the level");
  }
  if options.len() != count {
    return Some("wrong number of options for the level");
  }
  let distinct: BTreeSet<(i64, i64)> = options.iter().map(|f| (f.numerator, f.denominator)).collect();
  if distinct.len() != options.len() || options.contains(base) {
    return Some("options must be distinct and differ from the base");
  }
  let hits = options.iter().filter(|f| f.equivalent(base)).count();
  if hits == 0 || hits == options.len() {
    return Some("need at least one equivalent and one non-equivalent option");
  }
  None
}

pub(super) fn solve_equivalent(base: &Fraction, options: &[Fraction]) -> AnswerKey {
  AnswerKey::MultiSelect {
    options: options.to_vec(),
    correct: options
      .iter()
      .enumerate()
      .filter(|(_, f)| f.equivalent(base))
      .map(|(i, _)| i)
      .collect(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::SeedableRng;
  use rand_chacha::ChaCha8Rng;

  #[test]
  fn eighteen_twenty_fourths_reduce_to_three_quarters() {
    let f = Fraction::of(18, 24);
    assert_eq!(simplify_violation(2, &f), None);
    assert_eq!(solve_simplify(&f), AnswerKey::LowestTerms { fraction: Fraction::of(3, 4) });
  }

  #[test]
  fn lowest_terms_input_is_degenerate() {
    assert_eq!(simplify_violation(1, &Fraction::of(3, 8)), Some("already in lowest terms"));
    assert!(simplify_violation(1, &Fraction::of(8, 8)).is_some());
  }

  #[test]
  fn add_levels() {
    assert_eq!(add_violation(1, &Fraction::of(1, 5), &Fraction::of(2, 5)), None);
    assert!(add_violation(1, &Fraction::of(3, 5), &Fraction::of(4, 5)).is_some());
    assert_eq!(add_violation(2, &Fraction::of(1, 4), &Fraction::of(3, 8)), None);
    assert!(add_violation(2, &Fraction::of(1, 4), &Fraction::of(1, 6)).is_some());
    assert_eq!(add_violation(3, &Fraction::of(2, 3), &Fraction::of(3, 4)), None);
    assert_eq!(
      solve_add(&Fraction::of(1, 4), &Fraction::of(3, 8)),
      AnswerKey::Single { value: Value::Fraction(Fraction::of(5, 8)) }
    );
  }

  #[test]
  fn misconceptions_are_never_equivalent() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..200 {
      let f = misconception(2, 3, &mut rng);
      assert!(!f.equivalent(&Fraction::of(2, 3)), "{f}");
    }
  }

  #[test]
  fn equivalent_answer_lists_matching_indices() {
    let options = vec![Fraction::of(2, 4), Fraction::of(2, 3), Fraction::of(3, 6), Fraction::of(3, 5)];
    let base = Fraction::of(1, 2);
    assert_eq!(equivalent_violation(1, &base, &options), None);
    let AnswerKey::MultiSelect { correct, .. } = solve_equivalent(&base, &options) else {
      panic!("expected multi-select");
    };
    assert_eq!(correct.into_iter().collect::<Vec<_>>(), vec![0, 2]);
  }
}
