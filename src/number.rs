//! Exact value types used for operands and answers.
//!
//! Nothing here uses floating point: decimals are scaled integers and every
//! numeric comparison goes through rational cross-multiplication.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::{gcd, lcm};

/// A fraction as written. `3/4` and `6/8` are distinct values here
/// (`PartialEq` is literal); use [`Fraction::equivalent`] for rational equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
  pub numerator: i64,
  /// Always positive once built through a constructor.
  pub denominator: i64,
}

impl Fraction {
  /// Build a fraction, moving the sign to the numerator. `None` for a zero denominator.
  pub fn new(numerator: i64, denominator: i64) -> Option<Self> {
    match denominator.cmp(&0) {
      Ordering::Equal => None,
      Ordering::Greater => Some(Self { numerator, denominator }),
      Ordering::Less => Some(Self { numerator: -numerator, denominator: -denominator }),
    }
  }

  /// Generator-side constructor for non-negative parts. `denominator` must be non-zero.
  pub(crate) fn of(numerator: u64, denominator: u64) -> Self {
    debug_assert!(denominator != 0, "fraction with zero denominator");
    Self { numerator: numerator as i64, denominator: denominator.max(1) as i64 }
  }

  pub fn whole(n: i64) -> Self {
    Self { numerator: n, denominator: 1 }
  }

  /// Lowest-terms form of the same rational.
  pub fn reduced(&self) -> Self {
    let g = gcd(self.numerator.unsigned_abs(), self.denominator.unsigned_abs()) as i64;
    if g <= 1 {
      *self
    } else {
      Self { numerator: self.numerator / g, denominator: self.denominator / g }
    }
  }

  pub fn is_lowest_terms(&self) -> bool {
    gcd(self.numerator.unsigned_abs(), self.denominator.unsigned_abs()) == 1
  }

  /// Rational equality: `a/b == c/d` iff `a·d == c·b`.
  pub fn equivalent(&self, other: &Fraction) -> bool {
    (self.numerator as i128) * (other.denominator as i128)
      == (other.numerator as i128) * (self.denominator as i128)
  }

  /// Proper means `0 < numerator < denominator`.
  pub fn is_proper(&self) -> bool {
    self.numerator > 0 && self.numerator < self.denominator
  }

  /// Sum over the least common denominator, not reduced.
  pub fn add(&self, other: &Fraction) -> Fraction {
    let den = lcm(self.denominator.unsigned_abs(), other.denominator.unsigned_abs()) as i64;
    let num = self.numerator * (den / self.denominator) + other.numerator * (den / other.denominator);
    Fraction { numerator: num, denominator: den }
  }

  /// `5/4 -> "1 1/4"`, `8/4 -> "2"`, `3/4 -> "3/4"`.
  pub fn to_mixed_string(&self) -> String {
    let whole = self.numerator / self.denominator;
    let rest = (self.numerator % self.denominator).abs();
    match (whole, rest) {
      (w, 0) => w.to_string(),
      (0, _) => self.to_string(),
      (w, r) => format!("{} {}/{}", w, r, self.denominator),
    }
  }
}

impl fmt::Display for Fraction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.numerator, self.denominator)
  }
}

/// Base-ten decimal stored as `units / 10^scale`. `3.45` is `{ units: 345, scale: 2 }`.
///
/// Equality is numeric: `0.5 == 0.50`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Decimal {
  pub units: i64,
  pub scale: u32,
}

impl Decimal {
  pub fn new(units: i64, scale: u32) -> Self {
    Self { units, scale }
  }

  pub fn from_whole(n: i64) -> Self {
    Self { units: n, scale: 0 }
  }

  /// Money amounts keep two places so `120` cents displays as `1.20`.
  pub fn from_cents(cents: i64) -> Self {
    Self { units: cents, scale: 2 }
  }

  /// Drop trailing fractional zeros: `1.200 -> 1.2`.
  pub fn normalized(&self) -> Self {
    let mut out = *self;
    while out.scale > 0 && out.units % 10 == 0 {
      out.units /= 10;
      out.scale -= 1;
    }
    out
  }

  pub fn is_whole(&self) -> bool {
    self.normalized().scale == 0
  }

  /// Digit in the last written place (`3.45 -> 5`).
  pub fn last_digit(&self) -> u8 {
    (self.units.unsigned_abs() % 10) as u8
  }

  /// Multiply by `10^places` (negative `places` divides). Result is normalized.
  pub fn shift(&self, places: i32) -> Self {
    let out = if places >= 0 {
      let p = places as u32;
      if self.scale >= p {
        Self { units: self.units, scale: self.scale - p }
      } else {
        Self { units: self.units * 10i64.pow(p - self.scale), scale: 0 }
      }
    } else {
      Self { units: self.units, scale: self.scale + places.unsigned_abs() }
    };
    out.normalized()
  }

  /// Sum aligned to the finer of the two scales.
  pub fn add(&self, other: &Decimal) -> Decimal {
    let scale = self.scale.max(other.scale);
    let a = self.units * 10i64.pow(scale - self.scale);
    let b = other.units * 10i64.pow(scale - other.scale);
    Decimal { units: a + b, scale }
  }

  /// Re-express with exactly `scale` places; only widens.
  pub fn with_scale(&self, scale: u32) -> Decimal {
    if scale <= self.scale {
      return *self;
    }
    Decimal { units: self.units * 10i64.pow(scale - self.scale), scale }
  }

  pub fn to_fraction(&self) -> Fraction {
    Fraction { numerator: self.units, denominator: 10i64.pow(self.scale) }
  }
}

impl PartialEq for Decimal {
  fn eq(&self, other: &Self) -> bool {
    self.to_fraction().equivalent(&other.to_fraction())
  }
}

impl fmt::Display for Decimal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if self.units < 0 { "-" } else { "" };
    let abs = self.units.unsigned_abs();
    if self.scale == 0 {
      return write!(f, "{sign}{abs}");
    }
    let place = 10u64.pow(self.scale);
    write!(f, "{sign}{}.{:0width$}", abs / place, abs % place, width = self.scale as usize)
  }
}

/// A numeric operand or answer value.
///
/// Equality is numeric across kinds: `Whole(5) == Decimal(5.0) == Fraction(10/2)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
  Whole(i64),
  Decimal(Decimal),
  Fraction(Fraction),
}

impl Value {
  pub fn to_fraction(&self) -> Fraction {
    match self {
      Value::Whole(n) => Fraction::whole(*n),
      Value::Decimal(d) => d.to_fraction(),
      Value::Fraction(f) => *f,
    }
  }

  /// Orders values numerically; used to lay out multiple-choice options.
  pub fn numeric_cmp(&self, other: &Value) -> Ordering {
    let a = self.to_fraction();
    let b = other.to_fraction();
    ((a.numerator as i128) * (b.denominator as i128))
      .cmp(&((b.numerator as i128) * (a.denominator as i128)))
  }

  pub fn is_negative(&self) -> bool {
    self.to_fraction().numerator < 0
  }
}

impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    self.to_fraction().equivalent(&other.to_fraction())
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Whole(n) => write!(f, "{n}"),
      Value::Decimal(d) => write!(f, "{d}"),
      Value::Fraction(fr) => write!(f, "{fr}"),
    }
  }
}

impl From<i64> for Value {
  fn from(n: i64) -> Self {
    Value::Whole(n)
  }
}

impl From<Decimal> for Value {
  fn from(d: Decimal) -> Self {
    Value::Decimal(d)
  }
}

impl From<Fraction> for Value {
  fn from(f: Fraction) -> Self {
    Value::Fraction(f)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fraction_sign_and_zero_denominator() {
    assert!(Fraction::new(1, 0).is_none());
    let f = Fraction::new(3, -4).unwrap();
    assert_eq!((f.numerator, f.denominator), (-3, 4));
  }

  #[test]
  fn fraction_equivalence_is_cross_multiplication() {
    let a = Fraction::of(6, 8);
    let b = Fraction::of(3, 4);
    assert!(a.equivalent(&b));
    assert_ne!(a, b);
    assert_eq!(a.reduced(), b);
    assert!(!a.is_lowest_terms());
  }

  #[test]
  fn fraction_addition_uses_lcd() {
    let sum = Fraction::of(1, 4).add(&Fraction::of(3, 8));
    assert_eq!(sum, Fraction::of(5, 8));
    let sum = Fraction::of(2, 3).add(&Fraction::of(3, 4));
    assert_eq!(sum, Fraction::of(17, 12));
    assert_eq!(sum.to_mixed_string(), "1 5/12");
    assert_eq!(Fraction::of(8, 4).to_mixed_string(), "2");
  }

  #[test]
  fn decimal_display_and_equality() {
    assert_eq!(Decimal::new(345, 2).to_string(), "3.45");
    assert_eq!(Decimal::new(5, 3).to_string(), "0.005");
    assert_eq!(Decimal::new(-5, 1).to_string(), "-0.5");
    assert_eq!(Decimal::from_cents(120).to_string(), "1.20");
    assert_eq!(Decimal::new(5, 1), Decimal::new(50, 2));
  }

  #[test]
  fn decimal_shift_moves_the_point() {
    assert_eq!(Decimal::new(456, 2).shift(2).to_string(), "456");
    assert_eq!(Decimal::new(37, 1).shift(2).to_string(), "370");
    assert_eq!(Decimal::new(456, 2).shift(-2).to_string(), "0.0456");
  }

  #[test]
  fn decimal_add_aligns_scales() {
    let sum = Decimal::new(2375, 3).add(&Decimal::new(14, 1));
    assert_eq!(sum.to_string(), "3.775");
  }

  #[test]
  fn values_compare_numerically_across_kinds() {
    assert_eq!(Value::Whole(5), Value::Decimal(Decimal::new(50, 1)));
    assert_eq!(Value::Fraction(Fraction::of(10, 2)), Value::Whole(5));
    assert_eq!(Value::Whole(3).numeric_cmp(&Value::Whole(4)), Ordering::Less);
  }
}
