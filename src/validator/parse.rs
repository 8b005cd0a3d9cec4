//! Learner input parsing.
//!
//! Everything here is lenient about whitespace and case, strict about
//! numbers: anything that does not parse is a [`ParseError`], never a wrong
//! answer.

use crate::number::{Decimal, Fraction, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
  #[error("the answer is empty")]
  Empty,
  #[error("`{0}` is not a number")]
  NotANumber(String),
  #[error("`{0}` is not a fraction")]
  MalformedFraction(String),
  #[error("a fraction cannot have a zero denominator")]
  ZeroDenominator,
  #[error("`{0}` is not a quotient and remainder (try `8 R 2`)")]
  MalformedTuple(String),
  #[error("choice {index} is out of range; there are {count} options")]
  ChoiceOutOfRange { index: usize, count: usize },
  #[error("`{0}` is not one of the options")]
  UnknownOption(String),
  #[error("expected {expected} answer fields, got {got}")]
  FieldCount { expected: usize, got: usize },
  #[error("a {got} answer does not fit this question")]
  WrongShape { got: &'static str },
}

fn non_empty(s: &str) -> Result<&str, ParseError> {
  let t = s.trim();
  if t.is_empty() { Err(ParseError::Empty) } else { Ok(t) }
}

/// Digits with optional thousands separators (`27,000`). No sign.
fn digits(s: &str) -> Option<u64> {
  if s.is_empty() {
    return None;
  }
  if s.contains(',') {
    let mut groups = s.split(',');
    let head = groups.next()?;
    if head.is_empty() || head.len() > 3 {
      return None;
    }
    if !groups.all(|g| g.len() == 3) {
      return None;
    }
  }
  let plain: String = s.chars().filter(|c| *c != ',').collect();
  if !plain.chars().all(|c| c.is_ascii_digit()) {
    return None;
  }
  plain.parse().ok()
}

fn split_sign(s: &str) -> (bool, &str) {
  match s.strip_prefix('-') {
    Some(rest) => (true, rest.trim_start()),
    None => (false, s),
  }
}

/// Whole number, thousands separators allowed: `27000`, `27,000`, `-4`.
pub fn parse_whole(s: &str) -> Result<i64, ParseError> {
  let t = non_empty(s)?;
  let (negative, body) = split_sign(t);
  let n = digits(body)
    .and_then(|n| i64::try_from(n).ok())
    .ok_or_else(|| ParseError::NotANumber(t.to_string()))?;
  Ok(if negative { -n } else { n })
}

/// Decimal with an optional `$` and optional leading point: `$1.25`, `.5`, `3,450.75`.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseError> {
  let t = non_empty(s)?;
  let not_a_number = || ParseError::NotANumber(t.to_string());
  let (negative, body) = split_sign(t);
  let body = body.strip_prefix('$').unwrap_or(body).trim_start();

  let (int_part, frac_part) = match body.split_once('.') {
    Some((i, f)) => (i, f),
    None => (body, ""),
  };
  if int_part.is_empty() && frac_part.is_empty() {
    return Err(not_a_number());
  }
  let whole = if int_part.is_empty() { 0 } else { digits(int_part).ok_or_else(not_a_number)? };
  if !frac_part.chars().all(|c| c.is_ascii_digit()) || frac_part.len() > 12 {
    return Err(not_a_number());
  }
  let scale = frac_part.len() as u32;
  let frac: u64 = if frac_part.is_empty() { 0 } else { frac_part.parse().map_err(|_| not_a_number())? };
  let units = whole
    .checked_mul(10u64.pow(scale))
    .and_then(|w| w.checked_add(frac))
    .and_then(|u| i64::try_from(u).ok())
    .ok_or_else(not_a_number)?;
  Ok(Decimal::new(if negative { -units } else { units }, scale))
}

/// Fraction forms: `a/b`, mixed `w a/b`, whole `w`, or a decimal (`0.75 -> 75/100`).
pub fn parse_fraction(s: &str) -> Result<Fraction, ParseError> {
  let t = non_empty(s)?;
  if !t.contains('/') {
    return parse_decimal(t)
      .map(|d| d.to_fraction())
      .map_err(|_| ParseError::MalformedFraction(t.to_string()));
  }
  let malformed = || ParseError::MalformedFraction(t.to_string());
  let (negative, body) = split_sign(t);
  let tokens: Vec<&str> = body.split_whitespace().collect();
  let (whole, ratio) = match tokens.as_slice() {
    [ratio] => (0, *ratio),
    [whole, ratio] => (digits(whole).ok_or_else(malformed)?, *ratio),
    _ => return Err(malformed()),
  };
  let (num, den) = ratio.split_once('/').ok_or_else(malformed)?;
  let num = digits(num.trim()).ok_or_else(malformed)?;
  let den = digits(den.trim()).ok_or_else(malformed)?;
  if den == 0 {
    return Err(ParseError::ZeroDenominator);
  }
  let numerator = whole
    .checked_mul(den)
    .and_then(|w| w.checked_add(num))
    .and_then(|n| i64::try_from(n).ok())
    .ok_or_else(malformed)?;
  let denominator = i64::try_from(den).map_err(|_| malformed())?;
  Fraction::new(if negative { -numerator } else { numerator }, denominator).ok_or(ParseError::ZeroDenominator)
}

/// Any numeric answer: fractions when a `/` is present, otherwise decimal or whole.
pub fn parse_value(s: &str) -> Result<Value, ParseError> {
  let t = non_empty(s)?;
  if t.contains('/') {
    return parse_fraction(t).map(Value::Fraction);
  }
  let d = parse_decimal(t)?;
  Ok(if d.scale == 0 { Value::Whole(d.units) } else { Value::Decimal(d) })
}

/// `8 R 2`, `8r2`, `8 remainder 2`, `8, 2`, `8 2`, or plain `8` (remainder zero).
pub fn parse_quotient_remainder(s: &str) -> Result<(u64, u64), ParseError> {
  let t = non_empty(s)?;
  let malformed = || ParseError::MalformedTuple(t.to_string());
  let lowered = t.to_ascii_lowercase().replace("remainder", " r ");

  let pieces: Vec<&str> = if lowered.contains('r') {
    lowered.split('r').map(str::trim).collect()
  } else {
    lowered
      .split(|c: char| c == ',' || c.is_whitespace())
      .filter(|p| !p.is_empty())
      .collect()
  };
  match pieces.as_slice() {
    [q] => Ok((digits(q).ok_or_else(malformed)?, 0)),
    [q, r] => Ok((digits(q).ok_or_else(malformed)?, digits(r).ok_or_else(malformed)?)),
    _ => Err(malformed()),
  }
}

/// Comma- or semicolon-separated fractions, for typed multi-select answers.
pub fn parse_fraction_list(s: &str) -> Result<Vec<Fraction>, ParseError> {
  let items: Vec<&str> = s
    .split(|c| c == ',' || c == ';')
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .collect();
  if items.is_empty() {
    return Err(ParseError::Empty);
  }
  items.into_iter().map(parse_fraction).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wholes_with_grouping() {
    assert_eq!(parse_whole(" 27,000 "), Ok(27000));
    assert_eq!(parse_whole("27000"), Ok(27000));
    assert!(parse_whole("27,00").is_err());
    assert!(parse_whole("twelve").is_err());
    assert_eq!(parse_whole("   "), Err(ParseError::Empty));
  }

  #[test]
  fn decimals_and_money() {
    assert_eq!(parse_decimal("$1.25").unwrap().to_string(), "1.25");
    assert_eq!(parse_decimal(".5").unwrap(), Decimal::new(5, 1));
    assert_eq!(parse_decimal("0.50").unwrap(), Decimal::new(5, 1));
    assert!(parse_decimal("1.2.3").is_err());
    assert!(parse_decimal(".").is_err());
  }

  #[test]
  fn fraction_forms() {
    assert_eq!(parse_fraction("6/8"), Ok(Fraction::of(6, 8)));
    assert_eq!(parse_fraction(" 1 1/4 "), Ok(Fraction::of(5, 4)));
    assert_eq!(parse_fraction("2"), Ok(Fraction::whole(2)));
    assert_eq!(parse_fraction("3/0"), Err(ParseError::ZeroDenominator));
    assert!(matches!(parse_fraction("3//4"), Err(ParseError::MalformedFraction(_))));
    assert!(parse_fraction("0.75").unwrap().equivalent(&Fraction::of(3, 4)));
  }

  #[test]
  fn quotient_remainder_forms() {
    for input in ["8 R 2", "8r2", "8 remainder 2", "8, 2", "8 2", "8R 2"] {
      assert_eq!(parse_quotient_remainder(input), Ok((8, 2)), "{input}");
    }
    assert_eq!(parse_quotient_remainder("8"), Ok((8, 0)));
    assert!(parse_quotient_remainder("8 R").is_err());
    assert!(parse_quotient_remainder("8 R 2 R 1").is_err());
  }

  #[test]
  fn values_pick_their_kind() {
    assert_eq!(parse_value("5/8"), Ok(Value::Fraction(Fraction::of(5, 8))));
    assert!(matches!(parse_value("3.45"), Ok(Value::Decimal(_))));
    assert!(matches!(parse_value("42"), Ok(Value::Whole(42))));
  }

  #[test]
  fn fraction_lists() {
    assert_eq!(parse_fraction_list("2/4, 3/6").unwrap().len(), 2);
    assert_eq!(parse_fraction_list(" , "), Err(ParseError::Empty));
  }
}
