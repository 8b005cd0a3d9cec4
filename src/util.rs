//! Small numeric helpers shared by the generator, validator and explanations.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Greatest common divisor (Euclid). `gcd(0, 0) == 0`.
pub fn gcd(a: u64, b: u64) -> u64 {
  let (mut a, mut b) = (a, b);
  while b != 0 {
    let t = a % b;
    a = b;
    b = t;
  }
  a
}

/// Least common multiple; zero if either argument is zero.
pub fn lcm(a: u64, b: u64) -> u64 {
  if a == 0 || b == 0 {
    return 0;
  }
  a / gcd(a, b) * b
}

/// `10^exp`, saturating at `u64::MAX`.
pub fn pow10(exp: u32) -> u64 {
  10u64.checked_pow(exp).unwrap_or(u64::MAX)
}

/// Number of decimal digits (`digit_count(0) == 1`).
pub fn digit_count(n: u64) -> u32 {
  if n == 0 { 1 } else { n.ilog10() + 1 }
}

/// Count of trailing decimal zeros. Zero itself has none.
pub fn trailing_zeros(n: u64) -> u32 {
  strip_trailing_zeros(n).1
}

/// Split `n` into its non-zero core and the number of trailing zeros: `27000 -> (27, 3)`.
pub fn strip_trailing_zeros(n: u64) -> (u64, u32) {
  if n == 0 {
    return (0, 0);
  }
  let (mut core, mut zeros) = (n, 0);
  while core % 10 == 0 {
    core /= 10;
    zeros += 1;
  }
  (core, zeros)
}

/// Split off the leading place value: `47 -> (40, 7)`, `347 -> (300, 47)`.
pub fn split_leading(n: u64) -> (u64, u64) {
  let place = pow10(digit_count(n) - 1);
  (n / place * place, n % place)
}

/// Smallest friendly amount that is at least `value`, or `None` when `value`
/// exceeds every entry. `friendly` must be sorted ascending.
pub fn round_up_to_friendly(value: u64, friendly: &[u64]) -> Option<u64> {
  friendly.iter().copied().find(|f| *f >= value)
}

/// True when `n` is an exact power of ten (1, 10, 100, ...).
pub fn is_power_of_ten(n: u64) -> bool {
  n > 0 && strip_trailing_zeros(n).0 == 1
}

/// Log-safe truncation for learner input.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{}… ({} chars total)", head, s.chars().count())
  }
}
