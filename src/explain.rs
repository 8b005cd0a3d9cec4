//! Step-by-step explanations shown after an answer that was not fully correct.
//!
//! Every explanation is rebuilt from the operands, so it always agrees with
//! the answer key.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::domain::{ConversionDirection, Operands, ProblemInstance, SequenceRule, TopicId};
use crate::number::{Decimal, Fraction};
use crate::util::{fill_template, gcd, lcm, split_leading, strip_trailing_zeros, trailing_zeros};
use crate::validator::Verdict;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
  pub topic: TopicId,
  /// Verdict-specific remark, e.g. why an equal fraction was not accepted.
  pub note: Option<String>,
  pub steps: Vec<String>,
  pub answer: String,
}

fn fill(tpl: &str, pairs: &[(&str, &dyn Display)]) -> String {
  let owned: Vec<(&str, String)> = pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
  let borrowed: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
  fill_template(tpl, &borrowed)
}

fn note_for(verdict: &Verdict) -> Option<String> {
  match verdict {
    Verdict::NotSimplified => Some("Your fraction has the right value but is not in lowest terms yet.".into()),
    Verdict::Partial { correct, total } => Some(fill(
      "{correct} of {total} parts are right. Check the others below.",
      &[("correct", correct), ("total", total)],
    )),
    Verdict::Incorrect | Verdict::Correct => None,
  }
}

pub fn explain(problem: &ProblemInstance, verdict: &Verdict) -> Explanation {
  Explanation {
    topic: problem.topic,
    note: note_for(verdict),
    steps: steps(&problem.operands, problem),
    answer: problem.correct_answer.display(),
  }
}

fn steps(operands: &Operands, problem: &ProblemInstance) -> Vec<String> {
  match operands {
    Operands::MultiplyByZeros { a, b } => zeros_steps(*a, *b),
    Operands::AreaModel { a, b } => area_steps(*a, *b),
    Operands::DivideRemainder { dividend, divisor } => {
      let q = dividend / divisor;
      let used = q * divisor;
      let item = problem.narrative_fields.get("item").map(String::as_str).unwrap_or("items");
      vec![
        fill(
          "{divisor} × {q} = {used} is the largest multiple of {divisor} that fits in {dividend}.",
          &[("divisor", divisor), ("q", &q), ("used", &used), ("dividend", dividend)],
        ),
        fill("{dividend} − {used} = {r}.", &[("dividend", dividend), ("used", &used), ("r", &(dividend - used))]),
        fill("So {r} {item} are left over.", &[("r", &(dividend - used)), ("item", &item)]),
      ]
    }
    Operands::LongDivision { dividend, divisor } => {
      let q = dividend / divisor;
      let used = q * divisor;
      vec![
        fill(
          "{divisor} goes into {dividend} {q} times: {divisor} × {q} = {used}.",
          &[("divisor", divisor), ("dividend", dividend), ("q", &q), ("used", &used)],
        ),
        fill("Remainder: {dividend} − {used} = {r}.", &[("dividend", dividend), ("used", &used), ("r", &(dividend - used))]),
      ]
    }
    Operands::FractionSimplify { fraction } => simplify_steps(fraction),
    Operands::FractionAdd { left, right } => add_fraction_steps(left, right),
    Operands::EquivalentFractions { base, options } => options
      .iter()
      .map(|o| {
        let (x, y) = (o.numerator * base.denominator, base.numerator * o.denominator);
        let tpl = if x == y {
          "{o}: {on} × {bd} = {x} and {bn} × {od} = {y}, so {o} = {base}."
        } else {
          "{o}: {on} × {bd} = {x} but {bn} × {od} = {y}, so {o} is not equal to {base}."
        };
        fill(
          tpl,
          &[
            ("o", o),
            ("on", &o.numerator),
            ("od", &o.denominator),
            ("bn", &base.numerator),
            ("bd", &base.denominator),
            ("x", &x),
            ("y", &y),
            ("base", base),
          ],
        )
      })
      .collect(),
    Operands::DecimalAdd { left, right } => add_decimal_steps(left, right),
    Operands::DecimalShift { value, power, divide } => {
      let (verb, side, symbol) = if *divide { ("Dividing", "left", "÷") } else { ("Multiplying", "right", "×") };
      let places = if *divide { -(*power as i32) } else { *power as i32 };
      let factor = 10u64.pow(*power);
      vec![
        fill(
          "{verb} by {factor} moves the decimal point {power} place(s) to the {side}.",
          &[("verb", &verb), ("factor", &factor), ("power", power), ("side", &side)],
        ),
        fill(
          "{value} {symbol} {factor} = {answer}.",
          &[("value", value), ("symbol", &symbol), ("factor", &factor), ("answer", &value.shift(places))],
        ),
      ]
    }
    Operands::NumberSequence { start, rule, shown } => sequence_steps(*start, rule, *shown),
    Operands::RectangleMeasures { width, height } => {
      let unit = problem.narrative_fields.get("unit").map(String::as_str).unwrap_or("units");
      vec![
        fill(
          "Area = width × height = {w} × {h} = {area} square {unit}.",
          &[("w", width), ("h", height), ("area", &(width * height)), ("unit", &unit)],
        ),
        fill(
          "Perimeter = 2 × (width + height) = 2 × ({w} + {h}) = {p} {unit}.",
          &[("w", width), ("h", height), ("p", &(2 * (width + height))), ("unit", &unit)],
        ),
      ]
    }
    Operands::UnitConversion { pair, major, minor, direction } => {
      let ratio = pair.ratio();
      let total = major * ratio + minor;
      let (big, small) = (pair.major(), pair.minor());
      let mut out = vec![fill("1 {big} = {ratio} {small}.", &[("big", &big), ("ratio", &ratio), ("small", &small)])];
      match direction {
        ConversionDirection::ToMinor => {
          out.push(fill(
            "{major} {big} = {major} × {ratio} = {x} {small}.",
            &[("major", major), ("big", &big), ("ratio", &ratio), ("x", &(major * ratio)), ("small", &small)],
          ));
          if *minor > 0 {
            out.push(fill(
              "Add the extra {minor} {small}: {x} + {minor} = {total} {small}.",
              &[("minor", minor), ("small", &small), ("x", &(major * ratio)), ("total", &total)],
            ));
          }
        }
        ConversionDirection::ToMajor => {
          let places = trailing_zeros(ratio);
          out.push(fill(
            "{total} {small} ÷ {ratio} = {answer} {big}.",
            &[
              ("total", &total),
              ("small", &small),
              ("ratio", &ratio),
              ("answer", &Decimal::new(total as i64, places)),
              ("big", &big),
            ],
          ));
        }
      }
      out
    }
    Operands::MakingChange { price_cents, paid_cents } => {
      let currency = problem.narrative_fields.get("currency").map(String::as_str).unwrap_or("$");
      let money = |cents: u64| format!("{currency}{}", Decimal::from_cents(cents as i64));
      vec![
        "Change is the amount paid minus the price.".to_string(),
        fill(
          "{paid} − {price} = {change}.",
          &[
            ("paid", &money(*paid_cents)),
            ("price", &money(*price_cents)),
            ("change", &money(paid_cents - price_cents)),
          ],
        ),
      ]
    }
  }
}

fn zeros_steps(a: u64, b: u64) -> Vec<String> {
  let (ca, za) = strip_trailing_zeros(a);
  let (cb, zb) = strip_trailing_zeros(b);
  vec![
    fill("Multiply the non-zero parts: {ca} × {cb} = {p}.", &[("ca", &ca), ("cb", &cb), ("p", &(ca * cb))]),
    fill(
      "Count the zeros: {za} in {a} and {zb} in {b}, {z} in all.",
      &[("za", &za), ("a", &a), ("zb", &zb), ("b", &b), ("z", &(za + zb))],
    ),
    fill(
      "Write {z} zeros after {p}: {a} × {b} = {product}.",
      &[("z", &(za + zb)), ("p", &(ca * cb)), ("a", &a), ("b", &b), ("product", &(a * b))],
    ),
  ]
}

fn area_steps(a: u64, b: u64) -> Vec<String> {
  let (a_hi, a_lo) = split_leading(a);
  let (b_hi, b_lo) = split_leading(b);
  let pieces = [(a_hi, b_hi), (a_hi, b_lo), (a_lo, b_hi), (a_lo, b_lo)];
  let mut out = vec![fill(
    "Split {a} into {a_hi} + {a_lo} and {b} into {b_hi} + {b_lo}.",
    &[("a", &a), ("a_hi", &a_hi), ("a_lo", &a_lo), ("b", &b), ("b_hi", &b_hi), ("b_lo", &b_lo)],
  )];
  out.extend(
    pieces
      .iter()
      .map(|(x, y)| fill("{x} × {y} = {p}", &[("x", x), ("y", y), ("p", &(x * y))])),
  );
  let sum = pieces.iter().map(|(x, y)| (x * y).to_string()).collect::<Vec<_>>().join(" + ");
  out.push(fill("Add the pieces: {sum} = {total}.", &[("sum", &sum), ("total", &(a * b))]));
  out
}

fn simplify_steps(f: &Fraction) -> Vec<String> {
  let g = gcd(f.numerator.unsigned_abs(), f.denominator.unsigned_abs());
  let r = f.reduced();
  vec![
    fill(
      "The greatest common factor of {n} and {d} is {g}.",
      &[("n", &f.numerator), ("d", &f.denominator), ("g", &g)],
    ),
    fill(
      "Divide the top and the bottom by {g}: {n} ÷ {g} = {rn} and {d} ÷ {g} = {rd}.",
      &[("g", &g), ("n", &f.numerator), ("rn", &r.numerator), ("d", &f.denominator), ("rd", &r.denominator)],
    ),
    fill("{f} = {r} in lowest terms.", &[("f", f), ("r", &r)]),
  ]
}

fn add_fraction_steps(left: &Fraction, right: &Fraction) -> Vec<String> {
  let sum = left.add(right);
  let mut out = Vec::new();
  if left.denominator == right.denominator {
    out.push(fill(
      "The denominators match, so add the numerators: {a} + {b} = {n}.",
      &[("a", &left.numerator), ("b", &right.numerator), ("n", &sum.numerator)],
    ));
  } else {
    let lcd = lcm(left.denominator.unsigned_abs(), right.denominator.unsigned_abs()) as i64;
    let rewrite = |f: &Fraction| Fraction { numerator: f.numerator * (lcd / f.denominator), denominator: lcd };
    out.push(fill(
      "The least common denominator of {d1} and {d2} is {lcd}.",
      &[("d1", &left.denominator), ("d2", &right.denominator), ("lcd", &lcd)],
    ));
    out.push(fill(
      "Rewrite: {l} = {l2} and {r} = {r2}.",
      &[("l", left), ("l2", &rewrite(left)), ("r", right), ("r2", &rewrite(right))],
    ));
    out.push(fill("Add the numerators: {s}.", &[("s", &sum)]));
  }
  let reduced = sum.reduced();
  if reduced != sum {
    out.push(fill("Simplify: {s} = {r}.", &[("s", &sum), ("r", &reduced)]));
  }
  if reduced.numerator >= reduced.denominator {
    out.push(fill("As a mixed number: {m}.", &[("m", &reduced.to_mixed_string())]));
  }
  out
}

fn add_decimal_steps(left: &Decimal, right: &Decimal) -> Vec<String> {
  let scale = left.scale.max(right.scale);
  let (l, r) = (left.with_scale(scale), right.with_scale(scale));
  let place = match scale {
    1 => "tenths",
    2 => "hundredths",
    _ => "thousandths",
  };
  vec![
    fill("Line up the decimal points: {l} + {r}.", &[("l", &l), ("r", &r)]),
    fill(
      "Add as {place}: {lu} + {ru} = {su}.",
      &[("place", &place), ("lu", &l.units), ("ru", &r.units), ("su", &(l.units + r.units))],
    ),
    fill("Put the point back: {sum}.", &[("sum", &left.add(right))]),
  ]
}

fn sequence_steps(start: i64, rule: &SequenceRule, shown: usize) -> Vec<String> {
  let last = rule.term(start, shown.saturating_sub(1));
  let next = rule.term(start, shown);
  match *rule {
    SequenceRule::Add { step } if step >= 0 => vec![
      fill("Each term adds {step}.", &[("step", &step)]),
      fill("{last} + {step} = {next}.", &[("last", &last), ("step", &step), ("next", &next)]),
    ],
    SequenceRule::Add { step } => vec![
      fill("Each term subtracts {step}.", &[("step", &-step)]),
      fill("{last} − {step} = {next}.", &[("last", &last), ("step", &-step), ("next", &next)]),
    ],
    SequenceRule::Multiply { factor } => vec![
      fill("Each term is {factor} times the one before.", &[("factor", &factor)]),
      fill("{last} × {factor} = {next}.", &[("last", &last), ("factor", &factor), ("next", &next)]),
    ],
    SequenceRule::Alternate { first, second } => {
      let signed = |n: i64| format!("{n:+}");
      vec![
        fill(
          "The steps take turns: {first}, then {second}.",
          &[("first", &signed(first)), ("second", &signed(second))],
        ),
        fill(
          "The next step is {step}: {last} → {next}.",
          &[("step", &signed(next - last)), ("last", &last), ("next", &next)],
        ),
      ]
    }
  }
}
