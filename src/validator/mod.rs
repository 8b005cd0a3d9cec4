//! Answer checking.
//!
//! `validate` compares a learner submission with the problem's answer key
//! according to the key's shape. Input that cannot be read is reported as a
//! [`SubmissionError`] so the caller can re-prompt; it never counts as a
//! wrong answer.

pub mod parse;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AnswerKey, ProblemInstance, TopicId};
use crate::number::Value;
pub use parse::ParseError;
use parse::{parse_fraction, parse_fraction_list, parse_quotient_remainder, parse_value, parse_whole};

/// What the learner sent, as the presentation layer collected it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Submission {
  /// One free-text box.
  Text(String),
  /// One box per labelled field, in the key's field order.
  Fields(Vec<String>),
  /// Index into the displayed multiple-choice options.
  Choice(usize),
  /// Indices of the selected options.
  Selection(BTreeSet<usize>),
}

impl Submission {
  fn kind(&self) -> &'static str {
    match self {
      Submission::Text(_) => "text",
      Submission::Fields(_) => "multi-field",
      Submission::Choice(_) => "choice",
      Submission::Selection(_) => "selection",
    }
  }
}

impl From<&str> for Submission {
  fn from(s: &str) -> Self {
    Submission::Text(s.to_string())
  }
}

impl From<String> for Submission {
  fn from(s: String) -> Self {
    Submission::Text(s)
  }
}

impl From<i64> for Submission {
  fn from(n: i64) -> Self {
    Submission::Text(n.to_string())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
  #[error(transparent)]
  Parse(#[from] ParseError),
  #[error("{missing} answer field(s) left blank")]
  Incomplete { missing: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
  Correct,
  Incorrect,
  /// Equal in value to the answer but not reduced. Not correct.
  NotSimplified,
  /// Some parts right, some wrong.
  Partial { correct: usize, total: usize },
}

/// The submission after parsing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", content = "answer", rename_all = "snake_case")]
pub enum NormalizedAnswer {
  Value(Value),
  QuotientRemainder { quotient: u64, remainder: u64 },
  Fields(Vec<Value>),
  Selection(BTreeSet<usize>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
  pub problem_id: Uuid,
  pub topic: TopicId,
  pub verdict: Verdict,
  /// Per-field correctness for tuple, multi-part and multi-select answers.
  pub parts: Vec<bool>,
  pub submitted: NormalizedAnswer,
}

impl VerificationResult {
  pub fn is_correct(&self) -> bool {
    self.verdict == Verdict::Correct
  }
}

pub fn validate(problem: &ProblemInstance, submission: &Submission) -> Result<VerificationResult, SubmissionError> {
  let (verdict, parts, submitted) = check(&problem.correct_answer, submission)?;
  Ok(VerificationResult { problem_id: problem.id, topic: problem.topic, verdict, parts, submitted })
}

fn wrong_shape(submission: &Submission) -> SubmissionError {
  ParseError::WrongShape { got: submission.kind() }.into()
}

/// One text box or a single field.
fn single_text(submission: &Submission) -> Result<&str, SubmissionError> {
  match submission {
    Submission::Text(s) => Ok(s.as_str()),
    Submission::Fields(fields) if fields.len() == 1 => Ok(fields[0].as_str()),
    Submission::Fields(fields) => Err(ParseError::FieldCount { expected: 1, got: fields.len() }.into()),
    other => Err(wrong_shape(other)),
  }
}

/// Field texts for a key with `expected` fields. Free text may separate them with `;`.
fn field_texts(submission: &Submission, expected: usize) -> Result<Vec<String>, SubmissionError> {
  let fields: Vec<String> = match submission {
    Submission::Fields(fields) => fields.clone(),
    Submission::Text(s) => s.split(';').map(str::to_string).collect(),
    other => return Err(wrong_shape(other)),
  };
  if fields.len() != expected {
    return Err(ParseError::FieldCount { expected, got: fields.len() }.into());
  }
  let missing = fields.iter().filter(|f| f.trim().is_empty()).count();
  if missing > 0 {
    return Err(SubmissionError::Incomplete { missing });
  }
  Ok(fields)
}

fn tally(parts: &[bool]) -> Verdict {
  let correct = parts.iter().filter(|p| **p).count();
  match correct {
    0 => Verdict::Incorrect,
    n if n == parts.len() => Verdict::Correct,
    n => Verdict::Partial { correct: n, total: parts.len() },
  }
}

fn check(key: &AnswerKey, submission: &Submission) -> Result<(Verdict, Vec<bool>, NormalizedAnswer), SubmissionError> {
  match key {
    AnswerKey::Single { value } => {
      let got = parse_value(single_text(submission)?)?;
      let verdict = if got == *value { Verdict::Correct } else { Verdict::Incorrect };
      Ok((verdict, Vec::new(), NormalizedAnswer::Value(got)))
    }

    AnswerKey::LowestTerms { fraction } => {
      let got = parse_fraction(single_text(submission)?)?;
      let verdict = match (got.equivalent(fraction), got.is_lowest_terms()) {
        (true, true) => Verdict::Correct,
        (true, false) => Verdict::NotSimplified,
        _ => Verdict::Incorrect,
      };
      Ok((verdict, Vec::new(), NormalizedAnswer::Value(Value::Fraction(got))))
    }

    AnswerKey::QuotientRemainder { quotient, remainder } => {
      let (q, r) = match submission {
        Submission::Fields(_) => {
          let fields = field_texts(submission, 2)?;
          let part = |s: &str| {
            parse_whole(s)
              .ok()
              .and_then(|n| u64::try_from(n).ok())
              .ok_or_else(|| ParseError::MalformedTuple(s.trim().to_string()))
          };
          (part(&fields[0])?, part(&fields[1])?)
        }
        Submission::Text(s) => parse_quotient_remainder(s)?,
        other => return Err(wrong_shape(other)),
      };
      let parts = vec![q == *quotient, r == *remainder];
      Ok((tally(&parts), parts, NormalizedAnswer::QuotientRemainder { quotient: q, remainder: r }))
    }

    AnswerKey::MultiPart { parts: expected } => {
      let fields = field_texts(submission, expected.len())?;
      let values = fields.iter().map(|f| parse_value(f)).collect::<Result<Vec<_>, _>>()?;
      let parts: Vec<bool> = values.iter().zip(expected).map(|(got, want)| *got == want.value).collect();
      Ok((tally(&parts), parts, NormalizedAnswer::Fields(values)))
    }

    AnswerKey::MultipleChoice { correct, .. } => {
      let options = key.options();
      let got = match submission {
        Submission::Choice(index) => *options
          .get(*index)
          .ok_or(ParseError::ChoiceOutOfRange { index: *index, count: options.len() })?,
        _ => {
          let text = single_text(submission)?;
          let typed = parse_value(text)?;
          *options
            .iter()
            .find(|o| **o == typed)
            .ok_or_else(|| ParseError::UnknownOption(text.trim().to_string()))?
        }
      };
      let verdict = if got == *correct { Verdict::Correct } else { Verdict::Incorrect };
      Ok((verdict, Vec::new(), NormalizedAnswer::Value(got)))
    }

    AnswerKey::MultiSelect { options, correct } => {
      let selected: BTreeSet<usize> = match submission {
        Submission::Selection(indices) => {
          if let Some(index) = indices.iter().find(|i| **i >= options.len()) {
            return Err(ParseError::ChoiceOutOfRange { index: *index, count: options.len() }.into());
          }
          indices.clone()
        }
        Submission::Text(s) if s.trim().is_empty() => BTreeSet::new(),
        Submission::Text(s) => parse_fraction_list(s)?
          .iter()
          .map(|f| {
            options
              .iter()
              .position(|o| o == f)
              .ok_or_else(|| ParseError::UnknownOption(f.to_string()))
          })
          .collect::<Result<_, _>>()?,
        other => return Err(wrong_shape(other)),
      };
      if selected.is_empty() {
        return Err(SubmissionError::Incomplete { missing: 1 });
      }
      let parts: Vec<bool> = (0..options.len())
        .map(|i| selected.contains(&i) == correct.contains(&i))
        .collect();
      let hits = selected.intersection(correct).count();
      let verdict = if selected == *correct {
        Verdict::Correct
      } else if hits > 0 {
        Verdict::Partial { correct: hits, total: correct.len() }
      } else {
        Verdict::Incorrect
      };
      Ok((verdict, parts, NormalizedAnswer::Selection(selected)))
    }
  }
}

impl AnswerKey {
  /// The submission a learner who knows the answer would send.
  pub fn as_submission(&self) -> Submission {
    match self {
      AnswerKey::Single { value } => Submission::Text(value.to_string()),
      AnswerKey::LowestTerms { fraction } => Submission::Text(fraction.to_string()),
      AnswerKey::QuotientRemainder { quotient, remainder } => Submission::Text(format!("{quotient} R {remainder}")),
      AnswerKey::MultiPart { parts } => Submission::Fields(parts.iter().map(|p| p.value.to_string()).collect()),
      AnswerKey::MultipleChoice { correct, .. } => {
        Submission::Choice(self.options().iter().position(|o| o == correct).unwrap_or(0))
      }
      AnswerKey::MultiSelect { correct, .. } => Submission::Selection(correct.clone()),
    }
  }
}
