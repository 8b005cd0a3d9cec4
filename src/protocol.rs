//! Public DTOs for whatever shell hosts the engine (serde ready, camelCase JSON).
//! Keep this small and stable to evolve the engine and the presentation layer independently.
//!
//! `ProblemOut` never carries the answer key.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::difficulty::LevelChange;
use crate::domain::{AnswerKey, ProblemInstance, TopicId, UnknownTopic};
use crate::explain::Explanation;
use crate::logic::{Feedback, SessionError};
use crate::number::{Fraction, Value};
use crate::validator::{Submission, Verdict};

/// How the presentation layer should collect the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerInput {
    Number,
    Fraction,
    QuotientRemainder,
    Fields,
    Choice,
    MultiSelect,
}

/// DTO for problem delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemOut {
    pub id: Uuid,
    pub topic: TopicId,
    pub level: u8,
    /// Operands in display order.
    pub values: Vec<Value>,
    pub narrative: BTreeMap<String, String>,
    pub input: AnswerInput,
    /// Labels for `fields` / `quotient_remainder` input.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_labels: Vec<String>,
    /// Multiple-choice options, ascending.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Value>,
    /// Multi-select fraction options.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fraction_options: Vec<Fraction>,
}

/// Convert a full `ProblemInstance` (internal) to the public DTO.
pub fn to_problem_out(p: &ProblemInstance) -> ProblemOut {
    let (input, fraction_options) = match &p.correct_answer {
        AnswerKey::Single { value: Value::Fraction(_) } | AnswerKey::LowestTerms { .. } => (AnswerInput::Fraction, Vec::new()),
        AnswerKey::Single { .. } => (AnswerInput::Number, Vec::new()),
        AnswerKey::QuotientRemainder { .. } => (AnswerInput::QuotientRemainder, Vec::new()),
        AnswerKey::MultiPart { .. } => (AnswerInput::Fields, Vec::new()),
        AnswerKey::MultipleChoice { .. } => (AnswerInput::Choice, Vec::new()),
        AnswerKey::MultiSelect { options, .. } => (AnswerInput::MultiSelect, options.clone()),
    };
    ProblemOut {
        id: p.id,
        topic: p.topic,
        level: p.level,
        values: p.operands.values(),
        narrative: p.narrative_fields.clone(),
        input,
        field_labels: p.correct_answer.field_labels(),
        options: p.correct_answer.options(),
        fraction_options,
    }
}

//
// Answer submission
//

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerIn {
    pub problem_id: Uuid,
    /// Topic slug; legacy names are accepted.
    pub topic: String,
    pub answer: Submission,
}

impl AnswerIn {
    pub fn topic_id(&self) -> Result<TopicId, UnknownTopic> {
        self.topic.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackOut {
    pub problem_id: Uuid,
    pub correct: bool,
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<bool>,
    pub level: u8,
    pub level_change: LevelChange,
    pub mastery_reached: bool,
    pub retired: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

pub fn to_feedback_out(f: &Feedback) -> FeedbackOut {
    FeedbackOut {
        problem_id: f.result.problem_id,
        correct: f.result.is_correct(),
        verdict: f.result.verdict,
        parts: f.result.parts.clone(),
        level: f.transition.state.level,
        level_change: f.transition.change,
        mastery_reached: f.transition.mastery_reached,
        retired: f.retired,
        explanation: f.explanation.clone(),
    }
}

/// Error view. `reprompt` means "ask the learner to answer again"; nothing was graded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOut {
    pub message: String,
    pub reprompt: bool,
}

pub fn to_error_out(e: &SessionError) -> ErrorOut {
    ErrorOut { message: e.to_string(), reprompt: e.is_reprompt() }
}

/// Selection helper for hosts that collect checkbox state as booleans.
pub fn selection_from_flags(flags: &[bool]) -> Submission {
    Submission::Selection(
        flags
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(i, _)| i)
            .collect::<BTreeSet<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Operands, ProblemSource};

    fn problem(operands: Operands) -> ProblemInstance {
        ProblemInstance {
            id: Uuid::nil(),
            topic: operands.topic(),
            level: 2,
            correct_answer: operands.solve(),
            operands,
            narrative_fields: BTreeMap::new(),
            source: ProblemSource::Fallback,
        }
    }

    #[test]
    fn problem_out_hides_the_answer() {
        let out = to_problem_out(&problem(Operands::DivideRemainder { dividend: 58, divisor: 7 }));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["topic"], "divide-remainder");
        assert_eq!(json["input"], "number");
        assert!(json.get("correctAnswer").is_none());
        assert!(json.get("options").is_none());
        assert_eq!(json["values"][0]["value"], 58);
    }

    #[test]
    fn multiple_choice_lists_sorted_options() {
        let out = to_problem_out(&problem(Operands::MultiplyByZeros { a: 90, b: 300 }));
        assert_eq!(out.input, AnswerInput::Choice);
        let shown: Vec<String> = out.options.iter().map(|v| v.to_string()).collect();
        assert_eq!(shown, vec!["390", "2700", "27000", "270000"]);
    }

    #[test]
    fn answer_in_reads_camel_case() {
        let a: AnswerIn = serde_json::from_str(
            r#"{"problemId":"00000000-0000-0000-0000-000000000000","topic":"divide-by-one-digit","answer":{"kind":"text","value":"2"}}"#,
        )
        .unwrap();
        assert_eq!(a.topic_id(), Ok(TopicId::DivideRemainder));
        assert_eq!(a.answer, Submission::Text("2".into()));
    }

    #[test]
    fn checkbox_flags_become_a_selection() {
        assert_eq!(selection_from_flags(&[true, false, true]), Submission::Selection(BTreeSet::from([0, 2])));
    }
}
