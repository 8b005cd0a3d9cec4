//! The practice loop: fetch or generate a problem, grade a submission,
//! move the difficulty, and decide when the next problem appears.
//!
//! This includes:
//!   - Serving the live problem for a topic (generated on demand at the current level)
//!   - Grading answers against the live problem (stale and repeat submissions rejected)
//!   - Advancing per-topic difficulty and attaching explanations to misses
//!   - Retiring problems (explicit "next", or automatically for auto-next families)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::difficulty::{advance_with, LevelChange, Transition};
use crate::domain::{ProblemInstance, TopicId};
use crate::explain::{explain, Explanation};
use crate::generator::{generate_with_attempts, GenerateError};
use crate::state::{LiveProblem, SessionContext};
use crate::util::trunc_for_log;
use crate::validator::{validate, Submission, SubmissionError, VerificationResult};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
  #[error(transparent)]
  Generate(#[from] GenerateError),
  #[error("no problem is live for {topic}")]
  NoLiveProblem { topic: TopicId },
  #[error("answer is for problem {got}, but the live problem is {expected}")]
  StaleProblem { expected: Uuid, got: Uuid },
  #[error("problem {id} has already been solved")]
  AlreadySolved { id: Uuid },
  #[error(transparent)]
  Submission(#[from] SubmissionError),
}

impl SessionError {
  /// Input problems the learner can fix by answering again; state is untouched.
  pub fn is_reprompt(&self) -> bool {
    matches!(self, SessionError::Submission(_))
  }
}

/// Outcome of one graded submission.
#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
  pub result: VerificationResult,
  pub transition: Transition,
  /// Present for every verdict other than `Correct`.
  pub explanation: Option<Explanation>,
  /// The live problem was discarded; the next `current_problem` generates a new one.
  pub retired: bool,
}

pub struct Orchestrator<R: Rng = ChaCha8Rng> {
  catalog: Catalog,
  rng: R,
}

impl Orchestrator<ChaCha8Rng> {
  /// Reproducible sessions: same seed, same problems.
  pub fn seeded(catalog: Catalog, seed: u64) -> Self {
    Self::new(catalog, ChaCha8Rng::seed_from_u64(seed))
  }

  pub fn from_entropy(catalog: Catalog) -> Self {
    Self::new(catalog, ChaCha8Rng::from_entropy())
  }
}

impl<R: Rng> Orchestrator<R> {
  pub fn new(catalog: Catalog, rng: R) -> Self {
    Self { catalog, rng }
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  /// The live problem for `topic`, generating one at the current level if there is none.
  #[instrument(level = "info", skip(self, ctx), fields(%topic))]
  pub fn current_problem(&mut self, ctx: &mut SessionContext, topic: TopicId) -> Result<ProblemInstance, SessionError> {
    let settings = self.catalog.settings(topic);
    let session = ctx.topic_mut(topic, &settings.policy);
    if let Some(live) = &session.live {
      return Ok(live.problem.clone());
    }

    let level = settings.policy.clamp(session.difficulty.level);
    let problem = generate_with_attempts(topic, level, settings.max_attempts, &mut self.rng)?;
    info!(target: "practice", %topic, level, id = %problem.id, source = ?problem.source, "New live problem");
    session.live = Some(LiveProblem::new(problem.clone()));
    Ok(problem)
  }

  /// Grade `submission` against the live problem `problem_id`.
  ///
  /// Unreadable input returns `SessionError::Submission` and changes nothing.
  #[instrument(level = "info", skip(self, ctx, submission), fields(%topic, %problem_id))]
  pub fn submit(
    &mut self,
    ctx: &mut SessionContext,
    topic: TopicId,
    problem_id: Uuid,
    submission: &Submission,
  ) -> Result<Feedback, SessionError> {
    let settings = self.catalog.settings(topic);
    let session = ctx.topic_mut(topic, &settings.policy);
    let live = session.live.as_mut().ok_or(SessionError::NoLiveProblem { topic })?;
    if live.problem.id != problem_id {
      return Err(SessionError::StaleProblem { expected: live.problem.id, got: problem_id });
    }
    if live.solved {
      return Err(SessionError::AlreadySolved { id: problem_id });
    }

    let result = match validate(&live.problem, submission) {
      Ok(r) => r,
      Err(e) => {
        debug!(target: "practice", %topic, submission = %trunc_for_log(&format!("{submission:?}"), 80), error = %e, "Re-prompting");
        return Err(e.into());
      }
    };

    let correct = result.is_correct();
    live.attempts = live.attempts.saturating_add(1);
    live.solved = correct;
    let explanation = (!correct).then(|| explain(&live.problem, &result.verdict));
    let attempts = live.attempts;

    let transition = advance_with(&session.difficulty, &settings.policy, &result);
    session.difficulty = transition.state;

    let retired = correct && settings.auto_next;
    if retired {
      session.live = None;
    }

    info!(
      target: "practice",
      %topic,
      verdict = ?result.verdict,
      attempts,
      level = transition.state.level,
      raised = transition.change == LevelChange::Raised,
      lowered = transition.change == LevelChange::Lowered,
      mastery = transition.mastery_reached,
      retired,
      "Graded submission"
    );
    Ok(Feedback { result, transition, explanation, retired })
  }

  /// Discard the live problem (solved or not) and generate the next one.
  #[instrument(level = "info", skip(self, ctx), fields(%topic))]
  pub fn next_problem(&mut self, ctx: &mut SessionContext, topic: TopicId) -> Result<ProblemInstance, SessionError> {
    let settings = self.catalog.settings(topic);
    ctx.topic_mut(topic, &settings.policy).live = None;
    self.current_problem(ctx, topic)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::validator::Verdict;

  fn orchestrator() -> Orchestrator {
    Orchestrator::seeded(Catalog::default(), 2024)
  }

  #[test]
  fn current_problem_is_stable_until_next() {
    let mut o = orchestrator();
    let mut ctx = SessionContext::new();
    let a = o.current_problem(&mut ctx, TopicId::LongDivision).unwrap();
    let b = o.current_problem(&mut ctx, TopicId::LongDivision).unwrap();
    assert_eq!(a.id, b.id);
    let c = o.next_problem(&mut ctx, TopicId::LongDivision).unwrap();
    assert_ne!(a.id, c.id);
  }

  #[test]
  fn unreadable_answer_reprompts_without_touching_state() {
    let mut o = orchestrator();
    let mut ctx = SessionContext::new();
    let p = o.current_problem(&mut ctx, TopicId::DivideRemainder).unwrap();
    let before = *ctx.difficulty(TopicId::DivideRemainder).unwrap();
    let err = o.submit(&mut ctx, TopicId::DivideRemainder, p.id, &"seven-ish".into()).unwrap_err();
    assert!(err.is_reprompt());
    assert_eq!(*ctx.difficulty(TopicId::DivideRemainder).unwrap(), before);
    assert_eq!(ctx.topic(TopicId::DivideRemainder).unwrap().live.as_ref().unwrap().attempts, 0);
  }

  #[test]
  fn stale_and_missing_problems_are_rejected() {
    let mut o = orchestrator();
    let mut ctx = SessionContext::new();
    assert!(matches!(
      o.submit(&mut ctx, TopicId::AreaModel, Uuid::nil(), &"1".into()),
      Err(SessionError::NoLiveProblem { .. })
    ));
    let old = o.current_problem(&mut ctx, TopicId::AreaModel).unwrap();
    o.next_problem(&mut ctx, TopicId::AreaModel).unwrap();
    assert!(matches!(
      o.submit(&mut ctx, TopicId::AreaModel, old.id, &old.correct_answer.as_submission()),
      Err(SessionError::StaleProblem { .. })
    ));
  }

  #[test]
  fn wrong_answers_come_with_an_explanation() {
    let mut o = orchestrator();
    let mut ctx = SessionContext::new();
    let p = o.current_problem(&mut ctx, TopicId::FractionSimplify).unwrap();
    let fb = o.submit(&mut ctx, TopicId::FractionSimplify, p.id, &"999/1000".into()).unwrap();
    assert_eq!(fb.result.verdict, Verdict::Incorrect);
    assert!(fb.explanation.is_some());
    assert!(!fb.retired);

    let fb = o.submit(&mut ctx, TopicId::FractionSimplify, p.id, &p.correct_answer.as_submission()).unwrap();
    assert!(fb.result.is_correct());
    assert!(fb.explanation.is_none());
    assert!(matches!(
      o.submit(&mut ctx, TopicId::FractionSimplify, p.id, &p.correct_answer.as_submission()),
      Err(SessionError::AlreadySolved { .. })
    ));
  }

  #[test]
  fn auto_next_families_retire_on_correct() {
    let mut o = orchestrator();
    let mut ctx = SessionContext::new();
    let p = o.current_problem(&mut ctx, TopicId::MultiplyByZeros).unwrap();
    let fb = o.submit(&mut ctx, TopicId::MultiplyByZeros, p.id, &p.correct_answer.as_submission()).unwrap();
    assert!(fb.retired);
    assert_eq!(fb.transition.change, LevelChange::Raised);
    let q = o.current_problem(&mut ctx, TopicId::MultiplyByZeros).unwrap();
    assert_ne!(p.id, q.id);
    assert_eq!(q.level, 2);
  }
}
