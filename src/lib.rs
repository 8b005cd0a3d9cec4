//! Practice Engine · adaptive arithmetic practice
//!
//! - Procedural problems for thirteen grade-school families (zeros, area model,
//!   division, fractions, decimals, sequences, rectangles, units, change)
//! - Answer checking with exact arithmetic and re-prompts for unreadable input
//! - Per-topic streak-based difficulty
//!
//! The engine is synchronous and keeps no global state: hosts own a
//! [`SessionContext`] and pass it into every [`Orchestrator`] call.
//!
//! Important env variables:
//!   PRACTICE_CONFIG_PATH : path to TOML config (attempt budget + per-topic overrides)
//!   PRACTICE_LOG         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default) or "json"

pub mod catalog;
pub mod config;
pub mod difficulty;
pub mod domain;
pub mod explain;
pub mod generator;
pub mod logic;
pub mod number;
pub mod protocol;
pub mod seeds;
pub mod state;
pub mod telemetry;
pub mod util;
pub mod validator;

pub use catalog::{Catalog, TopicSettings};
pub use difficulty::{advance, DifficultyPolicy, DifficultyState, LevelChange, Transition};
pub use domain::{AnswerKey, Operands, ProblemInstance, ProblemSource, TopicId};
pub use generator::{generate, generate_by_slug, generate_with_attempts, GenerateError};
pub use logic::{Feedback, Orchestrator, SessionError};
pub use number::{Decimal, Fraction, Value};
pub use state::SessionContext;
pub use validator::{validate, Submission, SubmissionError, Verdict, VerificationResult};
