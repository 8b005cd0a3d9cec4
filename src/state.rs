//! Session state: one entry per topic holding the difficulty state and the live problem.
//!
//! The engine keeps no hidden globals. The host owns a `SessionContext` and
//! passes it into every orchestrator call; its lifecycle (creation, reset,
//! expiry) is up to the host.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::difficulty::{DifficultyPolicy, DifficultyState};
use crate::domain::{ProblemInstance, TopicId};

/// The problem currently shown for a topic, with its answer pending.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiveProblem {
    pub problem: ProblemInstance,
    /// Graded submissions so far (re-prompts do not count).
    pub attempts: u32,
    pub solved: bool,
}

impl LiveProblem {
    pub fn new(problem: ProblemInstance) -> Self {
        Self { problem, attempts: 0, solved: false }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TopicSession {
    pub difficulty: DifficultyState,
    pub live: Option<LiveProblem>,
}

impl TopicSession {
    pub fn new(policy: &DifficultyPolicy) -> Self {
        Self { difficulty: DifficultyState::new(policy), live: None }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionContext {
    topics: HashMap<TopicId, TopicSession>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(&self, topic: TopicId) -> Option<&TopicSession> {
        self.topics.get(&topic)
    }

    /// Difficulty for `topic`, if the learner has visited it.
    pub fn difficulty(&self, topic: TopicId) -> Option<&DifficultyState> {
        self.topics.get(&topic).map(|s| &s.difficulty)
    }

    /// The topic's session, created at the policy's lowest level on first use.
    pub fn topic_mut(&mut self, topic: TopicId, policy: &DifficultyPolicy) -> &mut TopicSession {
        self.topics.entry(topic).or_insert_with(|| TopicSession::new(policy))
    }

    /// Forget everything about `topic`: level, streaks and live problem.
    /// The next visit starts over at the lowest level.
    pub fn reset(&mut self, topic: TopicId) {
        if self.topics.remove(&topic).is_some() {
            info!(target: "practice", %topic, "Topic session reset");
        }
    }

    pub fn visited(&self) -> impl Iterator<Item = TopicId> + '_ {
        self.topics.keys().copied()
    }
}
