//! Per-topic settings: level bounds, streak thresholds, auto-next and the attempt budget.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{error, info};

use crate::config::{load_config_from_env, ConfigError, PracticeConfig};
use crate::difficulty::DifficultyPolicy;
use crate::domain::TopicId;
use crate::generator::DEFAULT_MAX_ATTEMPTS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TopicSettings {
  pub policy: DifficultyPolicy,
  /// Retire the live problem as soon as it is answered correctly.
  pub auto_next: bool,
  pub max_attempts: u32,
}

/// Built-in thresholds (raise after, lower after) and auto-next flag per family.
fn builtin(topic: TopicId) -> TopicSettings {
  let (raise_after, lower_after, auto_next) = match topic {
    TopicId::MultiplyByZeros | TopicId::DecimalShift => (1, 1, true),
    TopicId::DecimalAdd => (1, 1, false),
    TopicId::DivideRemainder
    | TopicId::NumberSequence
    | TopicId::EquivalentFractions
    | TopicId::MakingChange => (1, 2, false),
    TopicId::LongDivision | TopicId::AreaModel | TopicId::FractionAdd => (3, 2, false),
    TopicId::FractionSimplify | TopicId::RectangleMeasures => (3, 1, false),
    TopicId::UnitConversion => (3, 3, false),
  };
  let (min_level, max_level) = topic.supported_levels();
  TopicSettings {
    policy: DifficultyPolicy { min_level, max_level, raise_after, lower_after },
    auto_next,
    max_attempts: DEFAULT_MAX_ATTEMPTS,
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
  topics: BTreeMap<TopicId, TopicSettings>,
}

impl Default for Catalog {
  fn default() -> Self {
    Self { topics: TopicId::ALL.into_iter().map(|t| (t, builtin(t))).collect() }
  }
}

impl Catalog {
  pub fn settings(&self, topic: TopicId) -> TopicSettings {
    self.topics.get(&topic).copied().unwrap_or_else(|| builtin(topic))
  }

  pub fn policy(&self, topic: TopicId) -> DifficultyPolicy {
    self.settings(topic).policy
  }

  /// Built-ins with the configuration's overrides applied.
  ///
  /// Overrides may narrow a family's level range but never widen it, and
  /// every threshold or budget must be at least one.
  pub fn from_config(cfg: &PracticeConfig) -> Result<Self, ConfigError> {
    let mut catalog = Catalog::default();

    if let Some(budget) = cfg.generator.max_attempts {
      if budget == 0 {
        return Err(ConfigError::ZeroSetting { scope: "generator".into(), field: "max_attempts" });
      }
      for settings in catalog.topics.values_mut() {
        settings.max_attempts = budget;
      }
    }

    for (slug, over) in &cfg.topics {
      let topic: TopicId = slug.parse()?;
      let mut settings = catalog.settings(topic);
      let (supported_min, supported_max) = topic.supported_levels();

      let min = over.min_level.unwrap_or(settings.policy.min_level);
      let max = over.max_level.unwrap_or(settings.policy.max_level);
      if min < supported_min || max > supported_max || min > max {
        return Err(ConfigError::LevelBounds { topic, min, max, supported_min, supported_max });
      }
      settings.policy.min_level = min;
      settings.policy.max_level = max;

      let positive = |value: Option<u32>, current: u32, field: &'static str| match value {
        Some(0) => Err(ConfigError::ZeroSetting { scope: topic.to_string(), field }),
        Some(v) => Ok(v),
        None => Ok(current),
      };
      settings.policy.raise_after = positive(over.raise_after, settings.policy.raise_after, "raise_after")?;
      settings.policy.lower_after = positive(over.lower_after, settings.policy.lower_after, "lower_after")?;
      settings.max_attempts = positive(over.max_attempts, settings.max_attempts, "max_attempts")?;
      settings.auto_next = over.auto_next.unwrap_or(settings.auto_next);

      info!(target: "practice_engine", %topic, ?settings, "Applied topic override");
      catalog.topics.insert(topic, settings);
    }
    Ok(catalog)
  }

  /// Catalog from PRACTICE_CONFIG_PATH, or the built-ins when unset or invalid.
  pub fn from_env() -> Self {
    match load_config_from_env() {
      Some(cfg) => Catalog::from_config(&cfg).unwrap_or_else(|e| {
        error!(target: "practice_engine", error = %e, "Invalid practice config; using built-in settings");
        Catalog::default()
      }),
      None => Catalog::default(),
    }
  }
}
