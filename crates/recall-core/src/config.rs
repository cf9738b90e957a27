// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;
use serde::Serialize;

use crate::error::EngineError;
use crate::error::Fallible;

/// Tunable parameters of the scheduling algorithm.
///
/// Every field has a default, so a caller can override a subset (e.g. from a
/// TOML file) and leave the rest alone. Bounds are checked once when a
/// [`Scheduler`](crate::sm2::Scheduler) is constructed.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Floor for the ease factor.
    pub min_ease_factor: f64,
    /// Ceiling for the ease factor.
    pub max_ease_factor: f64,
    /// Ease factor assigned to a card on first exposure.
    pub initial_ease_factor: f64,
    /// Ease gained by a perfect-quality review, before weighting.
    pub ease_bonus: f64,
    /// Ease lost on a failed review.
    pub ease_penalty: f64,
    /// Interval in days assigned when a review fails, and used to schedule
    /// the first look at a brand-new card.
    pub initial_interval: i64,
    /// Interval in days assigned on the first successful review.
    pub graduating_interval: i64,
    /// Interval in days for cards rated easy during initial learning.
    /// Recognized for config-file compatibility; the interval tiers do not
    /// consult it.
    pub easy_interval: i64,
    /// Memory strength above which a card can count as mastered.
    pub mastery_strength_threshold: f64,
    /// Consecutive successful reviews required before a card can count as
    /// mastered.
    pub mastery_min_repetitions: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_ease_factor: 1.3,
            max_ease_factor: 3.5,
            initial_ease_factor: 2.5,
            ease_bonus: 0.1,
            ease_penalty: 0.2,
            initial_interval: 1,
            graduating_interval: 1,
            easy_interval: 4,
            mastery_strength_threshold: 0.9,
            mastery_min_repetitions: 5,
        }
    }
}

impl SchedulerConfig {
    /// Parse a configuration from TOML text. Missing keys take their
    /// defaults.
    pub fn from_toml_str(text: &str) -> Fallible<Self> {
        let config: SchedulerConfig = toml::from_str(text)?;
        Ok(config)
    }

    /// Check that the parameters make sense together.
    pub fn validate(&self) -> Fallible<()> {
        if self.min_ease_factor <= 0.0 {
            return Err(EngineError::configuration(format!(
                "min_ease_factor must be positive, got {}",
                self.min_ease_factor
            )));
        }
        if self.max_ease_factor <= self.min_ease_factor {
            return Err(EngineError::configuration(format!(
                "ease bounds inverted: min {} >= max {}",
                self.min_ease_factor, self.max_ease_factor
            )));
        }
        if self.initial_ease_factor < self.min_ease_factor
            || self.initial_ease_factor > self.max_ease_factor
        {
            return Err(EngineError::configuration(format!(
                "initial_ease_factor {} outside [{}, {}]",
                self.initial_ease_factor, self.min_ease_factor, self.max_ease_factor
            )));
        }
        if self.ease_bonus < 0.0 {
            return Err(EngineError::configuration("ease_bonus must not be negative"));
        }
        if self.ease_penalty < 0.0 {
            return Err(EngineError::configuration("ease_penalty must not be negative"));
        }
        if self.initial_interval < 0 {
            return Err(EngineError::configuration("initial_interval must not be negative"));
        }
        if self.graduating_interval < 1 {
            return Err(EngineError::configuration("graduating_interval must be at least one day"));
        }
        if self.easy_interval < 1 {
            return Err(EngineError::configuration("easy_interval must be at least one day"));
        }
        if self.mastery_strength_threshold <= 0.0 || self.mastery_strength_threshold > 1.0 {
            return Err(EngineError::configuration(format!(
                "mastery_strength_threshold must be in (0, 1], got {}",
                self.mastery_strength_threshold
            )));
        }
        if self.mastery_min_repetitions == 0 {
            return Err(EngineError::configuration(
                "mastery_min_repetitions must be at least one",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.min_ease_factor, 1.3);
        assert_eq!(config.max_ease_factor, 3.5);
        assert_eq!(config.initial_ease_factor, 2.5);
        assert_eq!(config.ease_bonus, 0.1);
        assert_eq!(config.ease_penalty, 0.2);
        assert_eq!(config.initial_interval, 1);
        assert_eq!(config.graduating_interval, 1);
        assert_eq!(config.easy_interval, 4);
        assert_eq!(config.mastery_strength_threshold, 0.9);
        assert_eq!(config.mastery_min_repetitions, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial_override() -> Fallible<()> {
        let config = SchedulerConfig::from_toml_str(
            "max_ease_factor = 3.0\nease_penalty = 0.3\nmastery_min_repetitions = 7\n",
        )?;
        assert_eq!(config.max_ease_factor, 3.0);
        assert_eq!(config.ease_penalty, 0.3);
        assert_eq!(config.mastery_min_repetitions, 7);
        // Untouched keys keep their defaults.
        assert_eq!(config.min_ease_factor, 1.3);
        assert_eq!(config.graduating_interval, 1);
        Ok(())
    }

    #[test]
    fn test_from_toml_empty() -> Fallible<()> {
        let config = SchedulerConfig::from_toml_str("")?;
        assert_eq!(config, SchedulerConfig::default());
        Ok(())
    }

    #[test]
    fn test_from_toml_invalid() {
        let result = SchedulerConfig::from_toml_str("min_ease_factor = = 1.3");
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_validate_inverted_bounds() {
        let config = SchedulerConfig {
            min_ease_factor: 3.5,
            max_ease_factor: 1.3,
            ..SchedulerConfig::default()
        };
        let err = config.validate().err().unwrap();
        assert!(matches!(err, EngineError::Configuration(_)));
    }

    #[test]
    fn test_validate_negative_min_ease() {
        let config = SchedulerConfig {
            min_ease_factor: -1.0,
            ..SchedulerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_initial_ease_out_of_bounds() {
        let config = SchedulerConfig {
            initial_ease_factor: 4.0,
            ..SchedulerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_negative_penalty() {
        let config = SchedulerConfig {
            ease_penalty: -0.2,
            ..SchedulerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_mastery_repetitions() {
        let config = SchedulerConfig {
            mastery_min_repetitions: 0,
            ..SchedulerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
