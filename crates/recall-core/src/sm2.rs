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

use crate::config::SchedulerConfig;
use crate::error::Fallible;
use crate::types::card::MasteryLevel;
use crate::types::memory::MemoryState;
use crate::types::session::Difficulty;
use crate::types::session::ReviewSession;
use crate::types::timestamp::Timestamp;

/// Highest recall quality a session can report.
pub const MAX_QUALITY: u8 = 5;

/// Quality at or above which a review counts as successful.
pub const PASSING_QUALITY: u8 = 3;

/// Interval in days assigned on the second consecutive successful review.
const SECOND_INTERVAL: i64 = 6;

/// SM-2 scheduler with response-time and difficulty weighting.
///
/// Holds a validated configuration and nothing else; construct one per
/// configuration and share it freely. All operations take `now` explicitly,
/// so a single clock read covers every timestamp derived within a call.
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    /// Validates the configuration and builds a scheduler.
    pub fn new(config: SchedulerConfig) -> Fallible<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Memory state for a card the learner has just encountered.
    pub fn initial_state(&self, now: Timestamp) -> MemoryState {
        MemoryState {
            interval_days: 0,
            ease_factor: self.config.initial_ease_factor,
            repetition: 0,
            last_reviewed_at: now,
            next_review_at: now.add_days(self.config.initial_interval),
        }
    }

    /// Computes the memory state that follows `state` after one review.
    ///
    /// Identical inputs always yield identical outputs; the only clock
    /// involved is the caller-supplied `now`, which stamps
    /// `last_reviewed_at` and `next_review_at`. Out-of-range inputs are
    /// clamped rather than rejected, so this never fails.
    pub fn advance(
        &self,
        state: &MemoryState,
        session: &ReviewSession,
        now: Timestamp,
    ) -> MemoryState {
        let quality = session.quality.min(MAX_QUALITY);
        let (interval_days, ease_factor, repetition) = if quality >= PASSING_QUALITY {
            let repetition = state.repetition + 1;
            // Interval growth uses the pre-review ease factor.
            let interval_days = next_interval(
                repetition,
                state.interval_days,
                state.ease_factor,
                &self.config,
            );
            let ease = state.ease_factor + ease_delta(quality, self.config.ease_bonus);
            let ease = self.clamp_ease(ease * response_time_weight(session.response_time_ms));
            let ease = self.clamp_ease(ease * difficulty_weight(session.difficulty));
            (interval_days, self.clamp_ease(ease), repetition)
        } else {
            // A lapse is treated uniformly: no response-time or difficulty
            // weighting.
            let ease = state.ease_factor - self.config.ease_penalty;
            let ease = ease.max(self.config.min_ease_factor);
            (self.config.initial_interval, ease, 0)
        };
        log::debug!(
            "advance: quality={} interval {}d -> {}d ease {:.2} -> {:.2} repetition {} -> {}",
            quality,
            state.interval_days,
            interval_days,
            state.ease_factor,
            ease_factor,
            state.repetition,
            repetition
        );
        MemoryState {
            interval_days,
            ease_factor,
            repetition,
            last_reviewed_at: now,
            next_review_at: now.add_days(interval_days),
        }
    }

    fn clamp_ease(&self, ease: f64) -> f64 {
        ease.clamp(self.config.min_ease_factor, self.config.max_ease_factor)
    }
}

/// Change in ease produced by a successful review of the given quality.
/// The penalty is concave: near zero at quality 5, steeper toward 3.
pub fn ease_delta(quality: u8, ease_bonus: f64) -> f64 {
    let miss = (MAX_QUALITY - quality.min(MAX_QUALITY)) as f64;
    ease_bonus - miss * (0.08 + miss * 0.02)
}

/// Multiplier on ease derived from how quickly the learner answered.
pub fn response_time_weight(response_time_ms: u64) -> f64 {
    match response_time_ms {
        0..=2000 => 1.05,
        2001..=5000 => 1.0,
        5001..=10000 => 0.98,
        _ => 0.95,
    }
}

/// Multiplier on ease derived from the caller-assessed difficulty.
pub fn difficulty_weight(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 1.02,
        Difficulty::Medium => 1.0,
        Difficulty::Hard => 0.98,
    }
}

fn next_interval(
    repetition: u32,
    previous_interval: i64,
    ease_factor: f64,
    config: &SchedulerConfig,
) -> i64 {
    match repetition {
        1 => config.graduating_interval,
        2 => SECOND_INTERVAL,
        _ => ((previous_interval as f64) * ease_factor).round() as i64,
    }
}

/// Display-facing normalization of the ease factor into [0, 1].
///
/// This is the single definition of "memory strength"; both the mastery
/// classification and the aggregate statistics read it from here.
pub fn memory_strength(state: &MemoryState, config: &SchedulerConfig) -> f64 {
    let span = config.max_ease_factor - config.min_ease_factor;
    ((state.ease_factor - config.min_ease_factor) / span).clamp(0.0, 1.0)
}

/// Coarse mastery classification derived from ease and repetition count.
pub fn mastery_for(state: &MemoryState, config: &SchedulerConfig) -> MasteryLevel {
    if state.repetition == 0 {
        MasteryLevel::Learning
    } else if memory_strength(state, config) > config.mastery_strength_threshold
        && state.repetition >= config.mastery_min_repetitions
    {
        MasteryLevel::Mastered
    } else {
        MasteryLevel::Reviewing
    }
}
