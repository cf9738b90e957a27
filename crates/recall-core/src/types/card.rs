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

use std::collections::VecDeque;

use serde::Deserialize;
use serde::Serialize;

use crate::error::EngineError;
use crate::error::Fallible;
use crate::sm2::PASSING_QUALITY;
use crate::sm2::Scheduler;
use crate::sm2::mastery_for;
use crate::types::aliases::CardId;
use crate::types::aliases::LearnerId;
use crate::types::memory::MemoryState;
use crate::types::session::ReviewSession;
use crate::types::timestamp::Timestamp;

/// Number of recent review outcomes retained per card.
const HISTORY_WINDOW: usize = 10;

/// Reference to a content item owned by an external store. The engine never
/// interprets the key or the display fields.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ContentRef {
    /// Key into the external content store.
    pub key: String,
    /// Prompt-side display text.
    pub front: String,
    /// Answer-side display text.
    pub back: String,
}

/// Coarse classification of a learner's grip on an item. Ordered from
/// least to most established.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum MasteryLevel {
    Learning,
    Reviewing,
    Mastered,
}

impl MasteryLevel {
    pub fn as_str(&self) -> &str {
        match self {
            MasteryLevel::Learning => "learning",
            MasteryLevel::Reviewing => "reviewing",
            MasteryLevel::Mastered => "mastered",
        }
    }
}

/// Rolling record of recent review outcomes for one card.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct PerformanceHistory {
    /// Accuracy flags for the most recent reviews, oldest first.
    pub recent_correct: VecDeque<bool>,
    /// Response times for the most recent reviews, oldest first.
    pub recent_response_times_ms: VecDeque<u64>,
    /// Consecutive correct reviews.
    pub streak: u32,
    /// Lifetime count of incorrect reviews.
    pub mistakes: u64,
}

impl PerformanceHistory {
    /// Folds one outcome into the history. Entries beyond the window are
    /// dropped silently.
    fn record(&mut self, correct: bool, response_time_ms: u64) {
        self.recent_correct.push_back(correct);
        if self.recent_correct.len() > HISTORY_WINDOW {
            self.recent_correct.pop_front();
        }
        self.recent_response_times_ms.push_back(response_time_ms);
        if self.recent_response_times_ms.len() > HISTORY_WINDOW {
            self.recent_response_times_ms.pop_front();
        }
        if correct {
            self.streak += 1;
        } else {
            self.streak = 0;
            self.mistakes += 1;
        }
    }

    /// Fraction of recent reviews answered correctly, or `None` before the
    /// first review.
    pub fn accuracy(&self) -> Option<f64> {
        if self.recent_correct.is_empty() {
            return None;
        }
        let correct = self.recent_correct.iter().filter(|c| **c).count();
        Some(correct as f64 / self.recent_correct.len() as f64)
    }

    /// Mean response time over recent reviews, or `None` before the first
    /// review.
    pub fn average_response_time_ms(&self) -> Option<f64> {
        if self.recent_response_times_ms.is_empty() {
            return None;
        }
        let total: u64 = self.recent_response_times_ms.iter().sum();
        Some(total as f64 / self.recent_response_times_ms.len() as f64)
    }
}

/// One learner's durable relationship to one content item.
///
/// The card owns its memory state; every review replaces the whole card
/// rather than mutating it, so concurrent callers each work on an
/// independent snapshot and the persistence layer decides how conflicting
/// writes are serialized.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ReviewCard {
    pub id: CardId,
    pub owner_id: LearnerId,
    pub content: ContentRef,
    pub memory: MemoryState,
    pub performance: PerformanceHistory,
    /// Derived from `(memory.ease_factor, memory.repetition)` on every
    /// update; never set independently.
    pub mastery_level: MasteryLevel,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ReviewCard {
    /// A card for an item the learner is seeing for the first time.
    pub fn new(
        id: CardId,
        owner_id: LearnerId,
        content: ContentRef,
        scheduler: &Scheduler,
        now: Timestamp,
    ) -> Self {
        let memory = scheduler.initial_state(now);
        let mastery_level = mastery_for(&memory, scheduler.config());
        Self {
            id,
            owner_id,
            content,
            memory,
            performance: PerformanceHistory::default(),
            mastery_level,
            created_at: now,
            updated_at: now,
        }
    }

    /// Folds one review outcome into a new card.
    ///
    /// Returns the fully replaced card; `self` is left untouched. Fails only
    /// when the card has no content reference, which is a caller contract
    /// violation.
    pub fn record_review(
        &self,
        scheduler: &Scheduler,
        session: &ReviewSession,
        now: Timestamp,
    ) -> Fallible<ReviewCard> {
        if self.content.key.is_empty() {
            return Err(EngineError::invalid_card(format!(
                "card {} has no content reference",
                self.id
            )));
        }
        let memory = scheduler.advance(&self.memory, session, now);
        let correct = session.quality >= PASSING_QUALITY;
        let mut performance = self.performance.clone();
        performance.record(correct, session.response_time_ms);
        let mastery_level = mastery_for(&memory, scheduler.config());
        if mastery_level != self.mastery_level {
            log::debug!(
                "card {} mastery {} -> {}",
                self.id,
                self.mastery_level.as_str(),
                mastery_level.as_str()
            );
        }
        Ok(ReviewCard {
            id: self.id.clone(),
            owner_id: self.owner_id.clone(),
            content: self.content.clone(),
            memory,
            performance,
            mastery_level,
            created_at: self.created_at,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerConfig;
    use crate::types::session::Difficulty;

    fn make_timestamp(s: &str) -> Timestamp {
        Timestamp::try_from(s.to_string()).unwrap()
    }

    fn scheduler() -> Scheduler {
        Scheduler::new(SchedulerConfig::default()).unwrap()
    }

    fn content() -> ContentRef {
        ContentRef {
            key: "word:serendipity".to_string(),
            front: "serendipity".to_string(),
            back: "finding something good without looking for it".to_string(),
        }
    }

    fn card(scheduler: &Scheduler, now: Timestamp) -> ReviewCard {
        ReviewCard::new(
            "card-1".to_string(),
            "learner-1".to_string(),
            content(),
            scheduler,
            now,
        )
    }

    fn session(quality: u8, response_time_ms: u64, difficulty: Difficulty) -> ReviewSession {
        ReviewSession {
            quality,
            response_time_ms,
            difficulty,
            confidence: 0.8,
        }
    }

    #[test]
    fn test_new_card() {
        let sched = scheduler();
        let now = make_timestamp("2024-03-01T10:00:00.000");
        let card = card(&sched, now);
        assert_eq!(card.mastery_level, MasteryLevel::Learning);
        assert_eq!(card.memory.repetition, 0);
        assert_eq!(card.performance, PerformanceHistory::default());
        assert_eq!(card.created_at, now);
        assert_eq!(card.updated_at, now);
    }

    #[test]
    fn test_record_review_returns_new_value() {
        let sched = scheduler();
        let now = make_timestamp("2024-03-01T10:00:00.000");
        let card = card(&sched, now);
        let before = card.clone();
        let later = now.add_days(1);
        let updated = card
            .record_review(&sched, &session(5, 1800, Difficulty::Easy), later)
            .unwrap();
        // The original snapshot is untouched.
        assert_eq!(card, before);
        assert_eq!(updated.memory.repetition, 1);
        assert_eq!(updated.performance.streak, 1);
        assert_eq!(updated.performance.recent_correct, vec![true]);
        assert_eq!(updated.performance.recent_response_times_ms, vec![1800]);
        assert_eq!(updated.created_at, card.created_at);
        assert_eq!(updated.updated_at, later);
    }

    #[test]
    fn test_failure_bookkeeping() {
        let sched = scheduler();
        let mut now = make_timestamp("2024-03-01T10:00:00.000");
        let mut card = card(&sched, now);
        for _ in 0..3 {
            now = now.add_days(1);
            card = card
                .record_review(&sched, &session(4, 2500, Difficulty::Medium), now)
                .unwrap();
        }
        assert_eq!(card.performance.streak, 3);
        assert_eq!(card.performance.mistakes, 0);

        now = now.add_days(1);
        card = card
            .record_review(&sched, &session(2, 7000, Difficulty::Hard), now)
            .unwrap();
        assert_eq!(card.performance.streak, 0);
        assert_eq!(card.performance.mistakes, 1);
        assert_eq!(card.mastery_level, MasteryLevel::Learning);
        assert_eq!(card.memory.repetition, 0);
    }

    #[test]
    fn test_history_window_is_bounded() {
        let sched = scheduler();
        let mut now = make_timestamp("2024-03-01T10:00:00.000");
        let mut card = card(&sched, now);
        for i in 0..14 {
            now = now.add_days(1);
            let quality = if i % 2 == 0 { 5 } else { 1 };
            card = card
                .record_review(&sched, &session(quality, 1000 + i, Difficulty::Medium), now)
                .unwrap();
        }
        assert_eq!(card.performance.recent_correct.len(), 10);
        assert_eq!(card.performance.recent_response_times_ms.len(), 10);
        // The oldest entries were dropped.
        assert_eq!(card.performance.recent_response_times_ms[0], 1004);
    }

    #[test]
    fn test_mastery_never_decreases_under_sustained_success() {
        let sched = scheduler();
        let mut now = make_timestamp("2024-03-01T10:00:00.000");
        let mut card = card(&sched, now);
        let mut highest = card.mastery_level;
        for _ in 0..12 {
            now = now.add_days(card.memory.interval_days.max(1));
            card = card
                .record_review(&sched, &session(5, 1200, Difficulty::Easy), now)
                .unwrap();
            assert!(card.mastery_level >= highest);
            highest = card.mastery_level;
        }
        assert_eq!(card.mastery_level, MasteryLevel::Mastered);
    }

    #[test]
    fn test_record_review_without_content_reference() {
        let sched = scheduler();
        let now = make_timestamp("2024-03-01T10:00:00.000");
        let mut card = card(&sched, now);
        card.content.key = String::new();
        let result = card.record_review(&sched, &session(5, 1500, Difficulty::Easy), now);
        let err = result.err().unwrap();
        assert!(matches!(err, EngineError::InvalidCardState(_)));
        assert_eq!(
            err.to_string(),
            "invalid card state: card card-1 has no content reference"
        );
    }

    #[test]
    fn test_card_serialization_roundtrip() {
        let sched = scheduler();
        let now = make_timestamp("2024-03-01T10:00:00.000");
        let card = card(&sched, now)
            .record_review(&sched, &session(4, 3200, Difficulty::Medium), now.add_days(1))
            .unwrap();
        let json = serde_json::to_string(&card).unwrap();
        let decoded: ReviewCard = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, card);
    }
}
