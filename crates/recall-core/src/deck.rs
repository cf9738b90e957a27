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

use serde::Serialize;

use crate::config::SchedulerConfig;
use crate::sm2::memory_strength;
use crate::types::card::MasteryLevel;
use crate::types::card::ReviewCard;
use crate::types::timestamp::Timestamp;

/// Aggregate learning metrics over one learner's cards. Derived on demand,
/// never persisted.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct DeckStats {
    pub total: usize,
    pub learning: usize,
    pub reviewing: usize,
    pub mastered: usize,
    pub due_for_review: usize,
    /// Mean memory strength across all cards.
    pub average_memory_strength: f64,
    /// Mean of per-card recent accuracy, over cards with at least one
    /// review.
    pub average_accuracy: f64,
    /// Mean of per-card recent response time, over cards with at least one
    /// review.
    pub average_response_time_ms: f64,
    /// Longest current streak among the cards.
    pub best_streak: u32,
}

/// Cards due at `now`, soonest first; ties surface the card with the
/// less-established memory (lower repetition count) first.
pub fn due_cards(cards: &[ReviewCard], now: Timestamp) -> Vec<&ReviewCard> {
    let mut due: Vec<&ReviewCard> = cards.iter().filter(|c| c.memory.is_due(now)).collect();
    due.sort_by_key(|c| (c.memory.next_review_at, c.memory.repetition));
    due
}

/// Aggregate metrics over a collection of cards. All values are plain
/// reductions over the inputs.
pub fn deck_stats(cards: &[ReviewCard], config: &SchedulerConfig, now: Timestamp) -> DeckStats {
    let mut learning = 0;
    let mut reviewing = 0;
    let mut mastered = 0;
    let mut strength_sum = 0.0;
    let mut accuracy_sum = 0.0;
    let mut accuracy_count = 0;
    let mut response_time_sum = 0.0;
    let mut response_time_count = 0;
    let mut best_streak = 0;
    for card in cards {
        match card.mastery_level {
            MasteryLevel::Learning => learning += 1,
            MasteryLevel::Reviewing => reviewing += 1,
            MasteryLevel::Mastered => mastered += 1,
        }
        strength_sum += memory_strength(&card.memory, config);
        if let Some(accuracy) = card.performance.accuracy() {
            accuracy_sum += accuracy;
            accuracy_count += 1;
        }
        if let Some(avg) = card.performance.average_response_time_ms() {
            response_time_sum += avg;
            response_time_count += 1;
        }
        best_streak = best_streak.max(card.performance.streak);
    }
    let average = |sum: f64, count: usize| if count == 0 { 0.0 } else { sum / count as f64 };
    DeckStats {
        total: cards.len(),
        learning,
        reviewing,
        mastered,
        due_for_review: due_cards(cards, now).len(),
        average_memory_strength: average(strength_sum, cards.len()),
        average_accuracy: average(accuracy_sum, accuracy_count),
        average_response_time_ms: average(response_time_sum, response_time_count),
        best_streak,
    }
}
