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

use crate::types::timestamp::Timestamp;

/// The scheduling state of one card for one learner.
///
/// Created by [`Scheduler::initial_state`](crate::sm2::Scheduler::initial_state)
/// and mutated exclusively through
/// [`Scheduler::advance`](crate::sm2::Scheduler::advance).
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct MemoryState {
    /// Days until the next review. Zero means due immediately, which only
    /// occurs before the first grading.
    pub interval_days: i64,
    /// Multiplier controlling how quickly intervals grow. Always within the
    /// configured ease bounds.
    pub ease_factor: f64,
    /// Consecutive successful reviews. Resets to zero on failure.
    pub repetition: u32,
    /// When the card was last reviewed.
    pub last_reviewed_at: Timestamp,
    /// When the card is next due: `last_reviewed_at + interval_days`.
    pub next_review_at: Timestamp,
}

impl MemoryState {
    /// Whether the card is due at `now`. Equality counts as due.
    pub fn is_due(&self, now: Timestamp) -> bool {
        now >= self.next_review_at
    }
}
