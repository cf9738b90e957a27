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

//! recall-core: Core library for the recall spaced repetition system.
//!
//! This library provides the scheduling engine behind recall:
//! - The SM-2 based scheduling algorithm with response-time and difficulty
//!   weighting
//! - The review card aggregate with performance history and mastery
//!   classification
//! - Due-card queries and aggregate learning statistics
//!
//! The engine performs no I/O: callers supply the clock reading, the
//! content references and the persistence. Two concurrent reviews of the
//! same card are a write-write conflict the calling layer must serialize
//! (per-card locking or optimistic versioning); every operation here
//! returns a new value instead of mutating shared state.

pub mod config;
pub mod deck;
pub mod error;
pub mod sm2;
pub mod types;

// Re-exports for convenience
pub use config::SchedulerConfig;
pub use deck::{DeckStats, deck_stats, due_cards};
pub use error::{EngineError, Fallible};
pub use sm2::{Scheduler, mastery_for, memory_strength};
pub use types::aliases::{CardId, LearnerId};
pub use types::card::{ContentRef, MasteryLevel, PerformanceHistory, ReviewCard};
pub use types::memory::MemoryState;
pub use types::session::{Difficulty, ReviewSession};
pub use types::timestamp::Timestamp;
