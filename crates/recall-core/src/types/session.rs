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

/// How hard the learner found an attempt, as judged by the caller (e.g.
/// from answer-similarity scoring).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(EngineError::invalid_card(format!(
                "invalid difficulty string: {value}"
            ))),
        }
    }
}

/// One observed review attempt. Constructed by the caller at review time,
/// consumed once by the scheduler, then discarded.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct ReviewSession {
    /// Recall quality on the 0-5 scale. Clamped on use, so callers need not
    /// pre-validate noisy telemetry.
    pub quality: u8,
    /// How long the learner took to answer.
    pub response_time_ms: u64,
    /// Caller-assessed difficulty of the attempt.
    pub difficulty: Difficulty,
    /// Self-reported confidence in [0, 1]. Carried through for display;
    /// the algorithm does not consume it.
    pub confidence: f64,
}
