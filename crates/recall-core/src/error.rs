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

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Debug, PartialEq)]
pub enum EngineError {
    /// A card cannot record a review because its content reference is
    /// missing or unusable.
    InvalidCardState(String),
    /// The scheduler configuration failed validation, or could not be
    /// parsed. Raised at construction, never per review.
    Configuration(String),
}

impl EngineError {
    pub fn invalid_card(msg: impl Into<String>) -> Self {
        EngineError::InvalidCardState(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        EngineError::Configuration(msg.into())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(value: toml::de::Error) -> Self {
        EngineError::Configuration(format!("TOML error: {value}"))
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(value: serde_json::Error) -> Self {
        EngineError::Configuration(format!("JSON error: {value}"))
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            EngineError::InvalidCardState(msg) => write!(f, "invalid card state: {msg}"),
            EngineError::Configuration(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl Error for EngineError {}

pub type Fallible<T> = Result<T, EngineError>;
