// Roster
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Player records
//!
//! A [`Player`] carries two independent comparison semantics: identity, which
//! is decided by the immutable `uid`, and ranking, which is decided by the
//! mutable score. They are exposed as two named operations
//! ([`Player::same_identity`] and [`Player::rank_cmp`]) and are never folded
//! into `PartialEq`/`PartialOrd`.

pub mod ranking;

pub use ranking::*;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Errors raised when mutating a player
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<Infallible> for PlayerError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Type alias for player operation results
pub type PlayerResult<T> = Result<T, PlayerError>;

/// Non-negative integral score used for ranking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(u64);

impl Score {
    pub const ZERO: Score = Score(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for Score {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for Score {
    type Error = PlayerError;

    fn try_from(value: i64) -> PlayerResult<Self> {
        u64::try_from(value).map(Score).map_err(|_| PlayerError::Validation(format!("score must be non-negative, got {value}")))
    }
}

impl TryFrom<i32> for Score {
    type Error = PlayerError;

    fn try_from(value: i32) -> PlayerResult<Self> {
        Score::try_from(i64::from(value))
    }
}

impl TryFrom<f64> for Score {
    type Error = PlayerError;

    fn try_from(value: f64) -> PlayerResult<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(PlayerError::Validation(format!("score must be an integer, got {value}")));
        }
        if value < 0.0 {
            return Err(PlayerError::Validation(format!("score must be non-negative, got {value}")));
        }
        if value >= u64::MAX as f64 {
            return Err(PlayerError::Validation(format!("score out of range: {value}")));
        }
        Ok(Score(value as u64))
    }
}

impl FromStr for Score {
    type Err = PlayerError;

    fn from_str(s: &str) -> PlayerResult<Self> {
        let trimmed = s.trim();
        if trimmed.starts_with('-') {
            return Err(PlayerError::Validation(format!("score must be non-negative, got {trimmed}")));
        }
        trimmed
            .parse::<u64>()
            .map(Score)
            .map_err(|_| PlayerError::Validation(format!("score must be a non-negative integer, got {trimmed:?}")))
    }
}

impl TryFrom<&str> for Score {
    type Error = PlayerError;

    fn try_from(value: &str) -> PlayerResult<Self> {
        value.parse()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    uid: String,
    name: String,
    #[serde(default)]
    score: Score,
}

impl Player {
    /// Create a player with a zero score
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            score: Score::ZERO,
        }
    }

    /// Builder variant of [`Player::set_score`]
    pub fn with_score<S>(mut self, score: S) -> PlayerResult<Self>
    where
        S: TryInto<Score>,
        PlayerError: From<S::Error>,
    {
        self.set_score(score)?;
        Ok(self)
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn score(&self) -> u64 {
        self.score.value()
    }

    /// Set the score, rejecting negative or fractional input
    ///
    /// The player is left untouched when validation fails.
    pub fn set_score<S>(&mut self, score: S) -> PlayerResult<()>
    where
        S: TryInto<Score>,
        PlayerError: From<S::Error>,
    {
        self.score = score.try_into()?;
        Ok(())
    }

    /// Identity equality: same `uid`, regardless of name or score
    pub fn same_identity(&self, other: &Player) -> bool {
        self.uid == other.uid
    }

    /// Ranking comparison: by score only
    pub fn rank_cmp(&self, other: &Player) -> Ordering {
        self.score.cmp(&other.score)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player: uid={}, name={}, score={}", self.uid, self.name, self.score)
    }
}
