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

use crate::player::Player;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur during index operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Key not found in index
    #[error("Key not found: {0}")]
    KeyNotFound(String),
    /// Removal attempted on a structure with no entries
    #[error("Cannot delete from an empty structure")]
    EmptyStructure,
    /// Index constructed with unusable parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Records that can be stored in a collision chain
pub trait Keyed {
    /// Identity key used for lookups and deletes
    fn key(&self) -> &str;

    /// Absorb the mutable attributes of `incoming`, which carries the same key
    fn absorb(&mut self, incoming: Self)
    where
        Self: Sized;
}

impl Keyed for Player {
    fn key(&self) -> &str {
        self.uid()
    }

    /// Upserts only carry a new name; score and uid stay as they are
    fn absorb(&mut self, incoming: Self) {
        self.set_name(incoming.name());
    }
}

/// Outcome of an insert-or-update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// Traversal direction for bidirectional structures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    HeadToTail,
    TailToHead,
}
