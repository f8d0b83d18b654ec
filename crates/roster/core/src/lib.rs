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

//! Roster Core
//!
//! In-memory player registry built from three structures:
//!
//! - a chained hash table ([`PlayerHashTable`]) for lookup by uid, whose
//!   buckets are doubly linked [`CollisionChain`]s;
//! - a binary search tree ([`PlayerSearchTree`]) for name-ordered access,
//!   rebuilt to minimum height on demand;
//! - [`PlayerRegistry`], which keeps both indexes in step on every mutation.
//!
//! All structures are single-threaded; callers that share them across
//! threads must provide their own locking.

pub mod config;
pub mod indices;
pub mod player;
pub mod registry;

pub use config::RegistryConfig;
pub use indices::{CollisionChain, Direction, IndexError, IndexResult, PlayerHashTable, PlayerSearchTree, Upsert, pearson_hash};
pub use player::{Player, PlayerError, PlayerResult, Score, rank_by_score, selection_sort_by};
pub use registry::{PlayerRegistry, RegistryError, RegistryResult};
