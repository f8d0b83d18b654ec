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

//! Player indices
//!
//! - [`CollisionChain`]: doubly linked list used as a hash bucket
//! - [`PlayerHashTable`]: fixed bucket count, Pearson-hashed uid lookup
//! - [`PlayerSearchTree`]: name-ordered binary search tree with full rebalance

pub mod chain;
pub mod hash_table;
pub mod lib;
pub mod pearson;
pub mod search_tree;

pub use chain::*;
pub use hash_table::*;
pub use lib::*;
pub use pearson::*;
pub use search_tree::*;
