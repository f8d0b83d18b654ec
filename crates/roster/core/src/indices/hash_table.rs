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

use super::chain::CollisionChain;
use super::lib::{Direction, IndexError, IndexResult, Upsert};
use super::pearson::pearson_hash;
use crate::player::Player;
use std::collections::BTreeMap;
use tracing::debug;

/// Default number of buckets
pub const DEFAULT_BUCKET_COUNT: usize = 10;

/// Bucket occupancy statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HashTableStats {
    /// Number of entries across all buckets
    pub entry_count: usize,
    /// Number of buckets
    pub bucket_count: usize,
    /// Buckets holding at least one entry
    pub occupied_buckets: usize,
    /// Longest collision chain
    pub max_chain_length: usize,
    /// Entries per bucket
    pub load_factor: f64,
}

/// Fixed-size hash table of players keyed by uid
///
/// Bucket indices come from the Pearson hash of the key modulo the bucket
/// count, which is chosen at construction and never changes. Each bucket is
/// a [`CollisionChain`].
#[derive(Debug, Clone)]
pub struct PlayerHashTable {
    buckets: Vec<CollisionChain<Player>>,
}

impl Default for PlayerHashTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerHashTable {
    /// Create a table with [`DEFAULT_BUCKET_COUNT`] buckets
    pub fn new() -> Self {
        Self {
            buckets: (0..DEFAULT_BUCKET_COUNT).map(|_| CollisionChain::new()).collect(),
        }
    }

    /// Create a table with `bucket_count` buckets
    pub fn with_buckets(bucket_count: usize) -> IndexResult<Self> {
        if bucket_count == 0 {
            return Err(IndexError::InvalidConfiguration("Hash table needs at least one bucket".to_string()));
        }
        Ok(Self {
            buckets: (0..bucket_count).map(|_| CollisionChain::new()).collect(),
        })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket a key maps to
    pub fn bucket_index(&self, key: &str) -> usize {
        usize::from(pearson_hash(key)) % self.buckets.len()
    }

    pub fn bucket(&self, index: usize) -> Option<&CollisionChain<Player>> {
        self.buckets.get(index)
    }

    /// Store `name` under `key`, renaming the player if the key exists
    pub fn set(&mut self, key: &str, name: &str) -> Upsert {
        let index = self.bucket_index(key);
        let outcome = self.buckets[index].add_or_update(Player::new(key, name));
        debug!(bucket = index, key, name, ?outcome, "hash table set");
        outcome
    }

    pub fn get(&self, key: &str) -> IndexResult<&Player> {
        let index = self.bucket_index(key);
        self.buckets[index].get_by_key(key).map_err(|_| IndexError::KeyNotFound(key.to_string()))
    }

    pub fn get_mut(&mut self, key: &str) -> IndexResult<&mut Player> {
        let index = self.bucket_index(key);
        self.buckets[index].get_by_key_mut(key).map_err(|_| IndexError::KeyNotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.buckets[self.bucket_index(key)].contains_key(key)
    }

    /// Remove the player stored under `key`
    pub fn delete(&mut self, key: &str) -> IndexResult<Player> {
        let index = self.bucket_index(key);
        match self.buckets[index].delete_by_key(key) {
            Ok(player) => {
                debug!(bucket = index, key, "hash table delete");
                Ok(player)
            }
            Err(_) => Err(IndexError::KeyNotFound(key.to_string())),
        }
    }

    /// Count entries by walking every bucket
    pub fn count(&self) -> usize {
        self.buckets.iter().map(CollisionChain::count_links).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(CollisionChain::is_empty)
    }

    /// All players, bucket by bucket in head-to-tail order
    pub fn iter(&self) -> impl Iterator<Item = &Player> + '_ {
        self.buckets.iter().flat_map(CollisionChain::iter)
    }

    pub fn stats(&self) -> HashTableStats {
        let entry_count = self.count();
        HashTableStats {
            entry_count,
            bucket_count: self.buckets.len(),
            occupied_buckets: self.buckets.iter().filter(|bucket| !bucket.is_empty()).count(),
            max_chain_length: self.buckets.iter().map(CollisionChain::len).max().unwrap_or(0),
            load_factor: entry_count as f64 / self.buckets.len() as f64,
        }
    }

    /// Histogram of chain length to number of buckets with that length
    pub fn chain_length_distribution(&self) -> BTreeMap<usize, usize> {
        let mut distribution = BTreeMap::new();
        for bucket in &self.buckets {
            *distribution.entry(bucket.len()).or_insert(0) += 1;
        }
        distribution
    }

    /// Describe each non-empty bucket and its chain
    pub fn render(&self) -> Vec<String> {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(index, bucket)| format!("Index {index}: {}", bucket.render(Direction::HeadToTail).join("   (linked node-->)   ")))
            .collect()
    }
}
