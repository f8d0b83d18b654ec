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

//! Unified player registry
//!
//! Keeps a uid-keyed [`PlayerHashTable`] and a name-keyed
//! [`PlayerSearchTree`] in step. The hash table is authoritative: every
//! registered uid lives there. The tree holds one player per distinct name,
//! the most recent writer of that name; when that player leaves or is
//! renamed, another holder of the name (if any) takes its place.

use crate::config::RegistryConfig;
use crate::indices::{IndexError, PlayerHashTable, PlayerSearchTree, Upsert, minimum_height};
use crate::player::{Player, PlayerError, Score, rank_by_score};
use tracing::{debug, info};

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error("Name not found: {0}")]
    NameNotFound(String),
}

/// Type alias for registry operation results
pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug)]
pub struct PlayerRegistry {
    config: RegistryConfig,
    by_uid: PlayerHashTable,
    by_name: PlayerSearchTree,
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self {
            config: RegistryConfig::default(),
            by_uid: PlayerHashTable::new(),
            by_name: PlayerSearchTree::new(),
        }
    }
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> RegistryResult<Self> {
        config.validate()?;
        let by_uid = PlayerHashTable::with_buckets(config.bucket_count)?;
        info!(bucket_count = config.bucket_count, auto_balance = config.auto_balance, "created player registry");
        Ok(Self {
            config,
            by_uid,
            by_name: PlayerSearchTree::new(),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn hash_table(&self) -> &PlayerHashTable {
        &self.by_uid
    }

    pub fn search_tree(&self) -> &PlayerSearchTree {
        &self.by_name
    }

    /// Register `uid` under `name`, renaming it if already present
    pub fn register(&mut self, uid: &str, name: &str) -> RegistryResult<Upsert> {
        let previous_name = self.by_uid.get(uid).ok().map(|player| player.name().to_string());
        let outcome = self.by_uid.set(uid, name);

        if let Some(previous_name) = previous_name.filter(|previous| previous != name) {
            self.detach_name(&previous_name, uid);
        }

        let stored = self.by_uid.get(uid)?.clone();
        self.by_name.insert(stored);
        self.maybe_balance();

        debug!(uid, name, ?outcome, "registered player");
        Ok(outcome)
    }

    /// Register a complete player record, score included
    pub fn insert(&mut self, player: Player) -> RegistryResult<Upsert> {
        let outcome = self.register(player.uid(), player.name())?;
        self.set_score(player.uid(), Score::new(player.score()))?;
        Ok(outcome)
    }

    /// Rename an existing player
    pub fn rename(&mut self, uid: &str, name: &str) -> RegistryResult<()> {
        if !self.by_uid.contains(uid) {
            return Err(IndexError::KeyNotFound(uid.to_string()).into());
        }
        self.register(uid, name)?;
        Ok(())
    }

    /// Validate and store a new score for `uid`
    pub fn set_score<S>(&mut self, uid: &str, score: S) -> RegistryResult<()>
    where
        S: TryInto<Score>,
        PlayerError: From<S::Error>,
    {
        let player = self.by_uid.get_mut(uid)?;
        player.set_score(score)?;
        let snapshot = player.clone();

        if let Some(entry) = self.by_name.search_mut(snapshot.name()) {
            if entry.same_identity(&snapshot) {
                *entry = snapshot;
            }
        }
        Ok(())
    }

    /// Remove `uid` from both indexes
    pub fn remove(&mut self, uid: &str) -> RegistryResult<Player> {
        let player = self.by_uid.delete(uid)?;
        self.detach_name(player.name(), uid);
        debug!(uid, name = player.name(), "removed player");
        Ok(player)
    }

    pub fn get(&self, uid: &str) -> RegistryResult<&Player> {
        Ok(self.by_uid.get(uid)?)
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.by_uid.contains(uid)
    }

    /// Query by name; absence is an ordinary outcome
    pub fn find_by_name(&self, name: &str) -> Option<&Player> {
        self.by_name.search(name)
    }

    /// Lookup by name that reports absence as an error
    pub fn require_by_name(&self, name: &str) -> RegistryResult<&Player> {
        self.by_name.search(name).ok_or_else(|| RegistryError::NameNotFound(name.to_string()))
    }

    /// Players in ascending name order, one per distinct name
    pub fn players_by_name(&self) -> Vec<&Player> {
        self.by_name.in_order_traversal()
    }

    /// Every player ranked by descending score, ties in bucket order
    pub fn leaderboard(&self) -> Vec<Player> {
        rank_by_score(self.by_uid.iter().cloned().collect())
    }

    pub fn balance(&mut self) {
        self.by_name.balance();
    }

    pub fn len(&self) -> usize {
        self.by_uid.count()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uid.is_empty()
    }

    /// Drop the tree entry for `name` if `uid` owns it, then let another
    /// holder of the same name take the slot
    fn detach_name(&mut self, name: &str, uid: &str) {
        if !self.by_name.search(name).is_some_and(|entry| entry.uid() == uid) {
            return;
        }
        self.by_name.remove(name);

        if let Some(heir) = self.by_uid.iter().find(|player| player.name() == name && player.uid() != uid).cloned() {
            debug!(name, heir = heir.uid(), "name passed to remaining holder");
            self.by_name.insert(heir);
        }
    }

    fn maybe_balance(&mut self) {
        if self.config.auto_balance && self.by_name.height() > 2 * minimum_height(self.by_name.len()) {
            self.by_name.balance();
        }
    }
}
