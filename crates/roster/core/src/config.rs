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

use crate::indices::{DEFAULT_BUCKET_COUNT, IndexError, IndexResult};
use serde::{Deserialize, Serialize};

/// Registry configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Number of hash table buckets, fixed for the registry's lifetime
    pub bucket_count: usize,
    /// Rebalance the name tree once its height exceeds twice the minimum
    pub auto_balance: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            auto_balance: false,
        }
    }
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = bucket_count;
        self
    }

    pub fn with_auto_balance(mut self, auto_balance: bool) -> Self {
        self.auto_balance = auto_balance;
        self
    }

    pub fn validate(&self) -> IndexResult<()> {
        if self.bucket_count == 0 {
            return Err(IndexError::InvalidConfiguration("bucket_count must be at least 1".to_string()));
        }
        Ok(())
    }
}
