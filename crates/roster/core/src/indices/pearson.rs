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

//! Pearson hashing over a seeded permutation table
//!
//! The permutation of `0..=255` is produced once per process by a
//! Fisher-Yates shuffle driven by SplitMix64. Both algorithms are fully
//! specified here, so the table (and every bucket index derived from it) is
//! identical across runs and across implementations using the same seed.

use std::sync::LazyLock;

/// Seed of the process-wide permutation table
pub const PEARSON_SEED: u64 = 177;

static TABLE: LazyLock<PearsonTable> = LazyLock::new(|| PearsonTable::from_seed(PEARSON_SEED));

/// SplitMix64 generator
///
/// The permutation must be identical across builds and implementations, and
/// `rand`'s generators do not guarantee a stable output stream between
/// releases, so the algorithm is written out here.
#[derive(Debug, Clone)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

/// Permutation of the 256 byte values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PearsonTable {
    permutation: [u8; 256],
}

impl PearsonTable {
    /// Shuffle the identity permutation with a seeded generator
    pub fn from_seed(seed: u64) -> Self {
        let mut permutation = [0u8; 256];
        for (slot, value) in permutation.iter_mut().zip(0..=u8::MAX) {
            *slot = value;
        }

        let mut rng = SplitMix64::new(seed);
        for i in (1..permutation.len()).rev() {
            let j = (rng.next_u64() % (i as u64 + 1)) as usize;
            permutation.swap(i, j);
        }

        Self { permutation }
    }

    /// The table shared by every hash table in the process
    pub fn global() -> &'static PearsonTable {
        &TABLE
    }

    pub fn permutation(&self) -> &[u8; 256] {
        &self.permutation
    }

    /// Hash a key into `0..=255`
    pub fn hash(&self, key: &str) -> u8 {
        key.chars().fold(0u8, |acc, ch| {
            let index = (u32::from(acc) ^ u32::from(ch)) & 0xFF;
            self.permutation[index as usize]
        })
    }
}

/// Hash a key with the process-wide table
pub fn pearson_hash(key: &str) -> u8 {
    PearsonTable::global().hash(key)
}
