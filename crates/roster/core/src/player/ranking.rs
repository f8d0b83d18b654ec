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

//! Score ranking

use super::Player;
use std::cmp::Ordering;

/// Stable selection sort over a slice
///
/// Each pass picks the first element that compares lowest among the unsorted
/// suffix and rotates it into place, so elements that compare equal keep
/// their relative input order.
pub fn selection_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for start in 0..items.len() {
        let mut best = start;
        for candidate in (start + 1)..items.len() {
            if compare(&items[candidate], &items[best]) == Ordering::Less {
                best = candidate;
            }
        }
        if best != start {
            items[start..=best].rotate_right(1);
        }
    }
}

/// Sort players in place by descending score; ties keep input order
pub fn rank_slice_by_score(players: &mut [Player]) {
    selection_sort_by(players, |a, b| b.rank_cmp(a));
}

/// Sort players by descending score and hand the sequence back
pub fn rank_by_score(mut players: Vec<Player>) -> Vec<Player> {
    rank_slice_by_score(&mut players);
    players
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(uid: &str, name: &str, score: u64) -> Player {
        Player::new(uid, name).with_score(score).unwrap()
    }

    fn uids(players: &[Player]) -> Vec<&str> {
        players.iter().map(Player::uid).collect()
    }

    #[test]
    fn test_rank_by_score_descending() {
        let players = vec![
            scored("12345", "Greg", 10),
            scored("654321", "Karen", 15),
            scored("5555555", "Simon", 10),
            scored("987654", "Tom", 20),
        ];

        let ranked = rank_by_score(players);

        assert_eq!(uids(&ranked), vec!["987654", "654321", "12345", "5555555"]);
        assert_eq!(ranked.iter().map(Player::score).collect::<Vec<_>>(), vec![20, 15, 10, 10]);
    }

    #[test]
    fn test_rank_equal_scores_preserve_order() {
        let players = vec![scored("333", "Bobby", 15), scored("111", "Billy", 15), scored("444", "Robby", 15), scored("222", "Sally", 15)];

        let ranked = rank_by_score(players);

        assert_eq!(uids(&ranked), vec!["333", "111", "444", "222"]);
    }

    #[test]
    fn test_rank_empty_and_single() {
        assert!(rank_by_score(Vec::new()).is_empty());

        let ranked = rank_by_score(vec![scored("12345", "Greg", 10)]);
        assert_eq!(uids(&ranked), vec!["12345"]);
    }

    #[test]
    fn test_selection_sort_by_is_stable() {
        let mut pairs = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e')];
        selection_sort_by(&mut pairs, |a, b| a.0.cmp(&b.0));

        assert_eq!(pairs, vec![(0, 'e'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }
}
