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

//! Name-ordered binary search tree
//!
//! Insertion, search and removal walk the tree iteratively so an unbalanced
//! tree (for example one built from already sorted names) never deepens the
//! call stack. [`PlayerSearchTree::balance`] rebuilds a minimum-height shape
//! from the sorted contents.

use super::lib::Upsert;
use crate::player::Player;
use std::cmp::Ordering;
use tracing::{info, trace};

type Link = Option<Box<TreeNode>>;

/// Height of a perfectly balanced tree holding `len` nodes, `ceil(log2(len + 1))`
pub fn minimum_height(len: usize) -> usize {
    (usize::BITS - len.leading_zeros()) as usize
}

/// A node of the search tree
#[derive(Debug)]
pub struct TreeNode {
    player: Player,
    left: Link,
    right: Link,
}

impl TreeNode {
    fn leaf(player: Player) -> Self {
        Self { player, left: None, right: None }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn left(&self) -> Option<&TreeNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&TreeNode> {
        self.right.as_deref()
    }
}

/// Binary search tree of players ordered by name
///
/// Names are unique within the tree: inserting a player whose name is
/// already present replaces the stored player.
#[derive(Debug, Default)]
pub struct PlayerSearchTree {
    root: Link,
    len: usize,
}

impl PlayerSearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_deref()
    }

    /// Insert keyed by name; an equal name replaces the stored player
    pub fn insert(&mut self, player: Player) -> Upsert {
        let mut depth = 0usize;
        let mut link = &mut self.root;
        while let Some(node) = link {
            match player.name().cmp(node.player.name()) {
                Ordering::Less => link = &mut node.left,
                Ordering::Greater => link = &mut node.right,
                Ordering::Equal => {
                    trace!(name = player.name(), depth, "replaced search tree entry");
                    node.player = player;
                    return Upsert::Updated;
                }
            }
            depth += 1;
        }

        trace!(name = player.name(), depth, "inserted search tree entry");
        *link = Some(Box::new(TreeNode::leaf(player)));
        self.len += 1;
        Upsert::Inserted
    }

    /// Look up a player by exact name
    pub fn search(&self, name: &str) -> Option<&Player> {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            match name.cmp(node.player.name()) {
                Ordering::Less => cursor = node.left.as_deref(),
                Ordering::Greater => cursor = node.right.as_deref(),
                Ordering::Equal => return Some(&node.player),
            }
        }
        None
    }

    /// Mutable lookup; callers must not change the player's name
    pub(crate) fn search_mut(&mut self, name: &str) -> Option<&mut Player> {
        let mut cursor = self.root.as_deref_mut();
        while let Some(node) = cursor {
            match name.cmp(node.player.name()) {
                Ordering::Less => cursor = node.left.as_deref_mut(),
                Ordering::Greater => cursor = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.player),
            }
        }
        None
    }

    /// Remove the player stored under `name`
    pub fn remove(&mut self, name: &str) -> Option<Player> {
        let mut link = &mut self.root;
        while link.as_ref().is_some_and(|node| node.player.name() != name) {
            let Some(node) = link else {
                return None;
            };
            link = if name < node.player.name() { &mut node.left } else { &mut node.right };
        }

        let mut removed = link.take()?;
        *link = match (removed.left.take(), removed.right.take()) {
            (None, right) => right,
            (left, None) => left,
            (left, mut right) => match Self::take_min(&mut right) {
                Some(successor) => Some(Box::new(TreeNode { player: successor, left, right })),
                None => left,
            },
        };
        self.len -= 1;
        Some(removed.player)
    }

    /// Detach the leftmost player of a subtree, splicing in its right child
    fn take_min(mut link: &mut Link) -> Option<Player> {
        while link.as_ref().is_some_and(|node| node.left.is_some()) {
            let Some(node) = link else {
                return None;
            };
            link = &mut node.left;
        }
        let mut min = link.take()?;
        *link = min.right.take();
        Some(min.player)
    }

    /// Lazy in-order iterator
    pub fn iter(&self) -> InOrder<'_> {
        InOrder::new(self.root.as_deref())
    }

    /// Players in ascending name order
    pub fn in_order_traversal(&self) -> Vec<&Player> {
        self.iter().collect()
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<&TreeNode> = self.root.as_deref().into_iter().collect();
        while !level.is_empty() {
            height += 1;
            level = level.into_iter().flat_map(|node| node.left.as_deref().into_iter().chain(node.right.as_deref())).collect();
        }
        height
    }

    /// Rebuild into a minimum-height tree with the same contents
    pub fn balance(&mut self) {
        let height_before = self.height();
        let mut slots: Vec<Option<Player>> = self.drain_in_order().into_iter().map(Some).collect();
        self.root = Self::build(&mut slots);
        self.len = slots.len();
        info!(entries = self.len, height_before, height_after = self.height(), "rebalanced search tree");
    }

    /// Middle element (index `len / 2`) becomes the root of each run
    fn build(slots: &mut [Option<Player>]) -> Link {
        let middle = slots.len() / 2;
        let (left, rest) = slots.split_at_mut(middle);
        let (pivot, right) = rest.split_first_mut()?;
        let player = pivot.take()?;
        Some(Box::new(TreeNode {
            player,
            left: Self::build(left),
            right: Self::build(right),
        }))
    }

    /// Move every player out in name order, leaving the tree empty
    fn drain_in_order(&mut self) -> Vec<Player> {
        let mut players = Vec::with_capacity(self.len);
        let mut stack: Vec<Box<TreeNode>> = Vec::new();
        let mut cursor = self.root.take();
        loop {
            while let Some(mut node) = cursor {
                cursor = node.left.take();
                stack.push(node);
            }
            let Some(mut node) = stack.pop() else {
                break;
            };
            cursor = node.right.take();
            players.push(node.player);
        }
        self.len = 0;
        players
    }

    /// Whether in-order names are strictly increasing
    pub fn is_ordered(&self) -> bool {
        let mut iter = self.iter();
        let Some(mut previous) = iter.next() else {
            return true;
        };
        for player in iter {
            if player.name() <= previous.name() {
                return false;
            }
            previous = player;
        }
        true
    }

    pub fn clear(&mut self) {
        self.drain_in_order();
    }

    /// One formatted line per player in name order
    pub fn render(&self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

impl Drop for PlayerSearchTree {
    fn drop(&mut self) {
        let mut stack: Vec<Box<TreeNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<'a> IntoIterator for &'a PlayerSearchTree {
    type Item = &'a Player;
    type IntoIter = InOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order walk driven by an explicit stack
#[derive(Debug, Clone)]
pub struct InOrder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> InOrder<'a> {
    fn new(root: Option<&'a TreeNode>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut cursor: Option<&'a TreeNode>) {
        while let Some(node) = cursor {
            self.stack.push(node);
            cursor = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a Player;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tree: &PlayerSearchTree) -> Vec<&str> {
        tree.iter().map(Player::name).collect()
    }

    fn greg() -> Player {
        Player::new("1", "Greg")
    }

    fn tim() -> Player {
        Player::new("2", "Tim")
    }

    fn billy() -> Player {
        Player::new("3", "Billy")
    }

    fn bobby() -> Player {
        Player::new("4", "Bobby")
    }

    fn robby() -> Player {
        Player::new("5", "Robby")
    }

    #[test]
    fn test_insert_single_node() {
        let mut tree = PlayerSearchTree::new();
        assert_eq!(tree.insert(greg()), Upsert::Inserted);

        assert_eq!(tree.root().unwrap().player().name(), "Greg");
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_insert_multiple_nodes() {
        let mut tree = PlayerSearchTree::new();
        for player in [billy(), greg(), bobby(), tim(), robby()] {
            tree.insert(player);
        }

        assert_eq!(names(&tree), vec!["Billy", "Bobby", "Greg", "Robby", "Tim"]);
        assert!(tree.is_ordered());
    }

    #[test]
    fn test_insert_duplicate_node() {
        let mut tree = PlayerSearchTree::new();
        tree.insert(greg());
        assert_eq!(tree.insert(Player::new("6", "Greg")), Upsert::Updated);

        let root = tree.root().unwrap();
        assert_eq!(root.player().uid(), "6");
        assert_eq!(root.player().name(), "Greg");
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_structure_of_tree() {
        let mut tree = PlayerSearchTree::new();
        for player in [billy(), greg(), robby(), bobby(), tim()] {
            tree.insert(player);
        }

        let root = tree.root().unwrap();
        assert_eq!(root.player().name(), "Billy");
        assert!(root.left().is_none());

        let greg = root.right().unwrap();
        assert_eq!(greg.player().name(), "Greg");
        assert_eq!(greg.left().unwrap().player().name(), "Bobby");

        let robby = greg.right().unwrap();
        assert_eq!(robby.player().name(), "Robby");
        assert_eq!(robby.right().unwrap().player().name(), "Tim");
    }

    #[test]
    fn test_search_existing_player() {
        let mut tree = PlayerSearchTree::new();
        for player in [greg(), tim(), billy(), bobby(), robby()] {
            tree.insert(player);
        }

        let found = tree.search("Greg").unwrap();
        assert_eq!(found.uid(), "1");
        assert_eq!(found.name(), "Greg");
    }

    #[test]
    fn test_search_nonexistent_player() {
        let mut tree = PlayerSearchTree::new();
        tree.insert(greg());
        tree.insert(billy());

        assert!(tree.search("Tim").is_none());
        assert!(PlayerSearchTree::new().search("Greg").is_none());
    }

    #[test]
    fn test_search_after_updating_player() {
        let mut tree = PlayerSearchTree::new();
        tree.insert(greg());
        tree.insert(Player::new("6", "Greg"));

        assert_eq!(tree.search("Greg").unwrap().uid(), "6");
    }

    #[test]
    fn test_search_mut_updates_in_place() {
        let mut tree = PlayerSearchTree::new();
        tree.insert(greg());
        tree.insert(tim());

        tree.search_mut("Tim").unwrap().set_score(9_u64).unwrap();
        assert_eq!(tree.search("Tim").unwrap().score(), 9);
    }

    #[test]
    fn test_balance_degenerate_tree() {
        let mut tree = PlayerSearchTree::new();
        for (i, name) in ["A", "B", "C", "D", "E", "F", "G"].iter().enumerate() {
            tree.insert(Player::new(i.to_string(), *name));
        }
        assert_eq!(tree.height(), 7);

        let before: Vec<String> = names(&tree).into_iter().map(String::from).collect();
        tree.balance();

        assert_eq!(tree.height(), 3);
        assert_eq!(names(&tree), before);
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.root().unwrap().player().name(), "D");
    }

    #[test]
    fn test_balance_picks_len_over_two() {
        let mut tree = PlayerSearchTree::new();
        for (i, name) in ["A", "B", "C", "D"].iter().enumerate() {
            tree.insert(Player::new(i.to_string(), *name));
        }
        tree.balance();

        let root = tree.root().unwrap();
        assert_eq!(root.player().name(), "C");
        assert_eq!(root.left().unwrap().player().name(), "B");
        assert_eq!(root.left().unwrap().left().unwrap().player().name(), "A");
        assert_eq!(root.right().unwrap().player().name(), "D");
    }

    #[test]
    fn test_minimum_height() {
        assert_eq!(minimum_height(0), 0);
        assert_eq!(minimum_height(1), 1);
        assert_eq!(minimum_height(2), 2);
        assert_eq!(minimum_height(3), 2);
        assert_eq!(minimum_height(4), 3);
        assert_eq!(minimum_height(7), 3);
        assert_eq!(minimum_height(8), 4);
    }

    #[test]
    fn test_balance_empty_tree() {
        let mut tree = PlayerSearchTree::new();
        tree.balance();

        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn test_remove_leaf_inner_and_root() {
        let mut tree = PlayerSearchTree::new();
        for player in [billy(), greg(), robby(), bobby(), tim()] {
            tree.insert(player);
        }

        assert_eq!(tree.remove("Tim").unwrap().uid(), "2");
        assert_eq!(names(&tree), vec!["Billy", "Bobby", "Greg", "Robby"]);

        assert_eq!(tree.remove("Greg").unwrap().uid(), "1");
        assert_eq!(names(&tree), vec!["Billy", "Bobby", "Robby"]);
        assert_eq!(tree.root().unwrap().right().unwrap().player().name(), "Robby");

        assert_eq!(tree.remove("Billy").unwrap().uid(), "3");
        assert_eq!(tree.root().unwrap().player().name(), "Robby");

        assert!(tree.remove("Nobody").is_none());
        assert_eq!(tree.len(), 2);
        assert!(tree.is_ordered());
    }

    #[test]
    fn test_remove_node_with_two_children_uses_successor() {
        let mut tree = PlayerSearchTree::new();
        for (i, name) in ["M", "F", "T", "P", "W", "N"].iter().enumerate() {
            tree.insert(Player::new(i.to_string(), *name));
        }

        tree.remove("M").unwrap();

        let root = tree.root().unwrap();
        assert_eq!(root.player().name(), "N");
        assert_eq!(root.right().unwrap().left().unwrap().player().name(), "P");
        assert_eq!(names(&tree), vec!["F", "N", "P", "T", "W"]);
    }

    #[test]
    fn test_render_and_clear() {
        let mut tree = PlayerSearchTree::new();
        tree.insert(tim());
        tree.insert(billy());

        assert_eq!(tree.render(), vec!["Player: uid=3, name=Billy, score=0", "Player: uid=2, name=Tim, score=0"]);

        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_deep_tree_drops_without_overflow() {
        let mut tree = PlayerSearchTree::new();
        for i in 0..10_000 {
            tree.insert(Player::new(i.to_string(), format!("{i:06}")));
        }
        assert_eq!(tree.len(), 10_000);
        drop(tree);
    }
}
