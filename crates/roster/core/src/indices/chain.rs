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

//! Doubly linked collision chain
//!
//! Nodes live in an arena and refer to their neighbours by [`NodeId`]
//! handles. `next` links form the forward path from head to tail and
//! `previous` links mirror them, which keeps head and tail insertion and
//! removal O(1). Handles stay valid until the node they name is removed;
//! freed slots are recycled by later insertions.

use super::lib::{Direction, IndexError, IndexResult, Keyed, Upsert};
use std::fmt::Display;
use tracing::trace;

/// Handle to a node inside a [`CollisionChain`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct ChainNode<T> {
    value: T,
    next: Option<NodeId>,
    previous: Option<NodeId>,
}

/// Doubly linked list keyed by each record's identity
#[derive(Debug, Clone)]
pub struct CollisionChain<T> {
    slots: Vec<Option<ChainNode<T>>>,
    free: Vec<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<T> Default for CollisionChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CollisionChain<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none() && self.tail.is_none()
    }

    /// Number of linked nodes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    /// Value stored at `id`
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|node| &node.value)
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.next)
    }

    pub fn previous(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.previous)
    }

    fn node(&self, id: NodeId) -> Option<&ChainNode<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut ChainNode<T>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    fn allocate(&mut self, node: ChainNode<T>) -> NodeId {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Insert at the head in O(1)
    pub fn append_head(&mut self, value: T) -> NodeId {
        let old_head = self.head;
        let id = self.allocate(ChainNode { value, next: old_head, previous: None });

        match old_head.and_then(|head| self.node_mut(head)) {
            Some(node) => node.previous = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        id
    }

    /// Insert at the tail in O(1) using the tracked tail handle
    pub fn append_tail(&mut self, value: T) -> NodeId {
        let old_tail = self.tail;
        let id = self.allocate(ChainNode { value, next: None, previous: old_tail });

        match old_tail.and_then(|tail| self.node_mut(tail)) {
            Some(node) => node.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Remove and return the head value
    pub fn delete_head(&mut self) -> IndexResult<T> {
        let head = self.head.ok_or(IndexError::EmptyStructure)?;
        self.unlink(head).ok_or(IndexError::EmptyStructure)
    }

    /// Remove and return the tail value
    pub fn delete_tail(&mut self) -> IndexResult<T> {
        let tail = self.tail.ok_or(IndexError::EmptyStructure)?;
        self.unlink(tail).ok_or(IndexError::EmptyStructure)
    }

    /// Bypass the node at `id`, patching head/tail when it is an endpoint
    fn unlink(&mut self, id: NodeId) -> Option<T> {
        let node = self.slots.get_mut(id.0)?.take()?;

        match node.previous.and_then(|previous| self.node_mut(previous)) {
            Some(previous) => previous.next = node.next,
            None => self.head = node.next,
        }
        match node.next.and_then(|next| self.node_mut(next)) {
            Some(next) => next.previous = node.previous,
            None => self.tail = node.previous,
        }

        self.free.push(id.0);
        self.len -= 1;
        Some(node.value)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Head-to-tail iterator; `.rev()` walks tail-to-head
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            chain: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Count nodes by following `next` links from the head
    pub fn count_links(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            count += 1;
            cursor = self.next(id);
        }
        count
    }

    /// Iterate in the requested direction
    pub fn traverse(&self, direction: Direction) -> Traversal<'_, T> {
        Traversal { inner: self.iter(), direction }
    }

    /// Verify that `previous` links mirror `next` links and that the
    /// endpoints and node count agree with the walk
    pub fn check_links(&self) -> bool {
        if self.head.is_none() != self.tail.is_none() {
            return false;
        }
        if let Some(head) = self.head {
            if self.previous(head).is_some() {
                return false;
            }
        }

        let mut count = 0;
        let mut expected_previous = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(node) = self.node(id) else {
                return false;
            };
            if node.previous != expected_previous || count >= self.len {
                return false;
            }
            count += 1;
            expected_previous = Some(id);
            cursor = node.next;
        }

        expected_previous == self.tail && count == self.len
    }
}

impl<T: Keyed> CollisionChain<T> {
    fn find(&self, key: &str) -> Option<NodeId> {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = self.node(id)?;
            if node.value.key() == key {
                return Some(id);
            }
            cursor = node.next;
        }
        None
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Linear scan for `key`
    pub fn get_by_key(&self, key: &str) -> IndexResult<&T> {
        self.find(key).and_then(|id| self.get(id)).ok_or_else(|| IndexError::KeyNotFound(key.to_string()))
    }

    pub fn get_by_key_mut(&mut self, key: &str) -> IndexResult<&mut T> {
        match self.find(key).and_then(|id| self.node_mut(id)) {
            Some(node) => Ok(&mut node.value),
            None => Err(IndexError::KeyNotFound(key.to_string())),
        }
    }

    /// Unlink the node carrying `key`; the chain is untouched on a miss
    pub fn delete_by_key(&mut self, key: &str) -> IndexResult<T> {
        let id = self.find(key).ok_or_else(|| IndexError::KeyNotFound(key.to_string()))?;
        let value = self.unlink(id).ok_or_else(|| IndexError::KeyNotFound(key.to_string()))?;
        trace!(key, "unlinked chain node");
        Ok(value)
    }

    /// Update the record sharing `value`'s key, or append it at the tail
    pub fn add_or_update(&mut self, value: T) -> Upsert {
        match self.find(value.key()).and_then(|id| self.node_mut(id)) {
            Some(node) => {
                node.value.absorb(value);
                Upsert::Updated
            }
            None => {
                trace!(key = value.key(), "appending chain node");
                self.append_tail(value);
                Upsert::Inserted
            }
        }
    }
}

impl<T: Display> CollisionChain<T> {
    /// One formatted line per node in the requested order
    pub fn render(&self, direction: Direction) -> Vec<String> {
        self.traverse(direction).map(ToString::to_string).collect()
    }
}

impl<'a, T> IntoIterator for &'a CollisionChain<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Bidirectional iterator over a chain
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    chain: &'a CollisionChain<T>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.chain.node(self.front?)?;
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.chain.node(self.back?)?;
        self.back = node.previous;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Direction-selected walk over a chain
#[derive(Debug, Clone)]
pub struct Traversal<'a, T> {
    inner: Iter<'a, T>,
    direction: Direction,
}

impl<'a, T> Iterator for Traversal<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        match self.direction {
            Direction::HeadToTail => self.inner.next(),
            Direction::TailToHead => self.inner.next_back(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;

    fn uids<'a>(values: impl Iterator<Item = &'a Player>) -> Vec<&'a str> {
        values.map(Player::uid).collect()
    }

    fn greg_tom_simon() -> CollisionChain<Player> {
        let mut chain = CollisionChain::new();
        chain.append_head(Player::new("12345", "Greg"));
        chain.append_tail(Player::new("654321", "Tom"));
        chain.append_tail(Player::new("987654", "Simon"));
        chain
    }

    #[test]
    fn test_empty_chain() {
        let chain: CollisionChain<Player> = CollisionChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert!(chain.head().is_none());
        assert!(chain.tail().is_none());
        assert!(chain.check_links());
    }

    #[test]
    fn test_append_head_to_empty_chain() {
        let mut chain = CollisionChain::new();
        let id = chain.append_head(Player::new("12345", "Greg"));

        assert_eq!(chain.head(), Some(id));
        assert_eq!(chain.tail(), Some(id));
        assert_eq!(chain.get(id).unwrap().name(), "Greg");
        assert!(chain.next(id).is_none());
        assert!(chain.previous(id).is_none());
    }

    #[test]
    fn test_append_head_to_non_empty_chain() {
        let mut chain = CollisionChain::new();
        chain.append_head(Player::new("12345", "Greg"));
        chain.append_head(Player::new("654321", "Tom"));
        chain.append_head(Player::new("5555555", "Simon"));

        assert_eq!(uids(chain.iter()), vec!["5555555", "654321", "12345"]);
        let tail = chain.tail().unwrap();
        assert!(chain.next(tail).is_none());
        assert!(chain.check_links());
    }

    #[test]
    fn test_append_tail() {
        let mut chain = CollisionChain::new();
        chain.append_tail(Player::new("12345", "Greg"));
        chain.append_tail(Player::new("654321", "Tom"));
        chain.append_tail(Player::new("5555555", "Simon"));

        let head = chain.head().unwrap();
        let tail = chain.tail().unwrap();
        assert_eq!(chain.get(head).unwrap().uid(), "12345");
        assert_eq!(chain.get(tail).unwrap().uid(), "5555555");
        assert_eq!(chain.get(chain.next(head).unwrap()).unwrap().uid(), "654321");
        assert_eq!(chain.get(chain.previous(tail).unwrap()).unwrap().uid(), "654321");
        assert!(chain.previous(head).is_none());
    }

    #[test]
    fn test_traverse_both_directions() {
        let chain = greg_tom_simon();

        assert_eq!(chain.render(Direction::HeadToTail).len(), 3);
        assert_eq!(uids(chain.traverse(Direction::HeadToTail)), vec!["12345", "654321", "987654"]);
        assert_eq!(uids(chain.traverse(Direction::TailToHead)), vec!["987654", "654321", "12345"]);
        assert_eq!(uids(chain.iter().rev()), vec!["987654", "654321", "12345"]);

        // Traversals can be restarted any number of times
        assert_eq!(chain.traverse(Direction::HeadToTail).count(), 3);
        assert_eq!(chain.traverse(Direction::HeadToTail).count(), 3);
    }

    #[test]
    fn test_iter_meets_in_the_middle() {
        let chain = greg_tom_simon();
        let mut iter = chain.iter();

        assert_eq!(iter.next().unwrap().uid(), "12345");
        assert_eq!(iter.next_back().unwrap().uid(), "987654");
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next().unwrap().uid(), "654321");
        assert!(iter.next_back().is_none());
    }

    #[test]
    fn test_delete_head() {
        let mut chain = CollisionChain::new();
        chain.append_head(Player::new("12345", "Greg"));
        chain.append_head(Player::new("654321", "Tom"));

        assert_eq!(chain.delete_head().unwrap().uid(), "654321");
        let head = chain.head().unwrap();
        assert_eq!(chain.get(head).unwrap().uid(), "12345");
        assert!(chain.previous(head).is_none());

        chain.delete_head().unwrap();
        assert!(chain.is_empty());
        assert_eq!(chain.delete_head().unwrap_err(), IndexError::EmptyStructure);
    }

    #[test]
    fn test_delete_tail() {
        let mut chain = CollisionChain::new();
        chain.append_tail(Player::new("12345", "Greg"));
        chain.append_tail(Player::new("654321", "Tom"));

        assert_eq!(chain.delete_tail().unwrap().uid(), "654321");
        let tail = chain.tail().unwrap();
        assert_eq!(chain.get(tail).unwrap().uid(), "12345");
        assert!(chain.next(tail).is_none());

        chain.delete_tail().unwrap();
        assert!(chain.is_empty());
        assert_eq!(chain.delete_tail().unwrap_err(), IndexError::EmptyStructure);
    }

    #[test]
    fn test_delete_by_key() {
        let mut chain = greg_tom_simon();

        chain.delete_by_key("654321").unwrap();
        let head = chain.head().unwrap();
        let tail = chain.tail().unwrap();
        assert_eq!(chain.get(head).unwrap().uid(), "12345");
        assert_eq!(chain.get(tail).unwrap().uid(), "987654");
        assert_eq!(chain.previous(chain.next(head).unwrap()), Some(head));
        assert_eq!(chain.next(chain.previous(tail).unwrap()), Some(tail));

        chain.delete_by_key("12345").unwrap();
        let head = chain.head().unwrap();
        assert_eq!(chain.get(head).unwrap().uid(), "987654");
        assert!(chain.previous(head).is_none());
        assert!(chain.next(head).is_none());

        chain.delete_by_key("987654").unwrap();
        assert!(chain.is_empty());
        assert!(chain.head().is_none());
        assert!(chain.tail().is_none());
    }

    #[test]
    fn test_count_links_follows_next() {
        let mut chain = greg_tom_simon();
        assert_eq!(chain.count_links(), 3);

        chain.delete_by_key("654321").unwrap();
        chain.append_head(Player::new("111", "Ann"));
        chain.delete_tail().unwrap();
        assert_eq!(chain.count_links(), 2);
        assert_eq!(chain.count_links(), chain.len());

        chain.clear();
        assert_eq!(chain.count_links(), 0);
    }

    #[test]
    fn test_delete_tail_by_key() {
        let mut chain = greg_tom_simon();

        chain.delete_by_key("987654").unwrap();
        let tail = chain.tail().unwrap();
        assert_eq!(chain.get(tail).unwrap().uid(), "654321");
        assert!(chain.next(tail).is_none());
        assert!(chain.check_links());
    }

    #[test]
    fn test_delete_missing_key_leaves_chain_intact() {
        let mut chain = greg_tom_simon();

        let err = chain.delete_by_key("999999").unwrap_err();
        assert_eq!(err, IndexError::KeyNotFound("999999".to_string()));
        assert_eq!(chain.len(), 3);
        assert_eq!(uids(chain.iter()), vec!["12345", "654321", "987654"]);
        assert!(chain.check_links());
    }

    #[test]
    fn test_add_or_update() {
        let mut chain = CollisionChain::new();
        let mut greg = Player::new("12345", "Greg");
        greg.set_score(40_u64).unwrap();

        assert_eq!(chain.add_or_update(greg), Upsert::Inserted);
        assert_eq!(chain.add_or_update(Player::new("654321", "Tom")), Upsert::Inserted);
        assert_eq!(chain.add_or_update(Player::new("12345", "Gregory")), Upsert::Updated);

        assert_eq!(chain.len(), 2);
        let updated = chain.get_by_key("12345").unwrap();
        assert_eq!(updated.name(), "Gregory");
        assert_eq!(updated.score(), 40);
        assert_eq!(uids(chain.iter()), vec!["12345", "654321"]);
    }

    #[test]
    fn test_get_by_key() {
        let mut chain = greg_tom_simon();

        assert_eq!(chain.get_by_key("654321").unwrap().name(), "Tom");
        assert!(matches!(chain.get_by_key("000"), Err(IndexError::KeyNotFound(_))));

        chain.get_by_key_mut("654321").unwrap().set_name("Thomas");
        assert_eq!(chain.get_by_key("654321").unwrap().name(), "Thomas");
        assert!(chain.contains_key("987654"));
        assert!(!chain.contains_key("000"));
    }

    #[test]
    fn test_slots_are_recycled() {
        let mut chain = greg_tom_simon();
        chain.delete_by_key("654321").unwrap();
        chain.append_head(Player::new("1", "Ann"));

        assert_eq!(chain.slots.len(), 3);
        assert_eq!(uids(chain.iter()), vec!["1", "12345", "987654"]);
        assert!(chain.check_links());
    }

    #[test]
    fn test_clear() {
        let mut chain = greg_tom_simon();
        chain.clear();

        assert!(chain.is_empty());
        assert_eq!(chain.iter().count(), 0);
        assert!(chain.check_links());
    }
}
