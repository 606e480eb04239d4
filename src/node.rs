use std::slice::Iter;

use crate::list::{NodeIndex, Slots};

/// A Trie node that holds the character of the edge leading to it, the
/// indices of its children and an optional payload.
///
/// In the case of a root node the key will just be [Option::None]. Only a
/// node at the end of an inserted key carries a value; nodes in between are
/// created empty.
#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    /// The edge character.
    key: Option<char>,
    /// The children, sorted by their edge character.
    pub(crate) sub_keys: Vec<NodeIndex>,
    value: Option<V>,
}

impl<V> Node<V> {
    /// Creates a new root node.
    pub const fn root() -> Self {
        Node {
            key: None,
            sub_keys: Vec::new(),
            value: None,
        }
    }
    /// Creates an empty node reached through the edge `key`.
    pub fn keyed(key: char) -> Self {
        Self {
            key: Some(key),
            sub_keys: Vec::new(),
            value: None,
        }
    }
}

impl<V> Node<V> {
    /// Gets the node key. This will be [Option::None] for a root node.
    pub fn key(&self) -> Option<char> {
        self.key
    }
    /// Binary search over the children for the edge `key`.
    pub fn search(&self, key: char, buffer: &Slots<V>) -> Result<usize, usize> {
        self.sub_keys.binary_search_by(|node| {
            // No child is a root, so every child has a key.
            buffer[*node]
                .key
                .expect("Child node had no key.")
                .cmp(&key)
        })
    }
    /// Finds the child reached through the edge `key`.
    pub fn child(&self, key: char, buffer: &Slots<V>) -> Option<NodeIndex> {
        let position = self.search(key, buffer).ok()?;
        Some(self.sub_keys[position])
    }
    /// Gets an iterator over the children in edge order.
    pub fn subkeys(&self) -> Iter<'_, NodeIndex> {
        self.sub_keys.iter()
    }
    /// Returns an immutable reference to the payload.
    pub fn value(&self) -> &Option<V> {
        &self.value
    }
    /// Returns a mutable reference to the payload.
    pub fn value_mut(&mut self) -> &mut Option<V> {
        &mut self.value
    }
}
