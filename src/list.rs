use std::ops::{Index, IndexMut};

use crate::node::Node;

/// The array that holds all the underlying node data. Nodes are never
/// removed, so the arena is a plain vector and a [NodeIndex] stays valid
/// for the whole life of the [Slots].
///
/// The slots will always have a root at [NodeIndex::ROOT]. Sub-tries produced
/// by a prefix search share the same [Slots] and simply start from a
/// different index.
#[derive(Debug, Clone)]
pub(crate) struct Slots<V> {
    slots: Vec<Node<V>>,
}

/// Represents the index of a node within the [Slots].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NodeIndex(u64);

impl NodeIndex {
    /// The root node, which always has an internal index of 0.
    pub const ROOT: NodeIndex = NodeIndex(0);

    /// Gets the internal position of the node as a [usize].
    pub fn position(&self) -> usize {
        self.0 as usize
    }
}

/// Where a walk stopped when the path ran off the existing tree.
///
/// ```example
///             c
///            /
///           a
///          / \
///         n   v
/// ```
/// Walking "cat" stops at `a` with `t` as the first unmatched character;
/// whatever the iterator still yields follows `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Divergence {
    /// The deepest node that matched.
    pub at: NodeIndex,
    /// The first character without a matching edge.
    pub first: char,
}

impl<V> Slots<V> {
    /// Creates a new [Slots] with room for `cap` nodes, holding only the root.
    pub fn with_capacity(cap: usize) -> Self {
        let mut slots = Vec::with_capacity(cap.max(1));
        slots.push(Node::root());
        Self { slots }
    }
    /// The number of nodes, the root included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    /// Gets the capacity of the [Slots].
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }
    /// Pushes a [Node] into the arena, returning its [NodeIndex].
    fn push(&mut self, item: Node<V>) -> NodeIndex {
        self.slots.push(item);
        NodeIndex((self.slots.len() - 1) as u64)
    }
    /// Attaches `child` below `parent`, keeping the subkeys sorted by edge
    /// character.
    fn link(&mut self, parent: NodeIndex, child: NodeIndex) {
        let key = self[child]
            .key()
            .expect("Only the root node has no key and it is never a child.");
        match self[parent].search(key, self) {
            // Inserts only link fresh edges, so an existing one means the
            // walk was wrong.
            Ok(_) => unreachable!("edge '{key}' is already linked"),
            Err(position) => self[parent].sub_keys.insert(position, child),
        }
    }

    /// Follows `path` edge by edge from `from`. On success the iterator is
    /// exhausted and the reached node is returned. On failure the iterator
    /// holds everything after [Divergence::first].
    pub fn walk<I>(&self, from: NodeIndex, path: &mut I) -> Result<NodeIndex, Divergence>
    where
        I: Iterator<Item = char>,
    {
        let mut end = from;
        for current in path {
            match self[end].child(current, self) {
                Some(next) => end = next,
                None => {
                    return Err(Divergence {
                        at: end,
                        first: current,
                    });
                }
            }
        }
        Ok(end)
    }

    /// Returns the node reached by following `path` from `from`. An empty
    /// path is the node itself. The first character without a matching edge
    /// ends the search.
    pub fn descend<I>(&self, from: NodeIndex, path: I) -> Option<NodeIndex>
    where
        I: IntoIterator<Item = char>,
    {
        self.walk(from, &mut path.into_iter()).ok()
    }

    /// Stores `value` at the end of `path` starting from `from`, creating the
    /// missing suffix of the path. Returns the payload it replaced.
    pub fn insert<I>(&mut self, from: NodeIndex, path: I, value: V) -> Option<V>
    where
        I: IntoIterator<Item = char>,
    {
        let mut remainder = path.into_iter();
        match self.walk(from, &mut remainder) {
            Ok(end) => self[end].value_mut().replace(value),
            Err(Divergence { at, first }) => {
                let mut previous = at;
                for item in std::iter::once(first).chain(remainder) {
                    let next = self.push(Node::keyed(item));
                    self.link(previous, next);
                    previous = next;
                }
                // The chain holds at least `first`, so `previous` is new.
                *self[previous].value_mut() = Some(value);
                None
            }
        }
    }

    /// Pushes the payload of `from` followed by every payload below it,
    /// children visited in ascending edge order. Keys can be arbitrarily
    /// long, so the walk keeps its own stack.
    pub fn collect<'a>(&'a self, from: NodeIndex, out: &mut Vec<&'a V>) {
        let mut stack = vec![from];
        while let Some(index) = stack.pop() {
            let node = &self[index];
            if let Some(value) = node.value() {
                out.push(value);
            }
            stack.extend(node.subkeys().rev());
        }
    }

    /// Same traversal as [Slots::collect], pairing each payload with its key.
    /// `prefix` is the key of `from` and is restored before returning.
    pub fn collect_entries<'a>(
        &'a self,
        from: NodeIndex,
        prefix: &mut String,
        out: &mut Vec<(String, &'a V)>,
    ) {
        let base = prefix.len();
        // Each entry carries the byte length of its parent's key.
        let mut stack = vec![(from, base)];
        while let Some((index, parent)) = stack.pop() {
            prefix.truncate(parent);
            let node = &self[index];
            if index != from {
                if let Some(key) = node.key() {
                    prefix.push(key);
                }
            }
            if let Some(value) = node.value() {
                out.push((prefix.clone(), value));
            }
            let len = prefix.len();
            stack.extend(node.subkeys().rev().map(|child| (*child, len)));
        }
        prefix.truncate(base);
    }

    /// Moves every payload of the subtree at `from` into `out`, in
    /// [Slots::collect] order.
    pub fn take_values(&mut self, from: NodeIndex, out: &mut Vec<V>) {
        let mut stack = vec![from];
        while let Some(index) = stack.pop() {
            let node = &mut self[index];
            if let Some(value) = node.value_mut().take() {
                out.push(value);
            }
            stack.extend(node.subkeys().rev());
        }
    }
}

impl<V> Index<NodeIndex> for Slots<V> {
    type Output = Node<V>;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.slots[index.position()]
    }
}

impl<V> IndexMut<NodeIndex> for Slots<V> {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.slots[index.position()]
    }
}

#[cfg(test)]
mod tests {
    use super::{Divergence, NodeIndex, Slots};

    fn sample() -> Slots<&'static str> {
        let mut list = Slots::with_capacity(0);
        list.insert(NodeIndex::ROOT, "cane".chars(), "_cane_");
        list.insert(NodeIndex::ROOT, "cavia".chars(), "_cavia_");
        list.insert(NodeIndex::ROOT, "albero".chars(), "_albero_");
        list
    }

    fn values(list: &Slots<&'static str>, from: NodeIndex) -> Vec<&'static str> {
        let mut out = vec![];
        list.collect(from, &mut out);
        out.into_iter().copied().collect()
    }

    #[test]
    pub fn root_always_present() {
        let list = Slots::<usize>::with_capacity(0);
        assert_eq!(list.len(), 1);
        assert!(list[NodeIndex::ROOT].key().is_none());
        assert!(list[NodeIndex::ROOT].value().is_none());
    }

    #[test]
    pub fn insert_creates_one_node_per_new_char() {
        let mut list = Slots::<usize>::with_capacity(8);
        assert_eq!(list.insert(NodeIndex::ROOT, "abc".chars(), 1), None);
        assert_eq!(list.len(), 4);

        // Shares "ab", adds 'd'.
        assert_eq!(list.insert(NodeIndex::ROOT, "abd".chars(), 2), None);
        assert_eq!(list.len(), 5);

        // Interior node, no new structure.
        assert_eq!(list.insert(NodeIndex::ROOT, "ab".chars(), 3), None);
        assert_eq!(list.len(), 5);
    }

    #[test]
    pub fn insert_returns_replaced_payload() {
        let mut list = Slots::with_capacity(0);
        assert_eq!(list.insert(NodeIndex::ROOT, "key".chars(), 1), None);
        assert_eq!(list.insert(NodeIndex::ROOT, "key".chars(), 2), Some(1));
        let nodes = list.len();
        assert_eq!(list.insert(NodeIndex::ROOT, "key".chars(), 3), Some(2));
        assert_eq!(list.len(), nodes);
    }

    #[test]
    pub fn empty_path_targets_start_node() {
        let mut list = sample();
        assert_eq!(list.descend(NodeIndex::ROOT, "".chars()), Some(NodeIndex::ROOT));
        assert_eq!(list.insert(NodeIndex::ROOT, "".chars(), "root"), None);
        assert_eq!(list[NodeIndex::ROOT].value(), &Some("root"));
    }

    #[test]
    pub fn walk_reports_divergence() {
        let list = sample();
        let ca = list.descend(NodeIndex::ROOT, "ca".chars()).unwrap();

        let mut path = "catalogo".chars();
        let failure = list.walk(NodeIndex::ROOT, &mut path).unwrap_err();
        assert_eq!(failure, Divergence { at: ca, first: 't' });
        assert_eq!(path.collect::<String>(), "alogo");
    }

    #[test]
    pub fn descend_stops_at_first_missing_edge() {
        let list = sample();
        assert!(list.descend(NodeIndex::ROOT, "x".chars()).is_none());
        assert!(list.descend(NodeIndex::ROOT, "cx".chars()).is_none());
        // Past the end of an existing key.
        assert!(list.descend(NodeIndex::ROOT, "canes".chars()).is_none());
        assert!(list.descend(NodeIndex::ROOT, "can".chars()).is_some());
    }

    #[test]
    pub fn subkeys_stay_sorted() {
        let mut list = Slots::with_capacity(0);
        for c in ['m', 'c', 'x', 'a', 'q'] {
            list.insert(NodeIndex::ROOT, [c], c);
        }
        let keys = list[NodeIndex::ROOT]
            .subkeys()
            .map(|k| list[*k].key().unwrap())
            .collect::<String>();
        assert_eq!(keys, "acmqx");
    }

    #[test]
    pub fn collect_is_preorder() {
        let mut list = sample();
        list.insert(NodeIndex::ROOT, "ca".chars(), "_ca_");
        assert_eq!(
            values(&list, NodeIndex::ROOT),
            vec!["_albero_", "_ca_", "_cane_", "_cavia_"]
        );

        let ca = list.descend(NodeIndex::ROOT, "ca".chars()).unwrap();
        assert_eq!(values(&list, ca), vec!["_ca_", "_cane_", "_cavia_"]);
    }

    #[test]
    pub fn collect_entries_rebuilds_keys() {
        let list = sample();
        let mut prefix = String::new();
        let mut out = vec![];
        list.collect_entries(NodeIndex::ROOT, &mut prefix, &mut out);
        assert!(prefix.is_empty());
        assert_eq!(
            out,
            vec![
                ("albero".to_string(), &"_albero_"),
                ("cane".to_string(), &"_cane_"),
                ("cavia".to_string(), &"_cavia_"),
            ]
        );
    }

    #[test]
    pub fn collect_entries_from_inner_node() {
        let mut list = sample();
        list.insert(NodeIndex::ROOT, "cavallo".chars(), "_cavallo_");
        let ca = list.descend(NodeIndex::ROOT, "ca".chars()).unwrap();

        let mut prefix = String::from("ca");
        let mut out = vec![];
        list.collect_entries(ca, &mut prefix, &mut out);
        assert_eq!(prefix, "ca");
        assert_eq!(
            out.into_iter().map(|(key, _)| key).collect::<Vec<_>>(),
            vec!["cane", "cavallo", "cavia"]
        );
    }

    #[test]
    pub fn take_values_empties_subtree() {
        let mut list = sample();
        let c = list.descend(NodeIndex::ROOT, "c".chars()).unwrap();
        let mut out = vec![];
        list.take_values(c, &mut out);
        assert_eq!(out, vec!["_cane_", "_cavia_"]);
        assert_eq!(values(&list, NodeIndex::ROOT), vec!["_albero_"]);
    }
}
