use std::{
    cell::{Ref, RefCell, RefMut},
    fmt::{self, Debug, Display},
    rc::Rc,
};

use list::{NodeIndex, Slots};
use tracing::{debug, trace};

mod error;
mod iter;
mod list;
mod node;

pub use crate::error::NotFoundError;
pub use crate::iter::IntoValues;

/// A prefix tree mapping string keys to values of type `V`.
///
/// Every character of a key is one edge of the tree, so all the keys sharing
/// a prefix live below the same node. This makes prefix queries cheap
/// ([Trie::find_by_prefix], [Trie::completions]) at the cost of single-key
/// access that is slower than hashing.
///
/// # Shared subtrees
/// A [Trie] is a handle onto a node pool plus the node it treats as its root.
/// [Trie::find_by_prefix] returns a handle onto the *same* pool rooted at the
/// matched node; nothing is copied. Inserting through either handle is
/// visible through the other:
///
/// ```
/// use chartrie::Trie;
///
/// let tree = Trie::from([("cane", 1), ("cavia", 2)]);
/// let mut sub = tree.find_by_prefix("ca");
///
/// sub.insert("vallo", 3);
/// assert_eq!(*tree.get("cavallo").unwrap(), 3);
/// ```
///
/// Handles are reference counted without atomics, so a [Trie] can not leave
/// the thread that built it.
pub struct Trie<V> {
    /// The node pool. Shared by every handle produced from the same tree.
    node: Rc<RefCell<Slots<V>>>,
    /// The node this handle starts searching from.
    root: NodeIndex,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    /// Creates a new [Trie] with no keys and records.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let tree = Trie::<&str>::new();
    /// assert_eq!(tree.size(), 0);
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
    /// Creates a new [Trie] whose node pool has room for `nodes` nodes
    /// before reallocating. Each distinct character position of a key
    /// takes one node.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let tree = Trie::<usize>::with_capacity(20);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 20);
    /// ```
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            node: Rc::new(RefCell::new(Slots::with_capacity(nodes))),
            root: NodeIndex::ROOT,
        }
    }
    /// How many nodes the shared pool can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.node.borrow().capacity()
    }

    /// Gets the value stored under `key`.
    ///
    /// A key whose path exists but only as a prefix of longer keys is
    /// reported exactly like a key whose path does not exist at all.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let mut tree = Trie::new();
    /// tree.insert("hello", "world");
    /// assert_eq!(*tree.get("hello").unwrap(), "world");
    ///
    /// assert!(tree.get("hell").is_err());
    /// assert!(tree.get("help").is_err());
    /// ```
    ///
    /// The returned guard borrows the whole node pool; drop it before
    /// inserting through any handle on the same tree.
    ///
    /// # Panics
    /// If a [RefMut] from [Trie::get_mut] on this tree is still alive.
    pub fn get(&self, key: &str) -> Result<Ref<'_, V>, NotFoundError> {
        let root = self.root;
        Ref::filter_map(self.node.borrow(), |slots| {
            let found = slots.descend(root, key.chars())?;
            slots[found].value().as_ref()
        })
        .map_err(|_| NotFoundError::new(key))
    }
    /// Gets a copy of the value stored under `key`. See [Trie::get].
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let tree = Trie::from([("key", String::from("value"))]);
    /// assert_eq!(tree.get_cloned("key").unwrap(), "value");
    /// ```
    pub fn get_cloned(&self, key: &str) -> Result<V, NotFoundError>
    where
        V: Clone,
    {
        self.get(key).map(|value| (*value).clone())
    }
    /// Gets a mutable reference to the value stored under `key`.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let mut tree = Trie::new();
    /// tree.insert("hello", 1);
    ///
    /// *tree.get_mut("hello").unwrap() += 1;
    /// assert_eq!(*tree.get("hello").unwrap(), 2);
    /// ```
    ///
    /// # Panics
    /// If any reference obtained from this tree, or a handle sharing its
    /// pool, is still alive.
    pub fn get_mut(&mut self, key: &str) -> Result<RefMut<'_, V>, NotFoundError> {
        let root = self.root;
        RefMut::filter_map(self.node.borrow_mut(), |slots| {
            let found = slots.descend(root, key.chars())?;
            slots[found].value_mut().as_mut()
        })
        .map_err(|_| NotFoundError::new(key))
    }
    /// Checks if the [Trie] holds a value for `key`. This operation
    /// occurs in the same time as [Trie::get].
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_ok()
    }

    /// Puts a new record in the [Trie], returning the old value
    /// if there previously was a value present.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let mut tree = Trie::new();
    /// assert_eq!(tree.insert("hello", 1), None);
    ///
    /// // Verify the key replacement.
    /// assert_eq!(tree.insert("hello", 2), Some(1));
    /// assert_eq!(*tree.get("hello").unwrap(), 2);
    /// ```
    ///
    /// # Panics
    /// If any reference obtained from this tree, or a handle sharing its
    /// pool, is still alive.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let mut slots = self.node.borrow_mut();
        let before = slots.len();
        let previous = slots.insert(self.root, key.chars(), value);
        if previous.is_some() {
            trace!(key, "replaced existing value");
        } else {
            trace!(key, nodes = slots.len() - before, "inserted new key");
        }
        previous
    }

    /// Returns the part of the tree below `prefix`.
    ///
    /// The result shares its nodes with this tree (see the type level
    /// documentation); it is a view, not a snapshot. Keys in the result are
    /// relative to `prefix`. When no key starts with `prefix` the result is
    /// a new, empty and independent [Trie].
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let tree = Trie::from([("cane", 1), ("cavia", 2), ("albero", 3)]);
    ///
    /// let sub = tree.find_by_prefix("ca");
    /// assert_eq!(sub.enumerate(), vec![1, 2]);
    /// assert_eq!(*sub.get("via").unwrap(), 2);
    ///
    /// assert!(tree.find_by_prefix("zz").is_empty());
    /// ```
    pub fn find_by_prefix(&self, prefix: &str) -> Trie<V> {
        let found = self.node.borrow().descend(self.root, prefix.chars());
        match found {
            Some(root) => Trie {
                node: Rc::clone(&self.node),
                root,
            },
            None => {
                debug!(prefix, "no key starts with prefix");
                Trie::new()
            }
        }
    }
    /// Gets all the keys starting with `prefix`, in enumeration order.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let tree = Trie::from([("hello", ()), ("hey", ()), ("bye", ())]);
    ///
    /// assert_eq!(tree.completions("he"), vec!["hello", "hey"]);
    /// assert!(tree.completions("x").is_empty());
    /// ```
    pub fn completions(&self, prefix: &str) -> Vec<String> {
        let slots = self.node.borrow();
        let Some(start) = slots.descend(self.root, prefix.chars()) else {
            return vec![];
        };

        let mut key = prefix.to_string();
        let mut found = vec![];
        slots.collect_entries(start, &mut key, &mut found);
        found.into_iter().map(|(key, _)| key).collect()
    }

    /// Returns the amount of records within the [Trie]. This walks the whole
    /// tree, since records may be added through other handles.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let mut tree = Trie::new();
    /// tree.insert("hello", "world");
    /// tree.insert("hello", "again");
    /// assert_eq!(tree.size(), 1);
    /// ```
    pub fn size(&self) -> usize {
        let mut count = 0;
        self.for_each_value(|_| count += 1);
        count
    }
    /// Alias of [Trie::size].
    pub fn len(&self) -> usize {
        self.size()
    }
    /// Returns true if the [Trie] holds no records.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Calls `visit` with every value, in enumeration order: the value of a
    /// node comes before those below it and children are visited in
    /// ascending character order.
    ///
    /// # Panics
    /// If `visit` inserts through this tree or a handle sharing its pool.
    pub fn for_each_value<F>(&self, mut visit: F)
    where
        F: FnMut(&V),
    {
        let slots = self.node.borrow();
        let mut values = vec![];
        slots.collect(self.root, &mut values);
        for value in values {
            visit(value);
        }
    }
    /// Returns copies of every value, in enumeration order.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let tree = Trie::from([("b", 2), ("a", 1), ("ab", 3)]);
    /// assert_eq!(tree.enumerate(), vec![1, 3, 2]);
    /// ```
    pub fn enumerate(&self) -> Vec<V>
    where
        V: Clone,
    {
        let mut values = Vec::new();
        self.for_each_value(|value| values.push(value.clone()));
        values
    }
    /// Returns every key with a copy of its value, in enumeration order.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let tree = Trie::from([("bye", 2), ("hello", 1)]);
    /// assert_eq!(
    ///     tree.entries(),
    ///     vec![("bye".to_string(), 2), ("hello".to_string(), 1)]
    /// );
    /// ```
    pub fn entries(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        let slots = self.node.borrow();
        let mut entries = vec![];
        slots.collect_entries(self.root, &mut String::new(), &mut entries);
        entries
            .into_iter()
            .map(|(key, value)| (key, value.clone()))
            .collect()
    }
    /// Returns every key, in enumeration order.
    pub fn keys(&self) -> Vec<String> {
        self.completions("")
    }
    /// Consumes the handle, returning its values in enumeration order. The
    /// values are moved out when this is the last handle on the tree and
    /// cloned otherwise.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let tree = Trie::from([("hello", 1), ("bye", 2)]);
    ///
    /// let mut values = tree.into_values();
    /// assert_eq!(values.next(), Some(2));
    /// assert_eq!(values.next(), Some(1));
    /// assert_eq!(values.next(), None);
    /// ```
    pub fn into_values(self) -> IntoValues<V>
    where
        V: Clone,
    {
        let root = self.root;
        let values = match Rc::try_unwrap(self.node) {
            Ok(cell) => {
                let mut slots = cell.into_inner();
                let mut values = vec![];
                slots.take_values(root, &mut values);
                values
            }
            Err(shared) => {
                let slots = shared.borrow();
                let mut values = vec![];
                slots.collect(root, &mut values);
                values.into_iter().cloned().collect()
            }
        };
        IntoValues::new(values)
    }

    /// Checks if two handles start from the same node of the same tree.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let tree = Trie::from([("cane", 1)]);
    /// assert!(tree.find_by_prefix("").shares_root_with(&tree));
    /// assert!(!tree.find_by_prefix("c").shares_root_with(&tree));
    /// ```
    pub fn shares_root_with(&self, other: &Trie<V>) -> bool {
        Rc::ptr_eq(&self.node, &other.node) && self.root == other.root
    }
}

impl<V> IntoIterator for Trie<V>
where
    V: Clone,
{
    type Item = V;
    type IntoIter = IntoValues<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_values()
    }
}

impl<V> Display for Trie<V>
where
    V: Display,
{
    /// Renders the values in enumeration order as a bracketed,
    /// comma-separated list.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let tree = Trie::from([("cavia", "_cavia_"), ("cane", "_cane_")]);
    /// assert_eq!(tree.to_string(), "[_cane_, _cavia_]");
    /// assert_eq!(Trie::<u8>::new().to_string(), "[]");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut result = write!(f, "[");
        let mut first = true;
        self.for_each_value(|value| {
            if result.is_err() {
                return;
            }
            result = if first {
                write!(f, "{value}")
            } else {
                write!(f, ", {value}")
            };
            first = false;
        });
        result?;
        write!(f, "]")
    }
}

impl<V> Debug for Trie<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.node.borrow();
        let mut entries = vec![];
        slots.collect_entries(self.root, &mut String::new(), &mut entries);
        f.debug_map().entries(entries).finish()
    }
}

impl<K, V> Extend<(K, V)> for Trie<V>
where
    K: AsRef<str>,
{
    /// Extends a [Trie] from an iterator of key and value tuples.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let mut tree: Trie<&str> = Trie::new();
    /// tree.extend([("hello", "world")]);
    ///
    /// assert_eq!(*tree.get("hello").unwrap(), "world");
    /// ```
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Trie<V>
where
    K: AsRef<str>,
{
    /// Creates a [Trie] from an iterator of key and value tuples.
    ///
    /// ```
    /// use chartrie::Trie;
    ///
    /// let tree: Trie<usize> = vec![(String::from("hello"), 4)].into_iter().collect();
    ///
    /// assert_eq!(tree.size(), 1);
    /// assert_eq!(*tree.get("hello").unwrap(), 4);
    /// ```
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Trie::new();
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Trie<V>
where
    K: AsRef<str>,
{
    /// Creates a [Trie] from an array of key and value tuples.
    fn from(arr: [(K, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

#[cfg(feature = "arbitrary")]
impl<'a, V> arbitrary::Arbitrary<'a> for Trie<V>
where
    V: arbitrary::Arbitrary<'a>,
{
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let entries = u.arbitrary::<Vec<(String, V)>>()?;
        Ok(entries.into_iter().collect())
    }
}
