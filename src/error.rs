use thiserror::Error;

/// The one failure of a [Trie](crate::Trie) lookup.
///
/// It is returned both when the key's path leaves the tree and when the path
/// exists but ends on a node without a payload (a prefix of some other key).
/// The two cases are deliberately indistinguishable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("key `{key}` not found")]
pub struct NotFoundError {
    key: String,
}

impl NotFoundError {
    pub(crate) fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }
    /// The key that was looked up.
    pub fn key(&self) -> &str {
        &self.key
    }
}
