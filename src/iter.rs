/// An iterator created by consuming a [Trie](crate::Trie).
///
/// Yields the payloads in the same order as
/// [Trie::enumerate](crate::Trie::enumerate).
#[derive(Debug)]
pub struct IntoValues<V> {
    inner: std::vec::IntoIter<V>,
}

impl<V> IntoValues<V> {
    pub(crate) fn new(values: Vec<V>) -> Self {
        Self {
            inner: values.into_iter(),
        }
    }
}

impl<V> Iterator for IntoValues<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for IntoValues<V> {}
