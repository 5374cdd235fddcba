//! The ordered list of key/value pairs extracted from an incoming request.
use std::fmt;

/// A single `key=value` pair, plus a flag to track whether it has already been
/// decoded into a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterPair {
    key: String,
    value: String,
    consumed: bool,
}

impl ParameterPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            consumed: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// `true` if the pair has already been decoded into a value.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// The parameters of a request, in the order they were received.
///
/// The order is load-bearing: it's used to tell where one list element ends
/// and the next one begins.
/// When built from a request (see [`ParameterStream::from_request`]), query
/// parameters come first, followed by the body parameters and, last, by the
/// path parameters.
///
/// Every pair can be consumed at most once.
/// Decoding several parameters against the same stream makes the pairs claimed
/// by earlier parameters invisible to later ones.
///
/// [`ParameterStream::from_request`]: crate::stream::ParameterStream::from_request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterStream {
    pairs: Vec<ParameterPair>,
}

impl ParameterStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair at the end of the stream.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push(ParameterPair::new(key, value));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over all pairs, consumed or not, in stream order.
    pub fn iter(&self) -> std::slice::Iter<'_, ParameterPair> {
        self.pairs.iter()
    }

    /// Iterate over the pairs that haven't been decoded yet.
    pub fn unconsumed(&self) -> impl Iterator<Item = &ParameterPair> {
        self.pairs.iter().filter(|pair| !pair.consumed)
    }

    /// The pair at `position`, if the stream is long enough.
    pub fn peek(&self, position: usize) -> Option<&ParameterPair> {
        self.pairs.get(position)
    }

    /// Mark the pair at `position` as consumed and return its value.
    ///
    /// A pair can't be un-consumed.
    pub fn mark_consumed(&mut self, position: usize) -> Option<&str> {
        let pair = self.pairs.get_mut(position)?;
        debug_assert!(!pair.consumed, "`{}` was consumed twice", pair.key);
        pair.consumed = true;
        Some(&pair.value)
    }

    /// The position that follows `position` in the scan order.
    pub fn position_after(&self, position: usize) -> usize {
        position + 1
    }

    /// The position of the first unconsumed pair whose key is exactly `key`,
    /// scanning from `offset` onward.
    pub fn find_unconsumed(&self, key: &str, offset: usize) -> Option<usize> {
        self.pairs
            .iter()
            .enumerate()
            .skip(offset)
            .find(|(_, pair)| !pair.consumed && pair.key == key)
            .map(|(position, _)| position)
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterStream
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut stream = ParameterStream::new();
        stream.extend(iter);
        stream
    }
}

impl<K, V> Extend<(K, V)> for ParameterStream
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.pairs
            .extend(iter.into_iter().map(|(k, v)| ParameterPair::new(k, v)));
    }
}

impl<'a> IntoIterator for &'a ParameterStream {
    type Item = &'a ParameterPair;
    type IntoIter = std::slice::Iter<'a, ParameterPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ParameterPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}
