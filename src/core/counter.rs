//! Token frequency counter with deterministic top-N extraction.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Counts occurrences of string tokens.
///
/// Backed by an insertion-ordered map, so [`top_n`](Self::top_n) breaks ties
/// by first insertion instead of by hash order.
///
/// # Example
///
/// ```
/// use chatpulse::core::counter::FrequencyCounter;
///
/// let mut counter = FrequencyCounter::new();
/// counter.add("rust");
/// counter.add("python");
/// counter.add_n("rust", 2);
///
/// let top = counter.top_n(1);
/// assert_eq!(top.get("rust"), Some(&3));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyCounter {
    counts: IndexMap<String, u64>,
}

impl FrequencyCounter {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments `token` by one.
    pub fn add(&mut self, token: &str) {
        self.add_n(token, 1);
    }

    /// Increments `token` by `n`. A zero increment does not insert the token.
    pub fn add_n(&mut self, token: &str, n: u64) {
        if n == 0 {
            return;
        }
        if let Some(count) = self.counts.get_mut(token) {
            *count += n;
        } else {
            self.counts.insert(token.to_string(), n);
        }
    }

    /// Returns the count for `token` (zero when absent).
    pub fn get(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterates over `(token, count)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns the `n` most frequent tokens, by descending count.
    ///
    /// Ties keep first-insertion order (the sort is stable).
    pub fn top_n(&self, n: usize) -> IndexMap<String, u64> {
        let mut entries: Vec<(&String, &u64)> = self.counts.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1));
        entries
            .into_iter()
            .take(n)
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    /// Adds every count of `other` into `self`.
    ///
    /// Tokens new to `self` are appended in `other`'s insertion order.
    pub fn merge(&mut self, other: &FrequencyCounter) {
        for (token, count) in &other.counts {
            self.add_n(token, *count);
        }
    }

    /// Consumes the counter, returning the underlying map.
    pub fn into_inner(self) -> IndexMap<String, u64> {
        self.counts
    }
}

impl<'a> FromIterator<&'a str> for FrequencyCounter {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counter = Self::new();
        for token in iter {
            counter.add(token);
        }
        counter
    }
}
