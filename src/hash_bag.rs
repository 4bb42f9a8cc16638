//! HashBag: multiset over a `HashMap` of copy counts.
//!
//! A key is present exactly when its count is at least one; removing the
//! last copy removes the key. Counts saturate at `usize::MAX`.

use crate::hash_map::HashMap;
use crate::hashing::HashToken;
use crate::value::Value;
use core::fmt;
use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;

#[derive(Clone)]
pub struct HashBag<S = RandomState> {
    elements: HashMap<usize, S>,
}

impl HashBag {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl Default for HashBag {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BuildHasher> HashBag<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            elements: HashMap::with_hasher(hasher),
        }
    }

    /// Total number of copies, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.elements
            .values()
            .fold(0usize, |total, n| total.saturating_add(*n))
    }

    /// Number of distinct elements.
    pub fn unique_len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn add(&mut self, element: impl Into<Value>) {
        self.add_copies(element, 1);
    }

    /// Adding zero copies is a no-op.
    pub fn add_copies(&mut self, element: impl Into<Value>, copies: usize) {
        if copies == 0 {
            return;
        }
        let element = element.into();
        match self.elements.get_mut(&element) {
            Some(n) => {
                *n = n.checked_add(copies).unwrap_or_else(|| {
                    tracing::warn!(element = %element, "bag count saturated");
                    usize::MAX
                });
            }
            None => {
                self.elements.put(element, copies);
            }
        }
    }

    /// Set the count for `element`; zero removes it.
    pub fn set_copies(&mut self, element: impl Into<Value>, copies: usize) {
        let element = element.into();
        if copies == 0 {
            self.elements.remove(&element);
        } else {
            self.elements.put(element, copies);
        }
    }

    pub fn get_copies(&self, element: &Value) -> usize {
        self.elements.get(element).copied().unwrap_or(0)
    }

    pub fn contains(&self, element: &Value) -> bool {
        self.elements.contains_key(element)
    }

    /// Remove one copy. Returns whether the element was present.
    pub fn remove(&mut self, element: &Value) -> bool {
        self.remove_copies(element, 1) > 0
    }

    /// Remove up to `copies` copies, returning how many were removed.
    pub fn remove_copies(&mut self, element: &Value, copies: usize) -> usize {
        let Some(n) = self.elements.get_mut(element) else {
            return 0;
        };
        if copies < *n {
            *n -= copies;
            copies
        } else {
            self.elements.remove(element).unwrap_or(0)
        }
    }

    /// Remove every copy, returning how many there were.
    pub fn remove_all_copies(&mut self, element: &Value) -> usize {
        self.elements.remove(element).unwrap_or(0)
    }

    /// Remove every copy of each listed element.
    pub fn remove_all(&mut self, elements: &[Value]) {
        self.elements.remove_all(elements);
    }

    /// Keep only the listed elements, with all their copies.
    pub fn retain_all(&mut self, elements: &[Value]) {
        let keep: HashMap<()> = elements.iter().map(|e| (e.clone(), ())).collect();
        let doomed: Vec<HashToken> = self
            .elements
            .tokens()
            .filter(|t| !keep.contains_token(t))
            .cloned()
            .collect();
        for t in &doomed {
            self.elements.remove_token(t);
        }
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Distinct elements with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, usize)> + '_ {
        self.elements.iter().map(|(_, k, n)| (k, *n))
    }

    /// Every copy, grouped by element.
    pub fn to_vec(&self) -> Vec<Value> {
        self.iter()
            .flat_map(|(k, n)| core::iter::repeat(k.clone()).take(n))
            .collect()
    }
}

impl<K: Into<Value>> FromIterator<K> for HashBag {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut bag = HashBag::new();
        for e in iter {
            bag.add(e);
        }
        bag
    }
}

impl<S: BuildHasher> fmt::Debug for HashBag<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
