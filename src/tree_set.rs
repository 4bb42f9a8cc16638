//! TreeSet: a `TreeMap` whose values equal their keys.

use crate::error::CollectionError;
use crate::tree_map::{Comparator, TreeMap};
use crate::value::Value;
use core::fmt;
use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;

#[derive(Clone)]
pub struct TreeSet<S = RandomState> {
    elements: TreeMap<Value, S>,
}

impl TreeSet {
    pub fn new() -> Self {
        Self {
            elements: TreeMap::new(),
        }
    }

    pub fn with_comparator(comparator: impl Comparator + 'static) -> Self {
        Self {
            elements: TreeMap::with_comparator(comparator),
        }
    }
}

impl Default for TreeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BuildHasher> TreeSet<S> {
    pub fn comparator(&self) -> Option<&dyn Comparator> {
        self.elements.comparator()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns whether the element was newly added. Fails, leaving the set
    /// unchanged, if the comparator cannot order the element.
    pub fn add(&mut self, element: impl Into<Value>) -> Result<bool, CollectionError> {
        let element = element.into();
        let existed = self.elements.contains_key(&element);
        self.elements.put(element.clone(), element)?;
        Ok(!existed)
    }

    pub fn contains(&self, element: &Value) -> bool {
        self.elements.contains_key(element)
    }

    pub fn remove(&mut self, element: &Value) -> bool {
        self.elements.remove(element).is_some()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn first(&self) -> Result<Value, CollectionError> {
        self.elements.first_key().cloned()
    }

    pub fn last(&self) -> Result<Value, CollectionError> {
        self.elements.last_key().cloned()
    }

    /// Elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        self.elements.values()
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }
}

impl<K: Into<Value>> FromIterator<K> for TreeSet {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            elements: iter
                .into_iter()
                .map(|e| {
                    let e = e.into();
                    (e.clone(), e)
                })
                .collect(),
        }
    }
}

impl<S: BuildHasher> fmt::Debug for TreeSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
