//! HashSet: a `HashMap` whose keys are the elements.

use crate::hash_map::HashMap;
use crate::hashing::HashToken;
use crate::value::Value;
use core::fmt;
use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;

#[derive(Clone)]
pub struct HashSet<S = RandomState> {
    elements: HashMap<(), S>,
}

impl HashSet {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl Default for HashSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BuildHasher> HashSet<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            elements: HashMap::with_hasher(hasher),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns whether the element was newly added.
    pub fn add(&mut self, element: impl Into<Value>) -> bool {
        self.elements.put(element, ()).is_none()
    }

    pub fn contains(&self, element: &Value) -> bool {
        self.elements.contains_key(element)
    }

    pub fn remove(&mut self, element: &Value) -> bool {
        self.elements.remove(element).is_some()
    }

    pub fn remove_all(&mut self, elements: &[Value]) {
        self.elements.remove_all(elements);
    }

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

    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        self.elements.keys()
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }
}

impl<K: Into<Value>> FromIterator<K> for HashSet {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = HashSet::new();
        for e in iter {
            set.add(e);
        }
        set
    }
}

impl<S: BuildHasher> fmt::Debug for HashSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: adding an equal element twice stores it once; identity
    /// objects are distinct even when their payloads match.
    #[test]
    fn add_deduplicates() {
        let mut s = HashSet::new();
        assert!(s.add("a"));
        assert!(!s.add("a"));
        assert!(s.add(Value::object(1)));
        assert!(s.add(Value::object(1)));
        assert_eq!(s.len(), 3);
    }

    /// Invariant: retain_all keeps exactly the intersection.
    #[test]
    fn retain_and_remove_all() {
        let mut s: HashSet = [1, 2, 3, 4].into_iter().collect();
        s.retain_all(&[Value::Int(2), Value::Int(3), Value::Int(9)]);
        let mut left = s.to_vec();
        left.sort();
        assert_eq!(left, vec![Value::Int(2), Value::Int(3)]);
        s.remove_all(&[Value::Int(2)]);
        assert!(!s.contains(&Value::Int(2)));
        assert!(s.remove(&Value::Int(3)));
        assert!(s.is_empty());
    }
}
