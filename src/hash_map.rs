//! HashMap: map over arbitrary `Value` keys, indexed by hash token.
//!
//! Entries live in a `SlotMap`; a `HashTable` of slot keys indexes them by
//! the bucket hash of their token. Each entry stores its token, the
//! original key (for reverse recovery) and a precomputed bucket hash, so
//! rehashing never recomputes tokens.

use crate::error::CollectionError;
use crate::hashing::{hash_key, HashToken};
use crate::value::Value;
use core::fmt;
use core::hash::BuildHasher;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

#[derive(Clone, Debug)]
struct Entry<V> {
    token: HashToken,
    key: Value,
    value: V,
    hash: u64,
}

#[derive(Clone)]
pub struct HashMap<V, S = RandomState> {
    hasher: S,
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Entry<V>>,
}

impl<V> HashMap<V> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<V> Default for HashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(token, key, value)` triples.
pub struct Iter<'a, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a HashToken, &'a Value, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.token, &e.key, &e.value))
    }
}

/// Iterator over `(key, value)` pairs with mutable values.
pub struct IterMut<'a, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a Value, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &mut e.value))
    }
}

impl<V, S> HashMap<V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::new(),
            slots: SlotMap::with_key(),
        }
    }

    fn make_hash(&self, token: &HashToken) -> u64 {
        self.hasher.hash_one(token)
    }

    fn find(&self, token: &HashToken) -> Option<DefaultKey> {
        let hash = self.make_hash(token);
        self.index
            .find(hash, |&k| {
                self.slots
                    .get(k)
                    .map(|e| &e.token == token)
                    .unwrap_or(false)
            })
            .copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Store `value` under `key`, returning the value it replaces.
    ///
    /// On replacement the stored original key is also replaced, so `key()`
    /// recovers the most recently put key for the token.
    pub fn put(&mut self, key: impl Into<Value>, value: V) -> Option<V> {
        self.put_entry(key.into(), value).map(|(_, v)| v)
    }

    /// `put` that hands back both the replaced key and value.
    pub(crate) fn put_entry(&mut self, key: Value, value: V) -> Option<(Value, V)> {
        let token = hash_key(&key);
        let hash = self.make_hash(&token);
        match self.index.entry(
            hash,
            |&kk| {
                self.slots
                    .get(kk)
                    .map(|e| e.token == token)
                    .unwrap_or(false)
            },
            |&kk| self.slots.get(kk).map(|e| e.hash).unwrap_or(0),
        ) {
            hashbrown::hash_table::Entry::Occupied(o) => {
                let e = self.slots.get_mut(*o.get())?;
                let old_key = core::mem::replace(&mut e.key, key);
                let old_value = core::mem::replace(&mut e.value, value);
                Some((old_key, old_value))
            }
            hashbrown::hash_table::Entry::Vacant(v) => {
                let k = self.slots.insert(Entry {
                    token,
                    key,
                    value,
                    hash,
                });
                let _ = v.insert(k);
                None
            }
        }
    }

    pub fn put_all(&mut self, other: &HashMap<V, S>)
    where
        V: Clone,
    {
        for (_, k, v) in other.iter() {
            self.put(k.clone(), v.clone());
        }
    }

    pub fn get(&self, key: &Value) -> Option<&V> {
        self.get_by_token(&hash_key(key))
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut V> {
        let k = self.find(&hash_key(key))?;
        self.slots.get_mut(k).map(|e| &mut e.value)
    }

    pub fn get_by_token(&self, token: &HashToken) -> Option<&V> {
        let k = self.find(token)?;
        self.slots.get(k).map(|e| &e.value)
    }

    /// Recover the original key stored under `token`.
    pub fn key(&self, token: &HashToken) -> Result<&Value, CollectionError> {
        self.find(token)
            .and_then(|k| self.slots.get(k))
            .map(|e| &e.key)
            .ok_or_else(|| CollectionError::KeyNotFound {
                token: token.clone(),
            })
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.contains_token(&hash_key(key))
    }

    pub fn contains_token(&self, token: &HashToken) -> bool {
        self.find(token).is_some()
    }

    pub fn contains_keys<'a, I>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = &'a Value>,
    {
        keys.into_iter().all(|k| self.contains_key(k))
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.slots.values().any(|e| &e.value == value)
    }

    pub fn contains_values<'a, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a V>,
        V: PartialEq + 'a,
    {
        values.into_iter().all(|v| self.contains_value(v))
    }

    pub fn remove(&mut self, key: &Value) -> Option<V> {
        self.remove_token(&hash_key(key)).map(|(_, v)| v)
    }

    pub(crate) fn remove_token(&mut self, token: &HashToken) -> Option<(Value, V)> {
        let k = self.find(token)?;
        let entry = self.slots.remove(k)?;
        if let Ok(o) = self.index.find_entry(entry.hash, |&kk| kk == k) {
            o.remove();
        }
        Some((entry.key, entry.value))
    }

    pub fn remove_all<'a, I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = &'a Value>,
    {
        for k in keys {
            self.remove(k);
        }
    }

    pub fn clear(&mut self) {
        tracing::debug!(entries = self.slots.len(), "clearing map");
        self.index.clear();
        self.slots.clear();
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    pub fn tokens(&self) -> impl Iterator<Item = &HashToken> + '_ {
        self.slots.values().map(|e| &e.token)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> + '_ {
        self.slots.values().map(|e| &e.key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.slots.values().map(|e| &e.value)
    }
}

impl<K: Into<Value>, V> FromIterator<(K, V)> for HashMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = HashMap::new();
        m.extend(iter);
        m
    }
}

impl<K: Into<Value>, V, S: BuildHasher> Extend<(K, V)> for HashMap<V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<V: fmt::Debug, S> fmt::Debug for HashMap<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.values().map(|e| (&e.key, &e.value)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::Hasher;
    use std::collections::BTreeSet;

    /// Invariant: after `put(k, v)`, `get(k) == v`; absent keys yield `None`.
    #[test]
    fn put_then_get() {
        let mut m: HashMap<i32> = HashMap::new();
        assert_eq!(m.put("a", 1), None);
        assert_eq!(m.put(2, 20), None);
        assert_eq!(m.get(&Value::from("a")), Some(&1));
        assert_eq!(m.get(&Value::Int(2)), Some(&20));
        assert_eq!(m.get(&Value::from("missing")), None);
        assert_eq!(m.len(), 2);
    }

    /// Invariant: putting an existing key replaces the value and the stored
    /// key without adding an entry.
    #[test]
    fn put_replaces_in_place() {
        let mut m: HashMap<&str> = HashMap::new();
        m.put("k", "one");
        assert_eq!(m.put("k", "two"), Some("one"));
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(&"k".into()), Some(&"two"));
    }

    /// Invariant: `key(token)` recovers the original key for every stored token
    /// and fails with KeyNotFound for unknown tokens.
    #[test]
    fn reverse_lookup() {
        let obj = Value::object("payload");
        let mut m: HashMap<u8> = HashMap::new();
        m.put(obj.clone(), 1);
        m.put(vec![2, 1], 2);
        m.put(Value::Null, 3);

        let tokens: Vec<HashToken> = m.tokens().cloned().collect();
        assert_eq!(tokens.len(), 3);
        for t in &tokens {
            let k = m.key(t).unwrap();
            assert_eq!(m.get(k), m.get_by_token(t));
        }
        assert_eq!(m.key(&hash_key(&obj)), Ok(&obj));

        let err = m.key(&HashToken::Str("nope".into())).unwrap_err();
        assert!(err.is_not_found());
    }

    /// Invariant: removal detaches both the value and the reverse key.
    #[test]
    fn remove_and_reinsert() {
        let mut m: HashMap<i32> = HashMap::new();
        m.put("k", 1);
        assert_eq!(m.remove(&"k".into()), Some(1));
        assert!(!m.contains_key(&"k".into()));
        assert!(m.key(&HashToken::Str("k".into())).is_err());
        assert_eq!(m.remove(&"k".into()), None);
        m.put("k", 2);
        assert_eq!(m.get(&"k".into()), Some(&2));
    }

    /// Invariant: a clone is independent of its source.
    #[test]
    fn clone_does_not_alias() {
        let mut a: HashMap<i32> = [("x", 1), ("y", 2)].into_iter().collect();
        let b = a.clone();
        a.put("x", 10);
        a.remove(&"y".into());
        assert_eq!(b.get(&"x".into()), Some(&1));
        assert_eq!(b.get(&"y".into()), Some(&2));
    }

    #[test]
    fn value_queries_and_bulk_ops() {
        let mut m: HashMap<i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert!(m.contains_value(&2));
        assert!(!m.contains_value(&9));
        assert!(m.contains_values([&1, &3]));
        let keys = [Value::from("a"), Value::from("b")];
        assert!(m.contains_keys(keys.iter()));
        m.remove_all(keys.iter());
        assert_eq!(m.len(), 1);
        for (_, v) in m.iter_mut() {
            *v *= 10;
        }
        assert_eq!(m.values().copied().collect::<Vec<_>>(), vec![30]);
        m.clear();
        assert!(m.is_empty());
    }

    /// Invariant: lookups stay exact under total bucket collisions.
    #[test]
    fn collision_handling_with_const_hasher() {
        #[derive(Clone, Default)]
        struct ConstBuildHasher;
        struct ConstHasher;
        impl BuildHasher for ConstBuildHasher {
            type Hasher = ConstHasher;
            fn build_hasher(&self) -> Self::Hasher {
                ConstHasher
            }
        }
        impl Hasher for ConstHasher {
            fn write(&mut self, _bytes: &[u8]) {}
            fn finish(&self) -> u64 {
                0
            }
        }

        let mut m: HashMap<i32, ConstBuildHasher> = HashMap::with_hasher(ConstBuildHasher);
        for i in 0..16 {
            m.put(i64::from(i), i);
        }
        m.remove(&Value::Int(3));
        let seen: BTreeSet<i32> = m.values().copied().collect();
        assert_eq!(seen.len(), 15);
        assert!(!seen.contains(&3));
        assert_eq!(m.get(&Value::Int(7)), Some(&7));
    }
}
