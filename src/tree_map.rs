//! TreeMap: a `HashMap` that keeps its keys in a total order.
//!
//! The order is a sequence of hash tokens rebuilt after every `put`:
//! - without a comparator, naturally comparable keys (booleans, numbers,
//!   strings, temporals, ordered objects) are sorted by `Value::natural_cmp`
//!   and placed ahead of all other keys, which keep their existing relative
//!   order;
//! - with a comparator, every key is sorted by the comparator alone.
//!
//! Removal never reorders, so it does not consult the comparator.

use crate::error::CollectionError;
use crate::hash_map::HashMap;
use crate::hashing::{hash_key, HashToken};
use crate::value::Value;
use core::cmp::Ordering;
use core::convert::Infallible;
use core::fmt;
use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;
use std::rc::Rc;

/// Three-way comparison over keys. May refuse to order a pair, in which
/// case the error propagates out of the operation that asked.
pub trait Comparator {
    fn compare(&self, a: &Value, b: &Value) -> Result<Ordering, CollectionError>;
}

impl<F> Comparator for F
where
    F: Fn(&Value, &Value) -> Ordering,
{
    fn compare(&self, a: &Value, b: &Value) -> Result<Ordering, CollectionError> {
        Ok(self(a, b))
    }
}

/// Natural ordering that fails with `Incomparable` instead of deferring
/// keys without a natural order.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrictNatural;

impl Comparator for StrictNatural {
    fn compare(&self, a: &Value, b: &Value) -> Result<Ordering, CollectionError> {
        a.natural_cmp(b).ok_or_else(|| CollectionError::Incomparable {
            left: a.to_string(),
            right: b.to_string(),
        })
    }
}

#[derive(Clone)]
pub struct TreeMap<V, S = RandomState> {
    map: HashMap<V, S>,
    order: Vec<HashToken>,
    comparator: Option<Rc<dyn Comparator>>,
}

impl<V> TreeMap<V> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_comparator(comparator: impl Comparator + 'static) -> Self {
        let mut m = Self::new();
        m.comparator = Some(Rc::new(comparator));
        m
    }

    /// Sorted copy of `map` under natural ordering.
    pub fn from_map(map: &HashMap<V>) -> Self
    where
        V: Clone,
    {
        let mut m = Self {
            map: map.clone(),
            order: map.tokens().cloned().collect(),
            comparator: None,
        };
        m.reorder_natural();
        m
    }
}

impl<V> Default for TreeMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> TreeMap<V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            map: HashMap::with_hasher(hasher),
            order: Vec::new(),
            comparator: None,
        }
    }

    pub fn comparator(&self) -> Option<&dyn Comparator> {
        self.comparator.as_deref()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Store `value` under `key` and rebuild the key order.
    ///
    /// If the comparator fails, the map is restored to its state before the
    /// call and the comparator's error is returned.
    pub fn put(&mut self, key: impl Into<Value>, value: V) -> Result<Option<V>, CollectionError> {
        let key = key.into();
        let token = hash_key(&key);
        let saved_order = self.comparator.as_ref().map(|_| self.order.clone());
        let replaced = self.map.put_entry(key, value);
        if replaced.is_none() {
            self.order.push(token.clone());
        }

        match self.reorder() {
            Ok(()) => Ok(replaced.map(|(_, v)| v)),
            Err(e) => {
                tracing::warn!(error = %e, "comparator failed; rolling back put");
                match replaced {
                    Some((k, v)) => {
                        self.map.put_entry(k, v);
                    }
                    None => {
                        self.map.remove_token(&token);
                    }
                }
                if let Some(order) = saved_order {
                    self.order = order;
                }
                Err(e)
            }
        }
    }

    pub fn put_all(&mut self, other: &HashMap<V, S>) -> Result<(), CollectionError>
    where
        V: Clone,
    {
        for (_, k, v) in other.iter() {
            self.put(k.clone(), v.clone())?;
        }
        Ok(())
    }

    pub fn get(&self, key: &Value) -> Option<&V> {
        self.map.get(key)
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut V> {
        self.map.get_mut(key)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.map.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.map.contains_value(value)
    }

    pub fn key(&self, token: &HashToken) -> Result<&Value, CollectionError> {
        self.map.key(token)
    }

    pub fn remove(&mut self, key: &Value) -> Option<V> {
        let token = hash_key(key);
        let (_, v) = self.map.remove_token(&token)?;
        self.order.retain(|t| t != &token);
        Some(v)
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    /// Lowest key in the current order.
    pub fn first_key(&self) -> Result<&Value, CollectionError> {
        let token = self.order.first().ok_or(CollectionError::Underflow)?;
        self.map.key(token)
    }

    /// Highest key in the current order.
    pub fn last_key(&self) -> Result<&Value, CollectionError> {
        let token = self.order.last().ok_or(CollectionError::Underflow)?;
        self.map.key(token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &HashToken> + '_ {
        self.order.iter()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &V)> + '_ {
        self.order.iter().filter_map(move |t| {
            let k = self.map.key(t).ok()?;
            let v = self.map.get_by_token(t)?;
            Some((k, v))
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    fn reorder(&mut self) -> Result<(), CollectionError> {
        let Some(comparator) = self.comparator.clone() else {
            self.reorder_natural();
            return Ok(());
        };
        let order = core::mem::take(&mut self.order);
        let map = &self.map;
        let sorted = try_merge_sort(order.clone(), &mut |a: &HashToken, b: &HashToken| {
            comparator.compare(map.key(a)?, map.key(b)?)
        });
        match sorted {
            Ok(sorted) => {
                self.order = sorted;
                tracing::trace!(keys = self.order.len(), "reordered by comparator");
                Ok(())
            }
            Err(e) => {
                self.order = order;
                Err(e)
            }
        }
    }

    fn reorder_natural(&mut self) {
        let map = &self.map;
        let (comparable, other): (Vec<HashToken>, Vec<HashToken>) =
            core::mem::take(&mut self.order).into_iter().partition(|t| {
                map.key(t)
                    .map(Value::is_naturally_comparable)
                    .unwrap_or(false)
            });
        let sorted = try_merge_sort(comparable, &mut |a: &HashToken, b: &HashToken| {
            Ok::<_, Infallible>(match (map.key(a), map.key(b)) {
                (Ok(ka), Ok(kb)) => ka.natural_cmp(kb).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            })
        });
        let mut comparable = match sorted {
            Ok(sorted) => sorted,
            Err(never) => match never {},
        };
        comparable.extend(other);
        self.order = comparable;
        tracing::trace!(keys = self.order.len(), "reordered naturally");
    }
}

/// Stable merge sort that stops at the first comparison error.
fn try_merge_sort<T, E, F>(mut items: Vec<T>, cmp: &mut F) -> Result<Vec<T>, E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = try_merge_sort(items, cmp)?;
    let right = try_merge_sort(right, cmp)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut l = left.into_iter().peekable();
    let mut r = right.into_iter().peekable();
    loop {
        let take_right = match (l.peek(), r.peek()) {
            (Some(a), Some(b)) => cmp(b, a)? == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { r.next() } else { l.next() };
        merged.extend(next);
    }
    Ok(merged)
}

impl<K: Into<Value>, V> FromIterator<(K, V)> for TreeMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = TreeMap::new();
        for (k, v) in iter {
            let key = k.into();
            let token = hash_key(&key);
            if m.map.put_entry(key, v).is_none() {
                m.order.push(token);
            }
        }
        m.reorder_natural();
        m
    }
}

impl<V: fmt::Debug, S: BuildHasher> fmt::Debug for TreeMap<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
