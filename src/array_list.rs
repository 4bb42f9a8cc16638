//! ArrayList: resizable list with live sub-list views.
//!
//! A list handle is either the root of a registry tree or a view created
//! with `sub_list`. Both are the same type and support the same
//! operations; mutating either side is reflected in the other before the
//! mutating call returns.
//!
//! Handles are single-threaded (`!Send`/`!Sync`). `Clone` produces an
//! independent root list, never another handle onto the same storage.

use crate::error::CollectionError;
use crate::view_registry::{Edit, NodeId, Registry};
use core::cell::RefCell;
use core::fmt;
use core::ops::Range;
use std::rc::Rc;

pub struct ArrayList<T> {
    registry: Rc<RefCell<Registry<T>>>,
    id: NodeId,
}

impl<T> ArrayList<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    fn from_vec(elements: Vec<T>) -> Self {
        let (registry, id) = Registry::with_root(elements);
        Self {
            registry: Rc::new(RefCell::new(registry)),
            id,
        }
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().len(self.id)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this handle is a view onto another list.
    pub fn is_view(&self) -> bool {
        self.registry.borrow().is_view(self.id)
    }

    /// The view's current `[from, to)` range in its parent; `None` for a
    /// root list.
    pub fn bounds(&self) -> Option<Range<usize>> {
        self.registry.borrow().bounds(self.id)
    }
}

impl<T: Clone> ArrayList<T> {
    fn submit(&mut self, edit: Edit<T>) -> Result<(), CollectionError> {
        self.registry.borrow_mut().submit(self.id, edit)
    }

    pub fn get(&self, index: usize) -> Result<T, CollectionError> {
        let registry = self.registry.borrow();
        let elements = registry.elements(self.id);
        elements
            .get(index)
            .cloned()
            .ok_or_else(|| CollectionError::out_of_range(index, elements.len()))
    }

    /// Replace the element at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, element: T) -> Result<T, CollectionError> {
        let previous = self.get(index)?;
        self.submit(Edit::Set {
            at: index,
            item: element,
        })?;
        Ok(previous)
    }

    /// Insert at `index`, shifting later elements right. `index == len()`
    /// appends.
    pub fn insert(&mut self, index: usize, element: T) -> Result<(), CollectionError> {
        self.submit(Edit::Insert {
            at: index,
            items: vec![element],
        })
    }

    pub fn insert_all<I>(&mut self, index: usize, elements: I) -> Result<(), CollectionError>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = elements.into_iter().collect();
        if items.is_empty() {
            let len = self.len();
            if index > len {
                return Err(CollectionError::out_of_range(index, len));
            }
            return Ok(());
        }
        self.submit(Edit::Insert { at: index, items })
    }

    pub fn add(&mut self, element: T) {
        let len = self.len();
        let appended = self.insert(len, element);
        debug_assert!(appended.is_ok(), "insert at len is in range");
    }

    pub fn add_all<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len();
        let appended = self.insert_all(len, elements);
        debug_assert!(appended.is_ok(), "insert at len is in range");
    }

    /// Remove and return the element at `index`, shifting later elements left.
    #[doc(alias = "drop")]
    pub fn remove_at(&mut self, index: usize) -> Result<T, CollectionError> {
        let removed = self.get(index)?;
        self.submit(Edit::Remove { at: index })?;
        Ok(removed)
    }

    /// Remove the first element equal to `element`. Returns whether one was
    /// found.
    pub fn remove(&mut self, element: &T) -> bool
    where
        T: PartialEq,
    {
        match self.index_of(element) {
            Some(i) => self.submit(Edit::Remove { at: i }).is_ok(),
            None => false,
        }
    }

    /// Remove every element that appears in `elements`.
    pub fn remove_all(&mut self, elements: &[T])
    where
        T: PartialEq,
    {
        self.retain_where(|e| !elements.contains(e));
    }

    /// Keep only the elements that appear in `elements`.
    pub fn retain_all(&mut self, elements: &[T])
    where
        T: PartialEq,
    {
        self.retain_where(|e| elements.contains(e));
    }

    fn retain_where<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mask: Vec<bool> = self
            .registry
            .borrow()
            .elements(self.id)
            .iter()
            .map(&mut keep)
            .collect();
        if mask.iter().all(|k| *k) {
            return;
        }
        let retained = self.submit(Edit::Retain { keep: mask });
        debug_assert!(retained.is_ok(), "retain never fails");
    }

    /// Remove every element. On a view, only the view's range is removed
    /// from the parent.
    pub fn clear(&mut self) {
        let cleared = self.submit(Edit::Clear);
        debug_assert!(cleared.is_ok(), "clear never fails");
    }

    pub fn contains(&self, element: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(element).is_some()
    }

    pub fn index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.registry
            .borrow()
            .elements(self.id)
            .iter()
            .position(|e| e == element)
    }

    pub fn last_index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.registry
            .borrow()
            .elements(self.id)
            .iter()
            .rposition(|e| e == element)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.registry.borrow().elements(self.id).to_vec()
    }

    /// Iterate over a snapshot of the current elements.
    pub fn iter(&self) -> std::vec::IntoIter<T> {
        self.to_vec().into_iter()
    }

    /// Live view of `[from, to)`. Fails with OutOfRange unless
    /// `from <= to <= len()`.
    #[doc(alias = "subView")]
    pub fn sub_list(&self, from: usize, to: usize) -> Result<ArrayList<T>, CollectionError> {
        let id = self.registry.borrow_mut().register_view(self.id, from, to)?;
        Ok(ArrayList {
            registry: Rc::clone(&self.registry),
            id,
        })
    }
}

impl<T> Drop for ArrayList<T> {
    fn drop(&mut self) {
        if let Ok(mut registry) = self.registry.try_borrow_mut() {
            registry.release(self.id);
        }
    }
}

impl<T> Default for ArrayList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ArrayList<T> {
    fn clone(&self) -> Self {
        Self::from_vec(self.to_vec())
    }
}

impl<T> From<Vec<T>> for ArrayList<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::from_vec(elements)
    }
}

impl<T> FromIterator<T> for ArrayList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone> IntoIterator for &ArrayList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone + PartialEq> PartialEq for ArrayList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.to_vec() == other.to_vec()
    }
}

impl<T: Clone + Eq> Eq for ArrayList<T> {}

impl<T: fmt::Debug> fmt::Debug for ArrayList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.registry.borrow().elements(self.id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(s: &str) -> ArrayList<char> {
        s.chars().collect()
    }

    fn text(l: &ArrayList<char>) -> String {
        l.iter().collect()
    }

    /// Invariant: `get(i)` succeeds for `i < len` and fails at `len`.
    #[test]
    fn index_bounds() {
        let mut l = list("abc");
        l.insert(3, 'd').unwrap();
        l.remove_at(0).unwrap();
        for i in 0..l.len() {
            assert!(l.get(i).is_ok());
        }
        assert_eq!(
            l.get(l.len()),
            Err(CollectionError::OutOfRange { index: 3, len: 3 })
        );
        assert!(l.insert(5, 'x').unwrap_err().is_out_of_range());
        assert!(l.set(3, 'x').is_err());
        assert_eq!(text(&l), "bcd");
    }

    /// Invariant: `set` returns the replaced element and views see the new one.
    #[test]
    fn set_through_view() {
        let l = list("abcd");
        let mut v = l.sub_list(1, 3).unwrap();
        assert_eq!(v.set(1, 'C'), Ok('c'));
        assert_eq!(text(&l), "abCd");
        assert_eq!(text(&v), "bC");
    }

    /// Invariant: `remove` takes the first equal element only.
    #[test]
    fn remove_first_occurrence() {
        let mut l = list("abab");
        assert!(l.remove(&'b'));
        assert_eq!(text(&l), "aab");
        assert!(!l.remove(&'z'));
        assert_eq!(l.index_of(&'a'), Some(0));
        assert_eq!(l.last_index_of(&'a'), Some(1));
    }

    /// Invariant: set difference / intersection keep relative order.
    #[test]
    fn remove_all_and_retain_all() {
        let mut l = list("abcabc");
        l.remove_all(&['a', 'z']);
        assert_eq!(text(&l), "bcbc");
        l.retain_all(&['c']);
        assert_eq!(text(&l), "cc");
    }

    /// Invariant: the infallible mutators succeed on empty roots and empty
    /// views alike, without touching unrelated elements.
    #[test]
    fn infallible_mutators_on_empty_lists() {
        let mut empty: ArrayList<char> = ArrayList::new();
        empty.clear();
        empty.retain_all(&[]);
        empty.add_all(None);
        empty.add('a');
        assert_eq!(text(&empty), "a");

        let l = list("xy");
        let mut v = l.sub_list(1, 1).unwrap();
        v.clear();
        v.remove_all(&['x']);
        v.retain_all(&['z']);
        assert_eq!(text(&l), "xy");
        v.add_all(['p', 'q']);
        v.add('r');
        assert_eq!(text(&v), "pqr");
        assert_eq!(text(&l), "xpqry");
        v.retain_all(&['q']);
        v.clear();
        assert_eq!(text(&l), "xy");
    }

    /// Invariant: a clone is an independent root.
    #[test]
    fn clone_is_independent() {
        let mut l = list("abc");
        let v = l.sub_list(0, 2).unwrap();
        let c = v.clone();
        assert!(!c.is_view());
        l.clear();
        assert!(v.is_empty());
        assert_eq!(text(&c), "ab");
    }

    /// Invariant: dropping the root handle leaves views working.
    #[test]
    fn views_outlive_root_handle() {
        let l = list("abcd");
        let mut v = l.sub_list(1, 3).unwrap();
        let w = v.sub_list(0, 1).unwrap();
        drop(l);
        v.insert(0, 'x').unwrap();
        assert_eq!(text(&v), "xbc");
        assert_eq!(text(&w), "xb");
    }
}
