//! ArrayQueue: FIFO queue over an `ArrayList`.

use crate::array_list::ArrayList;
use crate::error::CollectionError;
use core::fmt;

#[derive(Clone)]
pub struct ArrayQueue<T> {
    elements: ArrayList<T>,
}

impl<T: Clone> ArrayQueue<T> {
    pub fn new() -> Self {
        Self {
            elements: ArrayList::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Enqueue at the tail.
    pub fn add(&mut self, element: T) {
        self.elements.add(element);
    }

    /// Head of the queue without removing it.
    pub fn peek(&self) -> Result<T, CollectionError> {
        self.elements.get(0).map_err(|_| CollectionError::Underflow)
    }

    /// Remove and return the head of the queue.
    pub fn poll(&mut self) -> Result<T, CollectionError> {
        self.elements
            .remove_at(0)
            .map_err(|_| CollectionError::Underflow)
    }

    pub fn contains(&self, element: &T) -> bool
    where
        T: PartialEq,
    {
        self.elements.contains(element)
    }

    /// Remove the first occurrence of `element`, wherever it is queued.
    pub fn remove(&mut self, element: &T) -> bool
    where
        T: PartialEq,
    {
        self.elements.remove(element)
    }

    pub fn remove_all(&mut self, elements: &[T])
    where
        T: PartialEq,
    {
        self.elements.remove_all(elements);
    }

    pub fn retain_all(&mut self, elements: &[T])
    where
        T: PartialEq,
    {
        self.elements.retain_all(elements);
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Elements from head to tail.
    pub fn to_vec(&self) -> Vec<T> {
        self.elements.to_vec()
    }
}

impl<T: Clone> Default for ArrayQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for ArrayQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.elements, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: poll returns elements in insertion order, then underflows.
    #[test]
    fn fifo_order() {
        let mut q: ArrayQueue<i32> = [1, 2].into_iter().collect();
        q.add(3);
        assert_eq!(q.peek(), Ok(1));
        assert_eq!(q.poll(), Ok(1));
        assert_eq!(q.poll(), Ok(2));
        assert_eq!(q.len(), 1);
        assert_eq!(q.poll(), Ok(3));
        assert_eq!(q.peek(), Err(CollectionError::Underflow));
        assert_eq!(q.poll(), Err(CollectionError::Underflow));
    }

    #[test]
    fn remove_from_middle() {
        let mut q: ArrayQueue<char> = "abcb".chars().collect();
        assert!(q.remove(&'b'));
        assert_eq!(q.to_vec(), vec!['a', 'c', 'b']);
        q.retain_all(&['a', 'b']);
        assert_eq!(q.to_vec(), vec!['a', 'b']);
        assert!(q.contains(&'b'));
        q.clear();
        assert!(q.is_empty());
    }
}
