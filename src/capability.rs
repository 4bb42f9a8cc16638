//! Per-capability traits.
//!
//! Each concrete collection implements only the capabilities it supports,
//! so most misuse is a compile error. `Unmodifiable<C>` exists for callers
//! that hold a collection behind one of these traits and must refuse
//! mutation at runtime; its mutators answer `UnsupportedOperation`.

use crate::array_list::ArrayList;
use crate::array_queue::ArrayQueue;
use crate::error::CollectionError;
use crate::hash_bag::HashBag;
use crate::hash_set::HashSet;
use crate::tree_set::TreeSet;
use crate::value::Value;
use core::hash::BuildHasher;

pub trait Growable<T> {
    fn add(&mut self, element: T) -> Result<(), CollectionError>;

    fn add_all<I>(&mut self, elements: I) -> Result<(), CollectionError>
    where
        I: IntoIterator<Item = T>,
        Self: Sized,
    {
        for e in elements {
            self.add(e)?;
        }
        Ok(())
    }
}

pub trait Indexable<T> {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Result<T, CollectionError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait Sortable<T> {
    fn first(&self) -> Result<T, CollectionError>;
    fn last(&self) -> Result<T, CollectionError>;
}

pub trait Clearable {
    fn clear(&mut self) -> Result<(), CollectionError>;
}

pub trait Membership<T> {
    fn contains(&self, element: &T) -> bool;

    fn contains_all<'a, I>(&self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
        Self: Sized,
    {
        elements.into_iter().all(|e| self.contains(e))
    }
}

/// Read-only wrapper: reads forward to the inner collection, mutators fail.
#[derive(Debug, Clone)]
pub struct Unmodifiable<C> {
    inner: C,
}

impl<C> Unmodifiable<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<T, C: Indexable<T>> Indexable<T> for Unmodifiable<C> {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn get(&self, index: usize) -> Result<T, CollectionError> {
        self.inner.get(index)
    }
}

impl<T, C: Sortable<T>> Sortable<T> for Unmodifiable<C> {
    fn first(&self) -> Result<T, CollectionError> {
        self.inner.first()
    }

    fn last(&self) -> Result<T, CollectionError> {
        self.inner.last()
    }
}

impl<T, C: Membership<T>> Membership<T> for Unmodifiable<C> {
    fn contains(&self, element: &T) -> bool {
        self.inner.contains(element)
    }
}

impl<T, C> Growable<T> for Unmodifiable<C> {
    fn add(&mut self, _element: T) -> Result<(), CollectionError> {
        Err(CollectionError::UnsupportedOperation { operation: "add" })
    }
}

impl<C> Clearable for Unmodifiable<C> {
    fn clear(&mut self) -> Result<(), CollectionError> {
        Err(CollectionError::UnsupportedOperation { operation: "clear" })
    }
}

impl<T: Clone> Growable<T> for ArrayList<T> {
    fn add(&mut self, element: T) -> Result<(), CollectionError> {
        ArrayList::add(self, element);
        Ok(())
    }
}

impl<T: Clone> Indexable<T> for ArrayList<T> {
    fn len(&self) -> usize {
        ArrayList::len(self)
    }

    fn get(&self, index: usize) -> Result<T, CollectionError> {
        ArrayList::get(self, index)
    }
}

impl<T: Clone> Clearable for ArrayList<T> {
    fn clear(&mut self) -> Result<(), CollectionError> {
        ArrayList::clear(self);
        Ok(())
    }
}

impl<T: Clone + PartialEq> Membership<T> for ArrayList<T> {
    fn contains(&self, element: &T) -> bool {
        ArrayList::contains(self, element)
    }
}

impl<T: Clone> Growable<T> for ArrayQueue<T> {
    fn add(&mut self, element: T) -> Result<(), CollectionError> {
        ArrayQueue::add(self, element);
        Ok(())
    }
}

impl<T: Clone> Clearable for ArrayQueue<T> {
    fn clear(&mut self) -> Result<(), CollectionError> {
        ArrayQueue::clear(self);
        Ok(())
    }
}

impl<T: Clone + PartialEq> Membership<T> for ArrayQueue<T> {
    fn contains(&self, element: &T) -> bool {
        ArrayQueue::contains(self, element)
    }
}

impl<S: BuildHasher> Growable<Value> for HashSet<S> {
    fn add(&mut self, element: Value) -> Result<(), CollectionError> {
        HashSet::add(self, element);
        Ok(())
    }
}

impl<S: BuildHasher> Clearable for HashSet<S> {
    fn clear(&mut self) -> Result<(), CollectionError> {
        HashSet::clear(self);
        Ok(())
    }
}

impl<S: BuildHasher> Membership<Value> for HashSet<S> {
    fn contains(&self, element: &Value) -> bool {
        HashSet::contains(self, element)
    }
}

impl<S: BuildHasher> Growable<Value> for HashBag<S> {
    fn add(&mut self, element: Value) -> Result<(), CollectionError> {
        HashBag::add(self, element);
        Ok(())
    }
}

impl<S: BuildHasher> Clearable for HashBag<S> {
    fn clear(&mut self) -> Result<(), CollectionError> {
        HashBag::clear(self);
        Ok(())
    }
}

impl<S: BuildHasher> Membership<Value> for HashBag<S> {
    fn contains(&self, element: &Value) -> bool {
        HashBag::contains(self, element)
    }
}

impl<S: BuildHasher> Growable<Value> for TreeSet<S> {
    fn add(&mut self, element: Value) -> Result<(), CollectionError> {
        TreeSet::add(self, element).map(|_| ())
    }
}

impl<S: BuildHasher> Sortable<Value> for TreeSet<S> {
    fn first(&self) -> Result<Value, CollectionError> {
        TreeSet::first(self)
    }

    fn last(&self) -> Result<Value, CollectionError> {
        TreeSet::last(self)
    }
}

impl<S: BuildHasher> Clearable for TreeSet<S> {
    fn clear(&mut self) -> Result<(), CollectionError> {
        TreeSet::clear(self);
        Ok(())
    }
}

impl<S: BuildHasher> Membership<Value> for TreeSet<S> {
    fn contains(&self, element: &Value) -> bool {
        TreeSet::contains(self, element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill<C: Growable<i32>>(c: &mut C) -> Result<(), CollectionError> {
        c.add_all([1, 2, 3])
    }

    /// Invariant: bulk defaults loop over the single-element primitive.
    #[test]
    fn bulk_defaults() {
        let mut l: ArrayList<i32> = ArrayList::new();
        fill(&mut l).unwrap();
        assert_eq!(l.to_vec(), vec![1, 2, 3]);
        assert!(Membership::contains_all(&l, [&1, &3]));
        assert!(!Membership::contains_all(&l, [&1, &4]));
    }

    /// Invariant: an unmodifiable wrapper answers reads and rejects writes
    /// without touching the inner collection.
    #[test]
    fn unmodifiable_rejects_mutation() {
        let mut u = Unmodifiable::new(ArrayList::from(vec![1, 2]));
        assert_eq!(Indexable::get(&u, 1), Ok(2));
        assert_eq!(Indexable::len(&u), 2);
        assert_eq!(
            fill(&mut u),
            Err(CollectionError::UnsupportedOperation { operation: "add" })
        );
        assert_eq!(
            Clearable::clear(&mut u),
            Err(CollectionError::UnsupportedOperation { operation: "clear" })
        );
        assert_eq!(u.into_inner().to_vec(), vec![1, 2]);
    }

    #[test]
    fn sortable_through_wrapper() {
        let set: TreeSet = [3, 1, 2].into_iter().collect();
        let u = Unmodifiable::new(set);
        assert_eq!(u.first(), Ok(Value::Int(1)));
        assert_eq!(u.last(), Ok(Value::Int(3)));
        assert!(u.contains(&Value::Int(2)));
    }
}
