//! misd-collections: lists with live sub-list views, and maps, sets and
//! bags keyed by arbitrary dynamically-typed values.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: Java-Collections-style structures whose hard parts (views,
//!   key hashing, ordering) live in small layers that can be reasoned
//!   about independently.
//! - Layers:
//!   - `Value` / `hash_key`: every key is a `Value`; `hash_key` maps it to
//!     a deterministic `HashToken`. Equal tokens mean the same key.
//!   - `HashMap<V, S>`: entries `(token, key, value)` in a slot map,
//!     indexed by a `HashTable` over a precomputed bucket hash. The
//!     original key is kept so a token can be turned back into its key.
//!   - `TreeMap<V, S>`: a `HashMap` plus a sequence of tokens in key
//!     order, rebuilt after each `put` from natural order or an injected
//!     `Comparator`.
//!   - `ArrayList<T>`: a handle onto a node of a shared view registry.
//!     The root node is the backing store; `sub_list` registers a child
//!     node over a `[from, to)` window.
//!   - `HashSet`, `TreeSet`, `HashBag`, `ArrayQueue`: thin wrappers over
//!     the above.
//!
//! Constraints
//! - Single-threaded: handles share their registry through `Rc<RefCell<_>>`
//!   and are `!Send`/`!Sync`.
//! - After any call returns, every live view equals its parent's elements
//!   over its bounds, at any nesting depth.
//! - Failing calls change nothing: indices are checked against the
//!   issuing list or view first, and a failed comparator rolls back the
//!   `TreeMap::put` that invoked it.
//!
//! View replay
//! - Edits are issued on any node, shifted into root coordinates and
//!   applied to the root, then replayed child by child. An insert exactly
//!   at a view's upper bound is absorbed into that view; other edits at or
//!   past the upper bound are ignored, and edits before the lower bound
//!   only move it.
//! - `clear` on a view removes its elements one at a time from the front,
//!   so siblings and ancestors see ordinary removals.
//! - Dropping a handle releases its node; the node is pruned once no
//!   descendant is still held. A dropped root keeps serving its views.
//!
//! Hash tokens
//! - Integers hash to themselves; strings and floats to their text.
//! - `true`, `false` and null hash to `"_true"`, `"_false"` and `"_null"`,
//!   temporals to `"_"` plus their RFC 3339 text, identity objects to
//!   `"_#<id>"`, and composites to `"_"` plus a blake3 digest of their
//!   sorted canonical JSON.
//! - A string spelled like another key's token addresses the same entry.
//!
//! Hasher and rehashing invariants
//! - Each map entry stores its bucket hash; the `BuildHasher` only ever
//!   hashes tokens, never keys, and never affects the tokens themselves.
//!
//! Notes and non-goals
//! - No thread safety, persistence or I/O.
//! - `HashMap` iterates in storage order, not insertion order.
//! - Removing from a `TreeMap` keeps the remaining order without
//!   consulting the comparator.

mod array_list;
mod array_list_proptest;
mod array_queue;
pub mod capability;
mod error;
mod hash_bag;
mod hash_map;
mod hash_set;
pub mod hashing;
mod tree_map;
mod tree_set;
mod value;
mod view_registry;

// Public surface
pub use array_list::ArrayList;
pub use array_queue::ArrayQueue;
pub use capability::{Clearable, Growable, Indexable, Membership, Sortable, Unmodifiable};
pub use error::CollectionError;
pub use hash_bag::HashBag;
pub use hash_map::{HashMap, Iter, IterMut};
pub use hash_set::HashSet;
pub use hashing::{hash_key, HashToken, KeyClass};
pub use tree_map::{Comparator, StrictNatural, TreeMap};
pub use tree_set::TreeSet;
pub use value::{natural_str_cmp, ObjectRef, Value};
