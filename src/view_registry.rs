//! View registry: the shared arena behind a root list and all of its views.
//!
//! Every node owns its own copy of its elements. The root node is the
//! backing store; a view node records its parent and its `from` offset in
//! the parent, and its `to` bound is always `from + elements.len()`.
//!
//! All structural edits are validated against the node they were issued
//! on, translated to root coordinates, applied to the root, and then
//! replayed down the tree:
//! - an edit at parent index `p` with `from <= p <= to` (inserts) or
//!   `from <= p < to` (everything else) is replayed at `p - from` on the
//!   view, which replays it further to its own views;
//! - an edit before `from` only shifts `from` by the size delta;
//! - an edit after `to` is ignored.
//!
//! Because the originating view receives its own edit back through the
//! replay, it sees it exactly once.

use crate::error::CollectionError;
use core::ops::Range;
use slotmap::SlotMap;

slotmap::new_key_type! {
    pub(crate) struct NodeId;
}

#[derive(Debug, Clone, Copy)]
struct Link {
    parent: NodeId,
    from: usize,
}

#[derive(Debug)]
struct Node<T> {
    elements: Vec<T>,
    link: Option<Link>,
    children: Vec<NodeId>,
    // A live list handle refers to this node.
    held: bool,
}

/// Structural edit in the coordinates of the node it is applied to.
#[derive(Debug, Clone)]
pub(crate) enum Edit<T> {
    Insert { at: usize, items: Vec<T> },
    Set { at: usize, item: T },
    Remove { at: usize },
    /// One flag per element; `false` removes it.
    Retain { keep: Vec<bool> },
    Clear,
}

impl<T> Edit<T> {
    fn shifted(self, offset: usize, root_len: usize) -> Self {
        match self {
            Edit::Insert { at, items } => Edit::Insert {
                at: at + offset,
                items,
            },
            Edit::Set { at, item } => Edit::Set {
                at: at + offset,
                item,
            },
            Edit::Remove { at } => Edit::Remove { at: at + offset },
            Edit::Retain { keep } => {
                let mut mask = vec![true; root_len];
                for (slot, k) in mask.iter_mut().skip(offset).zip(keep) {
                    *slot = k;
                }
                Edit::Retain { keep: mask }
            }
            Edit::Clear => Edit::Clear,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Registry<T> {
    nodes: SlotMap<NodeId, Node<T>>,
}

impl<T> Registry<T> {
    pub(crate) fn with_root(elements: Vec<T>) -> (Self, NodeId) {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node {
            elements,
            link: None,
            children: Vec::new(),
            held: true,
        });
        (Self { nodes }, root)
    }

    pub(crate) fn elements(&self, id: NodeId) -> &[T] {
        self.nodes
            .get(id)
            .map(|n| n.elements.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn len(&self, id: NodeId) -> usize {
        self.elements(id).len()
    }

    pub(crate) fn is_view(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .map(|n| n.link.is_some())
            .unwrap_or(false)
    }

    /// Current `[from, to)` of a view within its parent.
    pub(crate) fn bounds(&self, id: NodeId) -> Option<Range<usize>> {
        let node = self.nodes.get(id)?;
        let link = node.link?;
        Some(link.from..link.from + node.elements.len())
    }

    /// Root of the tree `id` belongs to, and `id`'s offset within it.
    fn locate(&self, mut id: NodeId) -> (NodeId, usize) {
        let mut offset = 0;
        while let Some(link) = self.nodes.get(id).and_then(|n| n.link) {
            offset += link.from;
            id = link.parent;
        }
        (id, offset)
    }

    /// Drop the handle's claim on `id`; the node goes away once nothing
    /// beneath it is still held.
    pub(crate) fn release(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.held = false;
        }
        let mut id = id;
        loop {
            let Some(node) = self.nodes.get(id) else {
                return;
            };
            if node.held || !node.children.is_empty() {
                return;
            }
            let parent = node.link.map(|l| l.parent);
            self.nodes.remove(id);
            tracing::debug!(view = ?id, "released list node");
            let Some(parent) = parent else {
                return;
            };
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|c| *c != id);
            }
            id = parent;
        }
    }
}

impl<T: Clone> Registry<T> {
    /// Register a view over `[from, to)` of `parent`.
    pub(crate) fn register_view(
        &mut self,
        parent: NodeId,
        from: usize,
        to: usize,
    ) -> Result<NodeId, CollectionError> {
        let len = self.len(parent);
        if to > len {
            return Err(CollectionError::out_of_range(to, len));
        }
        if from > to {
            return Err(CollectionError::out_of_range(from, len));
        }
        let elements = self.elements(parent)[from..to].to_vec();
        let id = self.nodes.insert(Node {
            elements,
            link: Some(Link { parent, from }),
            children: Vec::new(),
            held: true,
        });
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(id);
        }
        tracing::debug!(view = ?id, parent = ?parent, from, to, "registered view");
        Ok(id)
    }

    /// Validate `edit` against node `id`, then apply it through the root so
    /// that every registered view observes it.
    pub(crate) fn submit(&mut self, id: NodeId, edit: Edit<T>) -> Result<(), CollectionError> {
        let len = self.len(id);
        match &edit {
            Edit::Insert { at, .. } if *at > len => {
                return Err(CollectionError::out_of_range(*at, len));
            }
            Edit::Set { at, .. } | Edit::Remove { at } if *at >= len => {
                return Err(CollectionError::out_of_range(*at, len));
            }
            _ => {}
        }

        if matches!(edit, Edit::Clear) && self.is_view(id) {
            // One removal at a time so each goes through the usual cascade.
            for _ in 0..len {
                self.submit(id, Edit::Remove { at: 0 })?;
            }
            return Ok(());
        }

        let (root, offset) = self.locate(id);
        let edit = if root == id {
            edit
        } else {
            edit.shifted(offset, self.len(root))
        };
        self.apply(root, &edit);
        Ok(())
    }

    fn apply(&mut self, id: NodeId, edit: &Edit<T>) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        match edit {
            Edit::Insert { at, items } => {
                let tail = node.elements.split_off(*at);
                node.elements.extend(items.iter().cloned());
                node.elements.extend(tail);
            }
            Edit::Set { at, item } => {
                if let Some(slot) = node.elements.get_mut(*at) {
                    *slot = item.clone();
                }
            }
            Edit::Remove { at } => {
                if *at < node.elements.len() {
                    node.elements.remove(*at);
                }
            }
            Edit::Retain { keep } => {
                let mut flags = keep.iter();
                node.elements
                    .retain(|_| flags.next().copied().unwrap_or(true));
            }
            Edit::Clear => node.elements.clear(),
        }
        let children = node.children.clone();
        for child in children {
            self.replay(child, edit);
        }
    }

    fn replay(&mut self, child: NodeId, edit: &Edit<T>) {
        let Some(node) = self.nodes.get_mut(child) else {
            return;
        };
        let len = node.elements.len();
        let Some(link) = node.link.as_mut() else {
            return;
        };
        let from = link.from;
        let to = from + len;

        let local = match edit {
            Edit::Insert { at, items } => {
                if *at < from {
                    link.from += items.len();
                    None
                } else if *at <= to {
                    Some(Edit::Insert {
                        at: at - from,
                        items: items.clone(),
                    })
                } else {
                    None
                }
            }
            Edit::Set { at, item } => (from..to).contains(at).then(|| Edit::Set {
                at: at - from,
                item: item.clone(),
            }),
            Edit::Remove { at } => {
                if *at < from {
                    link.from -= 1;
                    None
                } else if *at < to {
                    Some(Edit::Remove { at: at - from })
                } else {
                    None
                }
            }
            Edit::Retain { keep } => {
                link.from -= keep.iter().take(from).filter(|k| !**k).count();
                let window = keep.get(from..to).map(<[bool]>::to_vec).unwrap_or_default();
                if window.iter().all(|k| *k) {
                    None
                } else {
                    Some(Edit::Retain { keep: window })
                }
            }
            Edit::Clear => {
                link.from = 0;
                Some(Edit::Clear)
            }
        };

        tracing::trace!(
            view = ?child,
            from,
            len,
            replayed = local.is_some(),
            "view replay"
        );
        if let Some(local) = local {
            self.apply(child, &local);
        }
    }
}
