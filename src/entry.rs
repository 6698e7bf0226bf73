//! Entries and collision chains.
//!
//! A bucket's head entry is stored in the bucket array itself. Every entry
//! after it is a chain node living in a `SlotMap` arena, linked through
//! `next`. Head entries are only ever cleared or overwritten; chain nodes
//! are created by [`Entry::displace`] and destroyed by [`release`].

use crate::key::Key;
use core::cmp::Ordering;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena key of a chain node.
    pub(crate) struct NodeKey;
}

/// Arena holding every chain node of a store.
pub(crate) type Nodes<V> = SlotMap<NodeKey, Entry<V>>;

/// Invariant: `key.is_set() == value.is_some()`.
#[derive(Debug)]
pub(crate) struct Entry<V> {
    key: Key,
    value: Option<V>,
    next: Option<NodeKey>,
}

impl<V> Entry<V> {
    pub(crate) const fn unset() -> Self {
        Self {
            key: Key::Unset,
            value: None,
            next: None,
        }
    }

    #[inline]
    pub(crate) fn is_set(&self) -> bool {
        self.key.is_set()
    }

    #[inline]
    pub(crate) fn key(&self) -> &str {
        self.key.as_str()
    }

    #[inline]
    pub(crate) fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> Option<&mut V> {
        self.value.as_mut()
    }

    #[inline]
    pub(crate) fn compare(&self, key: &str) -> Ordering {
        self.key.compare(key)
    }

    #[inline]
    pub(crate) fn next(&self) -> Option<NodeKey> {
        self.next
    }

    pub(crate) fn set_next(&mut self, next: Option<NodeKey>) {
        self.next = next;
    }

    /// Replace the whole entry; the previous key is released first.
    pub(crate) fn set(&mut self, key: Key, value: V, next: Option<NodeKey>) {
        self.key.clear();
        self.key = key;
        self.value = Some(value);
        self.next = next;
    }

    /// Swap in a new value, returning the old one.
    pub(crate) fn replace_value(&mut self, value: V) -> Option<V> {
        debug_assert!(self.is_set());
        self.value.replace(value)
    }

    /// Move this entry into a freshly allocated chain node, leaving `self`
    /// unset so the caller can overwrite it.
    pub(crate) fn displace(&mut self, nodes: &mut Nodes<V>) -> NodeKey {
        nodes.insert(self.take())
    }

    /// Take the contents out, leaving the entry unset.
    pub(crate) fn take(&mut self) -> Entry<V> {
        core::mem::replace(self, Entry::unset())
    }

    /// Split a set entry into its parts.
    pub(crate) fn into_parts(self) -> Option<(Key, V, Option<NodeKey>)> {
        let Entry { key, value, next } = self;
        value.map(|v| (key, v, next))
    }
}

/// Free a chain node, returning its contents.
pub(crate) fn release<V>(nodes: &mut Nodes<V>, node: NodeKey) -> Option<Entry<V>> {
    nodes.remove(node)
}
