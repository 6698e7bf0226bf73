//! Bucket store: the head-slot array, the chain-node arena and the live
//! count. Knows nothing about hashing policy, growth or destructors; the
//! table hands it a precomputed hash.

use crate::entry::{release, Entry, NodeKey, Nodes};
use crate::key::Key;
use slotmap::SlotMap;
use std::collections::TryReserveError;

/// Position of an entry within its bucket.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Link {
    Head(usize),
    Node(NodeKey),
}

/// Outcome of a probe.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Probe {
    /// `prev` is `None` exactly when `at` is the head slot.
    Hit { at: Link, prev: Option<Link> },
    /// Where a new key for this hash goes.
    Miss { bucket: usize },
}

pub(crate) struct Store<V> {
    buckets: Vec<Entry<V>>,
    nodes: Nodes<V>,
    count: usize,
}

impl<V> Store<V> {
    /// Allocate `size` unset head slots, reporting allocation failure.
    pub(crate) fn try_with_size(size: usize) -> Result<Self, TryReserveError> {
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(size)?;
        Ok(Self::from_buckets(buckets, size))
    }

    /// Like `try_with_size`, but aborts on allocation failure as std
    /// collections do.
    pub(crate) fn with_size(size: usize) -> Self {
        Self::from_buckets(Vec::with_capacity(size), size)
    }

    fn from_buckets(mut buckets: Vec<Entry<V>>, size: usize) -> Self {
        buckets.resize_with(size, Entry::unset);
        Self {
            buckets,
            nodes: SlotMap::with_key(),
            count: 0,
        }
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub(crate) fn bucket_of(&self, hash: u32) -> usize {
        hash as usize % self.buckets.len()
    }

    pub(crate) fn head(&self, bucket: usize) -> &Entry<V> {
        &self.buckets[bucket]
    }

    pub(crate) fn entry(&self, at: Link) -> &Entry<V> {
        match at {
            Link::Head(b) => &self.buckets[b],
            Link::Node(n) => &self.nodes[n],
        }
    }

    pub(crate) fn entry_mut(&mut self, at: Link) -> &mut Entry<V> {
        match at {
            Link::Head(b) => &mut self.buckets[b],
            Link::Node(n) => &mut self.nodes[n],
        }
    }

    pub(crate) fn node(&self, node: NodeKey) -> &Entry<V> {
        &self.nodes[node]
    }

    /// Walk the chain for `hash`, comparing each entry against `key`.
    pub(crate) fn probe(&self, hash: u32, key: &str) -> Probe {
        let bucket = self.bucket_of(hash);
        if !self.buckets[bucket].is_set() {
            return Probe::Miss { bucket };
        }
        let mut prev = None;
        let mut at = Link::Head(bucket);
        loop {
            let e = self.entry(at);
            if e.compare(key).is_eq() {
                return Probe::Hit { at, prev };
            }
            match e.next() {
                Some(n) => {
                    prev = Some(at);
                    at = Link::Node(n);
                }
                None => return Probe::Miss { bucket },
            }
        }
    }

    /// Insert a key known to be absent. The new entry always takes the head
    /// slot; a current occupant is pushed into a new chain node ahead of the
    /// rest of the chain.
    pub(crate) fn place(&mut self, bucket: usize, key: Key, value: V) {
        let head = &mut self.buckets[bucket];
        let next = if head.is_set() {
            Some(head.displace(&mut self.nodes))
        } else {
            None
        };
        head.set(key, value, next);
        self.count += 1;
    }

    /// Probe for `key` and place it on a miss. Used while rehashing, where
    /// keys are unique and the store is already large enough.
    ///
    /// A hit replaces the stored value and hands the old one back; the
    /// caller decides what a duplicate means.
    #[must_use]
    pub(crate) fn place_unique(&mut self, hash: u32, key: Key, value: V) -> Option<V> {
        match self.probe(hash, key.as_str()) {
            Probe::Miss { bucket } => {
                self.place(bucket, key, value);
                None
            }
            Probe::Hit { at, .. } => self.entry_mut(at).replace_value(value),
        }
    }

    /// Unlink the entry at `at` and return its key and value.
    ///
    /// Removing a head slot promotes the first chain node into it; removing
    /// a chain node splices its predecessor to its successor.
    pub(crate) fn unlink(&mut self, at: Link, prev: Option<Link>) -> Option<(Key, V)> {
        let (key, value) = match (at, prev) {
            (Link::Head(b), None) => {
                let head = &mut self.buckets[b];
                let (key, value, next) = head.take().into_parts()?;
                if let Some(n) = next {
                    if let Some((nk, nv, nn)) =
                        release(&mut self.nodes, n).and_then(Entry::into_parts)
                    {
                        head.set(nk, nv, nn);
                    }
                }
                (key, value)
            }
            (Link::Node(n), Some(p)) => {
                let (key, value, next) = release(&mut self.nodes, n)?.into_parts()?;
                self.entry_mut(p).set_next(next);
                (key, value)
            }
            _ => return None,
        };
        self.count -= 1;
        Some((key, value))
    }

    /// Empty every bucket in array order (head, then chain), handing each
    /// key and value to `f`. The bucket array keeps its size.
    pub(crate) fn drain_with(&mut self, mut f: impl FnMut(Key, V)) {
        for b in 0..self.buckets.len() {
            let mut cur = self.buckets[b].take().into_parts();
            while let Some((key, value, next)) = cur {
                f(key, value);
                cur = next
                    .and_then(|n| release(&mut self.nodes, n))
                    .and_then(Entry::into_parts);
            }
        }
        self.nodes.clear();
        self.count = 0;
    }

    /// Occupied head slots and the longest chain (head included).
    pub(crate) fn chain_stats(&self) -> (usize, usize) {
        let mut slots = 0;
        let mut longest = 0;
        for head in self.buckets.iter().filter(|h| h.is_set()) {
            slots += 1;
            let mut len = 1;
            let mut next = head.next();
            while let Some(n) = next {
                len += 1;
                next = self.nodes[n].next();
            }
            longest = longest.max(len);
        }
        (slots, longest)
    }

    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
