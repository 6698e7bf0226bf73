//! Borrowing iterators over a table.

use crate::entry::NodeKey;
use crate::store::Store;
use core::iter::FusedIterator;

/// Iterator over `(key, value)` pairs, returned by
/// [`StrTable::iter`](crate::StrTable::iter).
///
/// Walks the bucket array in order; within a bucket it yields the head slot
/// and then the chain.
pub struct Iter<'a, V> {
    store: &'a Store<V>,
    bucket: usize,
    pending: Option<NodeKey>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(store: &'a Store<V>) -> Self {
        Self {
            store,
            bucket: 0,
            pending: None,
            remaining: store.count(),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let store = self.store;
        let entry = match self.pending {
            Some(node) => store.node(node),
            None => loop {
                if self.bucket >= store.size() {
                    return None;
                }
                let head = store.head(self.bucket);
                self.bucket += 1;
                if head.is_set() {
                    break head;
                }
            },
        };
        self.pending = entry.next();
        self.remaining = self.remaining.saturating_sub(1);
        entry.value().map(|v| (entry.key(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            bucket: self.bucket,
            pending: self.pending,
            remaining: self.remaining,
        }
    }
}

/// Iterator over keys, returned by [`StrTable::keys`](crate::StrTable::keys).
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Keys<'a, V> {
    pub(crate) fn new(inner: Iter<'a, V>) -> Self {
        Self { inner }
    }
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}
impl<V> FusedIterator for Keys<'_, V> {}

/// Iterator over values, returned by
/// [`StrTable::values`](crate::StrTable::values).
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Values<'a, V> {
    pub(crate) fn new(inner: Iter<'a, V>) -> Self {
        Self { inner }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}
impl<V> FusedIterator for Values<'_, V> {}

#[cfg(test)]
mod tests {
    use crate::{StrTable, TableConfig};

    fn zero_hash(_: &str) -> u32 {
        0
    }

    #[test]
    fn empty_table_yields_nothing() {
        let t: StrTable<i32> = StrTable::new();
        let mut it = t.iter();
        assert_eq!(it.len(), 0);
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    /// Invariant: every entry is yielded exactly once and `len` counts down.
    #[test]
    fn visits_every_entry_once_with_exact_len() {
        let mut t = StrTable::create(TableConfig::default().with_initsize(3), zero_hash)
            .unwrap();
        for i in 0..6 {
            t.put(&format!("k{i}"), i).unwrap();
        }
        let mut it = t.iter();
        let mut seen = Vec::new();
        for expected_left in (0..6).rev() {
            let (k, v) = it.next().unwrap();
            assert_eq!(it.len(), expected_left);
            seen.push((k.to_string(), *v));
        }
        assert!(it.next().is_none());
        seen.sort();
        let want: Vec<_> = (0..6).map(|i| (format!("k{i}"), i)).collect();
        assert_eq!(seen, want);
    }

    #[test]
    fn single_bucket_yields_newest_first() {
        let mut t = StrTable::create(TableConfig::default().with_initsize(101), zero_hash)
            .unwrap();
        for k in ["a", "b", "c"] {
            t.put(k, ()).unwrap();
        }
        let keys: Vec<&str> = t.keys().collect();
        assert_eq!(keys, ["c", "b", "a"]);
    }

    #[test]
    fn keys_and_values_agree_with_iter() {
        let mut t = StrTable::new();
        for (i, k) in ["alpha", "beta", "gamma", "delta"].iter().enumerate() {
            t.put(k, i).unwrap();
        }
        let pairs: Vec<(&str, &usize)> = t.iter().collect();
        let keys: Vec<&str> = t.keys().collect();
        let values: Vec<&usize> = t.values().collect();
        assert_eq!(pairs.iter().map(|p| p.0).collect::<Vec<_>>(), keys);
        assert_eq!(pairs.iter().map(|p| p.1).collect::<Vec<_>>(), values);

        let mut n = 0;
        for (k, v) in &t {
            assert_eq!(t.get(k), Some(v));
            n += 1;
        }
        assert_eq!(n, 4);
    }
}
