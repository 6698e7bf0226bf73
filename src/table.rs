//! StrTable: the public chained hash table.

use crate::config::TableConfig;
use crate::error::TableError;
use crate::hash::{Fast, StrHash};
use crate::iter::{Iter, Keys, Values};
use crate::key::Key;
use crate::store::{Probe, Store};
use log::{debug, trace, warn};

/// Callback that takes ownership of values the table discards.
pub type Destructor<V> = Box<dyn FnMut(V)>;

/// Outcome of a successful [`StrTable::put`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Put {
    /// The key was new.
    Inserted,
    /// The key existed; its old value was handed to the destructor.
    Replaced,
}

/// Occupancy statistics returned by [`StrTable::info`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TableInfo {
    /// Number of buckets.
    pub size: usize,
    /// Number of key/value pairs.
    pub count: usize,
    /// Buckets holding at least one entry.
    pub slots: usize,
    /// Length of the longest chain, head slot included.
    pub longest_chain: usize,
}

impl TableInfo {
    pub fn load(&self) -> f64 {
        self.count as f64 / self.size as f64
    }

    /// Mean chain length over occupied buckets; 0 for an empty table.
    pub fn average_chain(&self) -> f64 {
        if self.slots == 0 {
            0.0
        } else {
            self.count as f64 / self.slots as f64
        }
    }

    /// Entries that did not get a bucket of their own.
    pub fn collisions(&self) -> usize {
        self.count - self.slots
    }
}

/// String-keyed hash table with separate chaining.
///
/// The most recently inserted key of a bucket always sits in the bucket's
/// head slot; older keys are pushed down the chain. The table grows when
/// `(count + 1) / size` reaches `maxload`, rehashing to a load of about
/// `minload`.
///
/// If a destructor is configured it receives every value the table lets
/// go of: replaced values, [`discard`](Self::discard)ed values, and values
/// dropped by [`clear`](Self::clear) or by dropping the table. Values
/// returned by [`insert`](Self::insert) and [`remove`](Self::remove) go to
/// the caller instead.
pub struct StrTable<V, H = Fast> {
    store: Store<V>,
    minload: f32,
    maxload: f32,
    hasher: H,
    destructor: Option<Destructor<V>>,
}

impl<V> StrTable<V> {
    /// A table with the default configuration and the [`Fast`] hash.
    pub fn new() -> Self {
        Self::with_hasher(Fast)
    }
}

impl<V> Default for StrTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, H> StrTable<V, H> {
    /// A table with the default configuration and the given hash function.
    pub fn with_hasher(hasher: H) -> Self {
        let config = TableConfig::default();
        Self::from_parts(config, Store::with_size(config.initsize), hasher)
    }

    /// Create a table from `config`, after clamping it to valid values.
    pub fn create(config: TableConfig, hasher: H) -> Result<Self, TableError> {
        let config = config.normalized();
        let store = Store::try_with_size(config.initsize)?;
        Ok(Self::from_parts(config, store, hasher))
    }

    fn from_parts(config: TableConfig, store: Store<V>, hasher: H) -> Self {
        trace!(
            "creating table: size={} minload={} maxload={}",
            store.size(),
            config.minload,
            config.maxload
        );
        Self {
            store,
            minload: config.minload,
            maxload: config.maxload,
            hasher,
            destructor: None,
        }
    }

    /// Install the callback that receives discarded values.
    pub fn with_destructor<F>(mut self, destructor: F) -> Self
    where
        F: FnMut(V) + 'static,
    {
        self.destructor = Some(Box::new(destructor));
        self
    }

    pub fn len(&self) -> usize {
        self.store.count()
    }

    pub fn is_empty(&self) -> bool {
        self.store.count() == 0
    }

    /// Current number of buckets.
    pub fn size(&self) -> usize {
        self.store.size()
    }

    pub fn minload(&self) -> f32 {
        self.minload
    }

    pub fn maxload(&self) -> f32 {
        self.maxload
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Size and count are O(1); slots and longest chain scan the table.
    pub fn info(&self) -> TableInfo {
        let (slots, longest_chain) = self.store.chain_stats();
        TableInfo {
            size: self.store.size(),
            count: self.store.count(),
            slots,
            longest_chain,
        }
    }

    /// Remove every entry, handing values to the destructor. The table keeps
    /// its size and configuration.
    pub fn clear(&mut self) {
        let released = self.release_all();
        debug!("cleared table: {} entries released", released);
    }

    fn release_all(&mut self) -> usize {
        let released = self.store.count();
        let destructor = &mut self.destructor;
        self.store.drain_with(|_key, value| {
            if let Some(d) = destructor.as_mut() {
                d(value);
            }
        });
        released
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &Store<V> {
        &self.store
    }

    fn dispose(&mut self, value: V) {
        if let Some(d) = self.destructor.as_mut() {
            d(value);
        }
    }

    /// Entries in bucket order, then chain order. The order is arbitrary and
    /// changes when the table grows.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.store)
    }

    pub fn keys(&self) -> Keys<'_, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, V> {
        Values::new(self.iter())
    }
}

impl<V, H> StrTable<V, H>
where
    H: StrHash,
{
    /// Insert or replace. A replaced value goes to the destructor, or is
    /// dropped when there is none.
    pub fn put(&mut self, key: &str, value: V) -> Result<Put, TableError> {
        match self.put_value(key, value)? {
            Some(old) => {
                self.dispose(old);
                Ok(Put::Replaced)
            }
            None => Ok(Put::Inserted),
        }
    }

    /// Insert or replace, returning the replaced value to the caller. The
    /// destructor is never invoked.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>, TableError> {
        self.put_value(key, value)
    }

    fn put_value(&mut self, key: &str, value: V) -> Result<Option<V>, TableError> {
        if key.is_empty() || key.as_bytes().contains(&0) {
            return Err(TableError::InvalidKey);
        }
        if (self.store.count() + 1) as f32 / self.store.size() as f32 >= self.maxload {
            self.grow()?;
        }
        let hash = self.hasher.hash_str(key);
        match self.store.probe(hash, key) {
            Probe::Hit { at, .. } => Ok(self.store.entry_mut(at).replace_value(value)),
            Probe::Miss { bucket } => {
                // Allocate the key before touching the bucket so failure
                // leaves it intact.
                let key = Key::new(key)?;
                self.store.place(bucket, key, value);
                Ok(None)
            }
        }
    }

    /// Rehash into a store sized for `count + 1` entries at `minload`.
    ///
    /// The new bucket array is the only allocation that can fail and it
    /// happens before any entry moves.
    fn grow(&mut self) -> Result<(), TableError> {
        let from = self.store.size();
        let count = self.store.count();
        let to = grown_size(count + 1, self.minload, self.maxload);

        let mut fresh = Store::try_with_size(to).map_err(|source| {
            warn!("failed to grow table from {} to {} buckets: {}", from, to, source);
            TableError::Grow { from, to, source }
        })?;

        let hasher = &self.hasher;
        let mut duplicates = 0usize;
        self.store.drain_with(|key, value| {
            let hash = hasher.hash_str(key.as_str());
            if fresh.place_unique(hash, key, value).is_some() {
                duplicates += 1;
            }
        });
        debug_assert_eq!(duplicates, 0, "rehash found duplicate keys");
        core::mem::swap(&mut self.store, &mut fresh);

        debug!("grew table from {} to {} buckets ({} entries)", from, to, count);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        match self.store.probe(self.hasher.hash_str(key), key) {
            Probe::Hit { at, .. } => self.store.entry(at).value(),
            Probe::Miss { .. } => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.store.probe(self.hasher.hash_str(key), key) {
            Probe::Hit { at, .. } => self.store.entry_mut(at).value_mut(),
            Probe::Miss { .. } => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        matches!(
            self.store.probe(self.hasher.hash_str(key), key),
            Probe::Hit { .. }
        )
    }

    /// Remove `key` and return its value to the caller. The destructor is
    /// not invoked.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        match self.store.probe(self.hasher.hash_str(key), key) {
            Probe::Hit { at, prev } => self.store.unlink(at, prev).map(|(_, v)| v),
            Probe::Miss { .. } => None,
        }
    }

    /// Remove `key`, handing its value to the destructor. Returns whether
    /// the key was present.
    pub fn discard(&mut self, key: &str) -> bool {
        match self.remove(key) {
            Some(value) => {
                self.dispose(value);
                true
            }
            None => false,
        }
    }
}

/// Odd bucket count bringing `needed` entries to about `minload`, and
/// strictly below `maxload`.
fn grown_size(needed: usize, minload: f32, maxload: f32) -> usize {
    let mut size = (needed as f32 / minload) as usize | 1;
    while needed as f32 / size as f32 >= maxload {
        size += 2;
    }
    size
}

impl<V, H> Drop for StrTable<V, H> {
    fn drop(&mut self) {
        if self.destructor.is_some() {
            self.release_all();
        }
    }
}

impl<V: core::fmt::Debug, H> core::fmt::Debug for StrTable<V, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V, H> IntoIterator for &'a StrTable<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
