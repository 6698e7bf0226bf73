//! strtab: a string-keyed hash table with separate chaining, a head-slot
//! bucket layout, caller-chosen hash functions and an optional value
//! destructor.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the bucket mechanics, the growth policy and the ownership
//!   rules for values in separate pieces so each can be reasoned about on
//!   its own.
//! - Layers:
//!   - Key: owned key text, inline up to 7 bytes and boxed beyond that.
//!   - Entry/Store: the head-slot array plus a `SlotMap` arena of chain
//!     nodes. Probing, head displacement, promotion on removal and
//!     in-order draining live here; the store is handed precomputed hashes
//!     and never calls user code.
//!   - StrTable<V, H>: public API. Validates keys, hashes them, decides when
//!     to grow, and routes discarded values to the destructor.
//!
//! Bucket layout
//! - Bucket `i` holds entries with `hash % size == i`.
//! - The newest key of a bucket always occupies the head slot; the previous
//!   occupant moves into a fresh chain node in front of the older ones.
//! - Removing a head promotes the first chain node into the head slot.
//!
//! Growth
//! - A put that would bring `(count + 1) / size` to `maxload` or above first
//!   rehashes into `floor((count + 1) / minload) | 1` buckets (stepped by two
//!   until the load is below `maxload`).
//! - Entries move in old-bucket order, head first, so the layout after a
//!   grow is a pure function of the layout before it.
//! - The new bucket array is allocated before anything moves. If that fails
//!   the put reports [`TableError::Grow`] and the table is unchanged.
//!
//! Value ownership
//! - `put` and `discard` hand old values to the destructor; `insert` and
//!   `remove` return them to the caller instead.
//! - `clear` and `Drop` hand every remaining value to the destructor.
//! - Growth never invokes the destructor.
//!
//! Constraints
//! - Keys are non-empty and NUL-free; the empty key is the unset-slot
//!   marker.
//! - Single-threaded: the destructor is a boxed `FnMut` with no `Send`
//!   bound. Callbacks cannot reach the table because every mutating method
//!   holds `&mut self`.
//! - The table never shrinks.
//!
//! Hash functions
//! - [`Fast`] is `val * 9 + byte`, wrapping at 32 bits.
//! - [`Good`] seeds one Park-Miller step with the first big-endian 4-byte
//!   word and XORs in the rest.
//! - Any `Fn(&str) -> u32` can be used in their place.

pub mod config;
mod entry;
pub mod error;
pub mod hash;
mod iter;
mod key;
mod store;
mod table;
mod table_proptest;
#[cfg(test)]
mod test_util;

// Public surface
pub use config::TableConfig;
pub use error::TableError;
pub use hash::{hash_str_fast, hash_str_good, Fast, Good, StrHash};
pub use iter::{Iter, Keys, Values};
pub use table::{Destructor, Put, StrTable, TableInfo};
