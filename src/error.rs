//! Error type shared by every fallible table operation.

use std::collections::TryReserveError;
use thiserror::Error;

/// Failure of a table operation.
///
/// A lookup or removal miss is not an error; those operations return
/// `Option`/`bool` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The key was empty or contained a NUL byte.
    #[error("key must be non-empty and must not contain NUL bytes")]
    InvalidKey,
    /// Allocating key storage or the bucket array failed.
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    /// Allocating the larger bucket array during growth failed. The table
    /// is left exactly as it was before the put.
    #[error("failed to grow table from {from} to {to} buckets: {source}")]
    Grow {
        from: usize,
        to: usize,
        #[source]
        source: TryReserveError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reserve_error() -> TryReserveError {
        let mut v: Vec<u64> = Vec::new();
        v.try_reserve_exact(usize::MAX).unwrap_err()
    }

    #[test]
    fn display_messages_name_the_failure() {
        assert_eq!(
            TableError::InvalidKey.to_string(),
            "key must be non-empty and must not contain NUL bytes"
        );
        let e = TableError::from(reserve_error());
        assert!(e.to_string().starts_with("allocation failed"));
        let g = TableError::Grow {
            from: 11,
            to: 19,
            source: reserve_error(),
        };
        assert!(g.to_string().contains("from 11 to 19"));
    }

    #[test]
    fn grow_error_exposes_source() {
        use std::error::Error as _;
        let g = TableError::Grow {
            from: 3,
            to: 5,
            source: reserve_error(),
        };
        assert!(g.source().is_some());
        assert!(TableError::InvalidKey.source().is_none());
    }
}
