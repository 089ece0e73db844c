//! Error types for ring operations.

use std::fmt;
use thiserror::Error;

/// Error returned by a push into a ring that has no vacant slot.
///
/// The rejected value is handed back so the caller can retry, drop it, or
/// route it elsewhere.
#[derive(Clone, Copy, PartialEq, Eq, Error)]
pub enum PushError<T> {
    /// All `N - 1` usable slots are occupied.
    #[error("ring buffer is full")]
    Full(T),
}

impl<T> PushError<T> {
    /// Returns the value that could not be pushed.
    #[inline]
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(value) => value,
        }
    }

    /// Returns `true` if the push failed because the ring was full.
    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }
}

// Manual impl so `T` need not be `Debug`.
impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => f.write_str("Full(..)"),
        }
    }
}
