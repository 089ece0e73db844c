//! Debug assertion macros for ring buffer invariants.
//!
//! Only active in debug builds (`debug_assert!`), so there is zero overhead in
//! release builds. All cursors here are wrapped indices in `[0, N)`; the
//! occupied window is `[read, write)` modulo `N`.

// =============================================================================
// Cursor range
// =============================================================================

/// Assert that a cursor stays inside the slot array.
///
/// **Invariant**: `0 ≤ cursor < N`
///
/// Used in: `push_unchecked()`, `pop_unchecked()`
macro_rules! debug_assert_cursor_in_range {
    ($name:literal, $cursor:expr, $capacity:expr) => {
        debug_assert!(
            $cursor < $capacity,
            "{} cursor {} out of range for capacity {}",
            $name,
            $cursor,
            $capacity
        )
    };
}

// =============================================================================
// Bounded length
// =============================================================================

/// Assert that the ring never holds more than `N - 1` elements.
///
/// **Invariant**: `(write - read) mod N ≤ N - 1` (one slot is always reserved)
///
/// Used in: `len()`
macro_rules! debug_assert_bounded_len {
    ($len:expr, $usable:expr) => {
        debug_assert!(
            $len <= $usable,
            "length {} exceeds usable capacity {}",
            $len,
            $usable
        )
    };
}

// =============================================================================
// Slot state
// =============================================================================

/// Assert that a slot index lies in the occupied window `[read, write)`.
///
/// **Invariant**: `buffer[i] is initialized ⟺ (i - read) mod N < (write - read) mod N`
///
/// Used in: `pop_unchecked()`, `search_unchecked()`, `drop_occupied()`
macro_rules! debug_assert_occupied {
    ($idx:expr, $read:expr, $write:expr, $mask:expr) => {
        debug_assert!(
            ($idx.wrapping_sub($read) & $mask) < ($write.wrapping_sub($read) & $mask),
            "slot {} is outside the occupied window [{}, {})",
            $idx,
            $read,
            $write
        )
    };
}

pub(crate) use debug_assert_bounded_len;
pub(crate) use debug_assert_cursor_in_range;
pub(crate) use debug_assert_occupied;
