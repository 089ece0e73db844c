//! Fixed-capacity SPSC ring buffer with inline storage.
//!
//! [`Ring<T, N>`] embeds its `N` slots directly in the struct. Capacity is a
//! const generic and must be a power of two, so wrapping a cursor is a single
//! `& (N - 1)`.
//!
//! # Reserved slot
//!
//! One slot is always kept empty to tell "full" apart from "empty" without a
//! separate counter. **A `Ring<T, N>` holds at most `N - 1` elements.**
//!
//! | condition | meaning |
//! |-----------|---------|
//! | `write == read` | empty |
//! | `(write + 1) & (N - 1) == read` | full |
//!
//! # Usage
//!
//! Safe code goes through [`Ring::split`], which hands out exactly one
//! [`Producer`] and one [`Consumer`]. The `unsafe` methods on `Ring` expose the
//! raw protocol for callers that uphold the single-producer/single-consumer
//! discipline on their own.
//!
//! Capacities that are not a power of two (or smaller than 2) are rejected at
//! compile time:
//!
//! ```compile_fail
//! use ringspsc_rs::Ring;
//!
//! let ring: Ring<u32, 6> = Ring::new();
//! ```

use crate::invariants::{
    debug_assert_bounded_len, debug_assert_cursor_in_range, debug_assert_occupied,
};
use crate::split::{Consumer, Producer};
use crate::sync::{AtomicUsize, Ordering, UnsafeCell};
use crate::PushError;

use crossbeam_utils::CachePadded;
use std::mem::MaybeUninit;

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// Each cursor has exactly one writer and one reader:
//
// - `write`: stored by the producer, loaded by the consumer
// - `read`:  stored by the consumer, loaded by the producer
//
// **Producer (push):**
// 1. Load `write` with Relaxed (only the producer stores it)
// 2. Load `read` with Acquire (synchronizes with the consumer's Release, so a
//    slot it just vacated is really free)
// 3. Write the value into `buffer[write]`
// 4. Store `write + 1` with Release (publishes the slot to the consumer)
//
// **Consumer (pop):**
// 1. Load `read` with Relaxed (only the consumer stores it)
// 2. Load `write` with Acquire (synchronizes with the producer's Release, so
//    the slot contents are fully visible)
// 3. Move the value out of `buffer[read]`
// 4. Store `read + 1` with Release (hands the slot back to the producer)
//
// The Release/Acquire pair on the same cursor is the only cross-thread
// synchronization. No fences, no RMW operations.
//
// `clear_unchecked` stores both cursors with Relaxed and is outside this
// protocol; it requires both sides to be quiescent.
//
// =============================================================================

/// A fixed-capacity, lock-free single-producer single-consumer ring buffer.
///
/// # Type Parameters
///
/// - `T`: The element type
/// - `N`: The number of slots. Must be a power of two and at least 2. The ring
///   holds at most `N - 1` elements ([`Ring::USABLE_CAPACITY`]).
///
/// # Memory Layout
///
/// ```text
/// ┌────────────────────────────────────────────────────────────────────┐
/// │ write: CachePadded<AtomicUsize>  ← Producer stores, Consumer loads │
/// ├────────────────────────────────────────────────────────────────────┤
/// │ read:  CachePadded<AtomicUsize>  ← Consumer stores, Producer loads │
/// ├────────────────────────────────────────────────────────────────────┤
/// │ buffer: [UnsafeCell<MaybeUninit<T>>; N]   (inline, never resized)  │
/// └────────────────────────────────────────────────────────────────────┘
/// ```
///
/// `Ring` is neither `Clone` nor `Copy`, and [`split`](Ring::split) borrows it
/// mutably, so it cannot be moved while a producer or consumer is alive:
///
/// ```compile_fail
/// use ringspsc_rs::Ring;
///
/// let mut ring: Ring<u32, 4> = Ring::new();
/// let (producer, consumer) = ring.split();
/// let moved = ring;
/// drop((producer, consumer));
/// ```
///
/// ```compile_fail
/// use ringspsc_rs::Ring;
///
/// let ring: Ring<u32, 4> = Ring::new();
/// let copy = ring.clone();
/// ```
pub struct Ring<T, const N: usize> {
    /// Next free slot (stored by producer, loaded by consumer)
    write: CachePadded<AtomicUsize>,
    /// Next occupied slot (stored by consumer, loaded by producer)
    read: CachePadded<AtomicUsize>,
    /// Slots in `[read, write)` are initialized, all others are not.
    buffer: [UnsafeCell<MaybeUninit<T>>; N],
}

// Safety: values of `T` move from the producer thread to the consumer thread,
// so `T: Send` is required and sufficient. Each cursor has a single writer and
// the Release/Acquire protocol orders every slot access.
unsafe impl<T: Send, const N: usize> Send for Ring<T, N> {}
unsafe impl<T: Send, const N: usize> Sync for Ring<T, N> {}

impl<T, const N: usize> Ring<T, N> {
    const MASK: usize = N - 1;

    const VALID_CAPACITY: () = assert!(
        N >= 2 && N.is_power_of_two(),
        "Ring capacity must be a power of two and at least 2"
    );

    /// Number of elements the ring can hold at once: `N - 1`.
    pub const USABLE_CAPACITY: usize = N - 1;

    /// Creates an empty ring with both cursors at zero.
    ///
    /// Fails to compile if `N` is not a power of two or is smaller than 2.
    ///
    /// # Example
    ///
    /// ```
    /// use ringspsc_rs::Ring;
    ///
    /// let ring: Ring<u64, 1024> = Ring::new();
    /// assert_eq!(ring.capacity(), 1024);
    /// assert_eq!(ring.usable_capacity(), 1023);
    /// ```
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;

        Self {
            write: CachePadded::new(AtomicUsize::new(0)),
            read: CachePadded::new(AtomicUsize::new(0)),
            buffer: std::array::from_fn(|_| UnsafeCell::new(MaybeUninit::uninit())),
        }
    }

    /// Splits the ring into its producer and consumer halves.
    ///
    /// The mutable borrow guarantees there is exactly one of each for as long
    /// as either is alive, and that the ring stays in place meanwhile.
    ///
    /// # Example
    ///
    /// ```
    /// use ringspsc_rs::Ring;
    /// use std::thread;
    ///
    /// let mut ring: Ring<u32, 8> = Ring::new();
    /// let (mut producer, mut consumer) = ring.split();
    ///
    /// thread::scope(|s| {
    ///     s.spawn(move || {
    ///         for i in 0..100 {
    ///             while producer.push(i).is_err() {
    ///                 std::hint::spin_loop();
    ///             }
    ///         }
    ///     });
    ///
    ///     let mut expected = 0;
    ///     while expected < 100 {
    ///         if let Some(v) = consumer.pop() {
    ///             assert_eq!(v, expected);
    ///             expected += 1;
    ///         }
    ///     }
    /// });
    /// ```
    pub fn split(&mut self) -> (Producer<'_, T, N>, Consumer<'_, T, N>) {
        let ring: &Self = self;
        (Producer::new(ring), Consumer::new(ring))
    }

    // =========================================================================
    // STATUS
    // =========================================================================

    /// Returns the number of slots, `N`, including the reserved one.
    ///
    /// Use [`usable_capacity`](Ring::usable_capacity) for the number of
    /// elements the ring can actually hold.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns the number of elements the ring can hold at once, `N - 1`.
    #[inline]
    pub const fn usable_capacity(&self) -> usize {
        Self::USABLE_CAPACITY
    }

    /// Returns the number of elements currently in the ring.
    ///
    /// A snapshot: the peer may move its cursor right after the loads. Good for
    /// heuristics, not for correctness decisions.
    #[inline]
    pub fn len(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        let len = write.wrapping_sub(read) & Self::MASK;

        debug_assert_bounded_len!(len, Self::USABLE_CAPACITY);

        len
    }

    /// Returns the number of vacant slots, `(N - 1) - len()`. Same snapshot
    /// caveat as [`len`](Ring::len).
    #[inline]
    pub fn vacant(&self) -> usize {
        Self::USABLE_CAPACITY - self.len()
    }

    /// Returns true if the ring holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.write.load(Ordering::Acquire) == self.read.load(Ordering::Acquire)
    }

    /// Returns true if the ring holds `N - 1` elements.
    #[inline]
    pub fn is_full(&self) -> bool {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        ((write + 1) & Self::MASK) == read
    }

    // =========================================================================
    // PRODUCER API
    // =========================================================================

    /// Pushes one element, or returns it inside [`PushError::Full`] if every
    /// usable slot is occupied.
    ///
    /// # Safety
    ///
    /// Producer-side methods (`push_unchecked`) must never run on two threads
    /// at the same time, and must not overlap with
    /// [`clear_unchecked`](Ring::clear_unchecked).
    #[inline]
    pub unsafe fn push_unchecked(&self, value: T) -> Result<(), PushError<T>> {
        let write = self.write.load(Ordering::Relaxed);
        let read = self.read.load(Ordering::Acquire);

        debug_assert_cursor_in_range!("write", write, N);

        let next = (write + 1) & Self::MASK;
        if next == read {
            return Err(PushError::Full(value));
        }

        // SAFETY: `write` is outside [read, write), so the consumer does not
        // touch this slot until the Release store below publishes it.
        self.buffer[write].with_mut(|slot| unsafe {
            (*slot).write(value);
        });

        self.write.store(next, Ordering::Release);
        Ok(())
    }

    // =========================================================================
    // CONSUMER API
    // =========================================================================

    /// Pops the oldest element, or returns `None` if the ring is empty.
    ///
    /// # Safety
    ///
    /// Consumer-side methods (`pop_unchecked`) must never run on two threads
    /// at the same time, and must not overlap with
    /// [`clear_unchecked`](Ring::clear_unchecked).
    #[inline]
    pub unsafe fn pop_unchecked(&self) -> Option<T> {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);

        debug_assert_cursor_in_range!("read", read, N);

        if read == write {
            return None;
        }

        debug_assert_occupied!(read, read, write, Self::MASK);

        // SAFETY: The slot was initialized by the producer and published via
        // Release; the Acquire load of `write` synchronizes with it. Advancing
        // `read` afterwards means the value is never read twice.
        let value = self.buffer[read].with(|slot| unsafe { (*slot).assume_init_read() });

        self.read.store((read + 1) & Self::MASK, Ordering::Release);
        Some(value)
    }

    /// Returns a reference to the oldest element without removing it.
    ///
    /// # Safety
    ///
    /// Consumer side only. The reference must be dropped before the next pop
    /// or clear.
    #[inline]
    pub(crate) unsafe fn peek_unchecked(&self) -> Option<&T> {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        // SAFETY: Same as `pop_unchecked`; the slot stays initialized until
        // the consumer advances `read`.
        Some(self.buffer[read].with(|slot| unsafe { (*slot).assume_init_ref() }))
    }

    /// Returns the 1-based distance from the read cursor to the first element
    /// equal to `value`, or 0 if there is none.
    ///
    /// # Safety
    ///
    /// Consumer side only: no pop or clear may run concurrently.
    pub(crate) unsafe fn search_unchecked(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        let mut pos = self.read.load(Ordering::Acquire);
        let write = self.write.load(Ordering::Acquire);
        let start = pos;
        let mut position = 0;

        while pos != write {
            debug_assert_occupied!(pos, start, write, Self::MASK);

            position += 1;
            // SAFETY: `pos` is inside the window published by the producer and
            // not yet released by the consumer (which is us).
            if self.buffer[pos].with(|slot| unsafe { (*slot).assume_init_ref() == value }) {
                return position;
            }
            pos = (pos + 1) & Self::MASK;
        }

        0
    }

    /// Returns the 1-based distance from the read cursor to the first element
    /// equal to `value`, or 0 if it is absent or the ring is empty.
    ///
    /// Position 1 is the element the next pop would return.
    ///
    /// ```
    /// use ringspsc_rs::Ring;
    ///
    /// let mut ring: Ring<char, 8> = Ring::new();
    /// {
    ///     let (mut producer, _) = ring.split();
    ///     producer.multi_push(&['a', 'b', 'c']);
    /// }
    /// assert_eq!(ring.search(&'b'), 2);
    /// assert_eq!(ring.search(&'z'), 0);
    /// ```
    pub fn search(&mut self, value: &T) -> usize
    where
        T: PartialEq,
    {
        // SAFETY: `&mut self` excludes every other access.
        unsafe { self.search_unchecked(value) }
    }

    // =========================================================================
    // MAINTENANCE
    // =========================================================================

    /// Drops every element and resets both cursors to zero.
    ///
    /// # Safety
    ///
    /// No push or pop may be in flight, on either side, while this runs, and
    /// neither side may rely on a cursor value loaded before the call.
    pub unsafe fn clear_unchecked(&self) {
        self.drop_occupied();
        self.write.store(0, Ordering::Relaxed);
        self.read.store(0, Ordering::Relaxed);
    }

    /// Drops every element and resets both cursors to zero.
    ///
    /// Takes `&mut self`, so quiescence of both sides is checked by the
    /// borrow checker.
    pub fn clear(&mut self) {
        // SAFETY: `&mut self` excludes concurrent producers and consumers.
        unsafe { self.clear_unchecked() }
    }

    /// Alias for [`clear`](Ring::clear).
    pub fn flush(&mut self) {
        self.clear();
    }

    /// Drops the elements in `[read, write)`, advancing `read` past each slot
    /// before dropping it. A panicking `Drop` leaves the rest occupied.
    ///
    /// # Safety
    ///
    /// Caller must ensure exclusive access.
    unsafe fn drop_occupied(&self) {
        let start = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Relaxed);

        let mut pos = start;
        while pos != write {
            debug_assert_occupied!(pos, start, write, Self::MASK);

            let idx = pos;
            pos = (pos + 1) & Self::MASK;
            self.read.store(pos, Ordering::Relaxed);

            // SAFETY: `idx` was in [read, write), so it is initialized and
            // owned by us; `read` has moved past it.
            self.buffer[idx].with_mut(|slot| unsafe { (*slot).assume_init_drop() });
        }
    }
}

impl<T, const N: usize> Default for Ring<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Drop for Ring<T, N> {
    fn drop(&mut self) {
        // SAFETY: `&mut self` during drop is exclusive.
        unsafe { self.drop_occupied() }
    }
}

impl<T, const N: usize> std::fmt::Debug for Ring<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ring")
            .field("capacity", &N)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TYPE ALIASES FOR COMMON CONFIGURATIONS
// =============================================================================

/// 256 slots (255 usable) - small hand-off queues
pub type Ring256<T> = Ring<T, 256>;

/// 1K slots (1023 usable)
pub type Ring1K<T> = Ring<T, 1024>;

/// 4K slots (4095 usable) - fits in L1 cache for word-sized `T` (~33KB for u64)
pub type Ring4K<T> = Ring<T, 4096>;

/// 64K slots (65535 usable) - box it; ~524KB for u64 may overflow thread stacks
pub type Ring64K<T> = Ring<T, 65536>;

// =============================================================================
// TESTS
// =============================================================================
