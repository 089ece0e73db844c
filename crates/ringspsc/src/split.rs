//! Producer and consumer halves of a [`Ring`].
//!
//! [`Ring::split`] returns one [`Producer`] and one [`Consumer`]. Neither is
//! `Clone`, and every mutating method takes `&mut self`, so at most one thread
//! pushes and at most one thread pops at any time. Both halves are `Send` when
//! `T: Send` and can be moved into scoped threads. [`Consumer`] hands out `&T`
//! through `&self`, so it is `Sync` only when `T: Sync` as well.

use crate::{PushError, Ring};
use std::fmt;
use std::marker::PhantomData;

// =============================================================================
// PRODUCER
// =============================================================================

/// The writing half of a [`Ring`].
pub struct Producer<'a, T, const N: usize> {
    ring: &'a Ring<T, N>,
}

impl<'a, T, const N: usize> Producer<'a, T, N> {
    pub(crate) fn new(ring: &'a Ring<T, N>) -> Self {
        Self { ring }
    }

    /// Pushes one element.
    ///
    /// Returns `Err(PushError::Full(value))` with the value handed back if the
    /// ring already holds `N - 1` elements. A failed push changes nothing.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), PushError<T>> {
        // SAFETY: This is the only producer for `ring` (see `Ring::split`).
        unsafe { self.ring.push_unchecked(value) }
    }

    /// Pushes clones of `src` in order, stopping at the first element that
    /// does not fit.
    ///
    /// Returns how many elements were pushed. A short count is not an error;
    /// `src[count..]` was not pushed. The consumer may free slots while this
    /// runs, so more than the `vacant()` observed beforehand may get through.
    pub fn multi_push(&mut self, src: &[T]) -> usize
    where
        T: Clone,
    {
        let mut pushed = 0;
        for value in src {
            if self.push(value.clone()).is_err() {
                break;
            }
            pushed += 1;
        }
        pushed
    }

    /// Pushes elements from `iter` until it is exhausted or the ring is full.
    ///
    /// Fullness is checked before an element is taken, so nothing is pulled
    /// from the iterator that does not end up in the ring. Call again with the
    /// same iterator to resume.
    pub fn push_iter<I>(&mut self, iter: &mut I) -> usize
    where
        I: Iterator<Item = T>,
    {
        let mut pushed = 0;
        while !self.ring.is_full() {
            let Some(value) = iter.next() else {
                break;
            };
            // Cannot fail: the consumer only ever frees slots.
            if self.push(value).is_err() {
                break;
            }
            pushed += 1;
        }
        pushed
    }

    /// See [`Ring::capacity`].
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// See [`Ring::usable_capacity`].
    #[inline]
    pub fn usable_capacity(&self) -> usize {
        self.ring.usable_capacity()
    }

    /// See [`Ring::len`].
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Number of pushes guaranteed to succeed right now. The consumer can only
    /// increase this concurrently, never decrease it.
    #[inline]
    pub fn vacant(&self) -> usize {
        self.ring.vacant()
    }

    /// See [`Ring::is_empty`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// See [`Ring::is_full`].
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }
}

impl<T, const N: usize> fmt::Debug for Producer<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").field("ring", self.ring).finish()
    }
}

// =============================================================================
// CONSUMER
// =============================================================================

/// The reading half of a [`Ring`].
///
/// Sharing a consumer between threads would share the `&T` that
/// [`peek`](Consumer::peek) returns, so it requires `T: Sync`:
///
/// ```compile_fail
/// use ringspsc_rs::Consumer;
/// use std::cell::Cell;
///
/// fn assert_sync<S: Sync>() {}
/// assert_sync::<Consumer<'static, Cell<u32>, 4>>();
/// ```
pub struct Consumer<'a, T, const N: usize> {
    ring: &'a Ring<T, N>,
    // Opts out of the auto `Sync` derived from `Ring: Sync`.
    _marker: PhantomData<*const ()>,
}

impl<'a, T, const N: usize> Consumer<'a, T, N> {
    pub(crate) fn new(ring: &'a Ring<T, N>) -> Self {
        Self {
            ring,
            _marker: PhantomData,
        }
    }

    /// Pops the oldest element, or returns `None` if the ring is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        // SAFETY: This is the only consumer for `ring` (see `Ring::split`).
        unsafe { self.ring.pop_unchecked() }
    }

    /// Pops into `dst` in order, stopping as soon as the ring is empty.
    ///
    /// Returns how many elements were popped. Only `dst[..count]` is written;
    /// the remaining entries keep whatever they held before the call.
    pub fn multi_pop(&mut self, dst: &mut [T]) -> usize {
        let mut popped = 0;
        for slot in dst.iter_mut() {
            match self.pop() {
                Some(value) => *slot = value,
                None => break,
            }
            popped += 1;
        }
        popped
    }

    /// Returns a reference to the element the next [`pop`](Consumer::pop)
    /// would return, without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        // SAFETY: Only the consumer advances `read`, and that needs
        // `&mut self`, so the slot outlives the returned borrow.
        unsafe { self.ring.peek_unchecked() }
    }

    /// Returns an iterator that pops until the ring is empty.
    ///
    /// Elements pushed while draining are yielded too.
    pub fn drain(&mut self) -> Drain<'_, 'a, T, N> {
        Drain { consumer: self }
    }

    /// Returns the 1-based distance from the read cursor to the first element
    /// equal to `value`, or 0 if it is absent or the ring is empty.
    ///
    /// Scans the elements present when the call starts. Elements the producer
    /// appends during the scan are not considered.
    pub fn search(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        // SAFETY: We are the only consumer and `&self` excludes a concurrent
        // pop through this handle; the producer never writes inside
        // [read, write).
        unsafe { self.ring.search_unchecked(value) }
    }

    /// See [`Ring::capacity`].
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// See [`Ring::usable_capacity`].
    #[inline]
    pub fn usable_capacity(&self) -> usize {
        self.ring.usable_capacity()
    }

    /// Number of pops guaranteed to succeed right now. The producer can only
    /// increase this concurrently, never decrease it.
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// See [`Ring::vacant`].
    #[inline]
    pub fn vacant(&self) -> usize {
        self.ring.vacant()
    }

    /// See [`Ring::is_empty`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// See [`Ring::is_full`].
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }
}

// SAFETY: Moving the consumer moves the only popping side; elements cross
// threads by value, which `T: Send` allows.
unsafe impl<T: Send, const N: usize> Send for Consumer<'_, T, N> {}
// SAFETY: `&Consumer` only reads slots in [read, write), and shared `&T`
// across threads needs `T: Sync`.
unsafe impl<T: Send + Sync, const N: usize> Sync for Consumer<'_, T, N> {}

impl<T, const N: usize> fmt::Debug for Consumer<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer").field("ring", self.ring).finish()
    }
}

// =============================================================================
// DRAIN
// =============================================================================

/// Iterator returned by [`Consumer::drain`].
pub struct Drain<'c, 'a, T, const N: usize> {
    consumer: &'c mut Consumer<'a, T, N>,
}

impl<T, const N: usize> Iterator for Drain<'_, '_, T, N> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.consumer.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.consumer.len(), None)
    }
}

impl<T, const N: usize> fmt::Debug for Drain<'_, '_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drain").field("consumer", &self.consumer).finish()
    }
}
