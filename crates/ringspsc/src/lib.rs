//! RingSPSC - Lock-Free Single-Producer Single-Consumer Ring Buffer
//!
//! A fixed-capacity circular buffer that hands elements from exactly one
//! producer thread to exactly one consumer thread without locks, allocation,
//! or blocking. Every operation is wait-free.
//!
//! # Key Features
//!
//! - Inline storage: `N` slots embedded in the struct, `N` a power of two
//! - One Release/Acquire pair per operation, no fences or RMW instructions
//! - Cursors on separate cache lines (`CachePadded`)
//! - Single producer and single consumer enforced by [`Ring::split`]
//!
//! **Capacity note:** one slot is reserved to distinguish full from empty, so
//! a `Ring<T, N>` holds at most `N - 1` elements.
//!
//! # Example
//!
//! ```
//! use ringspsc_rs::Ring;
//!
//! let mut ring: Ring<u64, 4> = Ring::new();
//! let (mut producer, mut consumer) = ring.split();
//!
//! // 3 usable slots out of 4
//! assert_eq!(producer.multi_push(&[1, 2, 3, 4]), 3);
//! assert!(producer.push(4).is_err());
//!
//! assert_eq!(consumer.pop(), Some(1));
//! assert!(producer.push(4).is_ok());
//!
//! let mut out = [0u64; 8];
//! assert_eq!(consumer.multi_pop(&mut out), 3);
//! assert_eq!(&out[..3], &[2, 3, 4]);
//! ```

mod error;
mod invariants;
mod ring;
mod split;
mod sync;

pub use error::PushError;
pub use ring::{Ring, Ring1K, Ring256, Ring4K, Ring64K};
pub use split::{Consumer, Drain, Producer};
