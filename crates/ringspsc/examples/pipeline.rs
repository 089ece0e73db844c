//! Two-thread pipeline over a `Ring`.
//!
//! A producer streams sensor-style samples, a consumer aggregates them. Shows
//! single-element and batch hand-off and what backpressure looks like from
//! each side.
//!
//! Run with: cargo run --release --example pipeline

use crossbeam_utils::Backoff;
use ringspsc_rs::{Ring, Ring1K};
use std::thread;
use std::time::Instant;

const MSG_COUNT: u64 = 10_000_000;
const BATCH_SIZE: usize = 64;

#[derive(Clone, Copy, Default)]
struct Sample {
    seq: u64,
    value: u32,
}

fn main() {
    println!("=== Lock-Free SPSC Ring Examples ===\n");

    example_basic();
    example_throughput();
    example_batch_throughput();
}

/// Capacity accounting, full/empty signals and search.
fn example_basic() {
    println!("1. Basics");
    println!("   ------");

    let mut ring: Ring<u32, 8> = Ring::new();
    println!(
        "   Slots: {}, usable: {} (one slot is reserved)",
        ring.capacity(),
        ring.usable_capacity()
    );

    let (mut producer, mut consumer) = ring.split();

    let pushed = producer.multi_push(&[10, 20, 30, 40, 50, 60, 70, 80, 90]);
    println!("   multi_push of 9 values pushed {}", pushed);
    println!("   full: {}, vacant: {}", producer.is_full(), producer.vacant());

    if let Err(err) = producer.push(100) {
        println!("   push(100) rejected: {} (got {} back)", err, err.into_inner());
    }

    println!("   search(30) -> position {}", consumer.search(&30));
    println!("   search(99) -> position {} (absent)", consumer.search(&99));

    let mut out = [0u32; 4];
    let popped = consumer.multi_pop(&mut out);
    println!("   multi_pop into 4 slots popped {}: {:?}", popped, &out[..popped]);

    let rest: Vec<u32> = consumer.drain().collect();
    println!("   drained {:?}, empty: {}", rest, consumer.is_empty());

    ring.clear();
    println!("   after clear: len {}\n", ring.len());
}

/// One element per operation across two threads.
fn example_throughput() {
    println!("2. Single-element throughput ({} messages)", MSG_COUNT);
    println!("   -------------------------------------");

    let mut ring: Box<Ring1K<Sample>> = Box::new(Ring::new());
    let (mut producer, mut consumer) = ring.split();

    let start = Instant::now();
    let (sum, full_spins) = thread::scope(|s| {
        let producer = s.spawn(move || {
            let backoff = Backoff::new();
            let mut full_spins = 0u64;
            for seq in 0..MSG_COUNT {
                let mut sample = Sample {
                    seq,
                    value: (seq % 1000) as u32,
                };
                loop {
                    match producer.push(sample) {
                        Ok(()) => break,
                        Err(err) => {
                            sample = err.into_inner();
                            full_spins += 1;
                            backoff.spin();
                        }
                    }
                }
                backoff.reset();
            }
            full_spins
        });

        let backoff = Backoff::new();
        let mut expected = 0u64;
        let mut sum = 0u64;
        while expected < MSG_COUNT {
            match consumer.pop() {
                Some(sample) => {
                    assert_eq!(sample.seq, expected, "out of order");
                    sum += u64::from(sample.value);
                    expected += 1;
                    backoff.reset();
                }
                None => backoff.spin(),
            }
        }

        (sum, producer.join().unwrap())
    });

    let elapsed = start.elapsed();
    println!("   Checksum: {}", sum);
    println!("   Producer saw full {} times", full_spins);
    println!(
        "   Throughput: {:.2} M msgs/sec\n",
        MSG_COUNT as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );
}

/// multi_push / multi_pop with short counts.
fn example_batch_throughput() {
    println!("3. Batch throughput ({} messages, batch {})", MSG_COUNT, BATCH_SIZE);
    println!("   -------------------------------------");

    let mut ring: Box<Ring1K<Sample>> = Box::new(Ring::new());
    let (mut producer, mut consumer) = ring.split();

    let start = Instant::now();
    let (received, short_writes) = thread::scope(|s| {
        let producer = s.spawn(move || {
            let backoff = Backoff::new();
            let mut batch = [Sample::default(); BATCH_SIZE];
            let mut short_writes = 0u64;
            let mut seq = 0u64;
            while seq < MSG_COUNT {
                let len = BATCH_SIZE.min((MSG_COUNT - seq) as usize);
                for (i, sample) in batch[..len].iter_mut().enumerate() {
                    sample.seq = seq + i as u64;
                    sample.value = ((seq + i as u64) % 1000) as u32;
                }

                let mut sent = 0;
                while sent < len {
                    let pushed = producer.multi_push(&batch[sent..len]);
                    if pushed < len - sent {
                        short_writes += 1;
                        backoff.snooze();
                    }
                    sent += pushed;
                }
                backoff.reset();
                seq += len as u64;
            }
            short_writes
        });

        let backoff = Backoff::new();
        let mut buf = [Sample::default(); BATCH_SIZE];
        let mut received = 0u64;
        while received < MSG_COUNT {
            let popped = consumer.multi_pop(&mut buf);
            if popped == 0 {
                backoff.snooze();
                continue;
            }
            for sample in &buf[..popped] {
                assert_eq!(sample.seq, received, "out of order");
                received += 1;
            }
            backoff.reset();
        }

        (received, producer.join().unwrap())
    });

    let elapsed = start.elapsed();
    println!("   Received: {}", received);
    println!("   Short writes: {}", short_writes);
    println!(
        "   Throughput: {:.2} M msgs/sec",
        MSG_COUNT as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );
}
