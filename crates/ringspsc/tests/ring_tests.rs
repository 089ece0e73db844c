//! Integration tests for Ring
//!
//! These tests run a real producer thread against a real consumer thread and
//! check that every element arrives exactly once and in order.

#![cfg(not(feature = "loom"))]

use crossbeam_utils::Backoff;
use ringspsc_rs::{Consumer, Producer, Ring};
use std::thread;

/// Push `0..count` one element at a time, retrying on full.
fn produce_sequence<const N: usize>(mut producer: Producer<'_, u64, N>, count: u64) {
    let backoff = Backoff::new();
    let mut next = 0u64;
    while next < count {
        match producer.push(next) {
            Ok(()) => {
                next += 1;
                backoff.reset();
            }
            Err(_) => backoff.snooze(),
        }
    }
}

/// Pop until `count` elements arrived, retrying on empty.
fn collect_sequence<const N: usize>(mut consumer: Consumer<'_, u64, N>, count: u64) -> Vec<u64> {
    let backoff = Backoff::new();
    let mut received = Vec::with_capacity(count as usize);
    while (received.len() as u64) < count {
        match consumer.pop() {
            Some(v) => {
                received.push(v);
                backoff.reset();
            }
            None => backoff.snooze(),
        }
    }
    received
}

fn run_stress<const N: usize>(count: u64) {
    let mut ring: Ring<u64, N> = Ring::new();
    let (producer, consumer) = ring.split();

    let received = thread::scope(|s| {
        s.spawn(move || produce_sequence(producer, count));
        s.spawn(move || collect_sequence(consumer, count))
            .join()
            .unwrap()
    });

    assert_eq!(received.len() as u64, count);
    for (i, v) in received.iter().enumerate() {
        assert_eq!(*v, i as u64, "FIFO violated at position {}", i);
    }
    assert!(ring.is_empty());
}

/// Smallest legal ring: a single usable slot forces a hand-off per element.
#[test]
fn test_stress_capacity_2() {
    run_stress::<2>(100_000);
}

#[test]
fn test_stress_capacity_4() {
    run_stress::<4>(200_000);
}

#[test]
fn test_stress_capacity_1024() {
    run_stress::<1024>(1_000_000);
}

/// Batch operations across threads, with short counts on both sides.
#[test]
fn test_stress_multi_push_multi_pop() {
    const TOTAL: u64 = 300_000;
    const BATCH: usize = 37;

    let mut ring: Ring<u64, 64> = Ring::new();
    let (mut producer, mut consumer) = ring.split();

    let received = thread::scope(|s| {
        s.spawn(move || {
            let source: Vec<u64> = (0..TOTAL).collect();
            let backoff = Backoff::new();
            let mut sent = 0usize;
            while sent < source.len() {
                let end = (sent + BATCH).min(source.len());
                let pushed = producer.multi_push(&source[sent..end]);
                if pushed == 0 {
                    backoff.snooze();
                } else {
                    backoff.reset();
                }
                sent += pushed;
            }
        });

        let consumer = s.spawn(move || {
            let backoff = Backoff::new();
            let mut received = Vec::with_capacity(TOTAL as usize);
            let mut buf = [0u64; BATCH];
            while (received.len() as u64) < TOTAL {
                let popped = consumer.multi_pop(&mut buf);
                if popped == 0 {
                    backoff.snooze();
                } else {
                    backoff.reset();
                }
                received.extend_from_slice(&buf[..popped]);
            }
            received
        });

        consumer.join().unwrap()
    });

    assert_eq!(received, (0..TOTAL).collect::<Vec<_>>());
}

/// Non-`Copy` payloads cross threads intact.
#[test]
fn test_stress_string_payloads() {
    const TOTAL: usize = 20_000;

    let mut ring: Ring<String, 16> = Ring::new();
    let (mut producer, mut consumer) = ring.split();

    thread::scope(|s| {
        s.spawn(move || {
            let backoff = Backoff::new();
            for i in 0..TOTAL {
                let mut item = format!("item_{}", i);
                loop {
                    match producer.push(item) {
                        Ok(()) => break,
                        Err(err) => {
                            item = err.into_inner();
                            backoff.snooze();
                        }
                    }
                }
                backoff.reset();
            }
        });

        s.spawn(move || {
            let backoff = Backoff::new();
            let mut expected = 0;
            while expected < TOTAL {
                if let Some(item) = consumer.pop() {
                    assert_eq!(item, format!("item_{}", expected));
                    expected += 1;
                    backoff.reset();
                } else {
                    backoff.snooze();
                }
            }
        });
    });
}

/// `len()` seen from either side never leaves `[0, N - 1]` while both run.
#[test]
fn test_concurrent_len_is_bounded() {
    const TOTAL: u64 = 100_000;

    let mut ring: Ring<u64, 8> = Ring::new();
    let (producer, consumer) = ring.split();

    thread::scope(|s| {
        s.spawn(move || {
            let mut producer = producer;
            let mut next = 0;
            while next < TOTAL {
                assert!(producer.len() <= producer.usable_capacity());
                if producer.push(next).is_ok() {
                    next += 1;
                }
            }
        });

        s.spawn(move || {
            let mut consumer = consumer;
            let mut seen = 0;
            while seen < TOTAL {
                assert!(consumer.len() <= consumer.usable_capacity());
                assert!(consumer.vacant() <= consumer.usable_capacity());
                if consumer.pop().is_some() {
                    seen += 1;
                }
            }
        });
    });
}

/// The consumer's search only ever sees elements in push order.
#[test]
fn test_search_under_concurrent_push() {
    const TOTAL: u64 = 50_000;

    let mut ring: Ring<u64, 32> = Ring::new();
    let (mut producer, mut consumer) = ring.split();

    thread::scope(|s| {
        s.spawn(move || {
            let backoff = Backoff::new();
            for i in 0..TOTAL {
                while producer.push(i).is_err() {
                    backoff.snooze();
                }
                backoff.reset();
            }
        });

        s.spawn(move || {
            let mut expected = 0;
            while expected < TOTAL {
                if let Some(&head) = consumer.peek() {
                    assert_eq!(head, expected);
                    // The element right after the head, if present, is one further.
                    let pos = consumer.search(&(expected + 1));
                    assert!(pos == 0 || pos == 2, "unexpected position {}", pos);
                    assert_eq!(consumer.search(&expected), 1);
                    assert_eq!(consumer.pop(), Some(expected));
                    expected += 1;
                }
            }
        });
    });
}

/// Clearing between runs leaves a fully usable ring.
#[test]
fn test_clear_between_runs() {
    let mut ring: Ring<u64, 8> = Ring::new();

    for round in 0..3u64 {
        {
            let (producer, consumer) = ring.split();
            let received = thread::scope(|s| {
                s.spawn(move || produce_sequence(producer, 10_000));
                s.spawn(move || collect_sequence(consumer, 9_995))
                    .join()
                    .unwrap()
            });
            assert_eq!(received.len(), 9_995);
        }

        // Five elements were left behind by the consumer
        assert_eq!(ring.len(), 5);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);

        let (mut producer, mut consumer) = ring.split();
        producer.push(1000 + round).unwrap();
        assert_eq!(consumer.pop(), Some(1000 + round));
    }
}
