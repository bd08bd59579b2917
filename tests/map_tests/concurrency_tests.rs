//! Concurrency Tests
//!
//! Tests verify:
//! - Concurrent writers with overlapping keys
//! - Disjoint writers inserting and removing
//! - Readers never observe a torn state while writers run
//! - Chained calls from many threads

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use sortedmap::{Config, SortedMap};

// =============================================================================
// Helper Functions
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn assert_strictly_ascending<K: Ord + std::fmt::Debug>(keys: &[K]) {
    for pair in keys.windows(2) {
        assert!(pair[0] < pair[1], "{:?} is not before {:?}", pair[0], pair[1]);
    }
}

// =============================================================================
// Parallel Set Tests
// =============================================================================

#[test]
fn test_parallel_set() {
    init_tracing();
    let map = Arc::new(SortedMap::new());

    let first = {
        let map = Arc::clone(&map);
        thread::spawn(move || {
            map.set("key1", 1).set("key2", 2);
        })
    };
    let second = {
        let map = Arc::clone(&map);
        thread::spawn(move || {
            map.set("key2", -2).set("key3", 3);
        })
    };

    first.join().unwrap();
    second.join().unwrap();

    assert_eq!(map.len(), 3);
    assert_eq!(map.keys(), vec!["key1", "key2", "key3"]);

    // Whichever writer took the lock last decides key2
    let key2 = map.get("key2").unwrap();
    assert!(key2 == 2 || key2 == -2);
}

#[test]
fn test_parallel_set_integer_keys() {
    let map = Arc::new(SortedMap::new());

    let handles: Vec<_> = [(123, 834), (234, 945), (234, -945), (345, 1056)]
        .into_iter()
        .map(|(key, value)| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                map.set(key, value);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(map.len(), 3);
    assert_eq!(map.keys(), vec![123, 234, 345]);
}

#[test]
fn test_parallel_delete() {
    let map = Arc::new(SortedMap::new());
    map.set("key1", 1).set("key2", 2).set("key3", 3);

    let first = {
        let map = Arc::clone(&map);
        thread::spawn(move || {
            map.delete(["key1"]);
        })
    };
    let second = {
        let map = Arc::clone(&map);
        thread::spawn(move || {
            map.delete(["key3"]);
        })
    };

    first.join().unwrap();
    second.join().unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(map.keys(), vec!["key2"]);
}

// =============================================================================
// Disjoint Writer Tests
// =============================================================================

#[test]
fn test_disjoint_writers_insert_and_remove() {
    init_tracing();

    const THREADS: u32 = 8;
    const PER_THREAD: u32 = 250;

    let map = Arc::new(SortedMap::with_capacity((THREADS * PER_THREAD) as usize));
    let barrier = Arc::new(Barrier::new(THREADS as usize));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let map = Arc::clone(&map);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();

                // Thread t owns keys t, t + THREADS, t + 2*THREADS, ...
                for i in 0..PER_THREAD {
                    let key = t + i * THREADS;
                    map.set(key, key * 10);
                }
                for i in (0..PER_THREAD).filter(|i| i % 2 == 1) {
                    map.delete([&(t + i * THREADS)]);
                }
                for i in (0..PER_THREAD).filter(|i| i % 4 == 0) {
                    map.set(t + i * THREADS, t + i * THREADS + 1);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let expected: Vec<(u32, u32)> = (0..THREADS * PER_THREAD)
        .filter(|key| (key / THREADS) % 2 == 0)
        .map(|key| {
            let value = if (key / THREADS) % 4 == 0 { key + 1 } else { key * 10 };
            (key, value)
        })
        .collect();

    assert_eq!(map.len(), expected.len());
    assert_eq!(map.entries(), expected);
}

// =============================================================================
// Reader / Writer Tests
// =============================================================================

#[test]
fn test_readers_never_observe_torn_state() {
    init_tracing();

    let map = Arc::new(SortedMap::with_config(
        Config::builder().verify_order(true).build(),
    ));
    let done = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..4u64)
        .map(|t| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for round in 0..200u64 {
                    let key = (round * 7 + t * 13) % 97;
                    if round % 3 == 0 {
                        map.delete([&key, &(key + 1)]);
                    } else {
                        map.set(key, key);
                    }
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let map = Arc::clone(&map);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    // len() panics on any cross-store mismatch
                    let len = map.len();
                    assert!(len <= 98);

                    let entries = map.entries();
                    assert_strictly_ascending(&entries.iter().map(|(k, _)| *k).collect::<Vec<_>>());
                    for (key, value) in &entries {
                        assert_eq!(key, value);
                    }

                    assert_strictly_ascending(&map.keys());
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Relaxed);
    for reader in readers {
        reader.join().unwrap();
    }

    let keys = map.keys();
    assert_strictly_ascending(&keys);
    assert_eq!(map.len(), keys.len());
    assert_eq!(map.values(), keys);
}

#[test]
fn test_concurrent_reads() {
    let map = Arc::new(SortedMap::with_entry("key".to_string(), "value".to_string()));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for _ in 0..100 {
                    assert_eq!(map.get("key"), Ok("value".to_string()));
                    assert!(map.contains_all(["key"]));
                    assert!(!map.contains_any(["other"]));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_overwrites_keep_single_key() {
    let map = Arc::new(SortedMap::new());

    let handles: Vec<_> = (0..10)
        .map(|t| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for j in 0..100 {
                    map.set("shared", t * 100 + j);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(map.len(), 1);
    assert_eq!(map.keys(), vec!["shared"]);
}
