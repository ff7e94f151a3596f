// ==============================================
// BEHAVIORAL CONTRACT SCENARIOS (integration)
// ==============================================
//
// End-to-end checks of the documented container behavior: capacity and
// eviction order, hit promotion, counter accounting, resize, batched
// update, deferred callback delivery, and busy rejection. Each module is
// one self-contained scenario.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use lrudict::prelude::*;

type Log<K, V> = Arc<Mutex<Vec<(K, V)>>>;

fn recording<K: Send + 'static, V: Send + 'static>(
) -> (Log<K, V>, Arc<dyn EvictionCallback<K, V>>) {
    let log: Log<K, V> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    (
        log,
        Arc::new(move |key: K, value: V| {
            sink.lock().unwrap().push((key, value));
        }),
    )
}

mod capacity_and_eviction {
    use super::*;

    #[test]
    fn fourth_insert_displaces_the_oldest() {
        let (log, callback) = recording();
        let dict = LruDict::with_callback(3, callback).unwrap();

        dict.insert(0u32, "a").unwrap();
        dict.insert(1, "b").unwrap();
        dict.insert(2, "c").unwrap();
        dict.insert(3, "d").unwrap();

        assert_eq!(dict.keys(), vec![3, 2, 1]);
        assert_eq!(
            log.lock().unwrap().as_slice(),
            &[(0, "a")],
            "exactly one eviction, of the first-inserted pair"
        );
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let dict: LruDict<u32, u32> = LruDict::new(4).unwrap();
        for i in 0..64 {
            dict.insert(i, i).unwrap();
            assert!(dict.len() <= 4, "len {} exceeded capacity", dict.len());
        }
    }
}

mod hit_promotion {
    use super::*;

    #[test]
    fn successful_lookup_moves_key_to_front() {
        let dict: LruDict<u32, u32> = LruDict::new(3).unwrap();
        dict.insert(0, 0).unwrap();
        dict.insert(1, 0).unwrap();
        dict.insert(2, 0).unwrap();

        let _ = dict.get(&0).unwrap();

        assert_eq!(dict.keys(), vec![0, 2, 1]);
        assert_eq!(dict.stats(), Stats { hits: 1, misses: 0 });
    }

    #[test]
    fn contains_and_peeks_promote_nothing() {
        let dict: LruDict<u32, u32> = LruDict::new(3).unwrap();
        dict.insert(0, 0).unwrap();
        dict.insert(1, 1).unwrap();

        assert!(dict.contains(&0));
        assert_eq!(dict.peek_lru().unwrap(), (0, 0));
        assert_eq!(dict.keys(), vec![1, 0]);
        assert_eq!(dict.stats(), Stats::default());
    }
}

mod miss_accounting {
    use super::*;

    #[test]
    fn miss_without_default_fails_and_counts() {
        let dict: LruDict<&str, u32> = LruDict::new(1).unwrap();
        assert_eq!(dict.get(&"x").unwrap_err(), Error::NotFound);
        assert_eq!(dict.stats(), Stats { hits: 0, misses: 1 });
    }

    #[test]
    fn present_iff_get_succeeds() {
        let dict: LruDict<u32, u32> = LruDict::new(3).unwrap();
        dict.insert(1, 10).unwrap();
        dict.insert(2, 20).unwrap();

        for key in 0..5u32 {
            assert_eq!(dict.contains(&key), dict.get(&key).is_ok());
        }
    }
}

mod resize {
    use super::*;

    #[test]
    fn shrinking_keeps_the_mru_prefix_in_order() {
        let dict: LruDict<u32, u32> = LruDict::new(5).unwrap();
        for i in 0..5 {
            dict.insert(i, i).unwrap();
        }
        dict.resize(2).unwrap();
        assert_eq!(dict.keys(), vec![4, 3]);
    }

    #[test]
    fn shrink_preserves_relative_order_after_promotion() {
        let dict: LruDict<u32, u32> = LruDict::new(4).unwrap();
        for i in 0..4 {
            dict.insert(i, i).unwrap();
        }
        let _ = dict.get(&0).unwrap(); // order now 0, 3, 2, 1
        dict.resize(3).unwrap();
        assert_eq!(dict.keys(), vec![0, 3, 2]);
    }
}

mod batched_update {
    use super::*;

    #[test]
    fn update_applies_pairs_in_source_order() {
        let (log, callback) = recording();
        let dict = LruDict::with_callback(2, callback).unwrap();

        dict.update(vec![(0u32, "a"), (1, "b"), (2, "c")]).unwrap();

        assert_eq!(dict.keys(), vec![2, 1]);
        assert_eq!(log.lock().unwrap().as_slice(), &[(0, "a")]);
    }

    #[test]
    fn update_longer_than_one_batch_applies_every_pair_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let dict: LruDict<u32, u32> = LruDict::builder(1024)
            .callback(Arc::new(move |_k: u32, _v: u32| {
                seen.fetch_add(1, Ordering::Relaxed);
            }))
            .build()
            .unwrap();

        // 500 distinct keys, each assigned twice; no evictions at this
        // capacity, so the callback must stay silent and every final
        // value must be from the second pass.
        let pairs: Vec<(u32, u32)> = (0..500).map(|i| (i, i)).chain((0..500).map(|i| (i, i + 1))).collect();
        dict.update(pairs).unwrap();

        assert_eq!(dict.len(), 500);
        assert_eq!(hits.load(Ordering::Relaxed), 0);
        assert_eq!(dict.get(&499).unwrap(), 500);
        assert_eq!(dict.get(&0).unwrap(), 1);
    }
}

mod deferred_callback {
    use super::*;

    /// The callback must observe a consistent, unlocked dictionary: it
    /// runs strictly after the assignment's critical section, never
    /// inside it.
    #[test]
    fn callback_runs_after_assignment_not_during() {
        struct Probe {
            dict: Arc<OnceLock<LruDict<u32, u32>>>,
            log: Log<u32, u32>,
            len_seen_by_callback: AtomicUsize,
        }
        impl EvictionCallback<u32, u32> for Probe {
            fn on_evict(&self, key: u32, value: u32) {
                // A blocking read would deadlock if the critical section
                // were still held; completing it proves deferral.
                if let Some(dict) = self.dict.get() {
                    self.len_seen_by_callback
                        .store(dict.len(), Ordering::Relaxed);
                }
                self.log.lock().unwrap().push((key, value));
            }
        }

        let slot = Arc::new(OnceLock::new());
        let probe = Arc::new(Probe {
            dict: Arc::clone(&slot),
            log: Arc::new(Mutex::new(Vec::new())),
            len_seen_by_callback: AtomicUsize::new(usize::MAX),
        });

        let dict =
            LruDict::with_callback(1, Arc::clone(&probe) as Arc<dyn EvictionCallback<u32, u32>>)
                .unwrap();
        slot.set(dict.clone()).ok().unwrap();

        dict.insert(0, 0).unwrap();
        assert!(probe.log.lock().unwrap().is_empty());

        dict.insert(1, 1).unwrap();
        assert_eq!(probe.log.lock().unwrap().as_slice(), &[(0, 0)]);
        assert_eq!(probe.len_seen_by_callback.load(Ordering::Relaxed), 1);
    }
}

mod busy_rejection {
    use super::*;

    #[derive(Clone)]
    struct HostileKey {
        id: u32,
        hostile: bool,
        dict: Arc<OnceLock<LruDict<HostileKey, u32>>>,
        inner_errors: Arc<Mutex<Vec<Error>>>,
    }

    impl Hash for HostileKey {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
    }

    impl PartialEq for HostileKey {
        fn eq(&self, other: &Self) -> bool {
            if self.hostile || other.hostile {
                if let Some(dict) = self.dict.get() {
                    let bystander = HostileKey {
                        id: u32::MAX,
                        hostile: false,
                        dict: Arc::clone(&self.dict),
                        inner_errors: Arc::clone(&self.inner_errors),
                    };
                    if let Err(err) = dict.insert(bystander, 0) {
                        self.inner_errors.lock().unwrap().push(err);
                    }
                }
            }
            self.id == other.id
        }
    }

    impl Eq for HostileKey {}

    #[test]
    fn reentrant_write_from_key_equality_is_refused() {
        let slot = Arc::new(OnceLock::new());
        let inner_errors = Arc::new(Mutex::new(Vec::new()));
        let dict: LruDict<HostileKey, u32> = LruDict::new(4).unwrap();
        slot.set(dict.clone()).ok().unwrap();

        let key = HostileKey {
            id: 7,
            hostile: false,
            dict: Arc::clone(&slot),
            inner_errors: Arc::clone(&inner_errors),
        };
        dict.insert(key.clone(), 1).unwrap();

        let hostile = HostileKey {
            hostile: true,
            ..key
        };
        // Outer assignment completes as a replacement...
        assert_eq!(dict.insert(hostile, 2).unwrap(), Some(1));
        // ...while the inner re-entrant write was refused untried.
        assert_eq!(inner_errors.lock().unwrap().as_slice(), &[Error::Busy]);
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.stats(), Stats::default());
    }
}

mod setdefault_semantics {
    use super::*;

    #[test]
    fn exactly_one_of_hit_or_insert() {
        let dict: LruDict<u32, &str> = LruDict::new(3).unwrap();

        // Absent: inserts and returns the default, no counter movement.
        assert_eq!(dict.get_or_insert(1, "d").unwrap(), "d");
        assert_eq!(dict.stats(), Stats::default());
        assert_eq!(dict.keys(), vec![1]);

        // Present: returns the stored value and counts a hit.
        dict.insert(2, "v").unwrap();
        assert_eq!(dict.get_or_insert(1, "other").unwrap(), "d");
        assert_eq!(dict.stats(), Stats { hits: 1, misses: 0 });
        assert_eq!(dict.keys(), vec![1, 2]);
    }
}

mod single_hash_per_operation {
    use super::*;

    #[derive(Clone)]
    struct CountedKey {
        id: u32,
        hashes: Arc<AtomicUsize>,
    }

    impl Hash for CountedKey {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.hashes.fetch_add(1, Ordering::Relaxed);
            self.id.hash(state);
        }
    }

    impl PartialEq for CountedKey {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    impl Eq for CountedKey {}

    fn hashed_during(hashes: &AtomicUsize, op: impl FnOnce()) -> usize {
        let before = hashes.load(Ordering::Relaxed);
        op();
        hashes.load(Ordering::Relaxed) - before
    }

    #[test]
    fn each_keyed_operation_hashes_at_most_once() {
        let hashes = Arc::new(AtomicUsize::new(0));
        let key = |id| CountedKey {
            id,
            hashes: Arc::clone(&hashes),
        };
        let dict: LruDict<CountedKey, u32> = LruDict::new(2).unwrap();

        assert_eq!(hashed_during(&hashes, || {
            dict.insert(key(1), 10).unwrap();
        }), 1);
        assert_eq!(hashed_during(&hashes, || {
            dict.insert(key(1), 11).unwrap();
        }), 1);
        assert_eq!(hashed_during(&hashes, || {
            dict.get(&key(1)).unwrap();
        }), 1);
        assert_eq!(hashed_during(&hashes, || {
            let _ = dict.get(&key(9));
        }), 1);
        assert_eq!(hashed_during(&hashes, || {
            dict.get_or_insert(key(2), 20).unwrap();
        }), 1);
        assert_eq!(hashed_during(&hashes, || {
            let _ = dict.contains(&key(2));
        }), 1);
        assert_eq!(hashed_during(&hashes, || {
            dict.pop(&key(2)).unwrap();
        }), 1);
        assert_eq!(hashed_during(&hashes, || {
            let _ = dict.remove(&key(2));
        }), 1);
        assert_eq!(hashed_during(&hashes, || {
            dict.insert(key(3), 30).unwrap();
        }), 1);

        // Eviction removes by the cached hash: shrinking displaces a key
        // without hashing it again.
        assert_eq!(dict.len(), 2);
        assert_eq!(hashed_during(&hashes, || dict.resize(1).unwrap()), 0);
        assert_eq!(dict.len(), 1);
    }
}

mod clear_semantics {
    use super::*;

    #[test]
    fn clear_resets_and_stays_silent() {
        let (log, callback) = recording();
        let dict = LruDict::with_callback(3, callback).unwrap();
        dict.insert(1u32, "a").unwrap();
        dict.insert(2, "b").unwrap();
        let _ = dict.get(&1);
        let _ = dict.get(&9);

        dict.clear().unwrap();

        assert_eq!(dict.len(), 0);
        assert_eq!(dict.stats(), Stats { hits: 0, misses: 0 });
        assert!(
            log.lock().unwrap().is_empty(),
            "clear must not deliver evictions"
        );

        // The dictionary remains fully usable.
        dict.insert(5, "e").unwrap();
        assert_eq!(dict.keys(), vec![5]);
    }
}
