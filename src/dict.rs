//! Bounded LRU dictionary with deferred eviction callbacks.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                     LruDict<K, V, S>  (Arc handle)           │
//!   │                                                              │
//!   │   Mutex<DictCore> ── the critical section                    │
//!   │   ┌────────────────────────────────────────────────────────┐ │
//!   │   │  RawTable<SlotId>       key_hash ─► slot               │ │
//!   │   │  RecencyList<Entry>     head = MRU ◄──► tail = LRU     │ │
//!   │   │  capacity, hits, misses                                │ │
//!   │   └────────────────────────────────────────────────────────┘ │
//!   │                                                              │
//!   │   Mutex<PurgeQueue<(K, V)>> ── evicted pairs awaiting the    │
//!   │   callback, drained after the critical section is released   │
//!   │                                                              │
//!   │   flags: detect_conflict, purge_suspended, should_purge      │
//!   │   pending: concurrently-active drain workers                 │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Protocol
//!
//! Every keyed operation hashes its key exactly once, before taking the
//! core lock; the cached hash travels with the entry and is reused for
//! index removal and rehashing, never recomputed. With conflict detection
//! enabled (the default), mutating operations acquire the core lock with
//! `try_lock` and refuse with [`Error::Busy`] when another mutation is in
//! flight: the dictionary rejects contention, it does not serialize it.
//!
//! User code never runs inside the critical section on the dictionary's
//! behalf, with one deliberate exception: `Eq` on keys during index
//! probes. Replaced values, removed entries, and the contents of `clear`
//! are released only after the lock is dropped, and evicted pairs travel
//! through the purge queue so the callback runs strictly outside the
//! critical section and may safely re-enter the dictionary.

use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::mem;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use hashbrown::raw::RawTable;
use parking_lot::{Mutex, MutexGuard};
use rustc_hash::FxHasher;

use crate::builder::LruDictBuilder;
use crate::ds::{PurgeQueue, RecencyList, SlotId};
use crate::error::Error;
use crate::stats::Stats;
use crate::traits::EvictionCallback;

/// Default hash builder (Fx hashing, like the index tables elsewhere in
/// this codebase).
pub type DefaultHashBuilder = BuildHasherDefault<FxHasher>;

/// Pairs applied per critical section by [`LruDict::update`].
const UPDATE_BATCH: usize = 128;

/// Ceiling on concurrently-active purge workers. Saturation makes further
/// drain attempts return immediately; queued entries wait for a later
/// drain or an explicit [`LruDict::purge`].
const PENDING_MAX: u32 = 65_535;

/// One live entry: the key, its value, and the key's hash cached at entry
/// creation.
struct Entry<K, V> {
    key: K,
    value: V,
    key_hash: u64,
}

/// Index + recency list + counters. Only ever touched under the core
/// mutex; all keyed methods take a precomputed hash.
struct DictCore<K, V> {
    index: RawTable<SlotId>,
    order: RecencyList<Entry<K, V>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl<K, V> DictCore<K, V>
where
    K: Eq + Hash,
{
    fn new(capacity: usize) -> Self {
        Self {
            index: RawTable::with_capacity(capacity),
            order: RecencyList::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.order.len()
    }

    fn find(&self, hash: u64, key: &K) -> Option<SlotId> {
        let order = &self.order;
        self.index
            .get(hash, |&slot| {
                order.get(slot).map_or(false, |entry| entry.key == *key)
            })
            .copied()
    }

    fn insert_index(&mut self, hash: u64, slot: SlotId) {
        let order = &self.order;
        self.index.insert(hash, slot, |&s| {
            order
                .get(s)
                .expect("index slot missing from recency list")
                .key_hash
        });
    }

    /// Hit path shared by lookups: promote, count, hand out the value.
    fn promote_hit(&mut self, slot: SlotId) -> Option<&V> {
        self.order.promote(slot);
        self.hits = self.hits.wrapping_add(1);
        self.order.get(slot).map(|entry| &entry.value)
    }

    fn lookup(&mut self, hash: u64, key: &K) -> Option<&V> {
        match self.find(hash, key) {
            Some(slot) => self.promote_hit(slot),
            None => {
                self.misses = self.misses.wrapping_add(1);
                None
            }
        }
    }

    /// Insert or replace. Replacement swaps the value and promotes; the
    /// old value is handed back so it outlives the critical section. The
    /// new-key path may displace the tail, returned for staging.
    fn assign(&mut self, hash: u64, key: K, value: V) -> (Option<V>, Option<Entry<K, V>>) {
        if let Some(slot) = self.find(hash, &key) {
            let entry = self
                .order
                .get_mut(slot)
                .expect("found slot missing from recency list");
            let replaced = mem::replace(&mut entry.value, value);
            self.order.promote(slot);
            return (Some(replaced), None);
        }
        let evicted = self.insert_absent(hash, key, value);
        (None, evicted)
    }

    /// New-key insertion; the caller has already established absence.
    fn insert_absent(&mut self, hash: u64, key: K, value: V) -> Option<Entry<K, V>> {
        let slot = self.order.push_mru(Entry {
            key,
            value,
            key_hash: hash,
        });
        self.insert_index(hash, slot);
        if self.order.len() > self.capacity {
            self.evict_lru()
        } else {
            None
        }
    }

    /// Removes the tail entry: index first (by slot identity under the
    /// cached hash, so no key comparison runs), then the list.
    fn evict_lru(&mut self) -> Option<Entry<K, V>> {
        let slot = self.order.lru_slot()?;
        let hash = self.order.get(slot)?.key_hash;
        self.index.remove_entry(hash, |&s| s == slot);
        self.order.remove(slot)
    }

    fn remove(&mut self, hash: u64, key: &K) -> Option<Entry<K, V>> {
        let slot = self.find(hash, key)?;
        self.index.remove_entry(hash, |&s| s == slot);
        self.order.remove(slot)
    }

    /// Keyed removal with hit/miss accounting.
    fn pop(&mut self, hash: u64, key: &K) -> Option<Entry<K, V>> {
        match self.find(hash, key) {
            Some(slot) => {
                self.hits = self.hits.wrapping_add(1);
                self.index.remove_entry(hash, |&s| s == slot);
                self.order.remove(slot)
            }
            None => {
                self.misses = self.misses.wrapping_add(1);
                None
            }
        }
    }

    /// Removes the MRU (`mru == true`) or LRU end without touching the
    /// counters.
    fn pop_end(&mut self, mru: bool) -> Option<Entry<K, V>> {
        let slot = if mru {
            self.order.mru_slot()
        } else {
            self.order.lru_slot()
        }?;
        let hash = self.order.get(slot)?.key_hash;
        self.index.remove_entry(hash, |&s| s == slot);
        self.order.remove(slot)
    }

    fn peek(&self, mru: bool) -> Option<(&K, &V)> {
        let slot = if mru {
            self.order.mru_slot()
        } else {
            self.order.lru_slot()
        }?;
        self.order.get(slot).map(|entry| (&entry.key, &entry.value))
    }

    /// Empties the dictionary and resets the counters. The displaced list
    /// is returned whole so its entries drop outside the critical section.
    fn clear(&mut self) -> RecencyList<Entry<K, V>> {
        self.index.clear();
        self.hits = 0;
        self.misses = 0;
        mem::take(&mut self.order)
    }

    fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order.iter().map(|entry| (&entry.key, &entry.value))
    }

    #[cfg(any(test, debug_assertions))]
    fn debug_validate_invariants(&self) {
        self.order.debug_validate_invariants();
        assert_eq!(self.index.len(), self.order.len());
        assert!(self.order.len() <= self.capacity);
        for entry in self.order.iter() {
            let order = &self.order;
            assert!(
                self.index
                    .get(entry.key_hash, |&s| {
                        order.get(s).map_or(false, |e| e.key == entry.key)
                    })
                    .is_some(),
                "listed entry unreachable through the index"
            );
        }
    }
}

struct Shared<K, V, S> {
    hash_builder: S,
    core: Mutex<DictCore<K, V>>,
    queue: Mutex<PurgeQueue<(K, V)>>,
    callback: Mutex<Option<Arc<dyn EvictionCallback<K, V>>>>,
    // Mirrors `callback.is_some()` so eviction paths can test it without
    // taking the callback lock inside the critical section.
    callback_installed: AtomicBool,
    pending: AtomicU32,
    should_purge: AtomicBool,
    purge_suspended: AtomicBool,
    detect_conflict: AtomicBool,
}

/// Bounded-capacity map with least-recently-used replacement and an
/// optional eviction callback.
///
/// `LruDict` is a cheap-to-clone handle; clones share one dictionary.
/// Handles may be used from any thread (given `Send` contents), and may be
/// captured by the eviction callback for re-entrant access.
///
/// See the [module docs](self) for the critical-section and purge
/// protocol. In short: lookups promote, inserts over capacity displace the
/// tail, displaced pairs are delivered to the callback after the mutating
/// call has already restored a consistent state, and a mutating call that
/// collides with another mutation returns [`Error::Busy`] instead of
/// waiting.
pub struct LruDict<K, V, S = DefaultHashBuilder> {
    shared: Arc<Shared<K, V, S>>,
}

impl<K, V, S> Clone for LruDict<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<K, V> LruDict<K, V>
where
    K: Eq + Hash,
{
    /// Creates a dictionary holding at most `capacity` entries.
    ///
    /// Returns [`Error::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        Self::with_hasher(capacity, DefaultHashBuilder::default())
    }

    /// Creates a dictionary with an eviction callback installed.
    pub fn with_callback(
        capacity: usize,
        callback: Arc<dyn EvictionCallback<K, V>>,
    ) -> Result<Self, Error> {
        Self::from_parts(
            capacity,
            Some(callback),
            true,
            false,
            DefaultHashBuilder::default(),
        )
    }

    /// Starts a [`LruDictBuilder`] for the remaining knobs.
    pub fn builder(capacity: usize) -> LruDictBuilder<K, V> {
        LruDictBuilder::new(capacity)
    }
}

impl<K, V, S> LruDict<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Creates a dictionary that hashes keys with `hash_builder`.
    pub fn with_hasher(capacity: usize, hash_builder: S) -> Result<Self, Error> {
        Self::from_parts(capacity, None, true, false, hash_builder)
    }

    pub(crate) fn from_parts(
        capacity: usize,
        callback: Option<Arc<dyn EvictionCallback<K, V>>>,
        detect_conflict: bool,
        purge_suspended: bool,
        hash_builder: S,
    ) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        let callback_installed = callback.is_some();
        Ok(Self {
            shared: Arc::new(Shared {
                hash_builder,
                core: Mutex::new(DictCore::new(capacity)),
                queue: Mutex::new(PurgeQueue::new()),
                callback: Mutex::new(callback),
                callback_installed: AtomicBool::new(callback_installed),
                pending: AtomicU32::new(0),
                should_purge: AtomicBool::new(false),
                purge_suspended: AtomicBool::new(purge_suspended),
                detect_conflict: AtomicBool::new(detect_conflict),
            }),
        })
    }

    #[inline]
    fn hash_of(&self, key: &K) -> u64 {
        self.shared.hash_builder.hash_one(key)
    }

    /// Entry gate for mutating operations: refuse when another mutation
    /// holds the critical section (unless detection is off, in which case
    /// the caller has taken on serialization and we block).
    fn lock_core(&self) -> Result<MutexGuard<'_, DictCore<K, V>>, Error> {
        if self.shared.detect_conflict.load(Ordering::Relaxed) {
            self.shared.core.try_lock().ok_or(Error::Busy)
        } else {
            Ok(self.shared.core.lock())
        }
    }

    /// Read-only entry: blocks briefly, never refuses. Must not be
    /// reached from key `Hash`/`Eq` code (use mutating operations there,
    /// which refuse instead of deadlocking).
    fn read_core(&self) -> MutexGuard<'_, DictCore<K, V>> {
        self.shared.core.lock()
    }

    /// Stages a displaced entry for callback delivery, or releases it on
    /// the spot when nothing foreign can run: no callback installed and
    /// both key and value have trivial destructors.
    ///
    /// Called with the core lock held; the queue lock nests inside it.
    fn stage(&self, entry: Entry<K, V>) {
        let must_defer = self.shared.callback_installed.load(Ordering::Relaxed)
            || mem::needs_drop::<K>()
            || mem::needs_drop::<V>();
        if must_defer {
            let mut queue = self.shared.queue.lock();
            queue.append((entry.key, entry.value));
            self.shared.should_purge.store(true, Ordering::Relaxed);
        }
    }

    /// Claims and delivers queued evictions. Returns the number of
    /// entries this call drained.
    fn drain_purge(&self, force: bool) -> usize {
        if !force {
            if self.shared.purge_suspended.load(Ordering::Relaxed) {
                return 0;
            }
            if !self.shared.should_purge.load(Ordering::Relaxed) {
                return 0;
            }
        }

        // Pin the callback for this pass; a mid-drain set_callback applies
        // to entries a later claim reaches.
        let callback = self.shared.callback.lock().clone();

        let batch = {
            let mut queue = self.shared.queue.lock();
            if queue.is_empty() {
                self.shared.should_purge.store(false, Ordering::Relaxed);
                return 0;
            }
            if self.shared.pending.load(Ordering::Acquire) >= PENDING_MAX {
                return 0;
            }
            self.shared.pending.fetch_add(1, Ordering::AcqRel);
            queue.claim()
        };

        let drained = batch.len();
        match callback {
            Some(callback) => {
                for (key, value) in batch {
                    let delivery =
                        catch_unwind(AssertUnwindSafe(|| callback.on_evict(key, value)));
                    if delivery.is_err() {
                        log::error!(
                            "eviction callback panicked; entry dropped, purge continues"
                        );
                    }
                }
            }
            // No callback: the claimed entries drop here, outside the
            // critical section.
            None => drop(batch),
        }

        // Last worker out compacts the consumed prefix.
        if self.shared.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            let mut queue = self.shared.queue.lock();
            if self.shared.pending.load(Ordering::Acquire) == 0 {
                queue.reclaim();
            }
        }
        drained
    }

    /// Inserts or replaces `key`'s entry, making it the MRU entry.
    ///
    /// Returns the value it replaced, if any. A new key inserted at
    /// capacity displaces the LRU entry to the purge queue. Hit/miss
    /// counters are unaffected.
    pub fn insert(&self, key: K, value: V) -> Result<Option<V>, Error> {
        let hash = self.hash_of(&key);
        let replaced = {
            let mut core = self.lock_core()?;
            let (replaced, evicted) = core.assign(hash, key, value);
            if let Some(entry) = evicted {
                self.stage(entry);
            }
            #[cfg(debug_assertions)]
            core.debug_validate_invariants();
            replaced
        };
        self.drain_purge(false);
        Ok(replaced)
    }

    /// Returns `key`'s value and promotes it to MRU.
    ///
    /// A hit increments `hits`; a miss increments `misses` and returns
    /// [`Error::NotFound`].
    pub fn get(&self, key: &K) -> Result<V, Error>
    where
        V: Clone,
    {
        let hash = self.hash_of(key);
        let mut core = self.lock_core()?;
        match core.lookup(hash, key) {
            Some(value) => Ok(value.clone()),
            None => Err(Error::NotFound),
        }
    }

    /// Like [`get`](Self::get), but a miss returns `default` instead of
    /// failing. The miss still counts.
    pub fn get_or(&self, key: &K, default: V) -> Result<V, Error>
    where
        V: Clone,
    {
        let hash = self.hash_of(key);
        let mut core = self.lock_core()?;
        match core.lookup(hash, key) {
            Some(value) => Ok(value.clone()),
            None => Ok(default),
        }
    }

    /// Returns `key`'s value (a hit, promoting it), or inserts `default`
    /// and returns it. The insert path counts neither a hit nor a miss
    /// and may evict. The key is hashed exactly once.
    pub fn get_or_insert(&self, key: K, default: V) -> Result<V, Error>
    where
        V: Clone,
    {
        let hash = self.hash_of(&key);
        let result = {
            let mut core = self.lock_core()?;
            match core.find(hash, &key) {
                Some(slot) => core
                    .promote_hit(slot)
                    .expect("found slot missing from recency list")
                    .clone(),
                None => {
                    let result = default.clone();
                    if let Some(entry) = core.insert_absent(hash, key, default) {
                        self.stage(entry);
                    }
                    result
                }
            }
        };
        self.drain_purge(false);
        Ok(result)
    }

    /// Returns `true` if `key` is present. Never promotes and never
    /// touches the counters.
    pub fn contains(&self, key: &K) -> bool {
        let hash = self.hash_of(key);
        self.read_core().find(hash, key).is_some()
    }

    /// Removes `key`'s entry and returns its value, or
    /// [`Error::NotFound`]. Counters are unaffected.
    pub fn remove(&self, key: &K) -> Result<V, Error> {
        let hash = self.hash_of(key);
        let entry = {
            let mut core = self.lock_core()?;
            core.remove(hash, key).ok_or(Error::NotFound)?
        };
        self.drain_purge(false);
        let Entry { value, .. } = entry;
        Ok(value)
    }

    /// Removes `key`'s entry and returns its value, counting a hit; a
    /// miss counts and returns [`Error::NotFound`].
    pub fn pop(&self, key: &K) -> Result<V, Error> {
        let hash = self.hash_of(key);
        let entry = {
            let mut core = self.lock_core()?;
            core.pop(hash, key)
        };
        self.drain_purge(false);
        match entry {
            Some(Entry { value, .. }) => Ok(value),
            None => Err(Error::NotFound),
        }
    }

    /// Like [`pop`](Self::pop), but a miss returns `default`. The miss
    /// still counts.
    pub fn pop_or(&self, key: &K, default: V) -> Result<V, Error> {
        let hash = self.hash_of(key);
        let entry = {
            let mut core = self.lock_core()?;
            core.pop(hash, key)
        };
        self.drain_purge(false);
        match entry {
            Some(Entry { value, .. }) => Ok(value),
            None => Ok(default),
        }
    }

    /// Removes and returns the most-recently-used pair, or
    /// [`Error::Empty`]. Counters are unaffected.
    pub fn pop_mru(&self) -> Result<(K, V), Error> {
        self.pop_end(true)
    }

    /// Removes and returns the least-recently-used pair, or
    /// [`Error::Empty`]. Counters are unaffected.
    pub fn pop_lru(&self) -> Result<(K, V), Error> {
        self.pop_end(false)
    }

    fn pop_end(&self, mru: bool) -> Result<(K, V), Error> {
        let entry = {
            let mut core = self.lock_core()?;
            core.pop_end(mru).ok_or(Error::Empty)?
        };
        self.drain_purge(false);
        Ok((entry.key, entry.value))
    }

    /// Returns the MRU pair without promoting or counting.
    pub fn peek_mru(&self) -> Result<(K, V), Error>
    where
        K: Clone,
        V: Clone,
    {
        self.read_core()
            .peek(true)
            .map(|(k, v)| (k.clone(), v.clone()))
            .ok_or(Error::Empty)
    }

    /// Returns the LRU pair without promoting or counting.
    pub fn peek_lru(&self) -> Result<(K, V), Error>
    where
        K: Clone,
        V: Clone,
    {
        self.read_core()
            .peek(false)
            .map(|(k, v)| (k.clone(), v.clone()))
            .ok_or(Error::Empty)
    }

    /// Empties the dictionary and zeroes the hit/miss counters.
    ///
    /// Displaced entries are **not** delivered to the callback: clearing
    /// is an administrative reset, and a burst of callbacks here would be
    /// a surprise. Their destructors still run outside the critical
    /// section.
    pub fn clear(&self) -> Result<(), Error> {
        let displaced = {
            let mut core = self.lock_core()?;
            core.clear()
        };
        drop(displaced);
        self.drain_purge(false);
        Ok(())
    }

    /// Applies `pairs` in iteration order, as if by repeated
    /// [`insert`](Self::insert).
    ///
    /// The source is consumed in batches of at most 128 pairs per
    /// critical section; replaced values are released and the purge queue
    /// drained between batches, so an unbounded source never pins the
    /// dictionary. Each pair is applied exactly once, in order; an error
    /// aborts the remainder (already-applied pairs stay applied).
    pub fn update<I>(&self, pairs: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut iter = pairs.into_iter();
        loop {
            let batch: Vec<(K, V)> = iter.by_ref().take(UPDATE_BATCH).collect();
            if batch.is_empty() {
                return Ok(());
            }
            let hashed: Vec<(u64, K, V)> = batch
                .into_iter()
                .map(|(key, value)| (self.hash_of(&key), key, value))
                .collect();

            let mut replaced: Vec<V> = Vec::new();
            {
                let mut core = self.lock_core()?;
                for (hash, key, value) in hashed {
                    let (old, evicted) = core.assign(hash, key, value);
                    if let Some(old) = old {
                        replaced.push(old);
                    }
                    if let Some(entry) = evicted {
                        self.stage(entry);
                    }
                }
                #[cfg(debug_assertions)]
                core.debug_validate_invariants();
            }
            drop(replaced);
            self.drain_purge(false);
        }
    }

    /// Changes the capacity bound, evicting LRU entries while the
    /// dictionary is over the new bound.
    ///
    /// Returns [`Error::InvalidCapacity`] when `new_capacity` is zero.
    pub fn resize(&self, new_capacity: usize) -> Result<(), Error> {
        if new_capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        {
            let mut core = self.lock_core()?;
            core.capacity = new_capacity;
            while core.len() > new_capacity {
                match core.evict_lru() {
                    Some(entry) => self.stage(entry),
                    None => break,
                }
            }
            #[cfg(debug_assertions)]
            core.debug_validate_invariants();
        }
        self.drain_purge(false);
        Ok(())
    }

    /// Keys in MRU-to-LRU order.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.read_core().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Values in MRU-to-LRU order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.read_core().iter().map(|(_, v)| v.clone()).collect()
    }

    /// `(key, value)` pairs in MRU-to-LRU order.
    pub fn items(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.read_core()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.read_core().len()
    }

    /// Returns `true` if the dictionary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current capacity bound.
    pub fn capacity(&self) -> usize {
        self.read_core().capacity
    }

    /// Snapshot of the hit/miss counters.
    pub fn stats(&self) -> Stats {
        let core = self.read_core();
        Stats {
            hits: core.hits,
            misses: core.misses,
        }
    }

    /// Forces a drain of the purge queue, even while automatic purging is
    /// suspended. Returns the number of entries this call delivered
    /// (possibly zero when another drain claimed them first).
    pub fn purge(&self) -> usize {
        self.drain_purge(true)
    }
}

// Knob accessors; none of these need the key bounds.
impl<K, V, S> LruDict<K, V, S> {
    /// Replaces the eviction callback (`None` disables it).
    ///
    /// Entries already queued are delivered to whichever callback is
    /// current when a drain claims them.
    pub fn set_callback(&self, callback: Option<Arc<dyn EvictionCallback<K, V>>>) {
        let previous = {
            let mut slot = self.shared.callback.lock();
            self.shared
                .callback_installed
                .store(callback.is_some(), Ordering::Relaxed);
            mem::replace(&mut *slot, callback)
        };
        drop(previous);
    }

    /// Current eviction callback, if any.
    pub fn callback(&self) -> Option<Arc<dyn EvictionCallback<K, V>>> {
        self.shared.callback.lock().clone()
    }

    /// Whether mutating calls refuse with [`Error::Busy`] on contention
    /// (`true`, the default) or block (`false`).
    pub fn detect_conflict(&self) -> bool {
        self.shared.detect_conflict.load(Ordering::Relaxed)
    }

    /// Sets the conflict-detection mode. Turning it off makes the caller
    /// responsible for serialization: re-entrant mutation from key code
    /// will deadlock instead of being refused.
    pub fn set_detect_conflict(&self, on: bool) {
        self.shared.detect_conflict.store(on, Ordering::Relaxed);
    }

    /// Whether automatic purge drains are currently suspended.
    pub fn purge_suspended(&self) -> bool {
        self.shared.purge_suspended.load(Ordering::Relaxed)
    }

    /// Suspends or resumes automatic purge drains. [`LruDict::purge`]
    /// drains regardless.
    pub fn set_purge_suspended(&self, suspended: bool) {
        self.shared.purge_suspended.store(suspended, Ordering::Relaxed);
    }

    /// Number of evicted entries awaiting callback delivery.
    pub fn purge_queue_size(&self) -> usize {
        self.shared.queue.lock().len()
    }
}

impl<K, V, S> fmt::Debug for LruDict<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.shared.core.lock();
        f.debug_struct("LruDict")
            .field("len", &core.order.len())
            .field("capacity", &core.capacity)
            .finish_non_exhaustive()
    }
}
