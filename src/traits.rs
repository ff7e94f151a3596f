//! Trait seam between the dictionary and user-supplied eviction handling.

/// Receiver for entries displaced by capacity pressure.
///
/// The dictionary invokes the callback once per evicted entry, outside its
/// critical section, after the mutating operation that caused the eviction
/// has already restored a consistent state. The callback owns the pair it
/// receives.
///
/// Implementations may re-enter the dictionary through its public
/// interface; a mutating re-entry that collides with another mutation in
/// progress observes [`Error::Busy`](crate::error::Error::Busy) rather
/// than deadlocking, provided conflict detection is left enabled.
///
/// A panic escaping the callback is caught, reported through the `log`
/// facade, and does not affect the caller of the operation that triggered
/// the eviction; remaining queued entries are still delivered.
///
/// Any `Fn(K, V) + Send + Sync` closure is a callback:
///
/// ```
/// use std::sync::Arc;
/// use lrudict::dict::LruDict;
///
/// let dict: LruDict<u32, &str> = LruDict::with_callback(
///     1,
///     Arc::new(|key: u32, value: &str| {
///         let _ = (key, value);
///     }),
/// )
/// .unwrap();
/// dict.insert(1, "a").unwrap();
/// dict.insert(2, "b").unwrap(); // evicts (1, "a") and delivers it
/// ```
pub trait EvictionCallback<K, V>: Send + Sync {
    /// Called with each evicted `(key, value)` pair.
    fn on_evict(&self, key: K, value: V);
}

impl<K, V, F> EvictionCallback<K, V> for F
where
    F: Fn(K, V) + Send + Sync,
{
    fn on_evict(&self, key: K, value: V) {
        self(key, value)
    }
}
