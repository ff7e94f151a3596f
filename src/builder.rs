//! Builder for dictionaries with non-default knobs.
//!
//! [`LruDict::new`](crate::dict::LruDict::new) covers the common case;
//! the builder exists for the long tail: installing a callback, starting
//! with purging suspended, opting out of conflict detection, or swapping
//! the hasher.
//!
//! ```
//! use std::sync::Arc;
//! use lrudict::builder::LruDictBuilder;
//!
//! use lrudict::dict::LruDict;
//!
//! let dict: LruDict<u64, String> = LruDictBuilder::new(64)
//!     .callback(Arc::new(|key: u64, value: String| {
//!         let _ = (key, value);
//!     }))
//!     .detect_conflict(true)
//!     .build()
//!     .unwrap();
//! dict.insert(1, "one".to_string()).unwrap();
//! ```

use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use crate::dict::{DefaultHashBuilder, LruDict};
use crate::error::Error;
use crate::traits::EvictionCallback;

/// Configures and constructs an [`LruDict`].
pub struct LruDictBuilder<K, V, S = DefaultHashBuilder> {
    capacity: usize,
    callback: Option<Arc<dyn EvictionCallback<K, V>>>,
    detect_conflict: bool,
    purge_suspended: bool,
    hash_builder: S,
}

impl<K, V> LruDictBuilder<K, V> {
    /// Starts a builder for a dictionary bounded at `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            callback: None,
            detect_conflict: true,
            purge_suspended: false,
            hash_builder: DefaultHashBuilder::default(),
        }
    }
}

impl<K, V, S> LruDictBuilder<K, V, S> {
    /// Installs an eviction callback.
    pub fn callback(mut self, callback: Arc<dyn EvictionCallback<K, V>>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Sets whether contended mutations are refused with
    /// [`Error::Busy`](crate::error::Error::Busy) (default `true`) or
    /// block.
    pub fn detect_conflict(mut self, on: bool) -> Self {
        self.detect_conflict = on;
        self
    }

    /// Starts with automatic purge drains suspended.
    pub fn suspend_purge(mut self, suspended: bool) -> Self {
        self.purge_suspended = suspended;
        self
    }

    /// Swaps the hash builder used for keys.
    pub fn hasher<S2>(self, hash_builder: S2) -> LruDictBuilder<K, V, S2> {
        LruDictBuilder {
            capacity: self.capacity,
            callback: self.callback,
            detect_conflict: self.detect_conflict,
            purge_suspended: self.purge_suspended,
            hash_builder,
        }
    }
}

impl<K, V, S> LruDictBuilder<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Builds the dictionary.
    ///
    /// Returns [`Error::InvalidCapacity`] when the capacity is zero.
    pub fn build(self) -> Result<LruDict<K, V, S>, Error> {
        LruDict::from_parts(
            self.capacity,
            self.callback,
            self.detect_conflict,
            self.purge_suspended,
            self.hash_builder,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn defaults_match_plain_constructor() {
        let dict: LruDict<u32, u32> = LruDictBuilder::new(8).build().unwrap();
        assert_eq!(dict.capacity(), 8);
        assert!(dict.detect_conflict());
        assert!(!dict.purge_suspended());
        assert!(dict.callback().is_none());
    }

    #[test]
    fn zero_capacity_fails_at_build() {
        let result: Result<LruDict<u32, u32>, _> = LruDictBuilder::new(0).build();
        assert_eq!(result.unwrap_err(), Error::InvalidCapacity);
    }

    #[test]
    fn knobs_carry_through() {
        let dict: LruDict<u32, u32> = LruDictBuilder::new(4)
            .detect_conflict(false)
            .suspend_purge(true)
            .build()
            .unwrap();
        assert!(!dict.detect_conflict());
        assert!(dict.purge_suspended());
    }

    #[test]
    fn callback_is_installed_and_fires() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let dict: LruDict<u32, u32> = LruDictBuilder::new(1)
            .callback(Arc::new(move |k: u32, v: u32| sink.lock().unwrap().push((k, v))))
            .build()
            .unwrap();

        dict.insert(1, 10).unwrap();
        dict.insert(2, 20).unwrap();
        assert_eq!(log.lock().unwrap().as_slice(), &[(1, 10)]);
    }

    #[test]
    fn custom_hasher_builds() {
        let dict: LruDict<u32, u32, std::collections::hash_map::RandomState> =
            LruDictBuilder::new(4)
                .hasher(std::collections::hash_map::RandomState::new())
                .build()
                .unwrap();
        dict.insert(1, 10).unwrap();
        assert_eq!(dict.get(&1).unwrap(), 10);
    }
}
