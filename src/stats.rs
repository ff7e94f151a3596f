//! Hit/miss accounting snapshot.

use std::fmt;

/// Point-in-time snapshot of a dictionary's hit and miss counters.
///
/// Both counters are modular: they wrap on overflow rather than saturate,
/// so long-lived dictionaries report deltas correctly when sampled
/// periodically. [`clear`](crate::dict::LruDict::clear) resets both to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Lookups that found their key.
    pub hits: u64,
    /// Lookups that did not.
    pub misses: u64,
}

impl Stats {
    /// Fraction of counted lookups that hit, or `None` when nothing has
    /// been counted yet.
    pub fn hit_ratio(&self) -> Option<f64> {
        let total = self.hits.checked_add(self.misses)?;
        if total == 0 {
            None
        } else {
            Some(self.hits as f64 / total as f64)
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hits: {}, misses: {}", self.hits, self.misses)
    }
}
