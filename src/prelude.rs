pub use crate::builder::LruDictBuilder;
pub use crate::dict::{DefaultHashBuilder, LruDict};
pub use crate::ds::{PurgeQueue, RecencyList, SlotArena, SlotId};
pub use crate::error::Error;
pub use crate::stats::Stats;
pub use crate::traits::EvictionCallback;
