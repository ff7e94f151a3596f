pub mod purge_queue;
pub mod recency_list;
pub mod slot_arena;

pub use purge_queue::PurgeQueue;
pub use recency_list::RecencyList;
pub use slot_arena::{SlotArena, SlotId};
