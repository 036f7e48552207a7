//! # pairsort
//!
//! Sort a list of free-text items by answering pairwise "which is bigger"
//! questions, with a partition-based sort driven by human judgment instead of
//! a comparator function.
//!
//! The core is a resumable state machine: [`initialize`] opens a sort walk
//! over an item list, and each call to [`advance`] consumes one boolean
//! answer to the currently displayed pivot-vs-compare pair and returns the
//! next [`SortWalkState`]. Answers are recorded as symmetric before/after
//! relations on the items; the engine asks only about unresolved pairs and
//! partitions exactly as quicksort would, once it has enough answers. When
//! the state reaches [`Phase::Done`], its items hold the final order and the
//! caller commits them back to the owning [`ItemList`].
mod engine;
mod graph;
mod item;
mod list;
mod store;

pub use engine::{advance, initialize, partition, Phase, SortWalkState};
pub use graph::{derived_order, would_contradict};
pub use item::{has_relation, next_unresolved_index, Item, ItemId};
pub use list::{parse_batch, ItemList};
pub use store::{Store, DEFAULT_ITEMS, STORAGE_KEY};
