//! In-memory task containers over one doubly linked node arena.
//!
//! - [`Stack`]: last-in-first-out.
//! - [`FifoQueue`]: first-in-first-out.
//! - [`Scheduler`]: priority-aware removal with a random anti-starvation
//!   mode.
//!
//! All containers are single-threaded and report removal from an empty
//! container as [`QueueError::EmptyContainer`].

pub mod error;
pub mod list;
pub mod node;
pub mod queue;
pub mod random;
pub mod selector;
pub mod stack;

pub use error::QueueError;
pub use list::{IntegrityError, LinkedList};
pub use node::{Node, NodeId, Priority};
pub use queue::{FifoQueue, Queue, QueueStats, Scheduler};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use selector::{
    select_bucket, select_priority_max, Fifo, ModeWeights, PriorityRandomized, Selection,
    SelectionMode, Selector,
};
pub use stack::Stack;
