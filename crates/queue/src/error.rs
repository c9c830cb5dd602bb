//! Queue error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// A removal was attempted on a container holding zero items.
    #[error("container is empty")]
    EmptyContainer,

    #[error("priority {0} is outside 0..=10")]
    InvalidPriority(i64),
}
