//! List nodes and the priority scale they carry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QueueError;

/// Priority level of a queued item, 0 (lowest) through 10 (highest).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: Priority = Priority(0);
    pub const MAX: Priority = Priority(10);

    /// Validate a raw priority.
    pub fn new(raw: i64) -> Result<Self, QueueError> {
        if (Self::MIN.0 as i64..=Self::MAX.0 as i64).contains(&raw) {
            Ok(Priority(raw as u8))
        } else {
            Err(QueueError::InvalidPriority(raw))
        }
    }

    /// Saturate a raw priority into range.
    pub fn clamped(raw: i64) -> Self {
        Priority(raw.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }
}

impl TryFrom<i64> for Priority {
    type Error = QueueError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Priority::new(raw)
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a node inside a [`LinkedList`](crate::list::LinkedList).
///
/// Only meaningful for the list that handed it out. Once the node is
/// unlinked the handle stops resolving, even after its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl NodeId {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(self) -> usize {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// A list element. `next` points toward the back (newer items), `prev`
/// toward the front (older items).
#[derive(Debug, Clone)]
pub struct Node<T> {
    value: T,
    priority: Priority,
    pub(crate) next: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
}

impl<T> Node<T> {
    pub fn new(value: T, priority: Priority) -> Self {
        Self {
            value,
            priority,
            next: None,
            prev: None,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
