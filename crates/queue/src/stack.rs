//! Last-in-first-out container on the same node arena as the queues.

use tracing::trace;

use crate::error::QueueError;
use crate::list::LinkedList;
use crate::node::{Node, Priority};

#[derive(Debug, Clone)]
pub struct Stack<T> {
    list: LinkedList<T>,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self {
            list: LinkedList::new(),
        }
    }

    pub fn push(&mut self, value: T) {
        self.list.push_back(value, Priority::MIN);
    }

    /// Remove and return the most recently pushed value.
    pub fn pop(&mut self) -> Result<T, QueueError> {
        let node = self.list.pop_back().ok_or(QueueError::EmptyContainer)?;
        trace!(remaining = self.list.len(), "popped");
        Ok(node.into_value())
    }

    pub fn peek(&self) -> Option<&T> {
        self.list
            .back()
            .and_then(|id| self.list.get(id))
            .map(Node::value)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Top of the stack first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.list.iter_rev().map(|(_, node)| node.value())
    }

    pub fn list(&self) -> &LinkedList<T> {
        &self.list
    }
}
