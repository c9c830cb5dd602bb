//! Queues over the linked-list core, parameterized by a removal strategy.
//!
//! [`FifoQueue`] removes the oldest item. [`Scheduler`] removes by the
//! priority-randomized policy in [`PriorityRandomized`]. Both share the
//! same enqueue path and the same splice.

use serde::Serialize;
use tracing::{debug, warn};

use tasklist_core::config::{PriorityPolicy, SchedulerConfig};

use crate::error::QueueError;
use crate::list::{Iter, LinkedList};
use crate::node::{Node, NodeId, Priority};
use crate::random::{RandomSource, SeededRandom};
use crate::selector::{Fifo, PriorityRandomized, SelectionMode, Selector};

/// Counters since construction (or the last [`Queue::clear`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub enqueued: u64,
    pub dequeued: u64,
    pub front_selections: u64,
    pub priority_max_selections: u64,
    pub bucket_hits: u64,
    /// Bucket draws that matched nothing and fell back to the front.
    pub bucket_misses: u64,
}

impl QueueStats {
    fn record(&mut self, mode: SelectionMode) {
        self.dequeued += 1;
        match mode {
            SelectionMode::Front => self.front_selections += 1,
            SelectionMode::PriorityMax => self.priority_max_selections += 1,
            SelectionMode::BucketHit(_) => self.bucket_hits += 1,
            SelectionMode::BucketMiss(_) => self.bucket_misses += 1,
        }
    }
}

/// Single-threaded queue with no internal locking; wrap it in a lock to
/// share across threads.
#[derive(Debug, Clone)]
pub struct Queue<T, S = Fifo> {
    list: LinkedList<T>,
    selector: S,
    policy: PriorityPolicy,
    stats: QueueStats,
    last_mode: Option<SelectionMode>,
}

pub type FifoQueue<T> = Queue<T, Fifo>;

pub type Scheduler<T, R = SeededRandom> = Queue<T, PriorityRandomized<R>>;

impl<T> Queue<T, Fifo> {
    pub fn new() -> Self {
        Self::with_selector(Fifo)
    }
}

impl<T> Default for Queue<T, Fifo> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R: RandomSource> Queue<T, PriorityRandomized<R>> {
    /// Scheduler with default weights drawing from `rng`.
    pub fn with_random(rng: R) -> Self {
        Self::with_selector(PriorityRandomized::new(rng))
    }
}

impl<T> Queue<T, PriorityRandomized<SeededRandom>> {
    pub fn from_config(config: &SchedulerConfig) -> Self {
        let rng = SeededRandom::from_optional_seed(config.seed);
        Self::with_selector(PriorityRandomized::from_config(config, rng))
            .with_policy(config.priority_policy)
    }
}

impl<T, S: Selector> Queue<T, S> {
    pub fn with_selector(selector: S) -> Self {
        Self {
            list: LinkedList::new(),
            selector,
            policy: PriorityPolicy::Reject,
            stats: QueueStats::default(),
            last_mode: None,
        }
    }

    /// How out-of-range priorities are handled by [`enqueue_with_priority`].
    ///
    /// [`enqueue_with_priority`]: Queue::enqueue_with_priority
    pub fn with_policy(mut self, policy: PriorityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append at the back with priority 0. O(1).
    pub fn enqueue(&mut self, value: T) -> NodeId {
        self.push(value, Priority::MIN)
    }

    /// Append at the back. Priorities outside 0..=10 are rejected or
    /// clamped according to the queue's [`PriorityPolicy`].
    pub fn enqueue_with_priority(&mut self, value: T, priority: i64) -> Result<NodeId, QueueError> {
        let priority = match self.policy {
            PriorityPolicy::Reject => Priority::new(priority)?,
            PriorityPolicy::Clamp => {
                let clamped = Priority::clamped(priority);
                if i64::from(clamped.get()) != priority {
                    warn!(requested = priority, clamped = %clamped, "priority out of range, clamped");
                }
                clamped
            }
        };
        Ok(self.push(value, priority))
    }

    pub fn push(&mut self, value: T, priority: Priority) -> NodeId {
        self.stats.enqueued += 1;
        self.list.push_back(value, priority)
    }

    /// Remove the node the selector picks and return its value.
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        self.dequeue_node().map(Node::into_value)
    }

    /// Remove the node the selector picks and return it whole.
    pub fn dequeue_node(&mut self) -> Result<Node<T>, QueueError> {
        let selection = self
            .selector
            .select(&self.list)
            .ok_or(QueueError::EmptyContainer)?;
        let node = self
            .list
            .unlink(selection.id)
            .ok_or(QueueError::EmptyContainer)?;

        self.stats.record(selection.mode);
        self.last_mode = Some(selection.mode);
        debug!(
            priority = %node.priority(),
            mode = ?selection.mode,
            remaining = self.list.len(),
            "dequeued"
        );
        Ok(node)
    }

    pub fn peek_front(&self) -> Option<&Node<T>> {
        self.list.front().and_then(|id| self.list.get(id))
    }

    pub fn peek_back(&self) -> Option<&Node<T>> {
        self.list.back().and_then(|id| self.list.get(id))
    }

    pub fn front_mut(&mut self) -> Option<&mut Node<T>> {
        let id = self.list.front()?;
        self.list.get_mut(id)
    }

    pub fn back_mut(&mut self) -> Option<&mut Node<T>> {
        let id = self.list.back()?;
        self.list.get_mut(id)
    }

    pub fn for_each_mut<F>(&mut self, f: F)
    where
        F: FnMut(&mut Node<T>),
    {
        self.list.for_each_mut(f);
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> Iter<'_, T> {
        self.list.iter()
    }

    /// Newest to oldest.
    pub fn iter_rev(&self) -> Iter<'_, T> {
        self.list.iter_rev()
    }

    pub fn list(&self) -> &LinkedList<T> {
        &self.list
    }

    pub fn selector_mut(&mut self) -> &mut S {
        &mut self.selector
    }

    pub fn stats(&self) -> QueueStats {
        self.stats
    }

    /// Mode of the most recent successful dequeue.
    pub fn last_mode(&self) -> Option<SelectionMode> {
        self.last_mode
    }

    /// Drop every queued item and reset the counters.
    pub fn clear(&mut self) {
        self.list.clear();
        self.stats = QueueStats::default();
        self.last_mode = None;
    }
}
