//! Removal strategies: which node a queue gives up next.
//!
//! A [`Selector`] only picks; the queue performs the splice. Strategies
//! never see an empty list through the queue, but they must still answer
//! `None` for one.

use serde::Serialize;
use tracing::{debug, trace};

use tasklist_core::config::{SchedulerConfig, DEFAULT_BUCKET_COUNT, DEFAULT_PRIORITY_MAX_WEIGHT};

use crate::list::LinkedList;
use crate::node::{NodeId, Priority};
use crate::random::RandomSource;

/// How a node came to be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "bucket", rename_all = "snake_case")]
pub enum SelectionMode {
    /// Plain FIFO: the oldest node.
    Front,
    /// Highest priority, earliest among ties.
    PriorityMax,
    /// First node whose priority equals the drawn bucket.
    BucketHit(u8),
    /// No node matched the drawn bucket; fell back to the front.
    BucketMiss(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub id: NodeId,
    pub mode: SelectionMode,
}

pub trait Selector {
    fn select<T>(&mut self, list: &LinkedList<T>) -> Option<Selection>;
}

/// Always the front node.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fifo;

impl Selector for Fifo {
    fn select<T>(&mut self, list: &LinkedList<T>) -> Option<Selection> {
        list.front().map(|id| Selection {
            id,
            mode: SelectionMode::Front,
        })
    }
}

/// Scan front to back for the highest priority. Only a strictly greater
/// priority displaces the current best, so the earliest of equal maxima
/// wins. A priority-10 node ends the scan immediately.
pub fn select_priority_max<T>(list: &LinkedList<T>) -> Option<Selection> {
    let mut nodes = list.iter();
    let (mut best_id, first) = nodes.next()?;
    let mut best = first.priority();

    if !best.is_max() {
        for (id, node) in nodes {
            let priority = node.priority();
            if priority > best {
                best_id = id;
                best = priority;
                if best.is_max() {
                    trace!(slot = id.index(), "max priority found, scan stopped");
                    break;
                }
            }
        }
    }

    Some(Selection {
        id: best_id,
        mode: SelectionMode::PriorityMax,
    })
}

/// First node, front to back, whose priority is exactly `bucket`. A miss
/// falls back to the front node so a bucket draw never blocks progress.
pub fn select_bucket<T>(list: &LinkedList<T>, bucket: u8) -> Option<Selection> {
    let hit = list
        .iter()
        .find(|(_, node)| node.priority().get() == bucket)
        .map(|(id, _)| id);

    match hit {
        Some(id) => Some(Selection {
            id,
            mode: SelectionMode::BucketHit(bucket),
        }),
        None => list.front().map(|id| Selection {
            id,
            mode: SelectionMode::BucketMiss(bucket),
        }),
    }
}

/// Probability split between the two priority modes, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeWeights {
    priority_max: u32,
}

impl ModeWeights {
    /// `priority_max` is saturated to 100.
    pub fn new(priority_max: u32) -> Self {
        Self {
            priority_max: priority_max.min(100),
        }
    }

    pub fn priority_max(&self) -> u32 {
        self.priority_max
    }

    pub fn random_bucket(&self) -> u32 {
        100 - self.priority_max
    }
}

impl Default for ModeWeights {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY_MAX_WEIGHT)
    }
}

/// Priority-aware, starvation-resistant selection.
///
/// Every call draws a mode: with probability `weights.priority_max()` the
/// highest-priority node is taken, otherwise a bucket in
/// `0..bucket_count` is drawn and the first node of exactly that priority
/// is taken, falling back to the front on a miss.
#[derive(Debug, Clone)]
pub struct PriorityRandomized<R> {
    weights: ModeWeights,
    bucket_count: u8,
    rng: R,
}

impl<R: RandomSource> PriorityRandomized<R> {
    pub fn new(rng: R) -> Self {
        Self {
            weights: ModeWeights::default(),
            bucket_count: DEFAULT_BUCKET_COUNT,
            rng,
        }
    }

    pub fn from_config(config: &SchedulerConfig, rng: R) -> Self {
        Self::new(rng)
            .with_weights(ModeWeights::new(config.priority_max_weight))
            .with_bucket_count(config.bucket_count)
    }

    pub fn with_weights(mut self, weights: ModeWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Buckets are drawn from `0..bucket_count`, which is kept within
    /// `1..=Priority::MAX + 1`.
    pub fn with_bucket_count(mut self, bucket_count: u8) -> Self {
        self.bucket_count = bucket_count.clamp(1, Priority::MAX.get() + 1);
        self
    }

    pub fn weights(&self) -> ModeWeights {
        self.weights
    }

    pub fn bucket_count(&self) -> u8 {
        self.bucket_count
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: RandomSource> Selector for PriorityRandomized<R> {
    fn select<T>(&mut self, list: &LinkedList<T>) -> Option<Selection> {
        if list.is_empty() {
            return None;
        }

        let roll = self.rng.next_below(100);
        let selection = if roll < self.weights.priority_max {
            select_priority_max(list)
        } else {
            // bucket_count <= 11, so the cast is lossless.
            let bucket = self.rng.next_below(u32::from(self.bucket_count)) as u8;
            select_bucket(list, bucket)
        };

        if let Some(selection) = &selection {
            debug!(roll, mode = ?selection.mode, slot = selection.id.index(), "selected node");
        }
        selection
    }
}
