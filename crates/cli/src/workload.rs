//! Generated workloads for the three containers.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use tasklist_core::config::SchedulerConfig;
use tasklist_queue::{
    FifoQueue, Priority, QueueError, QueueStats, RandomSource, Scheduler, Stack,
};

/// One removed item: its arrival number and priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Removed {
    pub id: u32,
    pub priority: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrainReport {
    pub container: &'static str,
    pub order: Vec<Removed>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WaitSummary {
    pub served: u64,
    pub max_wait: u64,
    pub total_wait: u64,
}

impl WaitSummary {
    pub fn mean_wait(&self) -> f64 {
        if self.served == 0 {
            0.0
        } else {
            self.total_wait as f64 / self.served as f64
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub order: Vec<Removed>,
    /// Waits measured in dequeue steps, keyed by priority.
    pub waits: BTreeMap<u8, WaitSummary>,
    pub stats: QueueStats,
}

fn random_priority<R: RandomSource>(rng: &mut R) -> Priority {
    Priority::clamped(i64::from(rng.next_below(u32::from(Priority::MAX.get()) + 1)))
}

pub fn run_lifo(count: u32) -> Result<DrainReport, QueueError> {
    let mut stack = Stack::new();
    for id in 0..count {
        stack.push(id);
    }
    let mut order = Vec::with_capacity(count as usize);
    while !stack.is_empty() {
        order.push(Removed {
            id: stack.pop()?,
            priority: 0,
        });
    }
    Ok(DrainReport {
        container: "lifo",
        order,
    })
}

pub fn run_fifo<R: RandomSource>(count: u32, rng: &mut R) -> Result<DrainReport, QueueError> {
    let mut queue = FifoQueue::new();
    for id in 0..count {
        queue.push(id, random_priority(rng));
    }
    let mut order = Vec::with_capacity(count as usize);
    while !queue.is_empty() {
        let node = queue.dequeue_node()?;
        order.push(Removed {
            id: *node.value(),
            priority: node.priority().get(),
        });
    }
    Ok(DrainReport {
        container: "fifo",
        order,
    })
}

/// Fill the scheduler with `count` items, then for `steps` rounds add one
/// arrival and serve one item, then drain. Each item's wait is the number
/// of dequeues between its arrival and its removal.
pub fn run_schedule<R: RandomSource>(
    config: &SchedulerConfig,
    count: u32,
    steps: u32,
    rng: &mut R,
) -> Result<ScheduleReport, QueueError> {
    let mut scheduler: Scheduler<(u32, u64)> = Scheduler::from_config(config);
    let mut next_id = 0u32;
    let mut clock = 0u64;
    let mut order = Vec::new();
    let mut waits: BTreeMap<u8, WaitSummary> = BTreeMap::new();

    let mut arrive = |scheduler: &mut Scheduler<(u32, u64)>, clock: u64, rng: &mut R| {
        scheduler.push((next_id, clock), random_priority(rng));
        next_id += 1;
    };

    for _ in 0..count {
        arrive(&mut scheduler, clock, rng);
    }
    info!(queued = scheduler.len(), steps, "scheduler filled");

    let mut serve = |scheduler: &mut Scheduler<(u32, u64)>, clock: u64| -> Result<(), QueueError> {
        let node = scheduler.dequeue_node()?;
        let priority = node.priority().get();
        let (id, arrived) = node.into_value();
        let wait = clock - arrived;
        let summary = waits.entry(priority).or_default();
        summary.served += 1;
        summary.total_wait += wait;
        summary.max_wait = summary.max_wait.max(wait);
        debug!(id, priority, wait, "served");
        order.push(Removed { id, priority });
        Ok(())
    };

    for _ in 0..steps {
        arrive(&mut scheduler, clock, rng);
        serve(&mut scheduler, clock)?;
        clock += 1;
    }
    while !scheduler.is_empty() {
        serve(&mut scheduler, clock)?;
        clock += 1;
    }

    Ok(ScheduleReport {
        order,
        waits,
        stats: scheduler.stats(),
    })
}
