/// Integration tests for the task containers covering ordering, the
/// priority selection policy, structural integrity under interleaved use,
/// and starvation resistance.

use tasklist_core::config::{PriorityPolicy, SchedulerConfig};
use tasklist_queue::{
    FifoQueue, Queue, QueueError, RandomSource, Scheduler, ScriptedRandom, SeededRandom,
    SelectionMode, Stack,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Draw that forces priority-max mode under the default 60/40 split.
const FORCE_MAX: u32 = 0;
/// Draw that forces random-bucket mode under the default 60/40 split.
const FORCE_BUCKET: u32 = 99;

fn scheduler_with(script: &[u32]) -> Scheduler<char, ScriptedRandom> {
    Queue::with_random(ScriptedRandom::new(script.iter().copied()))
}

fn enqueue_all(queue: &mut Scheduler<char, ScriptedRandom>, items: &[(char, i64)]) {
    for &(value, priority) in items {
        queue.enqueue_with_priority(value, priority).unwrap();
    }
}

/// Forward and reverse walks must agree and match `len`.
fn assert_consistent<T: PartialEq + std::fmt::Debug, S: tasklist_queue::Selector>(
    queue: &Queue<T, S>,
) {
    queue.list().check_links().unwrap();
    let forward: Vec<&T> = queue.iter().map(|(_, n)| n.value()).collect();
    let mut backward: Vec<&T> = queue.iter_rev().map(|(_, n)| n.value()).collect();
    backward.reverse();
    assert_eq!(forward, backward);
    assert_eq!(forward.len(), queue.len());
    assert_eq!(queue.is_empty(), queue.len() == 0);
    assert_eq!(queue.peek_front().is_none(), queue.is_empty());
    assert_eq!(queue.peek_back().is_none(), queue.is_empty());
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_lifo_property() {
    let mut stack = Stack::new();
    for v in ['a', 'b', 'c'] {
        stack.push(v);
    }
    let popped: Vec<char> = (0..3).map(|_| stack.pop().unwrap()).collect();
    assert_eq!(popped, vec!['c', 'b', 'a']);
}

#[test]
fn test_fifo_property() {
    let mut queue = FifoQueue::new();
    for v in ['a', 'b', 'c'] {
        queue.enqueue_with_priority(v, 4).unwrap();
    }
    let drained: Vec<char> = (0..3).map(|_| queue.dequeue().unwrap()).collect();
    assert_eq!(drained, vec!['a', 'b', 'c']);
}

// ============================================================================
// Priority selection
// ============================================================================

#[test]
fn test_priority_max_tie_break() {
    let mut queue = scheduler_with(&[FORCE_MAX]);
    enqueue_all(&mut queue, &[('a', 5), ('b', 9), ('c', 9), ('d', 3)]);
    assert_eq!(queue.dequeue(), Ok('b'));
    assert_eq!(queue.last_mode(), Some(SelectionMode::PriorityMax));
    assert_consistent(&queue);
}

#[test]
fn test_priority_ten_short_circuit() {
    let mut queue = scheduler_with(&[FORCE_MAX]);
    enqueue_all(&mut queue, &[('a', 2), ('b', 10), ('c', 9)]);
    assert_eq!(queue.dequeue(), Ok('b'));
    assert_consistent(&queue);
}

#[test]
fn test_random_bucket_fallback() {
    let mut queue = scheduler_with(&[FORCE_BUCKET, 3]);
    enqueue_all(&mut queue, &[('a', 7), ('b', 7), ('c', 7)]);
    assert_eq!(queue.dequeue(), Ok('a'));
    assert_eq!(queue.last_mode(), Some(SelectionMode::BucketMiss(3)));
    assert_consistent(&queue);
}

#[test]
fn test_default_buckets_never_target_priority_ten() {
    for draw in 0..=99u32 {
        let mut queue = scheduler_with(&[FORCE_BUCKET, draw]);
        enqueue_all(&mut queue, &[('a', 10), ('b', 10), ('c', 10)]);
        assert_eq!(queue.dequeue(), Ok('a'));
        match queue.last_mode() {
            Some(SelectionMode::BucketMiss(bucket)) => assert!(bucket <= 9, "bucket {bucket}"),
            other => panic!("draw {draw} gave {other:?}"),
        }
    }
}

#[test]
fn test_removed_item_handle_is_dead() {
    let mut queue = scheduler_with(&[FORCE_MAX, FORCE_MAX]);
    let a = queue.enqueue_with_priority('a', 8).unwrap();
    queue.enqueue_with_priority('b', 1).unwrap();
    assert_eq!(queue.dequeue(), Ok('a'));
    let c = queue.enqueue_with_priority('c', 3).unwrap();
    assert!(queue.list().get(a).is_none());
    assert!(queue.list().get(c).is_some());
    assert_consistent(&queue);
}

#[test]
fn test_random_bucket_hit_skips_higher_priorities() {
    let mut queue = scheduler_with(&[FORCE_BUCKET, 2]);
    enqueue_all(&mut queue, &[('a', 9), ('b', 2), ('c', 10)]);
    assert_eq!(queue.dequeue(), Ok('b'));
    assert_eq!(queue.last_mode(), Some(SelectionMode::BucketHit(2)));
}

#[test]
fn test_scripted_full_drain() {
    // max -> 'c'(10); bucket 0 -> 'a'; max -> 'd'(6); bucket miss -> 'b'
    let mut queue = scheduler_with(&[FORCE_MAX, FORCE_BUCKET, 0, FORCE_MAX, FORCE_BUCKET, 9]);
    enqueue_all(&mut queue, &[('a', 0), ('b', 5), ('c', 10), ('d', 6)]);
    let drained: Vec<char> = (0..4).map(|_| queue.dequeue().unwrap()).collect();
    assert_eq!(drained, vec!['c', 'a', 'd', 'b']);
    assert!(queue.is_empty());
    assert_consistent(&queue);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_container_errors() {
    let mut stack: Stack<u32> = Stack::new();
    let mut fifo: FifoQueue<u32> = FifoQueue::new();
    let mut scheduler: Scheduler<u32> = Scheduler::from_config(&SchedulerConfig::default());

    assert_eq!(stack.pop(), Err(QueueError::EmptyContainer));
    assert_eq!(fifo.dequeue(), Err(QueueError::EmptyContainer));
    assert_eq!(scheduler.dequeue(), Err(QueueError::EmptyContainer));

    stack.push(1);
    fifo.enqueue(1);
    scheduler.enqueue(1);
    stack.pop().unwrap();
    fifo.dequeue().unwrap();
    scheduler.dequeue().unwrap();

    assert_eq!(stack.pop(), Err(QueueError::EmptyContainer));
    assert_eq!(fifo.dequeue(), Err(QueueError::EmptyContainer));
    assert_eq!(scheduler.dequeue(), Err(QueueError::EmptyContainer));
}

#[test]
fn test_out_of_range_priority_policies() {
    let mut rejecting: FifoQueue<u32> = FifoQueue::new();
    assert_eq!(
        rejecting.enqueue_with_priority(1, 11),
        Err(QueueError::InvalidPriority(11))
    );

    let mut clamping = FifoQueue::new().with_policy(PriorityPolicy::Clamp);
    clamping.enqueue_with_priority(1u32, 11).unwrap();
    assert!(clamping.peek_front().unwrap().priority().is_max());
}

// ============================================================================
// Structural integrity and conservation
// ============================================================================

#[test]
fn test_interleaved_operations_keep_structure() {
    let mut driver = SeededRandom::from_seed(0xC0FFEE);
    let config = SchedulerConfig {
        seed: Some(17),
        ..Default::default()
    };
    let mut queue: Scheduler<u32> = Scheduler::from_config(&config);
    let mut enqueued = 0u64;
    let mut removed = 0u64;

    for step in 0..2_000u32 {
        if driver.next_below(100) < 55 {
            let priority = i64::from(driver.next_below(11));
            queue.enqueue_with_priority(step, priority).unwrap();
            enqueued += 1;
        } else {
            match queue.dequeue() {
                Ok(_) => removed += 1,
                Err(QueueError::EmptyContainer) => assert!(queue.is_empty()),
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(queue.len() as u64, enqueued - removed);
        if step % 50 == 0 {
            assert_consistent(&queue);
        }
    }

    while queue.dequeue().is_ok() {
        removed += 1;
    }
    assert_eq!(enqueued, removed);
    assert_consistent(&queue);

    let stats = queue.stats();
    assert_eq!(stats.enqueued, enqueued);
    assert_eq!(stats.dequeued, removed);
    assert_eq!(
        stats.priority_max_selections + stats.bucket_hits + stats.bucket_misses,
        removed
    );
}

#[test]
fn test_every_value_comes_out_once() {
    let config = SchedulerConfig {
        seed: Some(99),
        ..Default::default()
    };
    let mut queue: Scheduler<u32> = Scheduler::from_config(&config);
    for v in 0..500u32 {
        queue.enqueue_with_priority(v, i64::from(v % 11)).unwrap();
    }
    let mut out: Vec<u32> = std::iter::from_fn(|| queue.dequeue().ok()).collect();
    out.sort_unstable();
    assert_eq!(out, (0..500).collect::<Vec<_>>());
}

// ============================================================================
// Policy behavior
// ============================================================================

#[test]
fn test_mode_split_tracks_weights() {
    let config = SchedulerConfig {
        seed: Some(2024),
        ..Default::default()
    };
    let mut queue: Scheduler<u32> = Scheduler::from_config(&config);
    for _ in 0..10_000 {
        queue.enqueue(0);
        queue.dequeue().unwrap();
    }
    let max = queue.stats().priority_max_selections;
    // 60% expected; the tolerance is many standard deviations wide.
    assert!((5_500..=6_500).contains(&max), "priority-max count {max}");
}

#[test]
fn test_low_priority_item_is_not_starved() {
    let config = SchedulerConfig {
        seed: Some(5),
        ..Default::default()
    };
    let mut queue: Scheduler<&str> = Scheduler::from_config(&config);
    queue.enqueue_with_priority("low", 0).unwrap();

    let mut served_at = None;
    for step in 0..500 {
        queue.enqueue_with_priority("high", 9).unwrap();
        queue.enqueue_with_priority("high", 9).unwrap();
        if queue.dequeue().unwrap() == "low" {
            served_at = Some(step);
            break;
        }
    }
    assert!(served_at.is_some(), "low-priority item never served");
}

#[test]
fn test_priority_max_only_starves_low_priority() {
    let mut queue = Queue::with_random(ScriptedRandom::default())
        .with_policy(PriorityPolicy::Reject);
    queue.enqueue_with_priority("low", 0).unwrap();
    for _ in 0..100 {
        queue.enqueue_with_priority("high", 9).unwrap();
        // An exhausted script always rolls 0: priority-max every time.
        assert_eq!(queue.dequeue(), Ok("high"));
    }
    assert_eq!(queue.peek_front().map(|n| *n.value()), Some("low"));
}
