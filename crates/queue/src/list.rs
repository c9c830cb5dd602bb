//! Doubly linked list backed by a slot arena.
//!
//! Nodes are owned by the list and addressed by [`NodeId`] indices instead
//! of pointers. `front` is the oldest node, `back` the newest. Removed slots
//! go on a free list and are reused by later pushes.
//!
//! The list is single-threaded: it is `Send` when `T` is, but every method
//! takes `&mut self` for mutation and there is no interior locking. Callers
//! sharing a list across threads must wrap it themselves.

use thiserror::Error;
use tracing::trace;

use crate::node::{Node, NodeId, Priority};

/// A broken structural invariant, reported by [`LinkedList::check_links`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("front is {front:?} but back is {back:?}")]
    EndpointMismatch {
        front: Option<usize>,
        back: Option<usize>,
    },

    #[error("link to vacant slot {0}")]
    DanglingLink(usize),

    #[error("asymmetric link between slots {from} and {to}")]
    Asymmetric { from: usize, to: usize },

    #[error("endpoint {0} has an outward link")]
    OpenEndpoint(usize),

    #[error("forward walk saw {walked} nodes, len is {len}")]
    LengthMismatch { walked: usize, len: usize },

    #[error("forward walk ended at {forward:?}, back is {back:?}")]
    WrongTerminus {
        forward: Option<usize>,
        back: Option<usize>,
    },
}

/// An arena slot. `generation` is bumped every time the slot's node is
/// removed, so ids handed out for an earlier occupant stop resolving.
#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

#[derive(Debug, Clone)]
pub struct LinkedList<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    len: usize,
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            front: None,
            back: None,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_none()
    }

    pub fn front(&self) -> Option<NodeId> {
        self.front
    }

    pub fn back(&self) -> Option<NodeId> {
        self.back
    }

    /// `None` once the node behind `id` has been removed, even if its slot
    /// has since been reused.
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Append at the back. O(1).
    pub fn push_back(&mut self, value: T, priority: Priority) -> NodeId {
        let mut node = Node::new(value, priority);
        node.prev = self.back;

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId::new(self.slots.len() - 1, 0)
            }
        };

        match self.back {
            Some(old_back) => self.node_mut(old_back).next = Some(id),
            None => self.front = Some(id),
        }
        self.back = Some(id);
        self.len += 1;
        id
    }

    /// Splice a node out and hand ownership back to the caller.
    ///
    /// Returns `None` if `id` does not address a live node.
    pub fn unlink(&mut self, id: NodeId) -> Option<Node<T>> {
        let slot = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)?;
        let mut node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);

        match (node.prev, node.next) {
            // Sole node.
            (None, None) => {
                self.front = None;
                self.back = None;
            }
            // Front: the next-newer node becomes front.
            (None, Some(next)) => {
                self.front = Some(next);
                self.node_mut(next).prev = None;
            }
            // Back: the next-older node becomes back.
            (Some(prev), None) => {
                self.back = Some(prev);
                self.node_mut(prev).next = None;
            }
            (Some(prev), Some(next)) => {
                self.node_mut(prev).next = Some(next);
                self.node_mut(next).prev = Some(prev);
            }
        }

        trace!(slot = id.index, prev = ?node.prev, next = ?node.next, "unlinked node");
        node.prev = None;
        node.next = None;
        self.free.push(id.index);
        self.len -= 1;
        Some(node)
    }

    pub fn pop_front(&mut self) -> Option<Node<T>> {
        self.front.and_then(|id| self.unlink(id))
    }

    pub fn pop_back(&mut self) -> Option<Node<T>> {
        self.back.and_then(|id| self.unlink(id))
    }

    /// Drop every node. Slots are kept and retired so ids from before the
    /// clear stay dead.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
        }
        self.front = None;
        self.back = None;
        self.len = 0;
    }

    /// Front-to-back traversal.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.front,
            forward: true,
            remaining: self.len,
        }
    }

    /// Back-to-front traversal.
    pub fn iter_rev(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.back,
            forward: false,
            remaining: self.len,
        }
    }

    /// Visit every node front to back with mutable access to value and
    /// priority. Links stay private, so the walk cannot be disturbed.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Node<T>),
    {
        let mut cursor = self.front;
        while let Some(id) = cursor {
            let node = self.node_mut(id);
            cursor = node.next;
            f(node);
        }
    }

    /// Walk the list both ways and verify every structural invariant.
    pub fn check_links(&self) -> Result<(), IntegrityError> {
        if self.front.is_none() != self.back.is_none() || (self.front.is_none() && self.len != 0) {
            return Err(IntegrityError::EndpointMismatch {
                front: self.front.map(NodeId::index),
                back: self.back.map(NodeId::index),
            });
        }
        if let Some(front) = self.front {
            if self.live(front)?.prev.is_some() {
                return Err(IntegrityError::OpenEndpoint(front.index));
            }
        }
        if let Some(back) = self.back {
            if self.live(back)?.next.is_some() {
                return Err(IntegrityError::OpenEndpoint(back.index));
            }
        }

        let mut walked = 0;
        let mut last = None;
        let mut cursor = self.front;
        while let Some(id) = cursor {
            walked += 1;
            // A cycle would walk forever; more steps than slots proves one.
            if walked > self.slots.len() {
                return Err(IntegrityError::LengthMismatch { walked, len: self.len });
            }
            let node = self.live(id)?;
            if let Some(next) = node.next {
                if self.live(next)?.prev != Some(id) {
                    return Err(IntegrityError::Asymmetric { from: id.index, to: next.index });
                }
            }
            last = Some(id);
            cursor = node.next;
        }

        if walked != self.len {
            return Err(IntegrityError::LengthMismatch { walked, len: self.len });
        }
        if last != self.back {
            return Err(IntegrityError::WrongTerminus {
                forward: last.map(NodeId::index),
                back: self.back.map(NodeId::index),
            });
        }
        Ok(())
    }

    fn live(&self, id: NodeId) -> Result<&Node<T>, IntegrityError> {
        self.get(id).ok_or(IntegrityError::DanglingLink(id.index))
    }

    /// Links inside the list always point at live slots.
    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.slots[id.index].node.as_mut() {
            Some(node) => node,
            None => unreachable!("link to vacant slot {}", id.index),
        }
    }
}

pub struct Iter<'a, T> {
    list: &'a LinkedList<T>,
    cursor: Option<NodeId>,
    forward: bool,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.cursor?;
        let node = self.list.get(id)?;
        self.cursor = if self.forward { node.next } else { node.prev };
        self.remaining -= 1;
        Some((id, node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
