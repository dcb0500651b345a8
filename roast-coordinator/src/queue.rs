//! Shared priority action queue: a min-heap keyed by [`ActionType`]'s
//! numeric priority, with FIFO tie-break on equal priority (mirroring the
//! `dataclass(order=True)` tie-break of the reference coordinator).

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Condvar, Mutex};

use roast_core::{Action, ActionType, Fq, PreNonce};

/// One unit of work for the coordinator's event loop: either a raw event
/// observed by an inbound worker, or a model-produced [`Action`] awaiting
/// dispatch (re-enqueued so it competes on priority with freshly-arriving
/// events, per §5's ordering guarantees).
pub enum QueueItem {
  Incoming { i: u32, s_i: Option<Fq>, pre_i: PreNonce, share_is_valid: bool },
  Dispatch(Action),
}

impl QueueItem {
  fn action_type(&self) -> ActionType {
    match self {
      QueueItem::Incoming { .. } => ActionType::Incoming,
      QueueItem::Dispatch(action) => action.action_type(),
    }
  }
}

struct QueuedItem {
  priority: u8,
  seq: u64,
  item: QueueItem,
}

impl PartialEq for QueuedItem {
  fn eq(&self, other: &Self) -> bool {
    self.priority == other.priority && self.seq == other.seq
  }
}

impl Eq for QueuedItem {}

impl PartialOrd for QueuedItem {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for QueuedItem {
  fn cmp(&self, other: &Self) -> Ordering {
    // BinaryHeap is a max-heap; reverse both keys so `pop` returns the
    // lowest priority value first, and on a tie the lowest (earliest) seq.
    other.priority.cmp(&self.priority).then_with(|| other.seq.cmp(&self.seq))
  }
}

/// MPSC: many inbound workers plus the event loop itself as producers, the
/// event loop as sole consumer. Blocks the consumer on empty rather than
/// spinning.
pub struct PriorityQueue {
  heap: Mutex<BinaryHeap<QueuedItem>>,
  not_empty: Condvar,
  seq: AtomicU64,
}

impl PriorityQueue {
  pub fn new() -> Self {
    Self { heap: Mutex::new(BinaryHeap::new()), not_empty: Condvar::new(), seq: AtomicU64::new(0) }
  }

  pub fn push(&self, item: QueueItem) {
    let priority = item.action_type() as u8;
    let seq = self.seq.fetch_add(1, AtomicOrdering::Relaxed);
    let mut heap = self.heap.lock().unwrap();
    heap.push(QueuedItem { priority, seq, item });
    self.not_empty.notify_one();
  }

  pub fn pop(&self) -> QueueItem {
    let mut heap = self.heap.lock().unwrap();
    loop {
      if let Some(queued) = heap.pop() {
        return queued.item;
      }
      heap = self.not_empty.wait(heap).unwrap();
    }
  }
}

impl Default for PriorityQueue {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use roast_core::curve::identity;

  fn dummy_pre() -> PreNonce {
    PreNonce { d_i: identity(), e_i: identity() }
  }

  #[test]
  fn pops_in_priority_order_not_insertion_order() {
    let q = PriorityQueue::new();
    q.push(QueueItem::Incoming { i: 1, s_i: None, pre_i: dummy_pre(), share_is_valid: false });
    q.push(QueueItem::Dispatch(Action::NoOp));
    q.push(QueueItem::Dispatch(Action::SessionStart(Vec::new())));

    assert!(matches!(q.pop(), QueueItem::Dispatch(Action::NoOp)));
    assert!(matches!(q.pop(), QueueItem::Incoming { .. }));
    assert!(matches!(q.pop(), QueueItem::Dispatch(Action::SessionStart(_))));
  }

  #[test]
  fn ties_break_fifo() {
    let q = PriorityQueue::new();
    q.push(QueueItem::Incoming { i: 1, s_i: None, pre_i: dummy_pre(), share_is_valid: false });
    q.push(QueueItem::Incoming { i: 2, s_i: None, pre_i: dummy_pre(), share_is_valid: false });

    match q.pop() {
      QueueItem::Incoming { i, .. } => assert_eq!(i, 1),
      _ => panic!("expected incoming"),
    }
    match q.pop() {
      QueueItem::Incoming { i, .. } => assert_eq!(i, 2),
      _ => panic!("expected incoming"),
    }
  }
}
