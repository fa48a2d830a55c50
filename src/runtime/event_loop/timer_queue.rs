use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use crate::runtime::{TimerId, value::Value};

pub(super) struct Timer {
    pub id: TimerId,
    pub due_ms: u64,
    pub callback: Value,
    pub args: Vec<Value>,
}

// Ordered by due time, then by registration id.
impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.id).cmp(&(other.due_ms, other.id))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Timer {}

/// Min-heap of fire-once timers.
#[derive(Default)]
pub(super) struct TimerQueue {
    heap: BinaryHeap<Reverse<Timer>>,
    next_id: TimerId,
}

impl TimerQueue {
    pub fn push(&mut self, due_ms: u64, callback: Value, args: Vec<Value>) -> TimerId {
        self.next_id += 1;
        let id = self.next_id;
        self.heap.push(Reverse(Timer {
            id,
            due_ms,
            callback,
            args,
        }));
        id
    }

    /// Removes and returns the earliest timer due at or before `limit_ms`.
    pub fn pop_due(&mut self, limit_ms: u64) -> Option<Timer> {
        if self.heap.peek()?.0.due_ms > limit_ms {
            return None;
        }
        self.heap.pop().map(|Reverse(timer)| timer)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
