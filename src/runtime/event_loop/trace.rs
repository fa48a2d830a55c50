use crate::runtime::{TimerId, value::Value};

use super::EventLoop;

impl EventLoop {
    pub(super) fn trace_call(&self, callee: &Value, receiver: Option<&Value>, argc: usize) {
        match receiver {
            Some(receiver) => println!(
                "[trace] t={}ms call {} on {} argc={}",
                self.now_ms,
                callee,
                receiver.type_name(),
                argc
            ),
            None => println!("[trace] t={}ms call {} argc={}", self.now_ms, callee, argc),
        }
    }

    pub(super) fn trace_schedule(&self, id: TimerId, callback: &Value, due_ms: u64) {
        println!(
            "[trace] t={}ms schedule timer#{} {} due={}ms",
            self.now_ms, id, callback, due_ms
        );
    }

    pub(super) fn trace_fire(&self, id: TimerId, callback: &Value) {
        println!("[trace] t={}ms fire timer#{} {}", self.now_ms, id, callback);
    }

    pub(super) fn trace_failure(&self, id: TimerId, err: &str) {
        println!("[trace] t={}ms timer#{} failed: {}", self.now_ms, id, err);
    }
}
