//! Single-threaded host for builtins.
//!
//! [`EventLoop`] owns a virtual clock, a fire-once timer queue and a seeded
//! random source. Time only moves when the owner calls [`EventLoop::advance`]
//! or [`EventLoop::run_until_idle`]; timers due inside the advanced span run
//! in due order, ties broken by registration order, with the clock reading
//! the timer's due time while its callback runs.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::runtime::{RuntimeContext, TimerId, config::RuntimeConfig, value::Value};

mod timer_queue;
mod trace;

use timer_queue::TimerQueue;

pub struct EventLoop {
    now_ms: u64,
    timers: TimerQueue,
    rng: StdRng,
    trace: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            now_ms: config.start_ms,
            timers: TimerQueue::default(),
            rng,
            trace: config.trace,
        }
    }

    pub fn set_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    /// Number of timers registered but not yet fired.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Moves the clock forward by `ms`, running every timer that falls due.
    ///
    /// Stops at the first failing callback and returns its error; the clock
    /// then stays at that callback's due time and later timers stay queued.
    pub fn advance(&mut self, ms: u64) -> Result<(), String> {
        let target = self.now_ms.saturating_add(ms);
        self.run_due(target)?;
        self.now_ms = target;
        Ok(())
    }

    /// Runs timers until the queue is empty, including timers scheduled by
    /// callbacks along the way.
    pub fn run_until_idle(&mut self) -> Result<(), String> {
        self.run_due(u64::MAX)
    }

    fn run_due(&mut self, limit_ms: u64) -> Result<(), String> {
        while let Some(timer) = self.timers.pop_due(limit_ms) {
            self.now_ms = self.now_ms.max(timer.due_ms);
            if self.trace {
                self.trace_fire(timer.id, &timer.callback);
            }
            let id = timer.id;
            if let Err(err) = self.invoke_value(timer.callback, timer.args) {
                if self.trace {
                    self.trace_failure(id, &err);
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

impl RuntimeContext for EventLoop {
    fn invoke_method(
        &mut self,
        callee: Value,
        receiver: Option<Value>,
        mut args: Vec<Value>,
    ) -> Result<Value, String> {
        if self.trace {
            self.trace_call(&callee, receiver.as_ref(), args.len());
        }
        match callee {
            Value::Builtin(builtin) => {
                if let Some(receiver) = receiver {
                    args.insert(0, receiver);
                }
                (builtin.func)(self, args)
            }
            Value::Closure(closure) => closure.call(self, receiver, args),
            other => Err(format!("not a function: {}", other.type_name())),
        }
    }

    fn schedule(&mut self, callback: Value, delay_ms: u64, args: Vec<Value>) -> TimerId {
        let due_ms = self.now_ms.saturating_add(delay_ms);
        let trace_callback = self.trace.then(|| callback.clone());
        let id = self.timers.push(due_ms, callback, args);
        if let Some(callback) = trace_callback {
            self.trace_schedule(id, &callback, due_ms);
        }
        id
    }

    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn random_index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper.max(1))
    }
}
