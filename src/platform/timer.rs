//! One-shot timers
//!
//! A scheduled task is owned by its [`Subscription`]; dropping the guard
//! before the delay elapses guarantees the task never runs.

use std::cell::RefCell;
use std::rc::Rc;

use super::Subscription;

/// Runs a task once after a delay
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Subscription;
}

struct PendingTask {
    id: u64,
    due_ms: u64,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualClock {
    now_ms: u64,
    next_id: u64,
    pending: Vec<PendingTask>,
}

/// Scheduler driven by explicit `advance` calls (native driver and tests)
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Number of tasks scheduled and not yet run or cancelled
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Move the clock forward, running every task that comes due in order.
    /// Returns how many tasks ran.
    pub fn advance(&self, ms: u64) -> usize {
        let target = {
            let mut clock = self.inner.borrow_mut();
            clock.now_ms += ms;
            clock.now_ms
        };

        let mut ran = 0;
        loop {
            // Pop outside the borrow so a task may schedule or cancel
            let next = {
                let mut clock = self.inner.borrow_mut();
                let idx = clock
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due_ms <= target)
                    .min_by_key(|(_, t)| (t.due_ms, t.id))
                    .map(|(i, _)| i);
                idx.map(|i| clock.pending.remove(i))
            };
            match next {
                Some(pending) => {
                    (pending.task)();
                    ran += 1;
                }
                None => break,
            }
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Subscription {
        let id = {
            let mut clock = self.inner.borrow_mut();
            let id = clock.next_id;
            clock.next_id += 1;
            let due_ms = clock.now_ms + u64::from(delay_ms);
            clock.pending.push(PendingTask { id, due_ms, task });
            id
        };

        let clock = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(clock) = clock.upgrade() {
                clock.borrow_mut().pending.retain(|t| t.id != id);
            }
        })
    }
}

/// `window.setTimeout` scheduler
#[cfg(target_arch = "wasm32")]
pub struct BrowserScheduler;

#[cfg(target_arch = "wasm32")]
impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Subscription {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let Some(window) = web_sys::window() else {
            log::warn!("No window - timer not scheduled");
            return Subscription::detached();
        };

        let closure = Closure::once(move || task());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(handle) => Subscription::new(move || {
                window.clear_timeout_with_handle(handle);
                // Closure is freed only after the timeout can no longer fire
                drop(closure);
            }),
            Err(e) => {
                log::warn!("setTimeout failed: {:?}", e);
                Subscription::detached()
            }
        }
    }
}
