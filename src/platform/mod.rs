//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Timers (`setTimeout` on web, a manually driven clock on native)
//! - Keyboard input (window `keydown` on web, an in-process hub on native)
//!
//! Both hand out a [`Subscription`] guard; dropping it deregisters.

pub mod keyboard;
pub mod timer;

pub use keyboard::{KeyHandler, KeySource, KeyboardHub};
pub use timer::{ManualScheduler, Scheduler};

#[cfg(target_arch = "wasm32")]
pub use keyboard::WindowKeyboard;
#[cfg(target_arch = "wasm32")]
pub use timer::BrowserScheduler;

/// RAII guard for a registered listener or pending task
///
/// The cancel action runs exactly once, on drop.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A guard with nothing to cancel (registration failed or was a no-op)
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Cancel now (same as dropping)
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_subscription_cancels_once_on_drop() {
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let sub = Subscription::new(move || c.set(c.get() + 1));
        assert_eq!(calls.get(), 0);
        sub.cancel();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_detached_subscription() {
        let sub = Subscription::detached();
        drop(sub);
    }
}
