//! Transient "animating" flag
//!
//! Set by every counter operation and cleared by a scheduled task after
//! `PULSE_MS`. The task only holds a weak reference to the flag and its
//! subscription is owned here, so dropping the pulse cancels it.

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::PULSE_MS;
use crate::platform::{Scheduler, Subscription};

pub struct Pulse {
    scheduler: Option<Rc<dyn Scheduler>>,
    active: Rc<Cell<bool>>,
    pending: Option<Subscription>,
}

impl Pulse {
    /// Without a scheduler the pulse never turns on
    pub fn new(scheduler: Option<Rc<dyn Scheduler>>) -> Self {
        Self {
            scheduler,
            active: Rc::new(Cell::new(false)),
            pending: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn trigger(&mut self) {
        let Some(scheduler) = &self.scheduler else {
            return;
        };

        // Restart: the previous clear must not cut this pulse short
        self.pending = None;
        self.active.set(true);

        let flag = Rc::downgrade(&self.active);
        self.pending = Some(scheduler.schedule(
            PULSE_MS,
            Box::new(move || {
                if let Some(flag) = flag.upgrade() {
                    flag.set(false);
                }
            }),
        ));
    }
}

impl std::fmt::Debug for Pulse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pulse")
            .field("active", &self.active.get())
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualScheduler;

    #[test]
    fn test_pulse_clears_after_delay() {
        let scheduler = ManualScheduler::new();
        let mut pulse = Pulse::new(Some(Rc::new(scheduler.clone())));
        assert!(!pulse.is_active());

        pulse.trigger();
        assert!(pulse.is_active());
        scheduler.advance(u64::from(PULSE_MS) - 1);
        assert!(pulse.is_active());
        scheduler.advance(1);
        assert!(!pulse.is_active());
    }

    #[test]
    fn test_retrigger_restarts_delay() {
        let scheduler = ManualScheduler::new();
        let mut pulse = Pulse::new(Some(Rc::new(scheduler.clone())));

        pulse.trigger();
        scheduler.advance(150);
        pulse.trigger();
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance(100);
        assert!(pulse.is_active());
        scheduler.advance(100);
        assert!(!pulse.is_active());
    }

    #[test]
    fn test_drop_cancels_pending_clear() {
        let scheduler = ManualScheduler::new();
        let mut pulse = Pulse::new(Some(Rc::new(scheduler.clone())));
        pulse.trigger();
        assert_eq!(scheduler.pending(), 1);

        drop(pulse);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.advance(1000), 0);
    }

    #[test]
    fn test_no_scheduler_no_pulse() {
        let mut pulse = Pulse::new(None);
        pulse.trigger();
        assert!(!pulse.is_active());
    }
}
