//! Bounded counter state machine

use std::rc::Rc;

use super::pulse::Pulse;
use crate::config::CounterConfig;
use crate::consts::STORAGE_KEY;
use crate::error::CounterError;
use crate::keymap::KeyAction;
use crate::persistence::{Persistence, Store};
use crate::platform::Scheduler;

/// Called with the committed value after every operation
pub type ChangeObserver = Box<dyn FnMut(i64)>;

/// A single integer held within `[min, max]` by increment/decrement.
///
/// Reset is the exception: under `ResetBehavior::IgnoreBounds` it returns to
/// `initial_value` even when that lies outside the bounds.
pub struct Counter {
    config: CounterConfig,
    value: i64,
    persistence: Option<Persistence>,
    observer: Option<ChangeObserver>,
    pulse: Pulse,
}

impl Counter {
    /// In-memory counter seeded from `initial_value`
    pub fn new(config: CounterConfig) -> Result<Self, CounterError> {
        config.validate()?;
        let value = config.initial_value;
        Ok(Self {
            config,
            value,
            persistence: None,
            observer: None,
            pulse: Pulse::new(None),
        })
    }

    /// Counter seeded from `store` when it holds a usable value.
    ///
    /// The store is read before anything can be written back. With
    /// `persist: false` the store is ignored entirely.
    pub fn with_store(config: CounterConfig, store: Box<dyn Store>) -> Result<Self, CounterError> {
        let mut counter = Self::new(config)?;
        if !counter.config.persist {
            return Ok(counter);
        }

        let mut persistence = Persistence::new(store, STORAGE_KEY);
        if let Some(stored) = persistence.hydrate() {
            let seeded = counter.config.clamp(stored);
            if seeded != stored {
                log::warn!("Stored value {} outside bounds, clamped to {}", stored, seeded);
            }
            counter.value = seeded;
        }
        counter.persistence = Some(persistence);
        Ok(counter)
    }

    /// Enable the pulse flag, cleared through `scheduler`
    pub fn with_scheduler(mut self, scheduler: Rc<dyn Scheduler>) -> Self {
        self.pulse = Pulse::new(Some(scheduler));
        self
    }

    /// Register the change observer (replaces any previous one)
    pub fn on_change(&mut self, observer: impl FnMut(i64) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    pub fn min(&self) -> Option<i64> {
        self.config.min
    }

    pub fn max(&self) -> Option<i64> {
        self.config.max
    }

    pub fn step(&self) -> i64 {
        self.config.step
    }

    pub fn initial_value(&self) -> i64 {
        self.config.initial_value
    }

    pub fn is_persistent(&self) -> bool {
        self.persistence.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.pulse.is_active()
    }

    pub fn can_increment(&self) -> bool {
        self.config.max.is_none_or(|max| self.value < max)
    }

    pub fn can_decrement(&self) -> bool {
        self.config.min.is_none_or(|min| self.value > min)
    }

    pub fn can_reset(&self) -> bool {
        self.value != self.config.reset_target()
    }

    pub fn increment(&mut self) -> i64 {
        let next = self.value.saturating_add(self.config.step);
        let next = self.config.max.map_or(next, |max| next.min(max));
        self.commit(next)
    }

    pub fn decrement(&mut self) -> i64 {
        let next = self.value.saturating_sub(self.config.step);
        let next = self.config.min.map_or(next, |min| next.max(min));
        self.commit(next)
    }

    pub fn reset(&mut self) -> i64 {
        let target = self.config.reset_target();
        self.commit(target)
    }

    pub fn apply(&mut self, action: KeyAction) -> i64 {
        match action {
            KeyAction::Increment => self.increment(),
            KeyAction::Decrement => self.decrement(),
            KeyAction::Reset => self.reset(),
        }
    }

    fn commit(&mut self, value: i64) -> i64 {
        self.value = value;
        log::debug!("Counter committed {}", value);

        if let Some(persistence) = &mut self.persistence {
            persistence.commit(value);
        }
        self.pulse.trigger();
        if let Some(observer) = &mut self.observer {
            observer(value);
        }
        value
    }
}

impl std::fmt::Debug for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Counter")
            .field("value", &self.value)
            .field("config", &self.config)
            .field("persistence", &self.persistence)
            .field("pulse", &self.pulse)
            .finish()
    }
}
