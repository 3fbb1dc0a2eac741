//! Counter view: keyboard binding while active, plus the render snapshot
//!
//! The view only holds the counter through `Rc`; the key handler it
//! registers holds a `Weak`, and deactivation (or drop) removes it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::counter::Counter;
use crate::keymap::{KeyAction, KeyOutcome};
use crate::platform::{KeySource, Subscription};

/// Machine-readable value and bounds for assistive technology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AriaState {
    pub value_now: i64,
    pub value_min: Option<i64>,
    pub value_max: Option<i64>,
}

impl AriaState {
    /// `aria-value*` attributes, unbounded sides written as +/-Infinity
    pub fn attributes(&self) -> [(&'static str, String); 3] {
        [
            ("aria-valuenow", self.value_now.to_string()),
            (
                "aria-valuemin",
                self.value_min
                    .map_or_else(|| "-Infinity".to_string(), |v| v.to_string()),
            ),
            (
                "aria-valuemax",
                self.value_max
                    .map_or_else(|| "Infinity".to_string(), |v| v.to_string()),
            ),
        ]
    }
}

/// One control button as it should be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub label: &'static str,
    pub aria_label: String,
    pub disabled: bool,
}

/// Everything the shell needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub value: i64,
    pub animating: bool,
    pub aria: AriaState,
    pub decrement: ButtonState,
    pub increment: ButtonState,
    pub reset: ButtonState,
}

impl ViewSnapshot {
    pub fn of(counter: &Counter) -> Self {
        let step = counter.step();
        Self {
            value: counter.value(),
            animating: counter.is_animating(),
            aria: AriaState {
                value_now: counter.value(),
                value_min: counter.min(),
                value_max: counter.max(),
            },
            decrement: ButtonState {
                label: "Decrement",
                aria_label: format!("Decrease count by {}", step),
                disabled: !counter.can_decrement(),
            },
            increment: ButtonState {
                label: "Increment",
                aria_label: format!("Increase count by {}", step),
                disabled: !counter.can_increment(),
            },
            reset: ButtonState {
                label: "Reset",
                aria_label: format!("Reset counter to {}", counter.initial_value()),
                disabled: !counter.can_reset(),
            },
        }
    }

    /// Container class list
    pub fn container_class(&self) -> &'static str {
        if self.animating {
            "counter-container animate"
        } else {
            "counter-container"
        }
    }
}

pub struct CounterView {
    counter: Rc<RefCell<Counter>>,
    keyboard: Option<Subscription>,
}

impl CounterView {
    pub fn new(counter: Rc<RefCell<Counter>>) -> Self {
        Self {
            counter,
            keyboard: None,
        }
    }

    pub fn counter(&self) -> &Rc<RefCell<Counter>> {
        &self.counter
    }

    pub fn is_active(&self) -> bool {
        self.keyboard.is_some()
    }

    /// Start dispatching key presses from `source` to the counter
    pub fn activate(&mut self, source: &dyn KeySource) {
        if self.is_active() {
            return;
        }

        let counter = Rc::downgrade(&self.counter);
        self.keyboard = Some(source.subscribe(Box::new(move |input| {
            let Some(action) = KeyAction::from_input(input) else {
                return KeyOutcome::Ignored;
            };
            let Some(counter) = counter.upgrade() else {
                return KeyOutcome::Ignored;
            };
            let Ok(mut counter) = counter.try_borrow_mut() else {
                log::warn!("Counter busy, dropping {:?}", action);
                return KeyOutcome::Ignored;
            };
            counter.apply(action);
            KeyOutcome::handled(action)
        })));
        log::info!("Counter view active");
    }

    /// Stop keyboard dispatch. No key press reaches the counter afterwards.
    pub fn deactivate(&mut self) {
        if self.keyboard.take().is_some() {
            log::info!("Counter view inactive");
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::of(&self.counter.borrow())
    }
}
