//! Keyboard event sources
//!
//! A source hands key presses to every subscribed handler until that
//! handler's [`Subscription`] is dropped.

use std::cell::RefCell;
use std::rc::Rc;

use super::Subscription;
use crate::keymap::{KeyInput, KeyOutcome};

pub type KeyHandler = Box<dyn FnMut(&KeyInput) -> KeyOutcome>;

/// Process-wide key press stream
pub trait KeySource {
    fn subscribe(&self, handler: KeyHandler) -> Subscription;
}

type SharedHandler = Rc<RefCell<KeyHandler>>;

#[derive(Default)]
struct HubListeners {
    next_id: u64,
    handlers: Vec<(u64, SharedHandler)>,
}

/// In-process key stream (native driver and tests)
#[derive(Clone, Default)]
pub struct KeyboardHub {
    inner: Rc<RefCell<HubListeners>>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }

    /// Deliver one key press to every live handler
    pub fn press(&self, input: &KeyInput) -> KeyOutcome {
        let snapshot: Vec<(u64, SharedHandler)> = self.inner.borrow().handlers.clone();

        let mut outcome = KeyOutcome::Ignored;
        for (id, handler) in snapshot {
            // A handler may have been removed by an earlier one in this press
            let live = self.inner.borrow().handlers.iter().any(|(i, _)| *i == id);
            if !live {
                continue;
            }
            let Ok(mut handler) = handler.try_borrow_mut() else {
                log::warn!("Re-entrant key press ignored");
                continue;
            };
            outcome = outcome.merge((*handler)(input));
        }
        outcome
    }
}

impl KeySource for KeyboardHub {
    fn subscribe(&self, handler: KeyHandler) -> Subscription {
        let id = {
            let mut listeners = self.inner.borrow_mut();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.handlers.push((id, Rc::new(RefCell::new(handler))));
            id
        };

        let listeners = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().handlers.retain(|(i, _)| *i != id);
            }
        })
    }
}

/// Browser `window` keydown listener
#[cfg(target_arch = "wasm32")]
pub struct WindowKeyboard;

#[cfg(target_arch = "wasm32")]
impl KeyInput {
    pub fn from_event(event: &web_sys::KeyboardEvent) -> Self {
        Self {
            key: event.key(),
            ctrl: event.ctrl_key(),
            meta: event.meta_key(),
            alt: event.alt_key(),
            shift: event.shift_key(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl KeySource for WindowKeyboard {
    fn subscribe(&self, mut handler: KeyHandler) -> Subscription {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let Some(window) = web_sys::window() else {
            log::warn!("No window - keyboard disabled");
            return Subscription::detached();
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let outcome = handler(&KeyInput::from_event(&event));
            if outcome.prevent_default() {
                event.prevent_default();
            }
        });

        if let Err(e) =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        {
            log::warn!("Failed to attach keydown listener: {:?}", e);
            return Subscription::detached();
        }

        Subscription::new(move || {
            let _ = window
                .remove_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_handler(hits: &Rc<Cell<u32>>) -> KeyHandler {
        let hits = hits.clone();
        Box::new(move |_input| {
            hits.set(hits.get() + 1);
            KeyOutcome::Handled {
                prevent_default: false,
            }
        })
    }

    #[test]
    fn test_press_reaches_subscribers() {
        let hub = KeyboardHub::new();
        let hits = Rc::new(Cell::new(0));
        let _a = hub.subscribe(counting_handler(&hits));
        let _b = hub.subscribe(counting_handler(&hits));

        let outcome = hub.press(&KeyInput::new("x"));
        assert_eq!(hits.get(), 2);
        assert!(matches!(outcome, KeyOutcome::Handled { .. }));
    }

    #[test]
    fn test_no_dispatch_after_unsubscribe() {
        let hub = KeyboardHub::new();
        let hits = Rc::new(Cell::new(0));
        let sub = hub.subscribe(counting_handler(&hits));
        assert_eq!(hub.listener_count(), 1);

        drop(sub);
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(hub.press(&KeyInput::new("ArrowUp")), KeyOutcome::Ignored);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_handler_removed_mid_press_is_skipped() {
        let hub = KeyboardHub::new();
        let hits = Rc::new(Cell::new(0));

        // First handler tears down the second one
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let v = victim.clone();
        let _killer = hub.subscribe(Box::new(move |_| {
            v.borrow_mut().take();
            KeyOutcome::Ignored
        }));
        *victim.borrow_mut() = Some(hub.subscribe(counting_handler(&hits)));

        hub.press(&KeyInput::new("a"));
        assert_eq!(hits.get(), 0);
        assert_eq!(hub.listener_count(), 1);
    }
}
