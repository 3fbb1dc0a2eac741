//! Tally - a bounded counter widget
//!
//! Core modules:
//! - `counter`: Bounded counter state machine (value, bounds, step, pulse)
//! - `config`: Counter configuration and validation
//! - `keymap`: Keyboard chord to counter action mapping
//! - `persistence`: Best-effort storage of the committed value
//! - `platform`: Browser/native abstraction for timers and keyboard input
//! - `view`: Binds a counter to a keyboard source while the view is active

pub mod config;
pub mod counter;
pub mod error;
pub mod keymap;
pub mod persistence;
pub mod platform;
pub mod view;

pub use config::{CounterConfig, ResetBehavior};
pub use counter::Counter;
pub use error::{CounterError, StoreError};
pub use keymap::{KeyAction, KeyInput};
pub use view::CounterView;

/// Widget constants
pub mod consts {
    /// Storage key for the committed counter value
    pub const STORAGE_KEY: &str = "counter-value";
    /// How long the pulse (animating) flag stays set after an operation
    pub const PULSE_MS: u32 = 200;
    /// Default increment/decrement magnitude
    pub const DEFAULT_STEP: i64 = 1;
}
