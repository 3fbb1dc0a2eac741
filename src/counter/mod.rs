//! Counter state machine
//!
//! All value logic lives here. No DOM or platform dependencies beyond the
//! `Store` and `Scheduler` seams.

pub mod bounded;
pub mod pulse;

pub use bounded::{ChangeObserver, Counter};
pub use pulse::Pulse;
