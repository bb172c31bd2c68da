//! Join window evaluation and session lifecycle for classgate
//!
//! This crate contains:
//! - The session window evaluator (is live, can join, countdown label)
//! - Derived UI actions for a session (join, wait for link, watch recording)
//! - Mock test attempt clocks (time remaining, resumability)
//! - Schedule tracking that turns successive evaluations into events
//! - Process-local reminder timers

mod action;
mod attempt;
mod evaluator;
mod events;
mod reminder;
mod session;
mod tracker;

pub use action::*;
pub use attempt::*;
pub use evaluator::*;
pub use events::*;
pub use reminder::*;
pub use session::*;
pub use tracker::*;
