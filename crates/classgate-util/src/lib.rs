//! Shared utilities for classgate
//!
//! This crate provides:
//! - ID types (SessionId, CourseId, MockTestId, ReminderId)
//! - Clock and timestamp helpers (mock time, lenient parsing, countdown labels)
//! - Error types
//! - Default paths for the config file

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
