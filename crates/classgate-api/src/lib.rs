//! Wire types for classgate
//!
//! Records are shaped by the backend's JSON responses:
//! - Live class sessions and their status
//! - Courses, mock tests and test attempts
//! - List/item envelopes (bare or wrapped in `data`)
//! - The evaluation result exposed to UI code

mod courses;
mod envelope;
mod session;
mod timestamp;

pub use courses::*;
pub use envelope::*;
pub use mock_tests::*;
pub use session::*;
pub use timestamp::*;
