//! Error types for classgate

use thiserror::Error;

use crate::SessionId;

/// Core error type for classgate operations
#[derive(Debug, Error)]
pub enum ClassgateError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Invalid timestamp '{value}': expected RFC 3339, YYYY-MM-DD[THH:MM:SS] or epoch milliseconds")]
    InvalidTimestamp { value: String },
}

impl ClassgateError {
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassgateError>;
