//! HTTP clients for the classgate backend
//!
//! Provides:
//! - `ClientSession`, the explicit base URL + bearer token passed to every client
//! - `LiveScheduleClient` for live class schedules
//! - `CourseCatalogClient` for available and enrolled courses
//! - `MockTestClient` for the mock test tree, details and attempts

mod catalog;
mod http;
mod schedule;

pub use catalog::*;
pub use http::*;
pub use mock_tests::*;
pub use schedule::*;

use thiserror::Error;

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid base URL '{0}'")]
    InvalidUrl(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
