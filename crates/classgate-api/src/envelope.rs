//! Response envelopes
//!
//! Endpoints answer either with the payload itself or with the payload under a
//! `data` key (`{"success": true, "data": [...]}`).

use serde::Deserialize;

/// A list response, bare or wrapped
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Wrapped { data } | ListEnvelope::Bare(data) => data,
        }
    }
}

/// A single-item response, bare or wrapped
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemEnvelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> ItemEnvelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            ItemEnvelope::Wrapped { data } | ItemEnvelope::Bare(data) => data,
        }
    }
}
