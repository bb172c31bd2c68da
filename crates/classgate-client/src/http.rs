//! Shared HTTP plumbing: the client session and JSON GET helper

use classgate_config::{ApiConfig, parse_base_url};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{ClientError, ClientResult};

/// Longest response body kept in a status error
const MAX_ERROR_BODY: usize = 512;

/// Everything a request needs to reach the backend as the current student.
///
/// Passed explicitly to each client instead of living in global storage.
#[derive(Debug, Clone)]
pub struct ClientSession {
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientSession {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let url = parse_base_url(base_url).map_err(|message| {
            warn!(base_url, %message, "Rejected base URL");
            ClientError::InvalidUrl(base_url.to_string())
        })?;

        Ok(Self {
            base_url: url,
            token: None,
            timeout: ApiConfig::default().timeout,
        })
    }

    /// Build from config, letting an explicit base URL override the configured one
    pub fn from_config(
        api: &ApiConfig,
        base_url_override: Option<&str>,
        token: Option<String>,
    ) -> ClientResult<Self> {
        let base_url = base_url_override
            .or(api.base_url.as_deref())
            .ok_or_else(|| ClientError::InvalidUrl("(not configured)".into()))?;

        Ok(Self::new(base_url)?
            .with_token(token)
            .with_timeout(api.timeout))
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL with the given path segments appended (each percent-encoded)
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Thin JSON-over-HTTP client shared by the domain clients
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    session: ClientSession,
}

impl ApiClient {
    pub fn new(session: ClientSession) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(session.timeout)
            .connect_timeout(session.timeout)
            .build()?;

        Ok(Self { http, session })
    }

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    /// GET a path and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let url = self.session.endpoint(segments)?;
        let path = url.path().to_string();

        let mut request = self.http.get(url);
        if let Some(token) = &self.session.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(path = %path, status = status.as_u16(), bytes = body.len(), "GET");

        if !status.is_success() {
            warn!(path = %path, status = status.as_u16(), "Backend request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: truncate(body, MAX_ERROR_BODY),
            });
        }

        serde_json::from_str(&body).map_err(|source| ClientError::Decode { path, source })
    }
}

fn truncate(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
    }
    s
}
