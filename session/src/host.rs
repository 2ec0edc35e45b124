//! Create-game request.

use crate::code::{CODE_LEN, GameCode};
use crate::config::SessionConfig;
use crate::endpoint::host_url;
use crate::error::SessionError;

/// Raw outcome of a create-game request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostResponse {
    pub status: u16,
    pub body: String,
}

impl HostResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Asks the server for a new game. Enables mocking in tests.
#[async_trait::async_trait]
pub trait HostApi: Send + Sync {
    /// POST to the create-game endpoint with no body.
    ///
    /// # Errors
    ///
    /// Returns `Err` only when no response was received at all; any status
    /// code comes back as a [`HostResponse`].
    async fn create_game(&self) -> Result<HostResponse, SessionError>;
}

/// [`HostApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpHostApi {
    client: reqwest::Client,
    url: String,
}

impl HttpHostApi {
    /// # Errors
    ///
    /// Returns `Err` if the origin is not `http(s)` or the client cannot be
    /// built.
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()?;
        Ok(Self { client, url: host_url(&config.origin)? })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl HostApi for HttpHostApi {
    async fn create_game(&self) -> Result<HostResponse, SessionError> {
        tracing::debug!(url = %self.url, "requesting new game");
        let response = self.client.post(&self.url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HostResponse { status, body })
    }
}

/// Extract the game code from a create-game response.
///
/// The whole body must be the code; it is not trimmed.
///
/// # Errors
///
/// Returns [`SessionError::HostStatus`] for a non-success status and
/// [`SessionError::HostBody`] for a body that is not a game code.
pub fn parse_hosted_code(response: &HostResponse) -> Result<GameCode, SessionError> {
    if !response.is_success() {
        return Err(SessionError::HostStatus { status: response.status, body: response.body.clone() });
    }
    if response.body.len() != CODE_LEN {
        return Err(SessionError::HostBody(response.body.clone()));
    }
    GameCode::parse(&response.body).map_err(|_| SessionError::HostBody(response.body.clone()))
}

#[cfg(test)]
#[path = "host_test.rs"]
mod tests;
