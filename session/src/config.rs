//! Session configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8080";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Page origin the live-session and create-game endpoints hang off.
    pub origin: String,
    pub http_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { origin: DEFAULT_ORIGIN.to_owned(), http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS }
    }
}

impl SessionConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `PRIME_CHESS_ORIGIN`: default `http://127.0.0.1:8080`
    /// - `PRIME_CHESS_HTTP_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let origin = lookup("PRIME_CHESS_ORIGIN")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_owned());
        let http_timeout_secs = parse_u64(lookup("PRIME_CHESS_HTTP_TIMEOUT_SECS"), DEFAULT_HTTP_TIMEOUT_SECS);

        Self { origin: origin.trim_end_matches('/').to_owned(), http_timeout_secs }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: &str) -> Self {
        origin.trim_end_matches('/').clone_into(&mut self.origin);
        self
    }

    /// Override the create-game timeout. Zero keeps the current value, since
    /// a zero timeout would fail every request at once.
    #[must_use]
    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        if secs > 0 {
            self.http_timeout_secs = secs;
        }
        self
    }

    /// Request timeout; a zero field falls back to the default.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        match self.http_timeout_secs {
            0 => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    match raw.map(|v| v.trim().parse::<u64>()) {
        Some(Ok(value)) if value > 0 => value,
        _ => default,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
