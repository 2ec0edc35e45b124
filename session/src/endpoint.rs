//! Endpoint derivation from the page origin.
//!
//! Only the scheme and authority of the origin are used; any path is
//! ignored, matching how a browser page derives its socket URL from
//! `location.host`.

use crate::code::GameCode;
use crate::error::SessionError;

/// Path under which live sessions are served; the code is the final segment.
pub const SESSION_NAMESPACE: &str = "/games/ws";

/// Create-game endpoint path.
pub const HOST_PATH: &str = "/games/";

/// Live-session URL for `code`: `http` upgrades to `ws`, `https` to `wss`.
///
/// # Errors
///
/// Returns [`SessionError::InvalidOrigin`] for an unsupported scheme or an
/// empty host.
pub fn session_url(origin: &str, code: &GameCode) -> Result<String, SessionError> {
    let (scheme, authority) = split_origin(origin)?;
    let socket_scheme = match scheme {
        "http" | "ws" => "ws",
        _ => "wss",
    };
    Ok(format!("{socket_scheme}://{authority}{SESSION_NAMESPACE}/{code}"))
}

/// Create-game URL, `{origin}/games/`.
///
/// # Errors
///
/// Returns [`SessionError::InvalidOrigin`] unless the origin is `http` or
/// `https` with a host.
pub fn host_url(origin: &str) -> Result<String, SessionError> {
    match split_origin(origin)? {
        (scheme @ ("http" | "https"), authority) => Ok(format!("{scheme}://{authority}{HOST_PATH}")),
        _ => Err(SessionError::InvalidOrigin(origin.to_owned())),
    }
}

fn split_origin(origin: &str) -> Result<(&str, &str), SessionError> {
    let invalid = || SessionError::InvalidOrigin(origin.to_owned());
    let (scheme, rest) = origin.trim().split_once("://").ok_or_else(invalid)?;
    if !matches!(scheme, "http" | "https" | "ws" | "wss") {
        return Err(invalid());
    }
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if authority.is_empty() {
        return Err(invalid());
    }
    Ok((scheme, authority))
}

#[cfg(test)]
#[path = "endpoint_test.rs"]
mod tests;
