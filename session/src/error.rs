//! Session error type.

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("game code must be 4 ASCII letters or digits, got {0:?}")]
    InvalidCode(String),
    #[error("origin must start with http://, https://, ws:// or wss://, got {0:?}")]
    InvalidOrigin(String),
    #[error("create-game request failed with status {status}")]
    HostStatus { status: u16, body: String },
    #[error("create-game response is not a game code: {0:?}")]
    HostBody(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("could not open live session: {0}")]
    Connect(String),
    #[error("no async runtime available to drive the live session")]
    NoRuntime,
    #[error("live session is not open")]
    NotConnected,
    #[error("live session channel is closed")]
    ChannelClosed,
}
