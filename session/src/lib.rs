//! Live-session connection management for prime-chess.
//!
//! Joins a game by its 4-character code over a WebSocket derived from the
//! page origin, or asks the server to host a new game and then joins it.
//! Connection lifecycle is an explicit state machine; inbound payloads are
//! handed to a caller-supplied handler without being parsed.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`code`] | [`code::GameCode`] validation |
//! | [`endpoint`] | Live-session and create-game URLs from the origin |
//! | [`config`] | Environment-driven [`config::SessionConfig`] |
//! | [`state`] | Five-state [`state::Session`] machine and its effects |
//! | [`channel`] | [`channel::Connector`] trait and the tungstenite transport |
//! | [`host`] | Create-game request and response parsing |
//! | [`notice`] | User-visible notices and [`notice::Notifier`] sinks |
//! | [`manager`] | [`manager::SessionManager`] tying it together |
//! | [`error`] | [`SessionError`] |

pub mod channel;
pub mod code;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod host;
pub mod manager;
pub mod notice;
pub mod state;

pub use code::GameCode;
pub use config::SessionConfig;
pub use error::SessionError;
pub use manager::SessionManager;
