//! User-visible notifications and where they go.

use std::fmt;

use crate::code::GameCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }

    #[must_use]
    pub fn connected(code: &GameCode) -> Self {
        Self::new(NoticeLevel::Success, format!("Successfully connected to game {code}!"))
    }

    #[must_use]
    pub fn disconnected(code: &GameCode) -> Self {
        Self::new(NoticeLevel::Warning, format!("Disconnected from game {code}."))
    }

    #[must_use]
    pub fn failed(code: &GameCode) -> Self {
        Self::new(NoticeLevel::Error, format!("Failed to connect to game {code}. Check console."))
    }

    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(NoticeLevel::Error, "Could not create WebSocket connection.")
    }

    #[must_use]
    pub fn hosted(code: &GameCode) -> Self {
        Self::new(NoticeLevel::Info, format!("Your game code is {code}!"))
    }

    #[must_use]
    pub fn invalid_hosted(body: &str) -> Self {
        Self::new(NoticeLevel::Error, format!("Received invalid response: {body}"))
    }

    #[must_use]
    pub fn host_unreachable() -> Self {
        Self::new(NoticeLevel::Error, "Could not reach the game server.")
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Destination for notices.
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Collects notices in order. Handy for hosts that render their own toasts.
impl Notifier for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Writes notices to the tracing log at a matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success | NoticeLevel::Info => tracing::info!(%notice),
            NoticeLevel::Warning => tracing::warn!(%notice),
            NoticeLevel::Error => tracing::error!(%notice),
        }
    }
}
