//! Connection state machine.
//!
//! One [`Session`] per connection attempt. Each channel event has its own
//! transition function that returns the effects the manager should carry
//! out. Events that arrive in a state where they mean nothing are absorbed
//! with no effects, which makes repeated or overlapping disconnect signals
//! (an error followed by a close) harmless.

use crate::channel::Payload;
use crate::code::GameCode;
use crate::notice::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No attempt has been made yet.
    Idle,
    /// The channel is being established.
    Connecting,
    Open,
    /// The channel closed normally or was dropped by the network.
    Closed,
    /// The channel failed.
    Errored,
}

impl SessionState {
    /// Whether no further transitions can happen.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }

    /// Whether the attempt is still in progress or established.
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Self::Connecting | Self::Open)
    }
}

/// Something the manager must do in response to a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify(Notice),
    SetConnected(bool),
    Forward(Payload),
}

#[derive(Debug, Clone)]
pub struct Session {
    code: GameCode,
    generation: u64,
    state: SessionState,
}

impl Session {
    #[must_use]
    pub fn new(code: GameCode, generation: u64) -> Self {
        Self { code, generation, state: SessionState::Idle }
    }

    #[must_use]
    pub fn code(&self) -> &GameCode {
        &self.code
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The channel is under construction.
    pub fn begin(&mut self) -> Vec<Effect> {
        if self.state != SessionState::Idle {
            return self.absorb("begin");
        }
        self.state = SessionState::Connecting;
        Vec::new()
    }

    /// The channel could not be constructed after [`Session::begin`].
    pub fn on_unavailable(&mut self) -> Vec<Effect> {
        if self.state != SessionState::Connecting {
            return self.absorb("unavailable");
        }
        self.state = SessionState::Errored;
        vec![Effect::Notify(Notice::unavailable()), Effect::SetConnected(false)]
    }

    pub fn on_open(&mut self) -> Vec<Effect> {
        if self.state != SessionState::Connecting {
            return self.absorb("open");
        }
        self.state = SessionState::Open;
        tracing::info!(code = %self.code, "live session open");
        vec![Effect::Notify(Notice::connected(&self.code)), Effect::SetConnected(true)]
    }

    pub fn on_message(&mut self, payload: Payload) -> Vec<Effect> {
        if self.state != SessionState::Open {
            return self.absorb("message");
        }
        vec![Effect::Forward(payload)]
    }

    pub fn on_close(&mut self) -> Vec<Effect> {
        if !self.state.is_live() {
            return self.absorb("close");
        }
        self.state = SessionState::Closed;
        tracing::info!(code = %self.code, "live session closed");
        vec![Effect::Notify(Notice::disconnected(&self.code)), Effect::SetConnected(false)]
    }

    pub fn on_error(&mut self, reason: &str) -> Vec<Effect> {
        if !self.state.is_live() {
            return self.absorb("error");
        }
        self.state = SessionState::Errored;
        tracing::warn!(code = %self.code, %reason, "live session failed");
        vec![Effect::Notify(Notice::failed(&self.code)), Effect::SetConnected(false)]
    }

    fn absorb(&self, event: &str) -> Vec<Effect> {
        tracing::debug!(code = %self.code, state = ?self.state, event, "event ignored in this state");
        Vec::new()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
