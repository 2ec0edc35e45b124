//! Session connection manager.
//!
//! Owns at most one live-session channel at a time. Callers drive it with two
//! inputs: [`SessionManager::connect`] / [`SessionManager::accept_hosted`]
//! from the UI, and [`SessionManager::handle`] for every event drained from
//! the [`EventReceiver`] returned by [`SessionManager::new`]. Nothing here
//! blocks; a create-game request can be awaited elsewhere while channel
//! events keep flowing.

use tokio::sync::{mpsc, watch};

use crate::channel::{ChannelEvent, ChannelEventKind, ChannelHandle, Connector, EventReceiver, EventSender, Payload};
use crate::code::GameCode;
use crate::endpoint::session_url;
use crate::error::SessionError;
use crate::host::{HostApi, HostResponse, parse_hosted_code};
use crate::notice::{Notice, Notifier};
use crate::state::{Effect, Session, SessionState};

/// Receives inbound payloads for decoding. The manager never parses them.
pub trait MessageHandler {
    fn handle(&mut self, payload: Payload);
}

impl<F: FnMut(Payload)> MessageHandler for F {
    fn handle(&mut self, payload: Payload) {
        self(payload);
    }
}

pub struct SessionManager<C, N, H> {
    origin: String,
    connector: C,
    notifier: N,
    handler: H,
    session: Option<Session>,
    channel: Option<ChannelHandle>,
    generation: u64,
    events: EventSender,
    connected: watch::Sender<bool>,
}

impl<C, N, H> SessionManager<C, N, H>
where
    C: Connector,
    N: Notifier,
    H: MessageHandler,
{
    /// Create an idle manager for pages served from `origin`.
    ///
    /// Returns the manager and the queue its channels report on; feed every
    /// event from the queue back through [`SessionManager::handle`].
    pub fn new(origin: impl Into<String>, connector: C, notifier: N, handler: H) -> (Self, EventReceiver) {
        let (events, receiver) = mpsc::unbounded_channel();
        let (connected, _) = watch::channel(false);
        let manager = Self {
            origin: origin.into(),
            connector,
            notifier,
            handler,
            session: None,
            channel: None,
            generation: 0,
            events,
            connected,
        };
        (manager, receiver)
    }

    /// Open a live session for `code`, superseding any previous one.
    ///
    /// Construction failures are reported through the notifier, never
    /// returned; the resulting state is `Errored` in that case and
    /// `Connecting` otherwise.
    pub fn connect(&mut self, code: GameCode) -> SessionState {
        self.generation += 1;
        let generation = self.generation;

        if self.channel.take().is_some() {
            tracing::debug!(generation, "superseding previous live session");
        }
        // A superseded session says nothing more; reset quietly.
        self.set_connected(false);

        let mut session = Session::new(code, generation);
        let mut effects = session.begin();
        let opened = session_url(&self.origin, session.code())
            .and_then(|url| self.connector.open(&url, generation, self.events.clone()));
        match opened {
            Ok(handle) => self.channel = Some(handle),
            Err(err) => {
                tracing::warn!(code = %session.code(), %err, "could not construct live session");
                effects.extend(session.on_unavailable());
            }
        }

        let state = session.state();
        self.session = Some(session);
        self.apply(effects);
        state
    }

    /// Apply one channel event. Events from superseded attempts are dropped.
    pub fn handle(&mut self, event: ChannelEvent) {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(generation = event.generation, "channel event with no session");
            return;
        };
        if event.generation != session.generation() {
            tracing::debug!(
                generation = event.generation,
                current = session.generation(),
                "dropping event from superseded channel"
            );
            return;
        }

        let effects = match event.kind {
            ChannelEventKind::Opened => session.on_open(),
            ChannelEventKind::Message(payload) => session.on_message(payload),
            ChannelEventKind::Closed => session.on_close(),
            ChannelEventKind::Error(reason) => session.on_error(&reason),
        };
        if session.state().is_terminal() {
            self.channel = None;
        }
        self.apply(effects);
    }

    /// Request a new game from `api` and join it.
    ///
    /// Holds the manager across the request; use [`HostApi::create_game`]
    /// plus [`SessionManager::accept_hosted`] to keep handling events while
    /// the request is in flight.
    pub async fn host_game<A: HostApi + ?Sized>(&mut self, api: &A) -> Option<SessionState> {
        let result = api.create_game().await;
        self.accept_hosted(result)
    }

    /// Act on a finished create-game request.
    ///
    /// A well-formed code is announced and connected to exactly once. Any
    /// other outcome is reported and no connection is attempted.
    pub fn accept_hosted(&mut self, result: Result<HostResponse, SessionError>) -> Option<SessionState> {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%err, "create-game request failed");
                self.notifier.notify(Notice::host_unreachable());
                return None;
            }
        };

        match parse_hosted_code(&response) {
            Ok(code) => {
                tracing::info!(%code, "hosted new game");
                self.notifier.notify(Notice::hosted(&code));
                Some(self.connect(code))
            }
            Err(err) => {
                tracing::warn!(%err, "create-game response rejected");
                self.notifier.notify(Notice::invalid_hosted(&response.body));
                None
            }
        }
    }

    /// Send a text payload over the open channel.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] unless the session is open,
    /// or [`SessionError::ChannelClosed`] if the transport has shut down.
    pub fn send(&self, text: impl Into<String>) -> Result<(), SessionError> {
        if self.state() != SessionState::Open {
            return Err(SessionError::NotConnected);
        }
        let channel = self.channel.as_ref().ok_or(SessionError::NotConnected)?;
        channel.send(Payload::Text(text.into()))
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.as_ref().map_or(SessionState::Idle, Session::state)
    }

    #[must_use]
    pub fn code(&self) -> Option<&GameCode> {
        self.session.as_ref().map(Session::code)
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// Observe the connected flag. Receivers see a change only when the
    /// value actually flips.
    #[must_use]
    pub fn connected(&self) -> watch::Receiver<bool> {
        self.connected.subscribe()
    }

    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    // --- Effects ---

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Notify(notice) => self.notifier.notify(notice),
                Effect::SetConnected(value) => self.set_connected(value),
                Effect::Forward(payload) => self.handler.handle(payload),
            }
        }
    }

    fn set_connected(&self, value: bool) {
        let changed = self.connected.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
        if changed {
            tracing::debug!(connected = value, "connected signal changed");
        }
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
