//! Live-session transport.
//!
//! A [`Connector`] opens one channel per connection attempt. Every event the
//! channel produces is tagged with the attempt's generation and pushed onto
//! the manager's event queue, so events from a superseded channel can be
//! recognised and dropped. The channel never interprets payloads.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;

use crate::error::SessionError;

/// A raw message, passed through undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

impl Payload {
    fn into_message(self) -> Message {
        match self {
            Self::Text(text) => Message::text(text),
            Self::Binary(bytes) => Message::binary(bytes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEventKind {
    Opened,
    Message(Payload),
    Closed,
    Error(String),
}

/// One channel lifecycle event, tagged with the attempt that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEvent {
    pub generation: u64,
    pub kind: ChannelEventKind,
}

pub type EventSender = mpsc::UnboundedSender<ChannelEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<ChannelEvent>;

/// Opens live-session channels.
pub trait Connector {
    /// Start opening a channel to `url`.
    ///
    /// Returns once the attempt is underway; the outcome arrives later on
    /// `events` as `Opened` or `Error`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the channel cannot even be constructed (bad URL, no
    /// runtime).
    fn open(&self, url: &str, generation: u64, events: EventSender) -> Result<ChannelHandle, SessionError>;
}

/// Owning handle to an open channel. Dropping it tears the channel down.
#[derive(Debug)]
pub struct ChannelHandle {
    outbound: mpsc::UnboundedSender<Payload>,
    task: Option<JoinHandle<()>>,
}

impl ChannelHandle {
    /// Handle over an outbound queue with no task of its own.
    #[must_use]
    pub fn new(outbound: mpsc::UnboundedSender<Payload>) -> Self {
        Self { outbound, task: None }
    }

    fn with_task(outbound: mpsc::UnboundedSender<Payload>, task: JoinHandle<()>) -> Self {
        Self { outbound, task: Some(task) }
    }

    /// Queue a payload for the server.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ChannelClosed`] if the channel has shut down.
    pub fn send(&self, payload: Payload) -> Result<(), SessionError> {
        self.outbound
            .send(payload)
            .map_err(|_| SessionError::ChannelClosed)
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// =============================================================
// Tungstenite transport
// =============================================================

/// WebSocket connector backed by `tokio-tungstenite`.
///
/// Must be used from within a tokio runtime; the socket is driven by a
/// spawned task.
#[derive(Debug, Default, Clone, Copy)]
pub struct TungsteniteConnector;

impl Connector for TungsteniteConnector {
    fn open(&self, url: &str, generation: u64, events: EventSender) -> Result<ChannelHandle, SessionError> {
        let request = url
            .into_client_request()
            .map_err(|err| SessionError::Connect(err.to_string()))?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SessionError::NoRuntime)?;

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        tracing::debug!(%url, generation, "opening live session");
        let task = runtime.spawn(drive(request, generation, events, outbound_rx));
        Ok(ChannelHandle::with_task(outbound, task))
    }
}

async fn drive(
    request: Request,
    generation: u64,
    events: EventSender,
    mut outbound: mpsc::UnboundedReceiver<Payload>,
) {
    let emit = |kind: ChannelEventKind| {
        if events.send(ChannelEvent { generation, kind }).is_err() {
            tracing::debug!(generation, "session manager gone; dropping channel event");
        }
    };

    let socket = match connect_async(request).await {
        Ok((socket, _response)) => socket,
        Err(err) => {
            emit(ChannelEventKind::Error(err.to_string()));
            return;
        }
    };
    emit(ChannelEventKind::Opened);

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    emit(ChannelEventKind::Message(Payload::Text(text.as_str().to_owned())));
                }
                Some(Ok(Message::Binary(bytes))) => {
                    emit(ChannelEventKind::Message(Payload::Binary(bytes.to_vec())));
                }
                Some(Ok(Message::Close(_))) | None => {
                    emit(ChannelEventKind::Closed);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    emit(ChannelEventKind::Error(err.to_string()));
                    break;
                }
            },
            queued = outbound.recv() => {
                let Some(payload) = queued else { break };
                if let Err(err) = sink.send(payload.into_message()).await {
                    emit(ChannelEventKind::Error(err.to_string()));
                    break;
                }
            }
        }
    }
}
