//! The WebSocket protocol client.
//!
//! [`MatchClient`] owns the single transport handle and the single
//! pending-interrupt slot. Inbound frames are forwarded from a reader
//! task over a channel and processed strictly in delivery order on the
//! caller's task; the client never touches match state itself, it
//! hands decoded events to an [`EventHandler`].

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Duration, Instant};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::events::{
    AssignedMatch, ClientEvent, ClockUpdate, MovePropagation, PositionSync, ServerEvent,
};
use crate::session::SessionError;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Transport lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open,
}

/// Outcome of an await-commit cycle.
///
/// The server is push-based: acceptance is the absence of a
/// `match_error` within the commit window. A transport loss mid-wait
/// resolves fail-safe as [`Commit::Disconnected`], never a hang.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    Accepted,
    Rejected(Value),
    Disconnected,
}

/// Receiver of decoded server events.
///
/// Fallible handlers return their error to the client, which captures
/// it into the interrupt slot for the next commit cycle instead of
/// crashing the session.
pub trait EventHandler {
    fn on_assigned_match(&mut self, event: AssignedMatch) -> Result<(), SessionError>;
    fn on_position_sync(&mut self, event: PositionSync) -> Result<(), SessionError>;
    fn on_move_propagation(&mut self, event: MovePropagation);
    fn on_clock_update(&mut self, event: ClockUpdate) -> Result<(), SessionError>;
    fn on_match_over(&mut self);
    fn on_disconnect(&mut self);
}

/// Errors from the protocol client itself.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("websocket transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("cannot send, websocket not open")]
    NotConnected,

    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),
}

enum Inbound {
    Frame(String),
    Closed,
}

/// The protocol client state machine.
pub struct MatchClient {
    state: ConnectionState,
    sink: Option<WsSink>,
    inbound: Option<mpsc::Receiver<Inbound>>,
    reader: Option<JoinHandle<()>>,
    interrupt: Option<Value>,
    commit_window: Duration,
    settle_delay: Duration,
}

impl MatchClient {
    /// Creates a disconnected client with the given commit window and
    /// post-open settle delay.
    pub fn new(commit_window: Duration, settle_delay: Duration) -> Self {
        MatchClient {
            state: ConnectionState::Disconnected,
            sink: None,
            inbound: None,
            reader: None,
            interrupt: None,
            commit_window,
            settle_delay,
        }
    }

    /// Current transport state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Opens the transport. Any prior connection is torn down first;
    /// at most one transport is live per client.
    ///
    /// If `initial` is given it is sent after a short settle delay;
    /// the caller should follow up with [`MatchClient::await_commit`]
    /// to learn whether the server accepted it.
    pub async fn connect(
        &mut self,
        url: &str,
        initial: Option<&ClientEvent>,
    ) -> Result<(), ClientError> {
        if self.state != ConnectionState::Disconnected {
            tracing::info!("tearing down previous connection");
            self.close().await;
        }

        self.state = ConnectionState::Connecting;
        let (ws, _response) = match connect_async(url).await {
            Ok(ok) => ok,
            Err(err) => {
                self.state = ConnectionState::Disconnected;
                return Err(err.into());
            }
        };
        tracing::info!(%url, "websocket connection opened");

        let (sink, mut stream) = ws.split();
        let (tx, rx) = mpsc::channel(64);
        let reader = tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        if tx.send(Inbound::Frame(text.to_string())).await.is_err() {
                            return;
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(err) => {
                        tracing::warn!(%err, "websocket read error");
                        break;
                    }
                }
            }
            let _ = tx.send(Inbound::Closed).await;
        });

        self.sink = Some(sink);
        self.inbound = Some(rx);
        self.reader = Some(reader);
        self.interrupt = None;
        self.state = ConnectionState::Open;

        if let Some(event) = initial {
            sleep(self.settle_delay).await;
            self.send(event).await?;
        }

        Ok(())
    }

    /// Serializes and transmits an event.
    ///
    /// Refuses (observably, not silently) unless the transport is
    /// open.
    pub async fn send(&mut self, event: &ClientEvent) -> Result<(), ClientError> {
        if self.state != ConnectionState::Open {
            tracing::warn!("cannot send event, websocket not open");
            return Err(ClientError::NotConnected);
        }
        let text = serde_json::to_string(event)?;

        let sink = self.sink.as_mut().ok_or(ClientError::NotConnected)?;
        if let Err(err) = sink.send(Message::Text(text.into())).await {
            tracing::warn!(%err, "websocket send failed, dropping transport");
            self.drop_transport();
            return Err(err.into());
        }
        Ok(())
    }

    /// Waits out the commit window for the last sent action.
    ///
    /// Inbound events keep being routed (in delivery order) while
    /// waiting; a `match_error` in the window, or a handler failure,
    /// rejects the commit with that reason.
    pub async fn await_commit<H: EventHandler>(&mut self, handler: &mut H) -> Commit {
        let deadline = Instant::now() + self.commit_window;

        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }

            let received = match self.inbound.as_mut() {
                Some(rx) => timeout(deadline - now, rx.recv()).await,
                None => return Commit::Disconnected,
            };

            match received {
                Ok(Some(Inbound::Frame(text))) => self.route_text(&text, handler).await,
                Ok(Some(Inbound::Closed)) | Ok(None) => {
                    self.drop_transport();
                    handler.on_disconnect();
                    return Commit::Disconnected;
                }
                Err(_elapsed) => break,
            }
        }

        match self.interrupt.take() {
            Some(reason) => Commit::Rejected(reason),
            None => Commit::Accepted,
        }
    }

    /// Drains events that have already been delivered, without
    /// blocking. Used by front-end loops between gestures.
    pub async fn pump<H: EventHandler>(&mut self, handler: &mut H) {
        loop {
            let received = match self.inbound.as_mut() {
                Some(rx) => rx.try_recv(),
                None => return,
            };

            match received {
                Ok(Inbound::Frame(text)) => self.route_text(&text, handler).await,
                Ok(Inbound::Closed) | Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.drop_transport();
                    handler.on_disconnect();
                    return;
                }
                Err(mpsc::error::TryRecvError::Empty) => return,
            }
        }
    }

    /// Decodes and dispatches one inbound text frame.
    pub async fn route_text<H: EventHandler>(&mut self, text: &str, handler: &mut H) {
        match ServerEvent::decode(text) {
            Ok(event) => self.dispatch(event, handler).await,
            Err(err) => {
                tracing::warn!(%err, "malformed event from server");
                self.interrupt = Some(Value::String(err.to_string()));
            }
        }
    }

    async fn dispatch<H: EventHandler>(&mut self, event: ServerEvent, handler: &mut H) {
        match event {
            ServerEvent::AssignedMatch(assigned) => {
                if let Err(err) = handler.on_assigned_match(assigned) {
                    self.capture_failure(err);
                }
            }
            ServerEvent::PositionSync(position) => {
                if let Err(err) = handler.on_position_sync(position) {
                    self.capture_failure(err);
                }
            }
            ServerEvent::MovePropagation(propagation) => handler.on_move_propagation(propagation),
            ServerEvent::ClockUpdate(clock) => {
                if let Err(err) = handler.on_clock_update(clock) {
                    self.capture_failure(err);
                }
            }
            ServerEvent::MatchOver(_) => {
                tracing::info!("match over, closing transport");
                handler.on_match_over();
                self.close().await;
            }
            ServerEvent::MatchError(payload) => {
                tracing::warn!("match error from server");
                self.interrupt = Some(payload);
            }
            ServerEvent::Unknown(kind) => {
                tracing::debug!(%kind, "ignoring unrecognized event type");
            }
        }
    }

    fn capture_failure(&mut self, err: SessionError) {
        tracing::warn!(%err, "event handler failed");
        self.interrupt = Some(Value::String(err.to_string()));
    }

    /// Closes the transport with a normal closure code.
    pub async fn close(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            let frame = CloseFrame {
                code: CloseCode::Normal,
                reason: "".into(),
            };
            let _ = sink.send(Message::Close(Some(frame))).await;
            let _ = sink.close().await;
        }
        self.drop_transport();
    }

    fn drop_transport(&mut self) {
        self.sink = None;
        self.inbound = None;
        if let Some(task) = self.reader.take() {
            task.abort();
        }
        self.state = ConnectionState::Disconnected;
    }
}

impl Default for MatchClient {
    fn default() -> Self {
        MatchClient::new(Duration::from_millis(200), Duration::from_millis(150))
    }
}

impl Drop for MatchClient {
    fn drop(&mut self) {
        if let Some(task) = self.reader.take() {
            task.abort();
        }
    }
}
