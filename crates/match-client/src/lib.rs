//! WebSocket protocol client for the online chess match server.
//!
//! The server is authoritative; this client is an optimistic front
//! end. [`client::MatchClient`] owns the transport and the
//! pending-interrupt slot, [`session::MatchSession`] owns all match
//! state, and [`events`] defines the typed `{type, payload}` envelope
//! both directions.

pub mod client;
pub mod config;
pub mod events;
pub mod session;

pub use client::{Commit, ConnectionState, EventHandler, MatchClient};
pub use config::Config;
pub use events::{ClientEvent, EventError, ServerEvent};
pub use session::{BoardRenderer, ClockSide, DragGesture, GestureOutcome, MatchSession};
