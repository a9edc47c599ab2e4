//! Typed event messages for the `{type, payload}` envelope.
//!
//! Outgoing events serialize through serde's adjacent tagging, which
//! produces the envelope shape directly. Inbound frames decode in two
//! steps: envelope first, then a total switch over the type tag that
//! extracts a typed payload. Unknown types survive as
//! [`ServerEvent::Unknown`] so future event kinds never break the
//! session.

use match_core::{Color, ColorParseError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors from decoding an inbound event.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("event frame is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("event has no type field")]
    MissingType,

    #[error("missing field '{field}' in '{event}' payload")]
    MissingField {
        event: &'static str,
        field: &'static str,
    },

    #[error("bad color in '{event}' payload: {source}")]
    BadColor {
        event: &'static str,
        source: ColorParseError,
    },
}

/// Events the client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinMatch {
        time_control: String,
    },
    NewEngineMatch {
        elo: u32,
    },
    MakeMove {
        #[serde(rename = "move")]
        notation: String,
    },
}

/// Match assignment: the server has paired this client into a match.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedMatch {
    pub match_id: String,
    pub pieces: Color,
}

/// Authoritative position push; only the FEN placement field is used.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSync {
    pub fen: String,
}

/// Move propagation notice. Informational in the current protocol:
/// position sync carries the actual board state.
#[derive(Debug, Clone, PartialEq)]
pub struct MovePropagation {
    pub player: Option<Color>,
}

/// Clock update for one side.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockUpdate {
    pub clock_owner: Color,
    pub time_remaining: String,
}

/// Events pushed by the server, decoded into a closed sum.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    AssignedMatch(AssignedMatch),
    PositionSync(PositionSync),
    MovePropagation(MovePropagation),
    ClockUpdate(ClockUpdate),
    MatchOver(Value),
    MatchError(Value),
    Unknown(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    payload: Value,
}

fn str_field(
    payload: &Value,
    event: &'static str,
    field: &'static str,
) -> Result<String, EventError> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(EventError::MissingField { event, field })
}

fn color_field(
    payload: &Value,
    event: &'static str,
    field: &'static str,
) -> Result<Color, EventError> {
    str_field(payload, event, field)?
        .parse()
        .map_err(|source| EventError::BadColor { event, source })
}

impl ServerEvent {
    /// Decodes a raw text frame into a typed event.
    ///
    /// A missing required field is an error here, surfaced to the
    /// caller through the next commit rejection; an unrecognized type
    /// tag is not.
    pub fn decode(text: &str) -> Result<ServerEvent, EventError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        let kind = match envelope.kind {
            Some(kind) if !kind.is_empty() => kind,
            _ => return Err(EventError::MissingType),
        };
        let payload = envelope.payload;

        match kind.as_str() {
            "assigned_match" => Ok(ServerEvent::AssignedMatch(AssignedMatch {
                match_id: str_field(&payload, "assigned_match", "match_id")?,
                pieces: color_field(&payload, "assigned_match", "pieces")?,
            })),
            "propagate_position" => Ok(ServerEvent::PositionSync(PositionSync {
                fen: str_field(&payload, "propagate_position", "fen")?,
            })),
            "propagate_move" => {
                let player = match payload.get("player").and_then(Value::as_str) {
                    Some(name) => Some(name.parse().map_err(|source| EventError::BadColor {
                        event: "propagate_move",
                        source,
                    })?),
                    None => None,
                };
                Ok(ServerEvent::MovePropagation(MovePropagation { player }))
            }
            "clock_update" => Ok(ServerEvent::ClockUpdate(ClockUpdate {
                clock_owner: color_field(&payload, "clock_update", "clock_owner")?,
                time_remaining: str_field(&payload, "clock_update", "time_remaining")?,
            })),
            "match_over" => Ok(ServerEvent::MatchOver(payload)),
            "match_error" => Ok(ServerEvent::MatchError(payload)),
            _ => Ok(ServerEvent::Unknown(kind)),
        }
    }
}
