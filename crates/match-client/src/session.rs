//! Match session state and server-event handlers.
//!
//! Everything the original front end kept as loose globals (current
//! turn, assigned color, the dragged piece) lives here as one explicit
//! struct. The session owns the client-local board projection, which
//! is provisional: it is rebuilt wholesale from every position sync
//! and mutated optimistically only after a commit cycle succeeds.

use serde_json::Value;
use thiserror::Error;

use match_core::{
    decode_placement, Color, FenError, Move, Perspective, PieceKind, Placement, Square,
    START_PLACEMENT,
};
use match_rules::{en_passant_step, encode_move, is_promotion, legal_step, Occupancy};

use crate::client::EventHandler;
use crate::events::{AssignedMatch, ClientEvent, ClockUpdate, MovePropagation, PositionSync};

/// Which clock display a clock update belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSide {
    Player,
    Opponent,
}

/// Render surface supplied by the UI collaborator.
///
/// Square slots are render indices with the session's perspective
/// already applied; the UI lays them out top-left first and never sees
/// canonical indices.
pub trait BoardRenderer {
    fn place_piece(&mut self, slot: u8, kind: PieceKind, color: Color);
    fn clear_square(&mut self, slot: u8);
    fn transient_message(&mut self, message: &str);
    fn match_banner(&mut self, text: &str);
    fn turn_indicator(&mut self, turn: Option<Color>);
    fn clock_text(&mut self, side: ClockSide, text: &str);
}

/// Errors raised by the session handlers.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("position sync failed: {0}")]
    Fen(#[from] FenError),

    #[error("no active match")]
    NoActiveMatch,
}

/// A drop gesture from the drag adapter: start and target square in
/// canonical indices.
#[derive(Debug, Clone, Copy)]
pub struct DragGesture {
    pub start: Square,
    pub target: Square,
}

/// What the session decided about a drop gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Locally illegal; a transient message was already rendered and
    /// no server round trip is needed.
    Rejected,
    /// The move is a promotion candidate; the caller must collect a
    /// choice and call [`MatchSession::finalize_promotion`].
    NeedsPromotion,
    /// Send this event, then run a commit cycle and apply or discard
    /// the pending move accordingly.
    Send(ClientEvent),
}

#[derive(Debug, Clone, Copy)]
struct PendingMove {
    mv: Move,
    /// Square of the pawn removed by an en-passant capture, if any.
    ep_victim: Option<Square>,
}

/// Session-scoped match state plus the glue from server events to
/// board geometry, notation, and render instructions.
pub struct MatchSession<R> {
    renderer: R,
    board: Placement,
    perspective: Perspective,
    turn: Color,
    assigned: Option<Color>,
    match_id: Option<String>,
    concluded: bool,
    pending: Option<PendingMove>,
    awaiting_choice: Option<PendingMove>,
}

impl<R: BoardRenderer> MatchSession<R> {
    pub fn new(renderer: R) -> Self {
        MatchSession {
            renderer,
            board: [None; 64],
            perspective: Perspective::Light,
            turn: Color::Light,
            assigned: None,
            match_id: None,
            concluded: false,
            pending: None,
            awaiting_choice: None,
        }
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn assigned(&self) -> Option<Color> {
        self.assigned
    }

    pub fn match_id(&self) -> Option<&str> {
        self.match_id.as_deref()
    }

    pub fn concluded(&self) -> bool {
        self.concluded
    }

    pub fn piece_at(&self, square: Square) -> Option<(PieceKind, Color)> {
        self.board.piece_at(square)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Validates a drop gesture against the local legality gate.
    ///
    /// Rejections short-circuit before any network traffic: wrong
    /// turn, geometric illegality, and capturing one's own piece all
    /// stop here with a transient message.
    pub fn handle_drop(&mut self, gesture: DragGesture) -> GestureOutcome {
        // A new gesture abandons any promotion still waiting on a choice.
        self.awaiting_choice = None;

        if self.concluded || self.assigned.is_none() {
            self.renderer.transient_message("no active match");
            return GestureOutcome::Rejected;
        }

        let Some((kind, color)) = self.board.piece_at(gesture.start) else {
            self.renderer.transient_message("invalid move");
            return GestureOutcome::Rejected;
        };

        if color != self.turn {
            self.renderer.transient_message("not your turn buddy");
            return GestureOutcome::Rejected;
        }

        if !legal_step(kind, color, gesture.start, gesture.target, &self.board) {
            self.renderer.transient_message("invalid move");
            return GestureOutcome::Rejected;
        }

        // A drop onto an occupied square is only a capture when the
        // occupant belongs to the opponent.
        let capture = match self.board.piece_at(gesture.target) {
            Some((_, occupant)) if occupant == color => {
                self.renderer.transient_message("invalid move");
                return GestureOutcome::Rejected;
            }
            Some(_) => true,
            None => false,
        };

        let mut mv = Move::new(gesture.start, gesture.target, kind, color);
        if capture {
            mv = mv.with_capture();
        }

        let ep_victim = if kind == PieceKind::Pawn
            && en_passant_step(color, gesture.start, gesture.target, &self.board)
        {
            Square::from_index(gesture.start.row() * 8 + gesture.target.file()).ok()
        } else {
            None
        };
        let pending = PendingMove { mv, ep_victim };

        if kind == PieceKind::Pawn && is_promotion(color, gesture.target) {
            self.awaiting_choice = Some(pending);
            return GestureOutcome::NeedsPromotion;
        }

        GestureOutcome::Send(self.stage(pending))
    }

    /// Completes a promotion-suspended gesture with the user's choice.
    ///
    /// Returns `None` if no gesture is waiting on a choice.
    pub fn finalize_promotion(&mut self, choice: PieceKind) -> Option<ClientEvent> {
        let mut pending = self.awaiting_choice.take()?;
        pending.mv = pending.mv.with_promotion(choice);
        Some(self.stage(pending))
    }

    fn stage(&mut self, pending: PendingMove) -> ClientEvent {
        let notation = encode_move(&pending.mv, &self.board);
        self.pending = Some(pending);
        ClientEvent::MakeMove { notation }
    }

    /// Applies the pending optimistic move after a successful commit:
    /// relocates the piece, removes any en-passant victim, and flips
    /// the turn indicator exactly once.
    pub fn commit_pending(&mut self) {
        let Some(PendingMove { mv, ep_victim }) = self.pending.take() else {
            return;
        };

        let placed = mv.promotion.unwrap_or(mv.piece);
        self.board[mv.start.index() as usize] = None;
        self.board[mv.target.index() as usize] = Some((placed, mv.color));
        self.render_square(mv.start);
        self.render_square(mv.target);

        if let Some(victim) = ep_victim {
            self.board[victim.index() as usize] = None;
            self.render_square(victim);
        }

        self.flip_turn();
    }

    /// Drops the pending move after a rejected commit and surfaces the
    /// server's reason transiently. The optimistic mutation is never
    /// applied.
    pub fn reject_pending(&mut self, reason: &Value) {
        self.pending = None;
        self.awaiting_choice = None;
        let text = match reason.as_str() {
            Some(s) => s.to_string(),
            None => reason.to_string(),
        };
        self.renderer.transient_message(&text);
    }

    /// Drops any in-flight gesture without rendering anything.
    pub fn discard_pending(&mut self) {
        self.pending = None;
        self.awaiting_choice = None;
    }

    fn flip_turn(&mut self) {
        self.turn = self.turn.opposite();
        self.renderer.turn_indicator(Some(self.turn));
    }

    fn render_square(&mut self, square: Square) {
        let slot = self.perspective.render_index(square);
        match self.board.piece_at(square) {
            Some((kind, color)) => self.renderer.place_piece(slot, kind, color),
            None => self.renderer.clear_square(slot),
        }
    }

    fn render_full(&mut self) {
        for index in 0..64u8 {
            if let Ok(square) = Square::from_index(index) {
                self.render_square(square);
            }
        }
    }
}

impl<R: BoardRenderer> EventHandler for MatchSession<R> {
    fn on_assigned_match(&mut self, event: AssignedMatch) -> Result<(), SessionError> {
        self.assigned = Some(event.pieces);
        self.perspective = event.pieces.into();
        self.board = decode_placement(START_PLACEMENT)?;
        self.turn = Color::Light;
        self.concluded = false;
        self.pending = None;
        self.awaiting_choice = None;

        self.renderer
            .match_banner(&format!("Match ID: {}", event.match_id));
        self.match_id = Some(event.match_id);
        self.render_full();
        self.renderer.turn_indicator(Some(self.turn));
        Ok(())
    }

    fn on_position_sync(&mut self, event: PositionSync) -> Result<(), SessionError> {
        if self.assigned.is_none() {
            return Err(SessionError::NoActiveMatch);
        }

        // The authoritative position supersedes any optimistic move
        // still in flight.
        self.discard_pending();
        self.board = decode_placement(&event.fen)?;
        self.render_full();
        self.flip_turn();
        Ok(())
    }

    fn on_move_propagation(&mut self, _event: MovePropagation) {
        self.flip_turn();
    }

    fn on_clock_update(&mut self, event: ClockUpdate) -> Result<(), SessionError> {
        let assigned = self.assigned.ok_or(SessionError::NoActiveMatch)?;

        let display = match event.time_remaining.find('.') {
            Some(dot) => &event.time_remaining[..dot],
            None => event.time_remaining.as_str(),
        };
        let side = if event.clock_owner == assigned {
            ClockSide::Player
        } else {
            ClockSide::Opponent
        };
        self.renderer.clock_text(side, display);
        Ok(())
    }

    fn on_match_over(&mut self) {
        self.concluded = true;
        self.discard_pending();
        self.renderer.turn_indicator(None);
        self.renderer.match_banner("match over");
    }

    fn on_disconnect(&mut self) {
        self.assigned = None;
        self.concluded = true;
        self.discard_pending();
        self.renderer.turn_indicator(None);
        self.renderer.match_banner("");
    }
}
