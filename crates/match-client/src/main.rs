//! Line-based front end for the match client.
//!
//! Joins a match through the matchmaking endpoint (or requests an
//! engine match with `engine <elo>`) and reads moves from stdin as
//! coordinate pairs: `e2e4`, or `e7e8q` to promote. `quit` exits.

use anyhow::Result;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::time::Duration;

use match_client::{
    BoardRenderer, ClientEvent, ClockSide, Commit, Config, ConnectionState, DragGesture,
    GestureOutcome, MatchClient, MatchSession,
};
use match_core::{Color, PieceKind, Square};

/// Renders the session to stdout, one instruction per line.
struct TermRenderer;

impl BoardRenderer for TermRenderer {
    fn place_piece(&mut self, slot: u8, kind: PieceKind, color: Color) {
        println!("[board] {:2} <- {} {}", slot, color, kind);
    }

    fn clear_square(&mut self, slot: u8) {
        println!("[board] {:2} cleared", slot);
    }

    fn transient_message(&mut self, message: &str) {
        println!("[info] {}", message);
    }

    fn match_banner(&mut self, text: &str) {
        println!("[match] {}", text);
    }

    fn turn_indicator(&mut self, turn: Option<Color>) {
        match turn {
            Some(color) => println!("[turn] {}", color),
            None => println!("[turn] -"),
        }
    }

    fn clock_text(&mut self, side: ClockSide, text: &str) {
        let label = match side {
            ClockSide::Player => "you",
            ClockSide::Opponent => "opponent",
        };
        println!("[clock] {}: {}s", label, text);
    }
}

fn parse_move(input: &str) -> Option<(DragGesture, Option<PieceKind>)> {
    if input.len() < 4 || input.len() > 5 {
        return None;
    }
    let start = Square::from_algebraic(input.get(0..2)?).ok()?;
    let target = Square::from_algebraic(input.get(2..4)?).ok()?;
    let promotion = match input.chars().nth(4) {
        Some(letter) => Some(PieceKind::from_promotion_letter(letter)?),
        None => None,
    };
    Some((DragGesture { start, target }, promotion))
}

async fn submit(
    client: &mut MatchClient,
    session: &mut MatchSession<TermRenderer>,
    event: ClientEvent,
) {
    if let Err(err) = client.send(&event).await {
        tracing::warn!(%err, "failed to send move");
        session.discard_pending();
        return;
    }
    match client.await_commit(session).await {
        Commit::Accepted => session.commit_pending(),
        Commit::Rejected(reason) => session.reject_pending(&reason),
        Commit::Disconnected => session.discard_pending(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load().await?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (url, initial) = match args.first().map(String::as_str) {
        Some("engine") => {
            let elo = match args.get(1) {
                Some(raw) => raw.parse()?,
                None => 1500,
            };
            (config.engine_url(), ClientEvent::NewEngineMatch { elo })
        }
        Some(time_control) => (
            config.matchmaking_url(),
            ClientEvent::JoinMatch {
                time_control: time_control.to_string(),
            },
        ),
        None => (
            config.matchmaking_url(),
            ClientEvent::JoinMatch {
                time_control: "5m".to_string(),
            },
        ),
    };

    let mut client = MatchClient::new(config.commit_window(), config.settle_delay());
    let mut session = MatchSession::new(TermRenderer);

    client.connect(&url, Some(&initial)).await?;
    if let Commit::Rejected(reason) = client.await_commit(&mut session).await {
        anyhow::bail!("server rejected the match request: {reason}");
    }

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let mut awaiting_choice = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                client.pump(&mut session).await;
                if client.state() == ConnectionState::Disconnected {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if input == "quit" {
                    client.close().await;
                    break;
                }

                if awaiting_choice {
                    let choice = input.chars().next().and_then(PieceKind::from_promotion_letter);
                    match choice {
                        Some(choice) => {
                            awaiting_choice = false;
                            if let Some(event) = session.finalize_promotion(choice) {
                                submit(&mut client, &mut session, event).await;
                            }
                        }
                        None => println!("choose one of q, r, b, n"),
                    }
                    continue;
                }

                let Some((gesture, promotion)) = parse_move(input) else {
                    println!("moves look like e2e4 (or e7e8q to promote)");
                    continue;
                };
                match session.handle_drop(gesture) {
                    GestureOutcome::Rejected => {}
                    GestureOutcome::NeedsPromotion => match promotion {
                        Some(choice) => {
                            if let Some(event) = session.finalize_promotion(choice) {
                                submit(&mut client, &mut session, event).await;
                            }
                        }
                        None => {
                            println!("promotion: type one of q, r, b, n");
                            awaiting_choice = true;
                        }
                    },
                    GestureOutcome::Send(event) => {
                        submit(&mut client, &mut session, event).await;
                    }
                }
            }
        }
    }

    Ok(())
}
