use chess::{Piece, Square};

use crate::board::{parse_promotion, parse_square};

/// What the external engine is asked for at a given difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineParams {
    pub depth: u8,
    /// The engine's `Skill Level` option, 0 to 20
    pub skill: u8,
}

/// A move read from a `bestmove` reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineMove {
    pub from: Square,
    pub to: Square,
    /// Only used if the move turns out to be a promotion
    pub promotion: Piece,
}

/// Sent once when the engine starts.
pub fn handshake() -> [&'static str; 2] { ["uci", "isready"] }

/// The lines that ask the engine to search `fen`.
pub fn search_commands(fen: &str, params: EngineParams) -> Vec<String> {
    vec![
        format!("setoption name Skill Level value {}", params.skill),
        format!("position fen {}", fen),
        format!("go depth {}", params.depth),
    ]
}

/// Reads `bestmove <move> [ponder <move>]`. Any other line, and a
/// `bestmove (none)`, gives `None`.
pub fn parse_bestmove(line: &str) -> Option<EngineMove> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != "bestmove" {
        return None;
    }
    let mv = tokens.next()?;
    let from = parse_square(mv.get(0..2)?).ok()?;
    let to = parse_square(mv.get(2..4)?).ok()?;
    let promotion = match mv.get(4..5) {
        Some(p) if !p.is_empty() => parse_promotion(p)?,
        _ => Piece::Queen,
    };
    Some(EngineMove { from, to, promotion })
}
