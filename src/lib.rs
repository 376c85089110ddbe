use fixed::{types::extra::U31, FixedU32};

mod board;
mod clock;
mod engine;
mod error;
mod js_interface;
mod logger;
mod session;
mod settings;
mod timer;
mod uci;
mod utils;

/// Material balance. Positive favours White.
pub type Score = i32;

/// Larger than any reachable evaluation, and safe to negate.
pub const INFINITY: Score = Score::MAX;

/// A probability between 0 and 1.
pub type Chance = FixedU32<U31>;

pub use board::{
    parse_promotion, parse_square, AppliedMove, DrawReason, GameBoard, Status, VerboseMove,
    START_FEN,
};
pub use clock::{format_time, ChessClock};
pub use engine::{
    alphabeta::{AlphaBeta, BranchInfo, Choice, LayerInfo, Window},
    evaluator::StaticEvaluator,
    material::MaterialCount,
    random::RandomMover,
    state::{GameState, MoveGuard},
    Engine,
};
pub use error::{FenError, MoveError};
pub use logger::Logger;
pub use session::{Cue, Outcome, Selection, Session, Turn};
pub use settings::{Difficulty, Mode, OpponentKind, Settings};
pub use uci::{EngineMove, EngineParams};

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Chance that the easiest opponent plays a random move instead of searching.
#[inline]
pub fn easy_skip_chance() -> Chance { Chance::from_num(0.3) }

pub mod protocol {
    //! Text protocol for an external UCI engine. Transport is left to the
    //! caller (a web worker in the browser, a child process natively).
    pub use crate::uci::{handshake, parse_bestmove, search_commands};
}
