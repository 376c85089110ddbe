
use chess::{Color, Piece, Square};
use js_sys::{Array, JsString};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::board::{square_at, DrawReason, VerboseMove};
use super::session::{Cue, Outcome, Selection, Session, Turn};
use super::settings::Settings;

/// A move as the front end sees it: squares in algebraic notation.
#[derive(Serialize)]
struct JsMove {
    from: String,
    to: String,
    piece: String,
    captured: Option<String>,
    promotion: Option<String>,
    check: bool,
    cues: Vec<&'static str>,
}

impl JsMove {
    fn from_verbose(mv: &VerboseMove) -> JsMove {
        JsMove {
            from: mv.from().to_string(),
            to: mv.to().to_string(),
            piece: piece_letter(mv.piece),
            captured: mv.captured.map(piece_letter),
            promotion: mv.promotion().map(piece_letter),
            check: false,
            cues: Vec::new(),
        }
    }

    fn from_turn(turn: &Turn) -> JsMove {
        JsMove {
            check: turn.applied.gives_check,
            cues: turn.cues.iter().map(|&cue| cue_name(cue)).collect(),
            ..JsMove::from_verbose(&turn.applied.details)
        }
    }
}

#[derive(Serialize)]
struct JsTick {
    status: String,
    cues: Vec<&'static str>,
}

fn piece_letter(piece: Piece) -> String { piece.to_string(Color::Black) }

fn cue_name(cue: Cue) -> &'static str {
    match cue {
        Cue::Move => "move",
        Cue::Capture => "capture",
        Cue::Check => "check",
        Cue::Win => "win",
    }
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

fn js_square(file: usize, rank: usize) -> Result<Square, JsValue> {
    square_at(file, rank).ok_or_else(|| JsValue::from_str("square is off the board"))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn turn_json(turn: Option<Turn>) -> Result<Option<String>, JsValue> {
    turn.map(|turn| to_json(&JsMove::from_turn(&turn))).transpose()
}

#[wasm_bindgen]
impl Session {
    /// `settings` is a JSON object; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn js_new(settings: &str) -> Result<Session, JsValue> {
        crate::utils::set_panic_hook();
        let settings = if settings.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        Ok(Session::new(settings))
    }

    pub fn js_start(&mut self) { self.start(); }

    pub fn js_started(&self) -> bool { self.is_started() }

    pub fn js_fen(&self) -> String { self.board().fen() }

    pub fn js_piece(&self, file: usize, rank: usize) -> Option<JsString> {
        let (piece, color) = self.board().piece_at(square_at(file, rank)?)?;
        Some(piece.to_string(color).into())
    }

    /// JSON list of the moves the piece on the square can make.
    pub fn js_moves_from(&self, file: usize, rank: usize) -> Result<String, JsValue> {
        let moves: Vec<JsMove> = self
            .board()
            .verbose_moves(Some(js_square(file, rank)?))
            .iter()
            .map(JsMove::from_verbose)
            .collect();
        to_json(&moves)
    }

    /// Returns `"ignored"`, `"selected"`, `"rejected"`, or the played move
    /// as JSON.
    pub fn js_select(&mut self, file: usize, rank: usize) -> Result<String, JsValue> {
        match self.select(js_square(file, rank)?) {
            Selection::Ignored => Ok("ignored".to_string()),
            Selection::Selected(_) => Ok("selected".to_string()),
            Selection::Rejected(_) => Ok("rejected".to_string()),
            Selection::Moved(turn) => to_json(&JsMove::from_turn(&turn)),
        }
    }

    /// The in-process opponent's reply as JSON, if it is its turn.
    pub fn js_opponent_move(&mut self) -> Result<Option<String>, JsValue> {
        turn_json(self.opponent_move())
    }

    /// Lines to post to the engine worker, empty if no request is due.
    pub fn js_engine_request(&mut self) -> Array {
        self.engine_request()
            .unwrap_or_default()
            .into_iter()
            .map(|line| JsValue::from_str(&line))
            .collect()
    }

    pub fn js_engine_reply(&mut self, line: &str) -> Result<Option<String>, JsValue> {
        turn_json(self.engine_reply(line))
    }

    /// Advances the clock by one second. Returns the status as JSON, with
    /// the cues to play if the side to move just ran out of time.
    pub fn js_tick(&mut self) -> Result<String, JsValue> {
        let cues = match self.tick() {
            Some((_, cues)) => cues.into_iter().map(cue_name).collect(),
            None => Vec::new(),
        };
        to_json(&JsTick { status: self.js_status().into(), cues })
    }

    pub fn js_status(&self) -> JsString {
        match self.outcome() {
            None if self.is_ai_thinking() => "thinking".into(),
            None if self.board().in_check() => format!("check {}", color_name(self.board().side_to_move())).into(),
            None => format!("turn {}", color_name(self.board().side_to_move())).into(),
            Some(outcome) => outcome.into(),
        }
    }

    pub fn js_player_name(&self, white: bool) -> String {
        let color = if white { Color::White } else { Color::Black };
        self.settings().player_name(color).to_string()
    }

    /// Seconds left for a side, or `None` if the side name is unknown.
    pub fn js_clock(&self, side: &str) -> Option<i32> {
        match side {
            "white" => Some(self.clock().remaining(Color::White)),
            "black" => Some(self.clock().remaining(Color::Black)),
            _ => None,
        }
    }

    pub fn js_clock_text(&self, white: bool) -> String {
        let color = if white { Color::White } else { Color::Black };
        crate::clock::format_time(self.clock().remaining(color))
    }

    pub fn js_clock_low(&self, white: bool) -> bool {
        self.clock().is_low(if white { Color::White } else { Color::Black })
    }
}

impl From<Outcome> for JsString {
    fn from(outcome: Outcome) -> JsString {
        match outcome {
            Outcome::Checkmate { winner } => format!("checkmate {}", color_name(winner)).into(),
            Outcome::Timeout { winner } => format!("timeout {}", color_name(winner)).into(),
            Outcome::Draw(DrawReason::Stalemate) => "draw stalemate".into(),
            Outcome::Draw(DrawReason::InsufficientMaterial) => "draw material".into(),
            Outcome::Draw(DrawReason::ThreefoldRepetition) => "draw repetition".into(),
            Outcome::Draw(DrawReason::FiftyMoves) => "draw fifty".into(),
        }
    }
}
