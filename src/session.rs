use chess::{Color, Piece, Square};
use wasm_bindgen::prelude::*;

use crate::{
    board::{AppliedMove, DrawReason, GameBoard, Status},
    clock::ChessClock,
    engine::{alphabeta::AlphaBeta, Engine},
    error::MoveError,
    logger::Logger,
    settings::{Mode, OpponentKind, Settings},
    uci,
};

/// Sounds the front end should play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Move,
    Capture,
    Check,
    Win,
}

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Draw(DrawReason),
    Timeout { winner: Color },
}

/// A move that was played, and what followed from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub applied: AppliedMove,
    /// Empty when sound is disabled
    pub cues: Vec<Cue>,
    pub status: Status,
}

/// The result of clicking a square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Clicks are not accepted right now, or the square has nothing to move
    Ignored,
    /// The square's piece is picked up
    Selected(Square),
    Moved(Turn),
    /// The picked-up piece cannot go there; the selection is dropped
    Rejected(MoveError),
}

/// The whole state of one game in the visualizer: the position, the
/// players' settings, the clock, and the opponent. The in-process opponent
/// only ever plays Black.
#[wasm_bindgen]
pub struct Session {
    board: GameBoard,
    settings: Settings,
    clock: ChessClock,
    started: bool,
    ai_thinking: bool,
    selected: Option<Square>,
    /// The side whose clock ran out
    flagged: Option<Color>,
    opponent: Option<AlphaBeta<GameBoard>>,
    logger: Logger,
}

impl Session {

    pub fn new(settings: Settings) -> Session {
        Session::from_position(settings, GameBoard::initial_board())
    }

    pub fn from_position(settings: Settings, board: GameBoard) -> Session {
        let opponent = match (settings.mode.difficulty(), settings.opponent) {
            (Some(difficulty), OpponentKind::Minimax) => {
                Some(AlphaBeta::for_difficulty(difficulty, settings.log_level))
            }
            _ => None,
        };
        Session {
            board,
            clock: ChessClock::new(settings.clock_seconds),
            started: false,
            ai_thinking: false,
            selected: None,
            flagged: None,
            opponent,
            logger: Logger::new(settings.log_level),
            settings,
        }
    }

    /// Makes the opponent's random choices reproducible.
    pub fn with_seed(mut self, seed: u64) -> Session {
        self.opponent = self.opponent.take().map(|opponent| opponent.with_seed(seed));
        self
    }

    pub fn board(&self) -> &GameBoard { &self.board }

    pub fn settings(&self) -> &Settings { &self.settings }

    pub fn clock(&self) -> &ChessClock { &self.clock }

    pub fn is_started(&self) -> bool { self.started }

    pub fn is_ai_thinking(&self) -> bool { self.ai_thinking }

    pub fn selected(&self) -> Option<Square> { self.selected }

    pub fn start(&mut self) {
        self.started = true;
        self.ai_thinking = false;
        self.flagged = None;
        self.selected = None;
        self.clock = ChessClock::new(self.settings.clock_seconds);
        self.logger.log_lazy(2, || format!(
            "{} (White) against {} (Black), {:?}",
            self.settings.player_white, self.settings.player_black, self.settings.mode
        ));
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if let Some(loser) = self.flagged {
            return Some(Outcome::Timeout { winner: !loser });
        }
        match self.board.status() {
            Status::InProgress => None,
            Status::Checkmate { winner } => Some(Outcome::Checkmate { winner }),
            Status::Draw(reason) => Some(Outcome::Draw(reason)),
        }
    }

    pub fn is_over(&self) -> bool { self.outcome().is_some() }

    /// Whether the side to move is played from the board rather than by the
    /// opponent.
    pub fn is_human_turn(&self) -> bool {
        self.settings.mode == Mode::Pvp || self.board.side_to_move() == Color::White
    }

    /// Handles a click on `sq`: the first click picks a piece up, the
    /// second tries to move it there, promoting to a queen.
    pub fn select(&mut self, sq: Square) -> Selection {
        if !self.started || self.ai_thinking || self.is_over() || !self.is_human_turn() {
            return Selection::Ignored;
        }
        match self.selected.take() {
            None => {
                if self.board.legal_moves(Some(sq)).is_empty() {
                    Selection::Ignored
                } else {
                    self.selected = Some(sq);
                    Selection::Selected(sq)
                }
            }
            Some(from) => match self.play(from, sq, Some(Piece::Queen)) {
                Ok(turn) => Selection::Moved(turn),
                Err(e) => {
                    self.logger.log_lazy(3, || format!("Rejected {}{}: {}", from, sq, e));
                    Selection::Rejected(e)
                }
            },
        }
    }

    /// Plays a move for the side to move.
    pub fn play(
        &mut self, from: Square, to: Square, promotion: Option<Piece>,
    ) -> Result<Turn, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let applied = self.board.apply_coords(from, to, promotion)?;
        Ok(self.finish_turn(applied))
    }

    /// Lets the in-process opponent reply. `None` if it is not the
    /// opponent's turn, the game is over, or the opponent is external.
    pub fn opponent_move(&mut self) -> Option<Turn> {
        if !self.started || self.is_over() || self.is_human_turn() {
            return None;
        }
        let opponent = self.opponent.as_mut()?;
        let mv = opponent.get_move(&mut self.board)?;
        match self.board.apply(mv) {
            Ok(applied) => Some(self.finish_turn(applied)),
            Err(e) => {
                self.logger.warn(&format!("opponent chose an unplayable move {}: {}", mv, e));
                None
            }
        }
    }

    /// The lines to send to the external engine for its reply. Marks the
    /// opponent as thinking until `engine_reply` sees a `bestmove`.
    pub fn engine_request(&mut self) -> Option<Vec<String>> {
        if self.settings.opponent != OpponentKind::Engine
            || !self.started
            || self.is_over()
            || self.is_human_turn()
        {
            return None;
        }
        let difficulty = self.settings.mode.difficulty()?;
        self.ai_thinking = true;
        Some(uci::search_commands(&self.board.fen(), difficulty.engine_params()))
    }

    /// Feeds one line of engine output. Returns the played turn once the
    /// `bestmove` line answering `engine_request` arrives. Replies nobody
    /// asked for are dropped.
    pub fn engine_reply(&mut self, line: &str) -> Option<Turn> {
        if !line.trim_start().starts_with("bestmove") {
            return None;
        }
        if !self.ai_thinking {
            self.logger.log_lazy(3, || format!("Dropped unrequested engine reply \"{}\"", line.trim()));
            return None;
        }
        self.ai_thinking = false;
        if self.is_over() || self.is_human_turn() {
            return None;
        }
        let reply = uci::parse_bestmove(line)?;
        match self.board.apply_coords(reply.from, reply.to, Some(reply.promotion)) {
            Ok(applied) => Some(self.finish_turn(applied)),
            Err(e) => {
                self.logger.warn(&format!("engine reply \"{}\" was not played: {}", line.trim(), e));
                None
            }
        }
    }

    /// One second passes for the side to move. Returns the outcome and its
    /// cues when that side runs out of time.
    pub fn tick(&mut self) -> Option<(Outcome, Vec<Cue>)> {
        if !self.started || self.is_over() {
            return None;
        }
        let loser = self.clock.tick(self.board.side_to_move())?;
        self.flagged = Some(loser);
        self.ai_thinking = false;
        self.selected = None;
        self.logger.log_lazy(2, || format!("{:?} ran out of time", loser));
        let cues = if self.settings.sound_enabled { vec![Cue::Win] } else { Vec::new() };
        Some((Outcome::Timeout { winner: !loser }, cues))
    }

    fn finish_turn(&mut self, applied: AppliedMove) -> Turn {
        let status = self.board.status();
        self.logger.log_lazy(3, || format!(
            "{} played {}", self.settings.player_name(applied.details.color), applied.mv()
        ));

        let mut cues = Vec::new();
        if self.settings.sound_enabled {
            cues.push(if applied.is_capture() {
                Cue::Capture
            } else if applied.gives_check {
                Cue::Check
            } else {
                Cue::Move
            });
            if !status.is_in_progress() {
                cues.push(Cue::Win);
            }
        }

        if !status.is_in_progress() {
            self.logger.log_lazy(2, || format!("Game over: {:?}", status));
        }

        Turn { applied, cues, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::parse_square;

    fn sq(name: &str) -> Square { parse_square(name).unwrap() }

    fn pvp() -> Settings { Settings { mode: Mode::Pvp, ..Settings::default() } }

    fn started(settings: Settings) -> Session {
        let mut session = Session::new(settings).with_seed(1);
        session.start();
        session
    }

    #[test]
    fn clicks_wait_for_the_start() {
        let mut session = Session::new(pvp());
        assert_eq!(session.select(sq("e2")), Selection::Ignored);
        session.start();
        assert_eq!(session.select(sq("e2")), Selection::Selected(sq("e2")));
    }

    #[test]
    fn two_clicks_make_a_move() {
        let mut session = started(pvp());
        assert_eq!(session.select(sq("e4")), Selection::Ignored);
        assert_eq!(session.select(sq("e2")), Selection::Selected(sq("e2")));
        let Selection::Moved(turn) = session.select(sq("e4")) else {
            panic!("e2e4 should have been played");
        };
        assert_eq!(turn.cues, vec![Cue::Move]);
        assert_eq!(turn.status, Status::InProgress);
        assert_eq!(session.selected(), None);
        assert_eq!(session.board().side_to_move(), Color::Black);
    }

    #[test]
    fn illegal_target_drops_the_selection() {
        let mut session = started(pvp());
        session.select(sq("e2"));
        assert_eq!(
            session.select(sq("e5")),
            Selection::Rejected(MoveError::Illegal { from: sq("e2"), to: sq("e5") })
        );
        assert_eq!(session.selected(), None);
        assert_eq!(session.board().history_len(), 0);
    }

    #[test]
    fn pvp_has_no_opponent() {
        let mut session = started(pvp());
        session.play(sq("e2"), sq("e4"), None).unwrap();
        assert_eq!(session.opponent_move(), None);
        assert_eq!(session.select(sq("e7")), Selection::Selected(sq("e7")));
    }

    #[test]
    fn opponent_answers_for_black() {
        let mut session = started(Settings { mode: Mode::BotMedium, ..Settings::default() });
        assert_eq!(session.opponent_move(), None);
        session.play(sq("e2"), sq("e4"), None).unwrap();
        assert_eq!(session.select(sq("e7")), Selection::Ignored);

        let turn = session.opponent_move().expect("black should reply");
        assert_eq!(turn.applied.details.color, Color::Black);
        assert_eq!(session.board().side_to_move(), Color::White);
        assert_eq!(session.board().history_len(), 2);
        assert_eq!(session.opponent_move(), None);
    }

    #[test]
    fn mate_ends_the_game_with_a_win_cue() {
        let board = GameBoard::from_fen(
            "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
        ).unwrap();
        let mut session = Session::from_position(pvp(), board);
        session.start();
        let turn = session.play(sq("h5"), sq("f7"), None).unwrap();
        assert_eq!(turn.cues, vec![Cue::Capture, Cue::Win]);
        assert_eq!(session.outcome(), Some(Outcome::Checkmate { winner: Color::White }));
        assert_eq!(session.select(sq("e8")), Selection::Ignored);
        assert_eq!(session.play(sq("e8"), sq("e7"), None), Err(MoveError::GameOver));
    }

    #[test]
    fn check_has_its_own_cue_and_sound_can_be_muted() {
        let fen = "4k3/8/8/8/8/8/8/4K2R w - - 0 1";
        let mut session = Session::from_position(pvp(), GameBoard::from_fen(fen).unwrap());
        session.start();
        let turn = session.play(sq("h1"), sq("h8"), None).unwrap();
        assert_eq!(turn.cues, vec![Cue::Check]);

        let quiet = Settings { sound_enabled: false, ..pvp() };
        let mut session = Session::from_position(quiet, GameBoard::from_fen(fen).unwrap());
        session.start();
        assert!(session.play(sq("h1"), sq("h8"), None).unwrap().cues.is_empty());
    }

    #[test]
    fn running_out_of_time_loses() {
        let mut session = started(Settings { clock_seconds: 2, ..pvp() });
        assert_eq!(session.tick(), None);
        assert_eq!(
            session.tick(),
            Some((Outcome::Timeout { winner: Color::Black }, vec![Cue::Win]))
        );
        assert_eq!(session.outcome(), Some(Outcome::Timeout { winner: Color::Black }));
        assert!(session.is_over());
        assert_eq!(session.tick(), None);
        assert_eq!(session.select(sq("e2")), Selection::Ignored);
    }

    #[test]
    fn timeout_is_silent_when_sound_is_off() {
        let mut session = started(Settings { clock_seconds: 1, sound_enabled: false, ..pvp() });
        assert_eq!(session.tick(), Some((Outcome::Timeout { winner: Color::Black }, Vec::new())));
    }

    #[test]
    fn clock_with_no_time_left_does_not_overflow() {
        let mut session = started(Settings { clock_seconds: i32::MIN, ..pvp() });
        assert!(session.tick().is_some());
        assert_eq!(session.clock().remaining(Color::White), i32::MIN);
    }

    #[test]
    fn clock_runs_for_the_side_to_move() {
        let mut session = started(pvp());
        session.tick();
        session.play(sq("e2"), sq("e4"), None).unwrap();
        session.tick();
        session.tick();
        assert_eq!(session.clock().remaining(Color::White), 599);
        assert_eq!(session.clock().remaining(Color::Black), 598);
    }

    #[test]
    fn clock_is_still_before_the_start() {
        let mut session = Session::new(pvp());
        assert_eq!(session.tick(), None);
        assert_eq!(session.clock().remaining(Color::White), 600);
    }

    #[test]
    fn external_engine_round_trip() {
        let settings = Settings {
            mode: Mode::BotMedium,
            opponent: OpponentKind::Engine,
            ..Settings::default()
        };
        let mut session = started(settings);
        assert_eq!(session.engine_request(), None);
        session.play(sq("e2"), sq("e4"), None).unwrap();
        assert_eq!(session.opponent_move(), None);

        let commands = session.engine_request().unwrap();
        assert_eq!(commands.last().map(String::as_str), Some("go depth 10"));
        assert!(commands[1].starts_with("position fen "));
        assert!(session.is_ai_thinking());
        assert_eq!(session.select(sq("d2")), Selection::Ignored);

        assert_eq!(session.engine_reply("info depth 3 score cp 20"), None);
        assert!(session.is_ai_thinking());
        let turn = session.engine_reply("bestmove e7e5 ponder g1f3").unwrap();
        assert_eq!(turn.applied.details.piece, Piece::Pawn);
        assert!(!session.is_ai_thinking());
        assert_eq!(session.board().side_to_move(), Color::White);
    }

    #[test]
    fn unplayable_engine_reply_is_dropped() {
        let settings = Settings { mode: Mode::BotEasy, opponent: OpponentKind::Engine, ..Settings::default() };
        let mut session = started(settings);
        session.play(sq("e2"), sq("e4"), None).unwrap();
        session.engine_request().unwrap();
        assert_eq!(session.engine_reply("bestmove e7e1"), None);
        assert!(!session.is_ai_thinking());
        assert_eq!(session.board().side_to_move(), Color::Black);
    }

    #[test]
    fn engine_replies_need_a_pending_request() {
        let mut session = started(pvp());
        assert_eq!(session.engine_reply("bestmove e2e4"), None);
        assert_eq!(session.board().history_len(), 0);

        let settings = Settings { mode: Mode::BotHard, opponent: OpponentKind::Engine, ..Settings::default() };
        let mut session = started(settings);
        session.play(sq("e2"), sq("e4"), None).unwrap();
        session.engine_request().unwrap();
        assert!(session.engine_reply("bestmove e7e5").is_some());
        assert_eq!(session.engine_reply("bestmove d2d4"), None);
        assert_eq!(session.board().history_len(), 2);
        assert_eq!(session.board().side_to_move(), Color::White);
    }
}
