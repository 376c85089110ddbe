use std::{fmt, str::FromStr};

use ansi_term::{Colour, Style};
use chess::{Board, BoardStatus, ChessMove, Color, File, MoveGen, Piece, Rank, Square, EMPTY};
use either::Either::{Left, Right};

use crate::error::{FenError, MoveError};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Checkmate { winner: Color },
    Draw(DrawReason),
}

impl Status {
    pub fn is_in_progress(self) -> bool { matches!(self, Status::InProgress) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMoves,
}

/// A legal move annotated with what it does on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VerboseMove {
    pub mv: ChessMove,
    pub color: Color,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub is_castle: bool,
    pub is_en_passant: bool,
}

impl VerboseMove {
    pub fn from(&self) -> Square { self.mv.get_source() }
    pub fn to(&self) -> Square { self.mv.get_dest() }
    pub fn promotion(&self) -> Option<Piece> { self.mv.get_promotion() }
}

/// The result of a move that was accepted by the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AppliedMove {
    pub details: VerboseMove,
    pub gives_check: bool,
}

impl AppliedMove {
    pub fn mv(&self) -> ChessMove { self.details.mv }
    pub fn is_capture(&self) -> bool { self.details.captured.is_some() }
}

/// Everything needed to put the board back exactly as it was before `mv`.
#[derive(Copy, Clone)]
struct Snapshot {
    board: Board,
    halfmove: u32,
    fullmove: u32,
    mv: ChessMove,
}

/// A chess game: the rules library's position plus the move counters and
/// the history it does not track itself.
#[derive(Clone)]
pub struct GameBoard {
    board: Board,
    halfmove: u32,
    fullmove: u32,
    history: Vec<Snapshot>,
}

impl Default for GameBoard {
    fn default() -> Self { GameBoard::initial_board() }
}

impl GameBoard {

    pub fn initial_board() -> GameBoard {
        GameBoard { board: Board::default(), halfmove: 0, fullmove: 1, history: Vec::new() }
    }

    pub fn from_fen(fen: &str) -> Result<GameBoard, FenError> {
        let board = Board::from_str(fen).map_err(|e| FenError::Position {
            fen: fen.to_string(),
            reason: format!("{:?}", e),
        })?;
        let fields: Vec<&str> = fen.split_whitespace().collect();
        Ok(GameBoard {
            board,
            halfmove: parse_counter(fields.get(4).copied(), 0)?,
            fullmove: parse_counter(fields.get(5).copied(), 1)?,
            history: Vec::new(),
        })
    }

    /// Full FEN, including the halfmove clock and fullmove number.
    pub fn fen(&self) -> String {
        // The rules library always prints "0 1" for the counters, and names
        // the pawn that can be taken en passant rather than the target square
        let position: Vec<String> =
            self.board.to_string().split_whitespace().take(3).map(String::from).collect();
        let en_passant = match self.board.en_passant() {
            Some(pawn) => pawn.uforward(self.side_to_move()).to_string(),
            None => "-".to_string(),
        };
        format!("{} {} {} {}", position.join(" "), en_passant, self.halfmove, self.fullmove)
    }

    pub fn board(&self) -> &Board { &self.board }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    pub fn halfmove_clock(&self) -> u32 { self.halfmove }

    pub fn fullmove_number(&self) -> u32 { self.fullmove }

    pub fn history_len(&self) -> usize { self.history.len() }

    pub fn hash(&self) -> u64 { self.board.get_hash() }

    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        Some((self.board.piece_on(sq)?, self.board.color_on(sq)?))
    }

    /// Legal moves in the rules library's order, optionally only those
    /// leaving `scope`. Draw rules are not consulted here.
    pub fn legal_moves(&self, scope: Option<Square>) -> Vec<ChessMove> {
        let moves = MoveGen::new_legal(&self.board);
        match scope {
            Some(sq) => Left(moves.filter(move |mv| mv.get_source() == sq)),
            None => Right(moves),
        }
        .collect()
    }

    pub fn verbose_moves(&self, scope: Option<Square>) -> Vec<VerboseMove> {
        self.legal_moves(scope).into_iter().map(|mv| self.describe(mv)).collect()
    }

    pub fn apply(&mut self, mv: ChessMove) -> Result<AppliedMove, MoveError> {
        if self.board.status() != BoardStatus::Ongoing {
            return Err(MoveError::GameOver);
        }
        if !self.board.legal(mv) {
            return Err(MoveError::Illegal { from: mv.get_source(), to: mv.get_dest() });
        }
        let details = self.describe(mv);
        self.advance(mv);
        Ok(AppliedMove { details, gives_check: self.in_check() })
    }

    /// Resolves a move from its squares. Promotions default to a queen, and
    /// a promotion piece given for an ordinary move is ignored.
    pub fn apply_coords(
        &mut self, from: Square, to: Square, promotion: Option<Piece>,
    ) -> Result<AppliedMove, MoveError> {
        if self.board.status() != BoardStatus::Ongoing {
            return Err(MoveError::GameOver);
        }
        let wanted = promotion.unwrap_or(Piece::Queen);
        let mv = self
            .legal_moves(Some(from))
            .into_iter()
            .filter(|mv| mv.get_dest() == to)
            .find(|mv| mv.get_promotion().map_or(true, |p| p == wanted))
            .ok_or(MoveError::Illegal { from, to })?;
        self.apply(mv)
    }

    /// Applies a move written in coordinate notation, such as `e2e4` or
    /// `e7e8n`.
    pub fn apply_notation(&mut self, text: &str) -> Result<AppliedMove, MoveError> {
        let text = text.trim();
        let bad = || MoveError::BadSquare { notation: text.to_string() };
        let from = text.get(0..2).ok_or_else(bad)?;
        let to = text.get(2..4).ok_or_else(bad)?;
        let promotion = match text.get(4..5) {
            None | Some("") => None,
            Some(p) => Some(parse_promotion(p).ok_or_else(bad)?),
        };
        self.apply_coords(parse_square(from)?, parse_square(to)?, promotion)
    }

    /// Reverts the most recent move, returning it.
    pub fn undo(&mut self) -> Option<ChessMove> {
        let snapshot = self.history.pop()?;
        self.board = snapshot.board;
        self.halfmove = snapshot.halfmove;
        self.fullmove = snapshot.fullmove;
        Some(snapshot.mv)
    }

    /// Plays a move already known to be legal.
    pub(crate) fn advance(&mut self, mv: ChessMove) {
        let resets_clock = self.board.piece_on(mv.get_dest()).is_some()
            || self.board.piece_on(mv.get_source()) == Some(Piece::Pawn);
        self.history.push(Snapshot {
            board: self.board,
            halfmove: self.halfmove,
            fullmove: self.fullmove,
            mv,
        });
        if self.board.side_to_move() == Color::Black {
            self.fullmove += 1;
        }
        self.halfmove = if resets_clock { 0 } else { self.halfmove + 1 };
        self.board = self.board.make_move_new(mv);
    }

    fn describe(&self, mv: ChessMove) -> VerboseMove {
        let (from, to) = (mv.get_source(), mv.get_dest());
        let piece = self.board.piece_on(from).expect("legal moves start on an occupied square");
        let is_en_passant = piece == Piece::Pawn
            && from.get_file() != to.get_file()
            && self.board.piece_on(to).is_none();
        let captured = if is_en_passant { Some(Piece::Pawn) } else { self.board.piece_on(to) };
        let is_castle = piece == Piece::King
            && (from.get_file().to_index() as i8 - to.get_file().to_index() as i8).abs() == 2;
        VerboseMove {
            mv,
            color: self.board.side_to_move(),
            piece,
            captured,
            is_castle,
            is_en_passant,
        }
    }

    pub fn in_check(&self) -> bool { *self.board.checkers() != EMPTY }

    pub fn is_checkmate(&self) -> bool { self.board.status() == BoardStatus::Checkmate }

    pub fn is_stalemate(&self) -> bool { self.board.status() == BoardStatus::Stalemate }

    pub fn is_insufficient_material(&self) -> bool {
        let kings = *self.board.pieces(Piece::King);
        let others = *self.board.combined() & !kings;
        match others.popcnt() {
            0 => true,
            1 => {
                let minors = *self.board.pieces(Piece::Knight) | *self.board.pieces(Piece::Bishop);
                others & minors != EMPTY
            }
            n => {
                // Only bishops left, all on the same colour of square
                let bishops = *self.board.pieces(Piece::Bishop);
                if others != bishops {
                    return false;
                }
                let light = bishops.filter(|&sq| is_light(sq)).count() as u32;
                light == 0 || light == n
            }
        }
    }

    pub fn is_threefold_repetition(&self) -> bool {
        let hash = self.board.get_hash();
        // Nothing before the last capture or pawn move can repeat
        let earlier = self
            .history
            .iter()
            .rev()
            .take(self.halfmove as usize)
            .filter(|s| s.board.get_hash() == hash)
            .count();
        earlier + 1 >= 3
    }

    pub fn is_fifty_move_draw(&self) -> bool { self.halfmove >= 100 }

    pub fn is_draw(&self) -> bool { matches!(self.status(), Status::Draw(_)) }

    pub fn is_game_over(&self) -> bool { !self.status().is_in_progress() }

    pub fn status(&self) -> Status {
        match self.board.status() {
            BoardStatus::Checkmate => Status::Checkmate { winner: !self.board.side_to_move() },
            BoardStatus::Stalemate => Status::Draw(DrawReason::Stalemate),
            BoardStatus::Ongoing => {
                if self.is_fifty_move_draw() {
                    Status::Draw(DrawReason::FiftyMoves)
                } else if self.is_insufficient_material() {
                    Status::Draw(DrawReason::InsufficientMaterial)
                } else if self.is_threefold_repetition() {
                    Status::Draw(DrawReason::ThreefoldRepetition)
                } else {
                    Status::InProgress
                }
            }
        }
    }
}

impl FromStr for GameBoard {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Self, Self::Err> { GameBoard::from_fen(fen) }
}

fn parse_counter(field: Option<&str>, default: u32) -> Result<u32, FenError> {
    match field {
        None => Ok(default),
        Some(text) => text.parse().map_err(|_| FenError::Counter { field: text.to_string() }),
    }
}

pub fn parse_square(text: &str) -> Result<Square, MoveError> {
    Square::from_str(&text.to_ascii_lowercase())
        .map_err(|_| MoveError::BadSquare { notation: text.to_string() })
}

pub fn parse_promotion(text: &str) -> Option<Piece> {
    match text.to_ascii_lowercase().as_str() {
        "q" => Some(Piece::Queen),
        "r" => Some(Piece::Rook),
        "b" => Some(Piece::Bishop),
        "n" => Some(Piece::Knight),
        _ => None,
    }
}

/// a1 is dark.
pub fn is_light(sq: Square) -> bool { (sq.get_rank().to_index() + sq.get_file().to_index()) % 2 == 1 }

pub fn square_at(file: usize, rank: usize) -> Option<Square> {
    if file < 8 && rank < 8 {
        Some(Square::make_square(Rank::from_index(rank), File::from_index(file)))
    } else {
        None
    }
}

impl fmt::Display for GameBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let sq = Square::make_square(Rank::from_index(rank), File::from_index(file));
                let background = if is_light(sq) {
                    Colour::RGB(0xeb, 0xec, 0xd0)
                } else {
                    Colour::RGB(0x73, 0x95, 0x52)
                };
                let (text, foreground) = match self.piece_at(sq) {
                    Some((piece, color)) => (
                        piece.to_string(color),
                        if color == Color::White { Colour::White } else { Colour::Black },
                    ),
                    None => (" ".to_string(), Colour::Black),
                };
                let style = Style::new().on(background).fg(foreground).bold();
                write!(f, "{}", style.paint(format!(" {} ", text)))?;
            }
            writeln!(f)?;
        }
        write!(f, "   a  b  c  d  e  f  g  h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(board: &mut GameBoard, moves: &[&str]) {
        for mv in moves {
            board.apply_notation(mv).unwrap_or_else(|e| panic!("{mv}: {e}"));
        }
    }

    #[test]
    fn starts_with_white_to_move() {
        let board = GameBoard::initial_board();
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.fen(), START_FEN);
        assert_eq!(board.legal_moves(None).len(), 20);
    }

    #[test]
    fn scholars_mate_is_checkmate() {
        let mut board = GameBoard::initial_board();
        play(&mut board, &["e2e4", "e7e5", "d1h5", "b8c6", "f1c4", "g8f6", "h5f7"]);
        assert!(board.is_checkmate());
        assert!(board.is_game_over());
        assert_eq!(board.status(), Status::Checkmate { winner: Color::White });
        assert_eq!(board.apply_notation("e8f7"), Err(MoveError::GameOver));
    }

    #[test]
    fn undo_restores_everything() {
        let mut board = GameBoard::initial_board();
        play(&mut board, &["e2e4", "c7c5", "g1f3", "d7d6", "e1e2"]);
        let fen = board.fen();
        let hash = board.hash();
        play(&mut board, &["b8c6", "e4e5", "d6d5"]);
        assert_ne!(board.fen(), fen);
        for _ in 0..3 {
            assert!(board.undo().is_some());
        }
        assert_eq!(board.fen(), fen);
        assert_eq!(board.hash(), hash);
        assert_eq!(board.history_len(), 5);
    }

    #[test]
    fn undo_on_fresh_board_does_nothing() {
        let mut board = GameBoard::initial_board();
        assert_eq!(board.undo(), None);
        assert_eq!(board.fen(), START_FEN);
    }

    #[test]
    fn counters_follow_the_moves() {
        let mut board = GameBoard::initial_board();
        play(&mut board, &["e2e4", "e7e5", "g1f3"]);
        assert_eq!(board.halfmove_clock(), 1);
        assert_eq!(board.fullmove_number(), 2);
        play(&mut board, &["b8c6", "f3e5"]);
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmove_number(), 3);
    }

    #[test]
    fn fen_round_trip_keeps_counters() {
        let board = GameBoard::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 17 42").unwrap();
        assert_eq!(board.halfmove_clock(), 17);
        assert_eq!(board.fullmove_number(), 42);
        let again = GameBoard::from_fen(&board.fen()).unwrap();
        assert_eq!(again.fen(), board.fen());
    }

    #[test]
    fn fen_names_the_en_passant_target() {
        let mut board = GameBoard::initial_board();
        play(&mut board, &["e2e4", "a7a6", "e4e5", "d7d5"]);
        let fen = "rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        assert_eq!(board.fen(), fen);
        assert_eq!(GameBoard::from_fen(fen).unwrap().fen(), fen);

        board.apply_notation("e5d6").unwrap();
        assert!(board.fen().ends_with(" b KQkq - 0 3"));
    }

    #[test]
    fn bad_fen_is_rejected() {
        assert!(matches!(GameBoard::from_fen("not a position"), Err(FenError::Position { .. })));
        assert!(matches!(
            GameBoard::from_fen("4k3/8/8/8/8/8/8/4K3 w - - x 1"),
            Err(FenError::Counter { .. })
        ));
    }

    #[test]
    fn illegal_moves_are_rejected_without_change() {
        let mut board = GameBoard::initial_board();
        let e2 = parse_square("e2").unwrap();
        let e5 = parse_square("e5").unwrap();
        assert_eq!(board.apply_coords(e2, e5, None), Err(MoveError::Illegal { from: e2, to: e5 }));
        assert!(matches!(board.apply_notation("z9e4"), Err(MoveError::BadSquare { .. })));
        assert_eq!(board.fen(), START_FEN);
    }

    #[test]
    fn en_passant_is_a_pawn_capture() {
        let mut board = GameBoard::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").unwrap();
        let fen = board.fen();
        play(&mut board, &["d7d5"]);
        let applied = board.apply_notation("e5d6").unwrap();
        assert!(applied.details.is_en_passant);
        assert_eq!(applied.details.captured, Some(Piece::Pawn));
        assert!(board.piece_at(parse_square("d5").unwrap()).is_none());
        board.undo();
        board.undo();
        assert_eq!(board.fen(), fen);
    }

    #[test]
    fn castling_is_flagged_and_undone() {
        let mut board = GameBoard::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let applied = board.apply_notation("e1g1").unwrap();
        assert!(applied.details.is_castle);
        assert!(!applied.is_capture());
        board.undo();
        assert_eq!(board.fen(), "4k3/8/8/8/8/8/8/4K2R w K - 0 1");
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let mut board = GameBoard::from_fen("8/P3k3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let applied = board.apply_notation("a7a8").unwrap();
        assert_eq!(applied.details.promotion(), Some(Piece::Queen));
        board.undo();
        let applied = board.apply_notation("a7a8n").unwrap();
        assert_eq!(applied.details.promotion(), Some(Piece::Knight));
    }

    #[test]
    fn promotion_piece_is_ignored_for_ordinary_moves() {
        let mut board = GameBoard::initial_board();
        let applied = board.apply_notation("e2e4q").unwrap();
        assert_eq!(applied.details.promotion(), None);
    }

    #[test]
    fn moves_can_be_scoped_to_a_square() {
        let board = GameBoard::initial_board();
        let knight = board.verbose_moves(Some(parse_square("g1").unwrap()));
        assert_eq!(knight.len(), 2);
        assert!(knight.iter().all(|m| m.piece == Piece::Knight && m.captured.is_none()));
        assert!(board.legal_moves(Some(parse_square("e4").unwrap())).is_empty());
    }

    #[test]
    fn stalemate_is_a_draw() {
        let board = GameBoard::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(board.is_stalemate());
        assert!(!board.in_check());
        assert_eq!(board.status(), Status::Draw(DrawReason::Stalemate));
    }

    #[test]
    fn insufficient_material() {
        let draw = |fen| GameBoard::from_fen(fen).unwrap().is_insufficient_material();
        assert!(draw("8/8/8/4k3/8/8/8/4K3 w - - 0 1"));
        assert!(draw("8/8/8/4k3/8/8/8/4K1N1 w - - 0 1"));
        assert!(draw("5b2/8/8/4k3/8/8/8/2B1K3 w - - 0 1"));
        assert!(!draw("2b5/8/8/4k3/8/8/8/2B1K3 w - - 0 1"));
        assert!(!draw("8/8/8/4k3/8/8/8/R3K3 w - - 0 1"));
        assert!(!draw("8/8/8/4k3/8/8/8/1N2K1N1 w - - 0 1"));
    }

    #[test]
    fn threefold_repetition() {
        let mut board = GameBoard::initial_board();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        play(&mut board, &shuffle);
        assert!(!board.is_threefold_repetition());
        play(&mut board, &shuffle);
        assert!(board.is_threefold_repetition());
        assert_eq!(board.status(), Status::Draw(DrawReason::ThreefoldRepetition));
    }

    #[test]
    fn fifty_move_rule() {
        let mut board = GameBoard::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 70").unwrap();
        assert!(!board.is_draw());
        play(&mut board, &["a1a2"]);
        assert_eq!(board.status(), Status::Draw(DrawReason::FiftyMoves));
    }

    #[test]
    fn light_squares() {
        assert!(!is_light(parse_square("a1").unwrap()));
        assert!(is_light(parse_square("h1").unwrap()));
        assert!(!is_light(parse_square("h8").unwrap()));
    }
}
