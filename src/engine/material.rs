use chess::{Color, Piece, ALL_PIECES};

use crate::{board::GameBoard, Score};
use super::evaluator::StaticEvaluator;

/// Counts material with a fixed value per piece type.
#[derive(Clone, Copy, Debug)]
pub struct MaterialCount {
    /// Indexed by `Piece::to_index`
    piece_values: [Score; 6],
}

impl Default for MaterialCount {

    fn default() -> Self {
        // pawn, knight, bishop, rook, queen, king
        MaterialCount { piece_values: [10, 30, 30, 50, 90, 900] }
    }

}

impl MaterialCount {

    pub fn value(&self, piece: Piece) -> Score { self.piece_values[piece.to_index()] }

    /// The same balance as `evaluate`, seen from `color`'s side.
    pub fn evaluate_for(&self, board: &GameBoard, color: Color) -> Score {
        let score = self.evaluate(board);
        if color == Color::White { score } else { -score }
    }

}

impl StaticEvaluator<GameBoard> for MaterialCount {

    fn evaluate(&self, board: &GameBoard) -> Score {
        let position = board.board();
        let white = *position.color_combined(Color::White);
        let black = *position.color_combined(Color::Black);

        ALL_PIECES.iter().map(|&piece| {
            let pieces = *position.pieces(piece);
            let count = (pieces & white).popcnt() as Score - (pieces & black).popcnt() as Score;
            count * self.value(piece)
        }).sum()
    }

}
