pub mod alphabeta;
pub mod evaluator;
pub mod material;
pub mod random;
pub mod state;

use chess::ChessMove;

use crate::{board::GameBoard, logger::Logger};

pub trait Engine {
    /// Picks a move for the side to move, or `None` if there is no legal
    /// move. The board is handed back in the position it was given in.
    fn get_move(&mut self, board: &mut GameBoard) -> Option<ChessMove>;

    fn get_logger(&self) -> &Logger;
}
