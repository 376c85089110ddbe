use std::{
    fmt,
    ops::{Deref, DerefMut},
};

use chess::ChessMove;

use crate::board::GameBoard;

/// A position the search can walk: moves are played and taken back in
/// stack order on the same object.
pub trait GameState {
    type Move: Copy + PartialEq + fmt::Display;

    /// Legal moves in a fixed, reproducible order.
    fn moves(&self) -> Vec<Self::Move>;

    fn make_move(&mut self, mv: Self::Move);

    /// Takes back the most recent `make_move`.
    fn undo_move(&mut self);

    /// Checkmate, stalemate or any other finished game.
    fn is_terminal(&self) -> bool;
}

impl GameState for GameBoard {
    type Move = ChessMove;

    fn moves(&self) -> Vec<ChessMove> { self.legal_moves(None) }

    fn make_move(&mut self, mv: ChessMove) { self.advance(mv); }

    fn undo_move(&mut self) {
        let undone = self.undo();
        assert!(undone.is_some(), "undo_move called without a move to take back");
    }

    fn is_terminal(&self) -> bool { self.is_game_over() }
}

/// Holds a move on the state for as long as it lives. Dropping the guard
/// takes the move back, including when a `break` or a panic leaves the
/// scope early.
pub struct MoveGuard<'a, G: GameState> {
    state: &'a mut G,
}

impl<'a, G: GameState> MoveGuard<'a, G> {
    pub fn new(state: &'a mut G, mv: G::Move) -> Self {
        state.make_move(mv);
        MoveGuard { state }
    }
}

impl<G: GameState> Deref for MoveGuard<'_, G> {
    type Target = G;

    fn deref(&self) -> &G { self.state }
}

impl<G: GameState> DerefMut for MoveGuard<'_, G> {
    fn deref_mut(&mut self) -> &mut G { self.state }
}

impl<G: GameState> Drop for MoveGuard<'_, G> {
    fn drop(&mut self) { self.state.undo_move(); }
}
