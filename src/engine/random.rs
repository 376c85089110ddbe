use chess::ChessMove;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{board::GameBoard, logger::Logger};
use super::Engine;

/// Plays a uniformly random legal move.
pub struct RandomMover {
    rng: StdRng,
    logger: Logger,
}

impl RandomMover {
    pub fn new(log_level: u8) -> Self {
        RandomMover { rng: StdRng::from_entropy(), logger: Logger::new(log_level) }
    }

    pub fn with_seed(seed: u64, log_level: u8) -> Self {
        RandomMover { rng: StdRng::seed_from_u64(seed), logger: Logger::new(log_level) }
    }
}

impl Engine for RandomMover {
    fn get_move(&mut self, board: &mut GameBoard) -> Option<ChessMove> {
        let mv = board.legal_moves(None).choose(&mut self.rng).copied();
        self.logger.log_lazy(4, || match mv {
            Some(mv) => format!("Random move {}", mv),
            None => "No legal move".to_string(),
        });
        mv
    }

    fn get_logger(&self) -> &Logger { &self.logger }
}
