mod window;
pub use window::Window;

mod choice;
pub use choice::Choice;

mod branch_info;
pub use branch_info::{BranchInfo, LayerInfo};


use chess::ChessMove;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use super::{
    evaluator::StaticEvaluator,
    material::MaterialCount,
    state::{GameState, MoveGuard},
    Engine,
};
use crate::{board::GameBoard, logger::Logger, settings::Difficulty, Chance, Score, INFINITY};

/// Fixed-depth minimax with alpha-beta pruning.
///
/// Scores are the negated static evaluation, so they are seen from Black's
/// side, and the root keeps the move with the greatest score. The opponent
/// built on this therefore plays Black.
pub struct AlphaBeta<G: GameState> {
    static_evaluator: Box<dyn StaticEvaluator<G>>,
    depth: u8,
    skip_chance: Option<Chance>,
    pruning: bool,
    rng: StdRng,
    logger: Logger,
    // Debug info
    branch_info: BranchInfo,
}

impl<G: GameState> AlphaBeta<G> {
    /// `skip_chance` is the probability of answering with a random move
    /// without searching at all. Using a larger log level may have
    /// performance costs.
    pub fn new(
        static_evaluator: impl StaticEvaluator<G> + 'static, depth: u8,
        skip_chance: Option<Chance>, log_level: u8,
    ) -> Self {
        AlphaBeta {
            static_evaluator: Box::new(static_evaluator),
            depth,
            skip_chance,
            pruning: true,
            rng: StdRng::from_entropy(),
            logger: Logger::new(log_level),
            branch_info: BranchInfo::new(depth),
        }
    }

    /// Makes the random choices reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Never stops enumerating early. The scores are the same, only more
    /// nodes are visited.
    pub fn without_pruning(mut self) -> Self {
        self.pruning = false;
        self
    }

    pub fn depth(&self) -> u8 { self.depth }

    pub fn skip_chance(&self) -> Option<Chance> { self.skip_chance }

    /// Statistics of the most recent `choose`, or of all `search` calls
    /// since then.
    pub fn branch_info(&self) -> &BranchInfo { &self.branch_info }

    /// Minimax value of `state` looking `depth` plies ahead.
    ///
    /// Leaves score `-evaluate(state)`. The state is handed back exactly as
    /// it was given.
    pub fn search(&mut self, state: &mut G, depth: u8, window: Window, maximizing: bool) -> Score {
        self.branch_info[depth as usize].visited += 1;

        if depth == 0 || state.is_terminal() {
            return -self.static_evaluator.evaluate(state);
        }

        self.branch_info[depth as usize].expanded += 1;

        let mut window = window;
        let mut best = if maximizing { -INFINITY } else { INFINITY };

        for mv in state.moves() {
            let value = {
                let mut child = MoveGuard::new(state, mv);
                self.search(&mut child, depth - 1, window, !maximizing)
            };

            if maximizing {
                best = best.max(value);
                window.raise_alpha(value);
            } else {
                best = best.min(value);
                window.lower_beta(value);
            }

            if self.pruning && window.is_closed() {
                self.branch_info[depth as usize].cutoffs += 1;
                break;
            }
        }

        best
    }

    /// Picks a move for the side to move, or `None` if there are no legal
    /// moves. Terminal positions are not otherwise detected here.
    pub fn choose(&mut self, state: &mut G) -> Option<Choice<G::Move>> {
        let moves = state.moves();
        if moves.is_empty() {
            self.logger.log(2, "No legal move to choose from");
            return None;
        }

        if let Some(chance) = self.skip_chance {
            if self.rng.gen_bool(chance.min(Chance::ONE).to_num::<f64>()) {
                let mv = *moves.choose(&mut self.rng)?;
                self.logger.log_lazy(3, || format!("Skipped the search and played {}", mv));
                return Some(Choice::Skipped(mv));
            }
        }

        self.logger.time_start(2, "move selection");
        self.branch_info.reset_statistics();

        let mut best = None;
        let mut best_score = -INFINITY;

        for &mv in &moves {
            let score = {
                let mut child = MoveGuard::new(state, mv);
                self.search(&mut child, self.depth.saturating_sub(1), Window::widest(), false)
            };
            self.logger.log_lazy(5, || format!("\t{} scored {}", mv, score));
            // Strictly greater, so the first of equal moves is kept
            if score > best_score {
                best_score = score;
                best = Some(mv);
            }
        }

        self.logger.time_end(2, "move selection");
        self.logger.log_lazy(6, || self.branch_info.statistics());

        let choice = match best {
            Some(mv) => Choice::Searched { mv, score: best_score },
            None => Choice::Fallback(*moves.choose(&mut self.rng)?),
        };

        self.logger.log_lazy(2, || match choice {
            Choice::Searched { mv, score } => {
                format!("Depth {} found move {} with score {}", self.depth, mv, score)
            }
            _ => format!("No move beat the sentinel, playing {} at random", choice.mv()),
        });

        Some(choice)
    }

    /// The move `choose` settles on, however it was picked.
    pub fn choose_move(&mut self, state: &mut G) -> Option<G::Move> {
        self.choose(state).map(|choice| choice.mv())
    }
}

impl AlphaBeta<GameBoard> {
    /// The in-process opponent for a difficulty setting.
    pub fn for_difficulty(difficulty: Difficulty, log_level: u8) -> Self {
        AlphaBeta::new(
            MaterialCount::default(),
            difficulty.search_depth(),
            difficulty.skip_chance(),
            log_level,
        )
    }
}

impl Engine for AlphaBeta<GameBoard> {
    fn get_move(&mut self, board: &mut GameBoard) -> Option<ChessMove> {
        self.choose_move(board)
    }

    fn get_logger(&self) -> &Logger { &self.logger }
}
