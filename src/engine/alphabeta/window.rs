use crate::{Score, INFINITY};

/// The alpha-beta window of a node. `alpha` is the score the maximizing side
/// can already force and `beta` the score the minimizing side can already
/// force, both taken from siblings explored earlier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub alpha: Score,
    pub beta: Score,
}

impl Window {
    pub fn widest() -> Window {
        Window {
            alpha: -INFINITY,
            beta: INFINITY,
        }
    }
    pub fn raise_alpha(&mut self, score: Score) {
        if score > self.alpha {
            self.alpha = score;
        }
    }
    pub fn lower_beta(&mut self, score: Score) {
        if score < self.beta {
            self.beta = score;
        }
    }
    /// Once closed, no further sibling can change what the parent picks.
    pub fn is_closed(self) -> bool { self.beta <= self.alpha }
}
