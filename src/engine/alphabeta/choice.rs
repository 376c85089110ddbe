use crate::Score;

/// How the top-level selection arrived at its move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice<M> {
    /// The first root move with the highest searched score.
    Searched { mv: M, score: Score },
    /// A uniformly random move played instead of searching, to weaken the
    /// opponent.
    Skipped(M),
    /// A uniformly random move played because no root move beat the
    /// initial sentinel score.
    Fallback(M),
}

impl<M: Copy> Choice<M> {
    pub fn mv(&self) -> M {
        match *self {
            Choice::Searched { mv, .. } | Choice::Skipped(mv) | Choice::Fallback(mv) => mv,
        }
    }
    pub fn score(&self) -> Option<Score> {
        match *self {
            Choice::Searched { score, .. } => Some(score),
            _ => None,
        }
    }
    pub fn is_random(&self) -> bool { !matches!(self, Choice::Searched { .. }) }
}
