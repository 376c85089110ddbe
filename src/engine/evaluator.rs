use crate::Score;

pub trait StaticEvaluator<G: ?Sized> {

    /// Evaluates the position in `state` without looking ahead.
    ///
    /// The score is always from White's side: positive when White is ahead,
    /// negative when Black is. The search negates it at its leaves.
    fn evaluate(&self, state: &G) -> Score;

}
