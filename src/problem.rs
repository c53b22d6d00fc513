use crate::space::Action;
use crate::space::Space;
use crate::space::State;

/// A search Space together with where the search starts.
pub trait BaseProblem<Sp, St, A>: std::fmt::Debug
where
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    fn space(&self) -> &Sp;
    fn starts(&self) -> &[St];
}

/// A Problem that is solved by reaching a goal.
pub trait ObjectiveProblem<Sp, St, A>: BaseProblem<Sp, St, A>
where
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    /// Whether a State solves the Problem.
    ///
    /// Goals are a predicate, so a Problem may be solved by many States.
    fn is_goal(&self, s: &St) -> bool;
}
