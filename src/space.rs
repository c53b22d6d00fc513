use std::fmt::Debug;
use std::hash::Hash;

const MAX_ACTIONS_DISPLAYED: usize = 20;

pub trait Action: Copy + Clone + Debug + PartialEq + Eq {}
pub trait State: Copy + Clone + Debug + PartialEq + Eq + Hash {}

/// A sequence of States joined by the Actions between them.
///
/// There's always one more State than Actions, so a Path with no Actions
/// still holds its start State.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<St, A>
where
    St: State,
    A: Action,
{
    states: Vec<St>,
    actions: Vec<A>,
}

impl<St, A> Path<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    #[must_use]
    pub fn new_from_start(start: St) -> Self {
        Self {
            states: vec![start],
            actions: vec![],
        }
    }

    /// Number of Actions (moves) in the Path.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the Path has no moves.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[inline(always)]
    pub fn start(&self) -> St {
        self.states[0]
    }

    #[inline(always)]
    pub fn end(&self) -> St {
        self.states[self.actions.len()]
    }

    pub fn states(&self) -> &[St] {
        &self.states
    }

    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    /// Iterates over `(from, action, to)` for every move.
    pub fn steps(&self) -> impl Iterator<Item = (&St, &A, &St)> {
        self.states
            .windows(2)
            .zip(self.actions.iter())
            .map(|(w, a)| (&w[0], a, &w[1]))
    }

    #[inline(always)]
    pub fn append(&mut self, last_action: (St, A)) {
        let (s, a) = last_action;
        self.actions.push(a);
        self.states.push(s);
    }

    /// Reverses the Path.
    ///
    /// Useful when naturally reconstructing paths from the end, where each
    /// appended `(parent, action)` leads from `parent` to the previous end.
    pub fn reverse(&mut self) {
        self.states.reverse();
        self.actions.reverse();
    }
}

impl<St, A> std::fmt::Display for Path<St, A>
where
    St: State,
    A: Action,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Path({}, {:?}:{:?}:{:?})",
            self.len(),
            self.start(),
            self.actions
                .iter()
                .take(MAX_ACTIONS_DISPLAYED)
                .collect::<Vec<_>>(),
            self.end()
        )
    }
}

pub trait Space<St, A>: Clone + std::fmt::Debug
where
    St: State,
    A: Action,
{
    /// Applies an Action, if it's legal from the given State.
    fn apply(&self, s: &St, a: &A) -> Option<St>;

    /// Expands a State into every valid successor and the Action reaching it.
    ///
    /// The order must be deterministic, searches break ties with it.
    fn neighbours(&self, s: &St) -> Vec<(St, A)>;

    /// Verify is a State is valid.
    fn valid(&self, s: &St) -> bool;

    fn valid_path(&self, p: &Path<St, A>) -> bool {
        if !p.states().iter().all(|s| self.valid(s)) {
            return false;
        }
        p.steps()
            .all(|(from, a, to)| self.apply(from, a).is_some_and(|s| s == *to))
    }

    /// Number of States in the Space, reachable or not.
    fn size(&self) -> Option<usize> {
        None
    }
}
