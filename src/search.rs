use std::fmt::Debug;

use rustc_hash::FxHashMap;

use crate::space::Action;
use crate::space::Path;
use crate::space::State;

/// What the search remembers about a discovered State.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<St, A>
where
    St: State,
    A: Action,
{
    /// The State this one was first reached from, and how.
    pub(crate) parent: Option<(St, A)>,
    /// Number of moves from the closest start.
    pub(crate) depth: usize,
}

impl<St, A> Node<St, A>
where
    St: State,
    A: Action,
{
    pub fn new(parent: Option<(St, A)>, depth: usize) -> Self {
        Self { parent, depth }
    }

    pub fn parent(&self) -> Option<&(St, A)> {
        self.parent.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Every State discovered by a search, keyed by State.
///
/// The keys are the visited set. A State is inserted once, when first
/// discovered, and its Node is never updated afterwards. In an unweighted
/// Space that first parent already lies on a shortest path.
pub(crate) struct SearchTree<St, A>
where
    St: State,
    A: Action,
{
    nodes: FxHashMap<St, Node<St, A>>,
}

impl<St, A> SearchTree<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            nodes: FxHashMap::default(),
        }
    }

    /// Records a newly discovered State.
    ///
    /// Returns `false` and keeps the existing Node if `s` was already known.
    #[inline(always)]
    pub(crate) fn discover(&mut self, s: St, node: Node<St, A>) -> bool {
        use std::collections::hash_map::Entry;

        match self.nodes.entry(s) {
            Entry::Occupied(_) => false,
            Entry::Vacant(e) => {
                e.insert(node);
                true
            }
        }
    }

    #[inline(always)]
    pub(crate) fn contains(&self, s: &St) -> bool {
        self.nodes.contains_key(s)
    }

    #[inline(always)]
    pub(crate) fn get(&self, s: &St) -> Option<&Node<St, A>> {
        self.nodes.get(s)
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Rebuilds the Path from the start that discovered `s` to `s`.
    #[must_use]
    pub fn path(&self, s: St) -> Path<St, A> {
        let mut path = Path::<St, A>::new_from_start(s);

        let mut state = s;
        while let Some((parent_state, a)) = self.get(&state).and_then(|n| n.parent) {
            debug_assert!(state != parent_state);
            path.append((parent_state, a));
            state = parent_state;
        }

        path.reverse();
        debug_assert_eq!(Some(path.len()), self.get(&s).map(Node::depth));
        path
    }
}

impl<St, A> Default for SearchTree<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A> Debug for SearchTree<St, A>
where
    St: State,
    A: Action,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct S(u8);
    impl State for S {}
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct A(char);
    impl Action for A {}

    #[test]
    fn first_discovery_wins() {
        let mut tree = SearchTree::<S, A>::new();
        assert!(tree.discover(S(0), Node::new(None, 0)));
        assert!(tree.discover(S(1), Node::new(Some((S(0), A('a'))), 1)));
        assert!(!tree.discover(S(1), Node::new(Some((S(0), A('b'))), 1)));

        assert!(tree.contains(&S(1)));
        assert!(!tree.contains(&S(2)));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(&S(1)).unwrap().parent(), Some(&(S(0), A('a'))));
    }

    #[test]
    fn path_follows_parents() {
        let mut tree = SearchTree::<S, A>::new();
        tree.discover(S(0), Node::new(None, 0));
        tree.discover(S(1), Node::new(Some((S(0), A('a'))), 1));
        tree.discover(S(2), Node::new(Some((S(1), A('b'))), 2));
        tree.discover(S(3), Node::new(Some((S(0), A('c'))), 1));

        let path = tree.path(S(2));
        assert_eq!(path.states(), &[S(0), S(1), S(2)]);
        assert_eq!(path.actions(), &[A('a'), A('b')]);

        let path = tree.path(S(0));
        assert!(path.is_empty());
        assert_eq!(path.start(), S(0));
    }
}
