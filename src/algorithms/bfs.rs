//! Implementation of Breadth-First Search.
//!
//! Every Action costs the same, so expanding States in the order they were
//! discovered reaches each State through a path with the fewest moves.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::marker::PhantomData;

use crate::problem::ObjectiveProblem;
use crate::search::Node;
use crate::search::SearchTree;
use crate::space::Action;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// Counters describing the work done by a search so far.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Successors produced by expansions, duplicates included.
    generated: usize,
    /// Successors dropped because they had been discovered already.
    duplicates: usize,
    /// States taken out of the frontier and expanded.
    expanded: usize,
    /// Longest the frontier has been.
    peak_frontier: usize,
}

impl SearchStats {
    pub fn generated(&self) -> usize {
        self.generated
    }
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
    pub fn expanded(&self) -> usize {
        self.expanded
    }
    pub fn peak_frontier(&self) -> usize {
        self.peak_frontier
    }
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use thousands::Separable;

        writeln!(
            f,
            "States generated: {}",
            self.generated.separate_with_commas()
        )?;
        writeln!(
            f,
            "Duplicates dropped: {}",
            self.duplicates.separate_with_commas()
        )?;
        writeln!(
            f,
            "States expanded: {}",
            self.expanded.separate_with_commas()
        )?;
        write!(
            f,
            "Peak frontier: {}",
            self.peak_frontier.separate_with_commas()
        )
    }
}

/// Breadth-First Search for Objective Problems.
///
/// Each search owns its frontier and visited set, so the same Problem type can
/// be solved many times, even concurrently, without sharing anything.
///
/// This initialises the search and offers an Iterator that goes around
/// different goals, closest first.
#[derive(Debug)]
pub struct BreadthFirstSearch<OP, Sp, St, A>
where
    OP: ObjectiveProblem<Sp, St, A>,
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    /// FIFO of discovered States waiting to be expanded.
    ///
    /// Depths along the queue never decrease and differ by at most one.
    open: VecDeque<St>,

    /// Every discovered State with the parent it was first reached from.
    ///
    /// A State is added here when enqueued, not when expanded, so it's never
    /// enqueued twice.
    search_tree: SearchTree<St, A>,

    /// A goal that was returned but not expanded yet.
    ///
    /// Only expanded if the search is asked for more goals.
    pending_goal: Option<St>,

    stats: SearchStats,

    problem: OP,

    _phantom_space: PhantomData<Sp>,
}

impl<OP, Sp, St, A> BreadthFirstSearch<OP, Sp, St, A>
where
    OP: ObjectiveProblem<Sp, St, A>,
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    /// Initialises the Search
    #[must_use]
    pub fn new(op: OP) -> Self {
        let starts = op.starts().to_vec();

        let mut search = Self {
            open: VecDeque::with_capacity(64),
            search_tree: SearchTree::new(),
            pending_goal: None,
            stats: SearchStats::default(),

            problem: op,

            _phantom_space: PhantomData,
        };

        for s in starts {
            if search.search_tree.discover(s, Node::new(None, 0)) {
                search.open.push_back(s);
            }
        }
        search.stats.peak_frontier = search.open.len();

        search
    }

    /// Runs the search until the next goal is dequeued.
    ///
    /// Returns `None` once the frontier is exhausted, which for the first call
    /// means that no goal is reachable.
    #[must_use]
    pub fn find_next_goal(&mut self) -> Option<Path<St, A>> {
        if let Some(goal) = self.pending_goal.take() {
            self.expand(goal);
        }

        while let Some(state) = self.open.pop_front() {
            if self.problem.is_goal(&state) {
                let path = self.path(state);
                log::debug!(
                    "Reached goal {state:?} in {} moves after expanding {} states",
                    path.len(),
                    self.stats.expanded
                );
                self.pending_goal = Some(state);
                return Some(path);
            }

            self.expand(state);
        }

        log::debug!(
            "Frontier exhausted after discovering {} states",
            self.search_tree.len()
        );
        None
    }

    /// Adds the undiscovered successors of `state` to the frontier.
    fn expand(&mut self, state: St) {
        let depth = match self.search_tree.get(&state) {
            Some(node) => node.depth() + 1,
            None => unreachable!("Tried expanding a state that was never discovered"),
        };
        self.stats.expanded += 1;
        log::trace!("Expanding {state:?} (depth {})", depth - 1);

        for (s, a) in self.problem.space().neighbours(&state) {
            debug_assert!(self.problem.space().valid(&s));
            self.stats.generated += 1;

            // Visited on discovery, so a State is enqueued at most once.
            if self.search_tree.discover(s, Node::new(Some((state, a)), depth)) {
                self.open.push_back(s);
            } else {
                self.stats.duplicates += 1;
            }
        }

        self.stats.peak_frontier = self.stats.peak_frontier.max(self.open.len());
    }

    fn path(&self, state: St) -> Path<St, A> {
        let path = self.search_tree.path(state);
        self.verify_path(&path);
        path
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify_path(&self, _path: &Path<St, A>) {
        // All good... (hopefully)
    }
    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify_path(&self, path: &Path<St, A>) {
        assert!(
            self.problem.space().valid_path(path),
            "Reconstructed an illegal path {path}"
        );
        assert!(self.problem.is_goal(&path.end()));
        assert!(self.problem.starts().contains(&path.start()));
    }

    /// Whether a State was discovered so far.
    pub fn discovered(&self, s: &St) -> bool {
        self.search_tree.contains(s)
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn problem(&self) -> &OP {
        &self.problem
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "BreadthFirstSearch Stats:")?;
        let s = size_of::<(St, Node<St, A>)>();
        let l = self.search_tree.len();
        let c = self.search_tree.capacity();
        writeln!(
            out,
            "  - |Nodes|:   {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Nodes|*: {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        let s = size_of::<St>();
        let l = self.open.len();
        let c = self.open.capacity();
        writeln!(
            out,
            "  - |Open|:   {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Open|*:  {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        writeln!(
            out,
            "  - Expanded nodes: {}",
            self.stats.expanded.separate_with_commas()
        )?;

        Ok(())
    }
}

impl<OP, Sp, St, A> Iterator for BreadthFirstSearch<OP, Sp, St, A>
where
    OP: ObjectiveProblem<Sp, St, A>,
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    type Item = Path<St, A>;
    fn next(&mut self) -> Option<Self::Item> {
        self.find_next_goal()
    }
}

/// Finds a Path with the fewest moves from a start to a goal.
///
/// `None` means that no goal can be reached.
#[must_use]
pub fn solve<OP, Sp, St, A>(problem: OP) -> Option<Path<St, A>>
where
    OP: ObjectiveProblem<Sp, St, A>,
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    BreadthFirstSearch::new(problem).find_next_goal()
}
