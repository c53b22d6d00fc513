//! River-crossing puzzles.
//!
//! Every entity stands on one of two banks. A single operator drives a
//! transport that carries it and up to `capacity` other entities from its bank
//! to the other one. Some pairs of entities can't be left together on a bank
//! unless the operator is there too.

use derive_more::Display;
use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;
use thiserror::Error;

use crate::problem::BaseProblem;
use crate::problem::ObjectiveProblem;
use crate::space::Action;
use crate::space::Space;
use crate::space::State;

/// Entities are tracked as bits of a `u32`.
pub const MAX_ENTITIES: usize = u32::BITS as usize;
const DEFAULT_CAPACITY: usize = 1;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Bank {
    #[display("origin")]
    Origin,
    #[display("destination")]
    Destination,
}

impl Bank {
    #[inline(always)]
    pub fn opposite(self) -> Bank {
        match self {
            Bank::Origin => Bank::Destination,
            Bank::Destination => Bank::Origin,
        }
    }
}

/// An entity of a puzzle, named by the Space that defines it.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("#{_0}")]
pub struct Entity(u8);

impl Entity {
    pub fn new(index: usize) -> Option<Entity> {
        (index < MAX_ENTITIES).then_some(Entity(index as u8))
    }
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
    #[inline(always)]
    fn bit(self) -> u32 {
        1u32 << self.0
    }
}

/// A set of Entities.
///
/// ```
/// use crossing::problems::river_crossing::{Entity, EntitySet};
///
/// let fox = Entity::new(1).unwrap();
/// let goose = Entity::new(2).unwrap();
/// let set = EntitySet::EMPTY.with(goose).with(fox);
/// assert_eq!(set.len(), 2);
/// assert!(set.contains(fox));
/// assert_eq!(set.iter().collect::<Vec<_>>(), vec![fox, goose]);
/// assert!(set.without(fox).is_subset(set));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EntitySet(u32);

impl EntitySet {
    pub const EMPTY: EntitySet = EntitySet(0);

    /// The first `n` Entities.
    pub fn first(n: usize) -> EntitySet {
        debug_assert!(n <= MAX_ENTITIES);
        match n {
            MAX_ENTITIES => EntitySet(u32::MAX),
            n => EntitySet((1u32 << n) - 1),
        }
    }

    #[inline(always)]
    pub fn contains(self, e: Entity) -> bool {
        self.0 & e.bit() != 0
    }
    #[inline(always)]
    #[must_use]
    pub fn with(self, e: Entity) -> EntitySet {
        EntitySet(self.0 | e.bit())
    }
    #[inline(always)]
    #[must_use]
    pub fn without(self, e: Entity) -> EntitySet {
        EntitySet(self.0 & !e.bit())
    }
    #[inline(always)]
    #[must_use]
    pub fn union(self, other: EntitySet) -> EntitySet {
        EntitySet(self.0 | other.0)
    }
    #[inline(always)]
    #[must_use]
    pub fn difference(self, other: EntitySet) -> EntitySet {
        EntitySet(self.0 & !other.0)
    }
    /// Entities in exactly one of both sets.
    #[inline(always)]
    #[must_use]
    pub fn symmetric_difference(self, other: EntitySet) -> EntitySet {
        EntitySet(self.0 ^ other.0)
    }
    #[inline(always)]
    pub fn is_subset(self, other: EntitySet) -> bool {
        self.0 & !other.0 == 0
    }
    #[inline(always)]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }
    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates in increasing Entity order.
    pub fn iter(self) -> impl Iterator<Item = Entity> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let e = Entity(bits.trailing_zeros() as u8);
            bits &= bits - 1;
            Some(e)
        })
    }
}

impl FromIterator<Entity> for EntitySet {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        iter.into_iter().fold(EntitySet::EMPTY, EntitySet::with)
    }
}

/// Where every entity stands.
///
/// Stores the set of entities on the destination bank, everything else is on
/// the origin bank. The transport is wherever the operator is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RiverCrossingState {
    far: EntitySet,
}
impl State for RiverCrossingState {}

impl RiverCrossingState {
    /// A State with `far` on the destination bank.
    ///
    /// Spaces only accept States built from their own entities, see
    /// [`RiverCrossingSpace::entities`] and [`RiverCrossingSpace::all_states`].
    #[inline(always)]
    pub fn new(far: EntitySet) -> Self {
        Self { far }
    }

    /// Entities on the destination bank.
    #[inline(always)]
    pub fn far(self) -> EntitySet {
        self.far
    }

    #[inline(always)]
    pub fn bank(self, e: Entity) -> Bank {
        if self.far.contains(e) {
            Bank::Destination
        } else {
            Bank::Origin
        }
    }
}

/// The operator crosses to `to` carrying `cargo`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Crossing {
    to: Bank,
    cargo: EntitySet,
}
impl Action for Crossing {}

impl Crossing {
    pub fn new(to: Bank, cargo: EntitySet) -> Self {
        Self { to, cargo }
    }
    pub fn to(&self) -> Bank {
        self.to
    }
    pub fn cargo(&self) -> EntitySet {
        self.cargo
    }
    pub fn is_alone(&self) -> bool {
        self.cargo.is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("A puzzle needs at least one entity")]
    NoEntities,
    #[error("Too many entities ({0}), at most {max} are supported", max = MAX_ENTITIES)]
    TooManyEntities(usize),
    #[error("Entity '{0}' is defined more than once")]
    DuplicateEntity(String),
    #[error("Operator '{0}' is not an entity")]
    UnknownOperator(String),
    #[error("Unknown entity '{0}'")]
    UnknownEntity(String),
    #[error("Entity '{0}' can't be forbidden from being with itself")]
    SelfPair(String),
    #[error("Operator '{0}' can't be part of a forbidden pair")]
    OperatorInPair(String),
    #[error("The starting arrangement already leaves {0} and {1} unsupervised")]
    UnsafeStart(String, String),
}

/// The rules of a river-crossing puzzle.
#[derive(Clone, PartialEq, Eq)]
pub struct RiverCrossingSpace {
    names: Vec<String>,
    operator: Entity,
    forbidden: Vec<(Entity, Entity)>,
    capacity: usize,
}

impl RiverCrossingSpace {
    /// Validates the rules and builds the Space.
    ///
    /// Entities are numbered in the order they are given, which is also the
    /// order used to pick cargo when expanding States.
    pub fn new<N, P>(
        entities: &[N],
        operator: &str,
        forbidden: &[(P, P)],
        capacity: usize,
    ) -> Result<Self, RulesError>
    where
        N: AsRef<str>,
        P: AsRef<str>,
    {
        if entities.is_empty() {
            return Err(RulesError::NoEntities);
        }
        if entities.len() > MAX_ENTITIES {
            return Err(RulesError::TooManyEntities(entities.len()));
        }

        let mut names: Vec<String> = Vec::with_capacity(entities.len());
        for name in entities {
            let name = name.as_ref();
            if names.iter().any(|n| n == name) {
                return Err(RulesError::DuplicateEntity(name.to_string()));
            }
            names.push(name.to_string());
        }

        let mut space = Self {
            names,
            operator: Entity(0),
            forbidden: Vec::with_capacity(forbidden.len()),
            capacity,
        };
        space.operator = space
            .entity(operator)
            .map_err(|_| RulesError::UnknownOperator(operator.to_string()))?;

        for (a, b) in forbidden {
            let (a, b) = (space.entity(a.as_ref())?, space.entity(b.as_ref())?);
            if a == b {
                return Err(RulesError::SelfPair(space.name(a).to_string()));
            }
            for e in [a, b] {
                if e == space.operator {
                    return Err(RulesError::OperatorInPair(space.name(e).to_string()));
                }
            }
            space.forbidden.push((a, b));
        }

        Ok(space)
    }

    /// The farmer who has to bring a fox, a goose and a bag of grain across.
    pub fn classic() -> Self {
        Self {
            names: ["Farmer", "Fox", "Goose", "Grain"]
                .iter()
                .map(|n| n.to_string())
                .collect(),
            operator: Entity(0),
            forbidden: vec![(Entity(1), Entity(2)), (Entity(2), Entity(3))],
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Finds an Entity by name.
    pub fn entity(&self, name: &str) -> Result<Entity, RulesError> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| Entity(i as u8))
            .ok_or_else(|| RulesError::UnknownEntity(name.to_string()))
    }

    /// Finds a set of Entities by name.
    pub fn entities<N: AsRef<str>>(&self, names: &[N]) -> Result<EntitySet, RulesError> {
        names.iter().map(|n| self.entity(n.as_ref())).collect()
    }

    pub fn name(&self, e: Entity) -> &str {
        &self.names[e.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn operator(&self) -> Entity {
        self.operator
    }

    pub fn forbidden(&self) -> &[(Entity, Entity)] {
        &self.forbidden
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Every Entity.
    pub fn all(&self) -> EntitySet {
        EntitySet::first(self.names.len())
    }

    /// The Entities standing on a bank.
    #[inline(always)]
    pub fn on(&self, s: &RiverCrossingState, bank: Bank) -> EntitySet {
        match bank {
            Bank::Origin => self.all().difference(s.far()),
            Bank::Destination => s.far(),
        }
    }

    /// Where the transport is.
    #[inline(always)]
    pub fn boat(&self, s: &RiverCrossingState) -> Bank {
        s.bank(self.operator)
    }

    /// Every State, valid or not, in increasing bitmask order.
    pub fn all_states(&self) -> impl Iterator<Item = RiverCrossingState> {
        (0..1u64 << self.names.len()).map(|bits| RiverCrossingState::new(EntitySet(bits as u32)))
    }

    /// The Entities that changed bank between two States.
    pub fn moved(&self, from: &RiverCrossingState, to: &RiverCrossingState) -> EntitySet {
        from.far().symmetric_difference(to.far())
    }

    /// The Crossing that turns `from` into `to`, if a single crossing does.
    ///
    /// Derived from the States alone, it doesn't check capacity or safety.
    pub fn crossing_between(
        &self,
        from: &RiverCrossingState,
        to: &RiverCrossingState,
    ) -> Option<Crossing> {
        let moved = self.moved(from, to);
        if !moved.contains(self.operator) {
            return None;
        }
        let bank = self.boat(to);
        if !moved.is_subset(self.on(to, bank)) {
            return None;
        }
        Some(Crossing::new(bank, moved.without(self.operator)))
    }

    /// A human-readable description of a Crossing.
    pub fn describe(&self, c: &Crossing) -> String {
        let operator = self.name(self.operator);
        if c.is_alone() {
            format!("{operator} crosses alone to the {} bank", c.to())
        } else {
            let cargo = c.cargo().iter().map(|e| self.name(e)).join(" and ");
            format!("{operator} takes {cargo} to the {} bank", c.to())
        }
    }

    /// Displays a State using entity names.
    ///
    /// The State must only hold entities of this Space.
    pub fn display_state<'a>(&'a self, s: &RiverCrossingState) -> StateDisplay<'a> {
        debug_assert!(
            s.far().is_subset(self.all()),
            "State {s:?} has entities outside the puzzle"
        );
        StateDisplay {
            space: self,
            state: *s,
        }
    }

    #[inline(always)]
    fn cross(&self, s: &RiverCrossingState, cargo: EntitySet) -> RiverCrossingState {
        RiverCrossingState::new(s.far().symmetric_difference(cargo.with(self.operator)))
    }
}

impl Space<RiverCrossingState, Crossing> for RiverCrossingSpace {
    fn apply(&self, s: &RiverCrossingState, c: &Crossing) -> Option<RiverCrossingState> {
        let here = self.boat(s);
        if c.to() != here.opposite()
            || c.cargo().contains(self.operator)
            || c.cargo().len() > self.capacity
            || !c.cargo().is_subset(self.on(s, here))
        {
            return None;
        }

        let next = self.cross(s, c.cargo());
        self.valid(&next).then_some(next)
    }

    /// Whether every forbidden pair is either split or supervised.
    ///
    /// Pairs are checked wherever they stand, so both banks are covered.
    /// States naming entities outside the puzzle are never valid.
    #[inline(always)]
    fn valid(&self, s: &RiverCrossingState) -> bool {
        if !s.far().is_subset(self.all()) {
            return false;
        }
        let operator = s.bank(self.operator);
        self.forbidden.iter().all(|&(a, b)| {
            let bank = s.bank(a);
            bank != s.bank(b) || bank == operator
        })
    }

    /// Crossing alone comes first, then larger cargo, each size in entity
    /// order.
    fn neighbours(&self, s: &RiverCrossingState) -> Vec<(RiverCrossingState, Crossing)> {
        let here = self.boat(s);
        let to = here.opposite();
        let passengers: SmallVec<[Entity; 8]> =
            self.on(s, here).without(self.operator).iter().collect();

        let mut v = Vec::<(RiverCrossingState, Crossing)>::with_capacity(passengers.len() + 1);
        let mut push = |cargo: EntitySet| {
            let next = self.cross(s, cargo);
            if self.valid(&next) {
                v.push((next, Crossing::new(to, cargo)));
            }
        };

        push(EntitySet::EMPTY);
        for k in 1..=self.capacity.min(passengers.len()) {
            for cargo in passengers.iter().copied().combinations(k) {
                push(cargo.into_iter().collect());
            }
        }
        v
    }

    fn size(&self) -> Option<usize> {
        1usize.checked_shl(self.names.len() as u32)
    }
}

impl std::fmt::Display for RiverCrossingSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Entities: {}", self.names.join(", "))?;
        writeln!(f, "Operator: {}", self.name(self.operator))?;
        if self.forbidden.is_empty() {
            writeln!(f, "Forbidden pairs: none")?;
        } else {
            let pairs = self
                .forbidden
                .iter()
                .map(|&(a, b)| format!("{} & {}", self.name(a), self.name(b)))
                .join(", ");
            writeln!(f, "Forbidden pairs: {pairs}")?;
        }
        write!(f, "Capacity: operator + {}", self.capacity)
    }
}

impl std::fmt::Debug for RiverCrossingSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "RiverCrossing({} entities, {} forbidden pairs, capacity {})",
            self.names.len(),
            self.forbidden.len(),
            self.capacity
        )
    }
}

/// A State shown with entity names, as returned by
/// [`RiverCrossingSpace::display_state`].
pub struct StateDisplay<'a> {
    space: &'a RiverCrossingSpace,
    state: RiverCrossingState,
}

impl StateDisplay<'_> {
    fn write_bank(&self, f: &mut std::fmt::Formatter, bank: Bank) -> std::fmt::Result {
        let set = self.space.on(&self.state, bank);
        if set.is_empty() {
            write!(f, "(empty)")
        } else {
            write!(f, "{}", set.iter().map(|e| self.space.name(e)).join(", "))
        }
    }
}

impl std::fmt::Display for StateDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Origin: ")?;
        self.write_bank(f, Bank::Origin)?;
        write!(f, " | Destination: ")?;
        self.write_bank(f, Bank::Destination)
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

/// A puzzle as written in a JSON file.
///
/// ```json
/// {
///   "entities": ["Farmer", "Fox", "Goose", "Grain"],
///   "operator": "Farmer",
///   "forbidden": [["Fox", "Goose"], ["Goose", "Grain"]],
///   "capacity": 1
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PuzzleConfig {
    pub entities: Vec<String>,
    pub operator: String,
    #[serde(default)]
    pub forbidden: Vec<(String, String)>,
    /// Entities the operator can carry along.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Entities that start on the destination bank.
    #[serde(default)]
    pub start: Vec<String>,
    /// Entities that must end on the destination bank. Defaults to all.
    #[serde(default)]
    pub goal: Option<Vec<String>>,
}

impl PuzzleConfig {
    pub fn classic() -> Self {
        let names = |ns: &[&str]| ns.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        Self {
            entities: names(&["Farmer", "Fox", "Goose", "Grain"]),
            operator: "Farmer".to_string(),
            forbidden: vec![
                ("Fox".to_string(), "Goose".to_string()),
                ("Goose".to_string(), "Grain".to_string()),
            ],
            capacity: DEFAULT_CAPACITY,
            start: vec![],
            goal: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum PuzzleParseError {
    #[error("I/O error when loading '{p}': {e}")]
    IOError {
        p: std::path::PathBuf,
        e: std::io::Error,
    },
    #[error("Invalid puzzle description: {e}")]
    JsonError { e: serde_json::Error },
    #[error("Invalid rules: {e}")]
    InvalidRules { e: RulesError },
}

impl std::convert::TryFrom<&str> for PuzzleConfig {
    type Error = PuzzleParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        serde_json::from_str(s).map_err(|e| PuzzleParseError::JsonError { e })
    }
}

impl std::convert::TryFrom<&std::path::Path> for PuzzleConfig {
    type Error = PuzzleParseError;

    fn try_from(p: &std::path::Path) -> Result<Self, Self::Error> {
        let s = std::fs::read_to_string(p).map_err(|e| PuzzleParseError::IOError {
            p: p.to_path_buf(),
            e,
        })?;
        PuzzleConfig::try_from(s.as_str())
    }
}

/// A river-crossing puzzle: its rules, where everyone starts and who has to
/// make it across.
#[derive(Clone, Debug)]
pub struct RiverCrossingProblem {
    space: RiverCrossingSpace,
    starts: Vec<RiverCrossingState>,
    /// Entities required on the destination bank.
    goal: EntitySet,
}

impl RiverCrossingProblem {
    /// Starts with everybody on the origin bank, and must get them all across.
    pub fn new(space: RiverCrossingSpace) -> Self {
        let goal = space.all();
        Self {
            space,
            starts: vec![RiverCrossingState::new(EntitySet::EMPTY)],
            goal,
        }
    }

    pub fn classic() -> Self {
        Self::new(RiverCrossingSpace::classic())
    }

    pub fn start(&self) -> RiverCrossingState {
        self.starts[0]
    }

    pub fn goal(&self) -> EntitySet {
        self.goal
    }
}

impl BaseProblem<RiverCrossingSpace, RiverCrossingState, Crossing> for RiverCrossingProblem {
    fn space(&self) -> &RiverCrossingSpace {
        &self.space
    }
    fn starts(&self) -> &[RiverCrossingState] {
        &self.starts
    }
}

impl ObjectiveProblem<RiverCrossingSpace, RiverCrossingState, Crossing> for RiverCrossingProblem {
    /// Every required entity is across, no matter where the rest are.
    #[inline(always)]
    fn is_goal(&self, s: &RiverCrossingState) -> bool {
        self.goal.is_subset(s.far())
    }
}

impl std::convert::TryFrom<&PuzzleConfig> for RiverCrossingProblem {
    type Error = RulesError;

    fn try_from(config: &PuzzleConfig) -> Result<Self, Self::Error> {
        let space = RiverCrossingSpace::new(
            &config.entities[..],
            &config.operator,
            &config.forbidden[..],
            config.capacity,
        )?;

        let start = RiverCrossingState::new(space.entities(&config.start[..])?);
        let operator = space.boat(&start);
        if let Some(&(a, b)) = space.forbidden().iter().find(|&&(a, b)| {
            let bank = start.bank(a);
            bank == start.bank(b) && bank != operator
        }) {
            return Err(RulesError::UnsafeStart(
                space.name(a).to_string(),
                space.name(b).to_string(),
            ));
        }

        let goal = match &config.goal {
            Some(names) => space.entities(&names[..])?,
            None => space.all(),
        };

        Ok(Self {
            space,
            starts: vec![start],
            goal,
        })
    }
}

impl std::convert::TryFrom<&str> for RiverCrossingProblem {
    type Error = PuzzleParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let config = PuzzleConfig::try_from(s)?;
        RiverCrossingProblem::try_from(&config).map_err(|e| PuzzleParseError::InvalidRules { e })
    }
}

impl std::convert::TryFrom<&std::path::Path> for RiverCrossingProblem {
    type Error = PuzzleParseError;

    fn try_from(p: &std::path::Path) -> Result<Self, Self::Error> {
        let config = PuzzleConfig::try_from(p)?;
        RiverCrossingProblem::try_from(&config).map_err(|e| PuzzleParseError::InvalidRules { e })
    }
}

impl std::fmt::Display for RiverCrossingProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "{}", self.space)?;
        writeln!(f, "Start: {}", self.space.display_state(&self.start()))?;
        if self.goal == self.space.all() {
            write!(f, "Goal: everybody on the destination bank")
        } else {
            write!(
                f,
                "Goal: {} on the destination bank",
                self.goal.iter().map(|e| self.space.name(e)).join(", ")
            )
        }
    }
}
