use itertools::Itertools;
use tracing::{debug, error};

use crate::math::OrderedSet;
use crate::prelude::*;
use crate::transition_system::delegate_state_space;

/// Adds an edge to `space`. If there already is an edge between `origin` and `target`, the guard
/// of that edge is replaced by the disjunction of both guards, so there is at most one edge per
/// pair of states. An unsatisfiable guard can never be taken and is dropped. If `exclusive` is set, the new guard must not overlap any guard that leads
/// from `origin` to a different target.
fn insert_guarded_edge<O: GuardOracle>(
    oracle: &O,
    space: &mut StateSpace<O::Formula>,
    origin: StateIndex,
    guard: O::Formula,
    target: StateIndex,
    exclusive: bool,
) -> Result<(), AutomatonError> {
    space.check_endpoints(origin, target, || oracle.describe(&guard))?;
    if !oracle.is_satisfiable(&guard) {
        debug!("dropping unsatisfiable guard from {origin} to {target}");
        return Ok(());
    }
    if exclusive {
        if let Some((existing, _)) = space
            .edges_of(origin)
            .iter()
            .find(|(existing, p)| *p != target && oracle.overlapping(existing, &guard))
        {
            return Err(AutomatonError::OverlappingGuards {
                state: origin,
                left: oracle.describe(existing),
                right: oracle.describe(&guard),
            });
        }
    }
    let edges = space.edges_mut(origin);
    match edges.iter_mut().find(|(_, p)| *p == target) {
        Some((existing, _)) => *existing = oracle.or(existing, &guard),
        None => edges.push((guard, target)),
    }
    Ok(())
}

fn build_space<O, I, J, T>(
    oracle: &O,
    states: I,
    initial: StateIndex,
    accepting: J,
    transitions: T,
    exclusive: bool,
) -> Result<StateSpace<O::Formula>, AutomatonError>
where
    O: GuardOracle,
    I: IntoIterator<Item = StateIndex>,
    J: IntoIterator<Item = StateIndex>,
    T: IntoIterator<Item = (StateIndex, O::Formula, StateIndex)>,
{
    let mut space = StateSpace::new(states, initial, accepting)?;
    for (origin, guard, target) in transitions {
        insert_guarded_edge(oracle, &mut space, origin, guard, target, exclusive)?;
    }
    Ok(space)
}

fn parse_all<O, S, T>(
    oracle: &O,
    transitions: T,
) -> Result<Vec<(StateIndex, O::Formula, StateIndex)>, AutomatonError>
where
    O: GuardOracle,
    S: AsRef<str>,
    T: IntoIterator<Item = (StateIndex, S, StateIndex)>,
{
    transitions
        .into_iter()
        .map(|(q, formula, p)| Ok((q, oracle.parse(formula.as_ref())?, p)))
        .collect()
}

/// A symbolic automaton, whose edges are labeled with guards over the propositions of a
/// [`GuardOracle`]. An [`Interpretation`] of the propositions can take every edge whose guard it
/// satisfies, so a state may have any number of successors for one input.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let aut = SymbolicAutomaton::from_formulas(
///     [0, 1],
///     PropAlphabet::new(["p", "q"]),
///     0,
///     [1],
///     [(0, "true", 0), (0, "p & q", 1)],
/// )
/// .unwrap();
/// let both = Interpretation::new().with("p", true).with("q", true);
/// let p = Interpretation::new().with("p", true);
/// assert!(aut.accepts([p.clone(), both.clone()]).unwrap());
/// assert!(!aut.accepts([both, p]).unwrap());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolicAutomaton<O: GuardOracle = PropAlphabet> {
    oracle: O,
    space: StateSpace<O::Formula>,
}

delegate_state_space!(SymbolicAutomaton<O: GuardOracle>, O::Formula);

impl<O: GuardOracle> SymbolicAutomaton<O> {
    /// Creates a new symbolic automaton after checking that the states are non-empty and
    /// contain the initial state, the accepting states and all endpoints of transitions.
    /// Transitions between the same pair of states are merged into one edge whose guard is the
    /// disjunction of their guards.
    pub fn new<I, J, T>(
        states: I,
        oracle: O,
        initial: StateIndex,
        accepting: J,
        transitions: T,
    ) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = StateIndex>,
        J: IntoIterator<Item = StateIndex>,
        T: IntoIterator<Item = (StateIndex, O::Formula, StateIndex)>,
    {
        let space = build_space(&oracle, states, initial, accepting, transitions, false)?;
        Ok(Self { oracle, space })
    }

    /// Works like [`Self::new`], but the guards are given in their textual form and parsed by
    /// the oracle first.
    pub fn from_formulas<I, J, S, T>(
        states: I,
        oracle: O,
        initial: StateIndex,
        accepting: J,
        transitions: T,
    ) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = StateIndex>,
        J: IntoIterator<Item = StateIndex>,
        S: AsRef<str>,
        T: IntoIterator<Item = (StateIndex, S, StateIndex)>,
    {
        let transitions = parse_all(&oracle, transitions)?;
        Self::new(states, oracle, initial, accepting, transitions)
    }

    pub(crate) fn from_parts(oracle: O, space: StateSpace<O::Formula>) -> Self {
        Self { oracle, space }
    }

    /// Gives a reference to the oracle that decides questions about guards.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// The names of the propositions that guards talk about.
    pub fn propositions(&self) -> &[String] {
        self.oracle.propositions()
    }

    /// Gives a reference to the underlying [`StateSpace`].
    pub fn state_space(&self) -> &StateSpace<O::Formula> {
        &self.space
    }

    /// Returns the guard of the edge from `source` to `target`, if there is one.
    pub fn guard_between(&self, source: StateIndex, target: StateIndex) -> Option<&O::Formula> {
        self.space
            .edges_of(source)
            .iter()
            .find_map(|(g, p)| if *p == target { Some(g) } else { None })
    }

    /// Returns true if for every state, the guards leaving it are pairwise mutually exclusive.
    pub fn is_deterministic(&self) -> bool {
        self.state_indices().all(|q| {
            self.space
                .edges_of(q)
                .iter()
                .tuple_combinations()
                .all(|((g, _), (h, _))| !self.oracle.overlapping(g, h))
        })
    }

    /// Turns `self` into a [`SymbolicDfa`] with the same states and edges, which fails if two
    /// guards leaving the same state overlap.
    pub fn to_dfa(&self) -> Result<SymbolicDfa<O>, AutomatonError> {
        SymbolicDfa::new(
            self.space.states().iter().copied(),
            self.oracle.clone(),
            self.initial(),
            self.space.accepting().iter().copied(),
            self.transitions().into_iter().map(Edge::into_tuple),
        )
    }
}

impl<O: GuardOracle> FiniteAutomaton for SymbolicAutomaton<O> {
    type Alphabet = O;
    type Input = Interpretation;

    fn alphabet(&self) -> &O {
        &self.oracle
    }

    fn validate_input(&self, _input: &Interpretation) -> Result<(), AutomatonError> {
        Ok(())
    }

    fn successors(
        &self,
        state: StateIndex,
        input: &Interpretation,
    ) -> Result<OrderedSet<StateIndex>, AutomatonError> {
        Ok(self
            .space
            .edges_of(state)
            .iter()
            .filter(|(guard, _)| self.oracle.evaluate(guard, input))
            .map(|(_, p)| *p)
            .collect())
    }
}

impl<O: GuardOracle> Trim for SymbolicAutomaton<O> {
    fn restrict_states(&self, keep: &OrderedSet<StateIndex>) -> Self {
        Self::from_parts(self.oracle.clone(), self.space.restrict(keep))
    }
}

/// A deterministic symbolic automaton. The guards leaving any state are pairwise mutually
/// exclusive, which is checked with satisfiability queries whenever an edge is added. Hence every
/// [`Interpretation`] can take at most one edge out of each state.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let props = PropAlphabet::new(["p"]);
/// let overlapping = SymbolicDfa::from_formulas(
///     [0, 1],
///     props.clone(),
///     0,
///     [1],
///     [(0, "p", 0), (0, "true", 1)],
/// );
/// assert!(matches!(overlapping, Err(AutomatonError::OverlappingGuards { state: 0, .. })));
///
/// let dfa = SymbolicDfa::from_formulas([0, 1], props, 0, [1], [(0, "p", 0), (0, "!p", 1)])
///     .unwrap();
/// assert!(dfa.accepts([Interpretation::new().with("p", true), Interpretation::new()]).unwrap());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolicDfa<O: GuardOracle = PropAlphabet> {
    oracle: O,
    space: StateSpace<O::Formula>,
}

delegate_state_space!(SymbolicDfa<O: GuardOracle>, O::Formula);

impl<O: GuardOracle> SymbolicDfa<O> {
    /// Creates a new deterministic symbolic automaton. On top of the checks that
    /// [`SymbolicAutomaton::new`] performs, every transition is checked against the transitions
    /// that leave the same state towards a different target. If the guards are satisfied by a
    /// common interpretation, construction fails with [`AutomatonError::OverlappingGuards`].
    pub fn new<I, J, T>(
        states: I,
        oracle: O,
        initial: StateIndex,
        accepting: J,
        transitions: T,
    ) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = StateIndex>,
        J: IntoIterator<Item = StateIndex>,
        T: IntoIterator<Item = (StateIndex, O::Formula, StateIndex)>,
    {
        let space = build_space(&oracle, states, initial, accepting, transitions, true)?;
        Ok(Self { oracle, space })
    }

    /// Works like [`Self::new`], but the guards are given in their textual form and parsed by
    /// the oracle first.
    pub fn from_formulas<I, J, S, T>(
        states: I,
        oracle: O,
        initial: StateIndex,
        accepting: J,
        transitions: T,
    ) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = StateIndex>,
        J: IntoIterator<Item = StateIndex>,
        S: AsRef<str>,
        T: IntoIterator<Item = (StateIndex, S, StateIndex)>,
    {
        let transitions = parse_all(&oracle, transitions)?;
        Self::new(states, oracle, initial, accepting, transitions)
    }

    pub(crate) fn from_parts(oracle: O, space: StateSpace<O::Formula>) -> Self {
        Self { oracle, space }
    }

    /// Gives a reference to the oracle that decides questions about guards.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// The names of the propositions that guards talk about.
    pub fn propositions(&self) -> &[String] {
        self.oracle.propositions()
    }

    /// Gives a reference to the underlying [`StateSpace`].
    pub fn state_space(&self) -> &StateSpace<O::Formula> {
        &self.space
    }

    /// Returns the guard of the edge from `source` to `target`, if there is one.
    pub fn guard_between(&self, source: StateIndex, target: StateIndex) -> Option<&O::Formula> {
        self.space
            .edges_of(source)
            .iter()
            .find_map(|(g, p)| if *p == target { Some(g) } else { None })
    }

    /// Returns the unique successor of `state` under `input`, if there is one.
    pub fn successor(
        &self,
        state: StateIndex,
        input: &Interpretation,
    ) -> Result<Option<StateIndex>, AutomatonError> {
        let mut satisfied = self
            .space
            .edges_of(state)
            .iter()
            .filter(|(guard, _)| self.oracle.evaluate(guard, input))
            .map(|(_, p)| *p);
        let first = satisfied.next();
        if satisfied.next().is_some() {
            error!(
                "interpretation {} satisfies more than one guard leaving state {state}",
                input.show()
            );
            return Err(AutomatonError::AmbiguousGuards {
                state,
                interpretation: input.show(),
            });
        }
        Ok(first)
    }

    /// Returns true if for every state, every interpretation satisfies one of the guards that
    /// leave it.
    pub fn is_complete(&self) -> bool {
        self.state_indices().all(|q| {
            let covered = self
                .oracle
                .disjunction(self.space.edges_of(q).iter().map(|(g, _)| g));
            self.oracle.is_valid(&covered)
        })
    }

    /// Returns an equivalent complete automaton. If `self` is not complete, a fresh rejecting
    /// sink is added whose only edge is a self-loop labeled with the guard that is always true.
    /// Every state that is not complete gets an edge into the sink, labeled with the negation of
    /// the disjunction of its guards.
    pub fn complete(&self) -> Self {
        if self.is_complete() {
            return self.clone();
        }
        let mut space = self.space.clone();
        let sink = space.fresh_state();
        let states = space.states().iter().copied().collect_vec();
        space.add_state(sink, false);
        for q in states {
            let covered = self
                .oracle
                .disjunction(self.space.edges_of(q).iter().map(|(g, _)| g));
            let rest = self.oracle.not(&covered);
            if self.oracle.is_satisfiable(&rest) {
                space.push_edge(q, rest, sink);
            }
        }
        space.push_edge(sink, self.oracle.top(), sink);
        debug!("completed symbolic dfa with {} states by adding sink {sink}", self.size());
        Self::from_parts(self.oracle.clone(), space)
    }

    /// Forgets that `self` is deterministic.
    pub fn to_automaton(&self) -> SymbolicAutomaton<O> {
        SymbolicAutomaton::from_parts(self.oracle.clone(), self.space.clone())
    }
}

impl<O: GuardOracle> FiniteAutomaton for SymbolicDfa<O> {
    type Alphabet = O;
    type Input = Interpretation;

    fn alphabet(&self) -> &O {
        &self.oracle
    }

    fn validate_input(&self, _input: &Interpretation) -> Result<(), AutomatonError> {
        Ok(())
    }

    fn successors(
        &self,
        state: StateIndex,
        input: &Interpretation,
    ) -> Result<OrderedSet<StateIndex>, AutomatonError> {
        Ok(self.successor(state, input)?.into_iter().collect())
    }
}

impl<O: GuardOracle> Trim for SymbolicDfa<O> {
    fn restrict_states(&self, keep: &OrderedSet<StateIndex>) -> Self {
        Self::from_parts(self.oracle.clone(), self.space.restrict(keep))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::TruthTable;

    fn interpretation(p: bool, q: bool) -> Interpretation {
        Interpretation::new().with("p", p).with("q", q)
    }

    #[test_log::test]
    fn overlapping_guards_are_rejected() {
        let props = PropAlphabet::new(["p", "q"]);
        let err = SymbolicDfa::from_formulas(
            [0, 1, 2],
            props.clone(),
            0,
            [1],
            [(0, "p", 1), (0, "q", 2)],
        )
        .unwrap_err();
        assert!(matches!(err, AutomatonError::OverlappingGuards { state: 0, .. }));

        // overlapping guards towards the same target are merged instead
        let merged = SymbolicDfa::from_formulas(
            [0, 1, 2],
            props.clone(),
            0,
            [1],
            [(0, "p", 1), (0, "q", 1), (0, "!p & !q", 2)],
        )
        .unwrap();
        assert_eq!(merged.edge_count(), 2);
        assert!(props.equivalent(
            merged.guard_between(0, 1).unwrap(),
            &props.parse("p | q").unwrap()
        ));
        assert_eq!(merged.propositions(), ["p".to_string(), "q".to_string()]);
    }

    #[test]
    fn symbolic_acceptance() {
        let props = PropAlphabet::new(["p", "q"]);
        let aut = SymbolicAutomaton::from_formulas(
            [0, 1, 2],
            props,
            0,
            [2],
            [(0, "p", 1), (0, "q", 2), (1, "!q", 2)],
        )
        .unwrap();
        assert!(!aut.is_deterministic());
        assert!(aut.to_dfa().is_err());
        assert!(aut.accepts([interpretation(true, true)]).unwrap());
        assert!(aut.accepts([interpretation(true, false), interpretation(false, false)]).unwrap());
        assert!(!aut.accepts([interpretation(true, false)]).unwrap());
        assert!(!aut.accepts([interpretation(false, false), interpretation(false, false)]).unwrap());
        assert!(!aut.accepts(Vec::<Interpretation>::new()).unwrap());
        assert_eq!(
            aut.successors(0, &interpretation(true, true)).unwrap().len(),
            2
        );
        // propositions that the automaton does not know about are ignored
        let extra = interpretation(false, true).with("r", true);
        assert!(aut.accepts([extra]).unwrap());
    }

    #[test]
    fn symbolic_completion() {
        let props = PropAlphabet::new(["p", "q"]);
        let dfa = SymbolicDfa::from_formulas([0, 1], props.clone(), 0, [1], [(0, "p & q", 1)])
            .unwrap();
        assert!(!dfa.is_complete());
        let complete = dfa.complete();
        assert!(complete.is_complete());
        assert_eq!(complete.size(), 3);
        assert!(props.equivalent(
            complete.guard_between(0, 2).unwrap(),
            &props.parse("!(p & q)").unwrap()
        ));
        assert!(props.is_valid(complete.guard_between(2, 2).unwrap()));
        assert!(props.is_valid(complete.guard_between(1, 2).unwrap()));
        assert_eq!(complete.complete(), complete);
        for word in [
            vec![interpretation(true, true)],
            vec![interpretation(true, false)],
            vec![interpretation(true, true), interpretation(true, true)],
        ] {
            assert_eq!(
                dfa.accepts(word.clone()).unwrap(),
                complete.accepts(word).unwrap()
            );
        }

        let far = SymbolicDfa::from_formulas(
            [0, usize::MAX],
            props.clone(),
            0,
            [usize::MAX],
            [(0, "p", usize::MAX)],
        )
        .unwrap();
        let complete = far.complete();
        assert_eq!(complete.size(), 3);
        assert!(props.is_valid(complete.guard_between(1, 1).unwrap()));
        assert!(complete.accepts([interpretation(true, false)]).unwrap());
        assert!(!complete.accepts([interpretation(false, true)]).unwrap());
    }

    /// Wraps [`TruthTable`] but claims that no two guards overlap, so it lets a nondeterministic
    /// automaton through construction.
    #[derive(Clone, Debug)]
    struct Careless(TruthTable);

    impl GuardOracle for Careless {
        type Formula = u64;

        fn propositions(&self) -> &[String] {
            self.0.propositions()
        }
        fn top(&self) -> u64 {
            self.0.top()
        }
        fn bottom(&self) -> u64 {
            self.0.bottom()
        }
        fn proposition(&self, name: &str) -> Result<u64, AutomatonError> {
            self.0.proposition(name)
        }
        fn parse(&self, formula: &str) -> Result<u64, AutomatonError> {
            self.0.parse(formula)
        }
        fn and(&self, left: &u64, right: &u64) -> u64 {
            self.0.and(left, right)
        }
        fn or(&self, left: &u64, right: &u64) -> u64 {
            self.0.or(left, right)
        }
        fn not(&self, formula: &u64) -> u64 {
            self.0.not(formula)
        }
        fn is_satisfiable(&self, formula: &u64) -> bool {
            self.0.is_satisfiable(formula)
        }
        fn equivalent(&self, left: &u64, right: &u64) -> bool {
            self.0.equivalent(left, right)
        }
        fn evaluate(&self, formula: &u64, interpretation: &Interpretation) -> bool {
            self.0.evaluate(formula, interpretation)
        }
        fn overlapping(&self, _left: &u64, _right: &u64) -> bool {
            false
        }
    }

    #[test_log::test]
    fn ambiguous_guards_fail_at_query_time() {
        let dfa = SymbolicDfa::from_formulas(
            [0, 1, 2],
            Careless(TruthTable::new(["a", "b"])),
            0,
            [1],
            [(0, "a", 1), (0, "b", 2)],
        )
        .unwrap();
        let both = Interpretation::new().with("a", true).with("b", true);
        let only_a = Interpretation::new().with("a", true);

        assert_eq!(dfa.successor(0, &only_a), Ok(Some(1)));
        assert!(dfa.accepts([only_a]).unwrap());
        assert!(matches!(
            dfa.successor(0, &both),
            Err(AutomatonError::AmbiguousGuards { state: 0, .. })
        ));
        assert!(matches!(
            dfa.accepts([both]),
            Err(AutomatonError::AmbiguousGuards { state: 0, .. })
        ));
    }

    #[test]
    fn stub_oracle() {
        let table = TruthTable::new(["a", "b"]);
        let dfa = SymbolicDfa::from_formulas(
            [0, 1],
            table.clone(),
            0,
            [1],
            [(0, "a", 1), (0, "!a", 0), (1, "true", 1)],
        )
        .unwrap();
        let a = Interpretation::new().with("a", true);
        assert!(dfa.accepts([Interpretation::new(), a.clone()]).unwrap());
        assert!(!dfa.accepts([Interpretation::new()]).unwrap());
        assert!(dfa.is_complete());
        assert!(SymbolicDfa::from_formulas([0], table, 0, [], [(0, "a", 0), (0, "b", 0)]).is_ok());
    }
}
