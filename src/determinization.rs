use std::collections::VecDeque;

use bit_set::BitSet;
use tracing::{debug, trace};

use crate::math::{Bijection, Map, OrderedMap};
use crate::prelude::*;

/// Arena for the composite states of the subset construction. A composite is a set of states of
/// the non-deterministic automaton, stored as a bit set over the positions of those states, and
/// is associated with the index it gets in the deterministic automaton. Indices are handed out
/// in the order in which composites are discovered, so the initial composite gets `0`.
#[derive(Debug, Clone)]
struct Composites {
    positions: Vec<StateIndex>,
    position_of: Map<StateIndex, usize>,
    arena: Bijection<BitSet, StateIndex>,
    queue: VecDeque<BitSet>,
}

impl Composites {
    fn new<Ts: Pointed>(ts: &Ts) -> Self {
        let positions: Vec<StateIndex> = ts.state_indices().collect();
        let position_of = positions.iter().enumerate().map(|(i, q)| (*q, i)).collect();
        let mut out = Self {
            positions,
            position_of,
            arena: Bijection::new(),
            queue: VecDeque::new(),
        };
        out.singleton(ts.initial());
        out
    }

    /// Creates the composite that only contains `state`.
    fn singleton(&mut self, state: StateIndex) -> StateIndex {
        let mut set = BitSet::with_capacity(self.positions.len());
        set.insert(self.position_of[&state]);
        self.index_of(set)
    }

    /// Returns the index of the given composite, allocating one and scheduling the composite for
    /// exploration if it has not been seen before.
    fn index_of(&mut self, set: BitSet) -> StateIndex {
        if let Some(id) = self.arena.get_by_left(&set) {
            return *id;
        }
        let id = self.arena.len();
        trace!(
            "discovered composite {id} = {}",
            self.members(&set).collect::<Vec<_>>().show()
        );
        self.arena.insert(set.clone(), id);
        self.queue.push_back(set);
        id
    }

    fn next(&mut self) -> Option<(StateIndex, BitSet)> {
        let set = self.queue.pop_front()?;
        let id = *self.arena.get_by_left(&set)?;
        Some((id, set))
    }

    fn members<'a>(&'a self, set: &'a BitSet) -> impl Iterator<Item = StateIndex> + 'a {
        set.iter().map(|i| self.positions[i])
    }

    fn position(&self, state: StateIndex) -> usize {
        self.position_of[&state]
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    /// Indices of the composites that contain an accepting state of `ts`.
    fn accepting<Ts: TransitionSystem>(&self, ts: &Ts) -> Vec<StateIndex> {
        self.arena
            .iter()
            .filter(|(set, _)| self.members(set).any(|q| ts.is_accepting(q)))
            .map(|(_, id)| *id)
            .collect()
    }
}

impl<A: Alphabet> SimpleNfa<A> {
    /// Turns `self` into an equivalent deterministic automaton using the subset construction.
    /// Only those sets of states are materialized that are reachable from the set containing the
    /// initial state. If a set of states has no successor for some symbol, the transition stays
    /// undefined, so the result is not necessarily complete. The result is not trimmed.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let nfa = TSBuilder::default()
    ///     .with_accepting([1])
    ///     .with_edges([(0, 'a', 0), (0, 'a', 1)])
    ///     .into_nfa(0)
    ///     .unwrap();
    /// let dfa = nfa.determinize();
    /// assert_eq!(dfa.size(), 2);
    /// assert!(dfa.accepts("aa".chars()).unwrap());
    /// assert!(!dfa.accepts("".chars()).unwrap());
    /// ```
    pub fn determinize(&self) -> SimpleDfa<A> {
        let mut composites = Composites::new(self);
        let mut edges = vec![];

        while let Some((id, set)) = composites.next() {
            for symbol in self.alphabet().universe() {
                let mut successor = BitSet::with_capacity(composites.positions.len());
                for q in composites.members(&set) {
                    for (s, p) in self.state_space().edges_of(q) {
                        if s == symbol {
                            successor.insert(composites.position(*p));
                        }
                    }
                }
                if successor.is_empty() {
                    continue;
                }
                let target = composites.index_of(successor);
                edges.push((id, symbol.clone(), target));
            }
        }

        let mut space = StateSpace::dense(composites.len(), 0, composites.accepting(self));
        for (q, symbol, p) in edges {
            space.push_edge(q, symbol, p);
        }
        debug!(
            "determinized nfa with {} states into dfa with {} states",
            self.size(),
            space.size()
        );
        SimpleDfa::from_parts(self.alphabet().clone(), space)
    }
}

impl<O: GuardOracle> SymbolicAutomaton<O> {
    /// Turns `self` into an equivalent deterministic symbolic automaton. The guards leaving a
    /// set of states `S` are first merged per target, then every satisfiable combination of
    /// taking some of these guards and not taking the others (a minterm) becomes an edge towards
    /// the set of targets that the combination takes. Distinct minterms are mutually exclusive,
    /// so the result is deterministic. Like [`SimpleNfa::determinize`], only reachable sets are
    /// materialized and the result is not trimmed.
    pub fn determinize(&self) -> SymbolicDfa<O> {
        let oracle = self.oracle();
        let mut composites = Composites::new(self);
        let mut edges = vec![];

        while let Some((id, set)) = composites.next() {
            let mut grouped: OrderedMap<usize, O::Formula> = OrderedMap::new();
            for q in composites.members(&set) {
                for (guard, p) in self.state_space().edges_of(q) {
                    let position = composites.position(*p);
                    let merged = match grouped.get(&position) {
                        Some(existing) => oracle.or(existing, guard),
                        None => guard.clone(),
                    };
                    grouped.insert(position, merged);
                }
            }

            let mut minterms = vec![(oracle.top(), BitSet::with_capacity(composites.positions.len()))];
            for (position, guard) in &grouped {
                let negated = oracle.not(guard);
                let mut refined = Vec::with_capacity(minterms.len() * 2);
                for (formula, targets) in minterms {
                    let taken = oracle.and(&formula, guard);
                    if oracle.is_satisfiable(&taken) {
                        let mut with = targets.clone();
                        with.insert(*position);
                        refined.push((taken, with));
                    }
                    let avoided = oracle.and(&formula, &negated);
                    if oracle.is_satisfiable(&avoided) {
                        refined.push((avoided, targets));
                    }
                }
                minterms = refined;
            }

            for (formula, targets) in minterms {
                if targets.is_empty() {
                    continue;
                }
                let target = composites.index_of(targets);
                edges.push((id, formula, target));
            }
        }

        let mut space = StateSpace::dense(composites.len(), 0, composites.accepting(self));
        for (q, guard, p) in edges {
            space.push_edge(q, guard, p);
        }
        debug!(
            "determinized symbolic automaton with {} states into one with {} states",
            self.size(),
            space.size()
        );
        SymbolicDfa::from_parts(oracle.clone(), space)
    }
}
