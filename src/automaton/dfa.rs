use std::collections::VecDeque;

use tracing::debug;

use crate::prelude::*;
use crate::transition_system::delegate_state_space;

use crate::math::{Map, OrderedSet};

/// A deterministic finite automaton over an explicit [`Alphabet`]. Every state has at most one
/// successor per symbol, a missing transition is an implicit rejecting sink. The edges leaving a
/// state are kept in the order of the alphabet.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let dfa = SimpleDfa::new(
///     [0, 1],
///     CharAlphabet::of_size(2),
///     0,
///     [1],
///     [(0, 'a', 1), (1, 'b', 0)],
/// )
/// .unwrap();
/// assert!(dfa.accepts("aba".chars()).unwrap());
/// assert!(!dfa.accepts("ab".chars()).unwrap());
/// assert!(!dfa.accepts("bb".chars()).unwrap());
/// assert!(!dfa.is_complete());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleDfa<A: Alphabet = CharAlphabet> {
    alphabet: A,
    space: StateSpace<A::Symbol>,
}

delegate_state_space!(SimpleDfa<A: Alphabet>, A::Symbol);

impl<A: Alphabet> SimpleDfa<A> {
    /// Creates a new deterministic automaton and checks all of its invariants. The states must
    /// be non-empty and contain the initial and accepting states as well as both endpoints of
    /// every transition, every symbol on a transition must be in `alphabet`, and no state may
    /// have two different successors for one symbol. Repeating a transition is allowed.
    pub fn new<I, J, T>(
        states: I,
        alphabet: A,
        initial: StateIndex,
        accepting: J,
        transitions: T,
    ) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = StateIndex>,
        J: IntoIterator<Item = StateIndex>,
        T: IntoIterator<Item = (StateIndex, A::Symbol, StateIndex)>,
    {
        let mut space = StateSpace::new(states, initial, accepting)?;
        for (origin, symbol, target) in transitions {
            space.check_endpoints(origin, target, || symbol.show())?;
            if !alphabet.contains(&symbol) {
                return Err(AutomatonError::UnknownTransitionSymbol {
                    state: origin,
                    symbol: symbol.show(),
                });
            }
            match space
                .edges_of(origin)
                .iter()
                .find(|(existing, _)| existing == &symbol)
            {
                Some((_, p)) if *p == target => {}
                Some(_) => {
                    return Err(AutomatonError::Nondeterministic {
                        state: origin,
                        symbol: symbol.show(),
                    })
                }
                None => space.push_edge(origin, symbol, target),
            }
        }
        Ok(Self::from_parts(alphabet, space))
    }

    /// Assembles a DFA from parts that are known to be deterministic.
    pub(crate) fn from_parts(alphabet: A, mut space: StateSpace<A::Symbol>) -> Self {
        space.sort_edges_by_key(|symbol, _| alphabet.position(symbol));
        Self { alphabet, space }
    }

    /// Gives a reference to the underlying [`StateSpace`].
    pub fn state_space(&self) -> &StateSpace<A::Symbol> {
        &self.space
    }

    /// Returns the successor of `state` on `symbol`, if the transition is defined.
    pub fn successor(&self, state: StateIndex, symbol: &A::Symbol) -> Option<StateIndex> {
        self.space
            .edges_of(state)
            .iter()
            .find_map(|(s, p)| if s == symbol { Some(*p) } else { None })
    }

    /// Runs `word` from the initial state and returns the state that is reached, or `None` if
    /// the run hits an undefined transition.
    pub fn reached_state<W>(&self, word: W) -> Result<Option<StateIndex>, AutomatonError>
    where
        W: IntoIterator<Item = A::Symbol>,
    {
        Ok(self.reached_states(word)?.first().copied())
    }

    /// Returns true if every state has a successor for every symbol of the alphabet.
    pub fn is_complete(&self) -> bool {
        self.state_indices()
            .all(|q| self.space.edges_of(q).len() == self.alphabet.size())
    }

    /// Returns an equivalent complete automaton. If `self` is not complete, a fresh rejecting
    /// sink with a self-loop on every symbol is added (its index is the smallest index that is
    /// not a state of `self`) and every undefined transition is sent there. Otherwise this is a
    /// clone.
    pub fn complete(&self) -> Self {
        if self.is_complete() {
            return self.clone();
        }
        let mut space = self.space.clone();
        let sink = space.fresh_state();
        space.add_state(sink, false);
        for q in space.states().iter().copied().collect::<Vec<_>>() {
            for symbol in self.alphabet.universe() {
                if self.successor(q, symbol).is_none() {
                    space.push_edge(q, symbol.clone(), sink);
                }
            }
        }
        debug!("completed dfa with {} states by adding sink {sink}", self.size());
        Self::from_parts(self.alphabet.clone(), space)
    }

    /// Produces a copy in which the states are numbered in the order in which a breadth-first
    /// search from the initial state discovers them, visiting the symbols in the order of the
    /// alphabet. Unreachable states are dropped. Two minimal automata for the same language are
    /// equal after renumbering.
    pub fn renumbered(&self) -> Self {
        let mut ids: Map<StateIndex, StateIndex> = Map::default();
        let mut order = vec![];
        let mut queue = VecDeque::from([self.initial()]);
        ids.insert(self.initial(), 0);
        while let Some(q) = queue.pop_front() {
            order.push(q);
            for (_, p) in self.space.edges_of(q) {
                if !ids.contains_key(p) {
                    ids.insert(*p, ids.len());
                    queue.push_back(*p);
                }
            }
        }

        let mut space = StateSpace::dense(
            order.len(),
            0,
            order
                .iter()
                .filter(|q| self.is_accepting(**q))
                .map(|q| ids[q]),
        );
        for q in &order {
            for (symbol, p) in self.space.edges_of(*q) {
                space.push_edge(ids[q], symbol.clone(), ids[p]);
            }
        }
        Self::from_parts(self.alphabet.clone(), space)
    }

    /// Views `self` as a non-deterministic automaton with the same states and transitions.
    pub fn to_nfa(&self) -> SimpleNfa<A> {
        SimpleNfa::from_parts(self.alphabet.clone(), self.space.clone())
    }
}

impl<A: Alphabet> FiniteAutomaton for SimpleDfa<A> {
    type Alphabet = A;
    type Input = A::Symbol;

    fn alphabet(&self) -> &A {
        &self.alphabet
    }

    fn validate_input(&self, input: &A::Symbol) -> Result<(), AutomatonError> {
        if self.alphabet.contains(input) {
            Ok(())
        } else {
            Err(AutomatonError::SymbolNotInAlphabet(input.show()))
        }
    }

    fn successors(
        &self,
        state: StateIndex,
        input: &A::Symbol,
    ) -> Result<OrderedSet<StateIndex>, AutomatonError> {
        Ok(self.successor(state, input).into_iter().collect())
    }
}

impl<A: Alphabet> Trim for SimpleDfa<A> {
    fn restrict_states(&self, keep: &OrderedSet<StateIndex>) -> Self {
        Self::from_parts(self.alphabet.clone(), self.space.restrict(keep))
    }
}
