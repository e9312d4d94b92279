use crate::prelude::*;

use crate::math::OrderedSet;

/// Helper struct for the construction of explicit automata. It stores a list of edges, a list of
/// accepting states and optionally additional states and symbols. The set of states and the
/// alphabet of the automaton that is built are derived from the edges, states or symbols that
/// are only mentioned elsewhere have to be added explicitly.
///
/// # Example
///
/// We want to create a DFA with two states 0 and 1 over the alphabet `['a', 'b']`. We want to add the following transitions:
/// - From state 0 to state 0 on symbol 'a'
/// - From state 0 to state 1 on symbol 'b'
/// - From state 1 to state 1 on symbol 'a'
/// - From state 1 to state 0 on symbol 'b'
///
/// Further, state 0 should be initial and accepting. This can be done as follows
/// ```
/// use finite_automata::prelude::*;
///
/// let dfa = TSBuilder::default()
///     .with_state_colors([true, false]) // acceptance given in the order of the states
///     .with_edges([(0, 'a', 0), (0, 'b', 1), (1, 'a', 1), (1, 'b', 0)])
///     .into_dfa(0) // 0 is the initial state
///     .unwrap();
/// assert!(dfa.accepts("abba".chars()).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct TSBuilder<S: Symbol = char> {
    symbols: OrderedSet<S>,
    states: OrderedSet<StateIndex>,
    accepting: OrderedSet<StateIndex>,
    edges: Vec<(StateIndex, S, StateIndex)>,
}

impl<S: Symbol> Default for TSBuilder<S> {
    fn default() -> Self {
        Self {
            symbols: OrderedSet::new(),
            states: OrderedSet::new(),
            accepting: OrderedSet::new(),
            edges: vec![],
        }
    }
}

impl<S: Symbol> TSBuilder<S> {
    /// By default, the only alphabet symbols in the automaton that is built are the ones that
    /// appear on at least one edge. This method can be used to force additional alphabet
    /// symbols to appear.
    pub fn with_alphabet_symbols<I>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.symbols.extend(symbols);
        self
    }

    /// Adds states that do not necessarily appear on an edge.
    pub fn with_states<I: IntoIterator<Item = StateIndex>>(mut self, states: I) -> Self {
        self.states.extend(states);
        self
    }

    /// Marks the given states as accepting. They still have to be states of the automaton, that
    /// is they have to appear on an edge or be added through [`Self::with_states`].
    pub fn with_accepting<I: IntoIterator<Item = StateIndex>>(mut self, states: I) -> Self {
        self.accepting.extend(states);
        self
    }

    /// Decides acceptance for the states `0, 1, ...` in the order in which the flags are given.
    /// Every state that gets a flag this way is added to the states.
    pub fn with_state_colors<I: IntoIterator<Item = bool>>(mut self, colors: I) -> Self {
        for (q, accepting) in colors.into_iter().enumerate() {
            self.states.insert(q);
            if accepting {
                self.accepting.insert(q);
            }
        }
        self
    }

    /// Adds a list of edges to `self`. The edges are added in the order in which they are given.
    /// The edges can be passed in as anything that is iterable. An easy way is to pass in an
    /// array of tuples of the form `(source, symbol, target)`.
    pub fn with_edges<I>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (StateIndex, S, StateIndex)>,
    {
        self.edges.extend(edges);
        self
    }

    fn alphabet(&self) -> SimpleAlphabet<S> {
        self.edges
            .iter()
            .map(|(_, sym, _)| sym.clone())
            .chain(self.symbols.iter().cloned())
            .collect()
    }

    fn states(&self) -> OrderedSet<StateIndex> {
        self.edges
            .iter()
            .flat_map(|(q, _, p)| [*q, *p])
            .chain(self.states.iter().copied())
            .collect()
    }

    /// Tries to turn `self` into a deterministic finite automaton with the given initial state.
    /// Fails if `self` is not deterministic, or if the initial state or an accepting state is not
    /// a state of the automaton.
    pub fn into_dfa(self, initial: StateIndex) -> Result<SimpleDfa<SimpleAlphabet<S>>, AutomatonError> {
        SimpleDfa::new(
            self.states(),
            self.alphabet(),
            initial,
            self.accepting.iter().copied(),
            self.edges,
        )
    }

    /// Turns `self` into a non-deterministic finite automaton with the given initial state.
    pub fn into_nfa(self, initial: StateIndex) -> Result<SimpleNfa<SimpleAlphabet<S>>, AutomatonError> {
        SimpleNfa::new(
            self.states(),
            self.alphabet(),
            initial,
            self.accepting.iter().copied(),
            self.edges,
        )
    }
}
