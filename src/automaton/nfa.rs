use crate::math::OrderedSet;
use crate::prelude::*;
use crate::transition_system::delegate_state_space;

/// A non-deterministic finite automaton over an explicit [`Alphabet`]. A state may have any
/// number of successors for a symbol, including none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleNfa<A: Alphabet = CharAlphabet> {
    alphabet: A,
    space: StateSpace<A::Symbol>,
}

delegate_state_space!(SimpleNfa<A: Alphabet>, A::Symbol);

impl<A: Alphabet> SimpleNfa<A> {
    /// Creates a new automaton. Fails if the states are empty, if the initial state, an
    /// accepting state or an endpoint of a transition is not a state, or if a transition is
    /// labeled with a symbol outside of `alphabet`. Duplicate transitions are collapsed.
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
            space.push_edge(origin, symbol, target);
        }
        Ok(Self::from_parts(alphabet, space))
    }

    pub(crate) fn from_parts(alphabet: A, mut space: StateSpace<A::Symbol>) -> Self {
        space.sort_edges_by_key(|symbol, target| (alphabet.position(symbol), target));
        Self { alphabet, space }
    }

    /// Gives a reference to the underlying [`StateSpace`].
    pub fn state_space(&self) -> &StateSpace<A::Symbol> {
        &self.space
    }

    /// Returns true if no state has more than one successor for any symbol, i.e. if `self`
    /// could be turned into a [`SimpleDfa`] without changing the transitions.
    pub fn is_deterministic(&self) -> bool {
        self.state_indices().all(|q| {
            let edges = self.space.edges_of(q);
            edges.windows(2).all(|pair| pair[0].0 != pair[1].0)
        })
    }
}

impl<A: Alphabet> FiniteAutomaton for SimpleNfa<A> {
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
        Ok(self
            .space
            .edges_of(state)
            .iter()
            .filter_map(|(symbol, p)| if symbol == input { Some(*p) } else { None })
            .collect())
    }
}

impl<A: Alphabet> Trim for SimpleNfa<A> {
    fn restrict_states(&self, keep: &OrderedSet<StateIndex>) -> Self {
        Self::from_parts(self.alphabet.clone(), self.space.restrict(keep))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn nondeterministic_acceptance() {
        // words over {a, b} whose second to last symbol is an a
        let nfa = TSBuilder::default()
            .with_accepting([2])
            .with_edges([
                (0, 'a', 0),
                (0, 'b', 0),
                (0, 'a', 1),
                (1, 'a', 2),
                (1, 'b', 2),
            ])
            .into_nfa(0)
            .unwrap();
        assert!(!nfa.is_deterministic());
        assert!(nfa.accepts("ab".chars()).unwrap());
        assert!(nfa.accepts("bbaa".chars()).unwrap());
        assert!(!nfa.accepts("abb".chars()).unwrap());
        assert!(!nfa.accepts("a".chars()).unwrap());
        assert_eq!(
            nfa.successors(0, &'a').unwrap().into_iter().collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert!(nfa.successors(2, &'a').unwrap().is_empty());
    }

    #[test]
    fn empty_frontier_is_absorbing() {
        let nfa = SimpleNfa::new(
            [0, 1],
            CharAlphabet::of_size(2),
            0,
            [0],
            [(0, 'a', 1), (1, 'a', 0)],
        )
        .unwrap();
        assert!(nfa.accepts("aa".chars()).unwrap());
        assert!(!nfa.accepts("baa".chars()).unwrap());
        assert!(nfa.reached_states("ba".chars()).unwrap().is_empty());
        assert_eq!(
            nfa.accepts("ac".chars()),
            Err(AutomatonError::SymbolNotInAlphabet("c".to_string()))
        );
    }

    #[test]
    fn construction_errors() {
        let unknown_symbol = SimpleNfa::new(
            [0, 1],
            CharAlphabet::of_size(1),
            0,
            [],
            [(0, 'b', 1)],
        );
        assert_eq!(
            unknown_symbol,
            Err(AutomatonError::UnknownTransitionSymbol {
                state: 0,
                symbol: "b".to_string()
            })
        );
        let unknown_state =
            SimpleNfa::new([0, 1], CharAlphabet::of_size(1), 0, [], [(0, 'a', 2)]);
        assert!(matches!(
            unknown_state,
            Err(AutomatonError::UnknownTransitionState { state: 2, .. })
        ));
    }
}
