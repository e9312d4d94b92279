use std::fmt::Debug;

use itertools::Itertools;
use tracing::trace;

use crate::prelude::*;

use crate::math::OrderedSet;

mod dfa;
pub use dfa::SimpleDfa;

mod nfa;
pub use nfa::SimpleNfa;

mod symbolic;
pub use symbolic::{SymbolicAutomaton, SymbolicDfa};

/// A transition of an automaton, i.e. a triple of source, label and target. For explicit automata
/// the label is a symbol, for symbolic automata it is a guard.
pub type Transition<L> = Edge<L>;

/// The capabilities that all four kinds of automata share: on top of enumerating states and
/// transitions (see [`TransitionSystem`]) they report their alphabet and decide acceptance of
/// words.
///
/// Acceptance is implemented once, as a frontier search: starting with the set containing only
/// the initial state, each input replaces the frontier by the union of the successors of its
/// states. The word is accepted iff the final frontier contains an accepting state. Once the
/// frontier is empty it stays empty, so the run stops early. For deterministic automata the
/// frontier never has more than one element and this is the usual deterministic walk, where an
/// undefined transition kills the run.
pub trait FiniteAutomaton: Pointed {
    /// What the automaton reports as its alphabet. For explicit automata this is an
    /// [`Alphabet`], for symbolic ones it is the [`GuardOracle`], which knows the propositions.
    type Alphabet: Debug;

    /// The type of elements of the words that are run through the automaton. For explicit
    /// automata this is a symbol, for symbolic automata an [`Interpretation`].
    type Input: Clone + Debug;

    /// Gives a reference to the alphabet.
    fn alphabet(&self) -> &Self::Alphabet;

    /// Verifies that `input` may appear in a word, fails with
    /// [`AutomatonError::SymbolNotInAlphabet`] if it does not.
    fn validate_input(&self, input: &Self::Input) -> Result<(), AutomatonError>;

    /// Returns the states reached from `state` by consuming `input`. An empty result means that
    /// the transition is undefined.
    fn successors(
        &self,
        state: StateIndex,
        input: &Self::Input,
    ) -> Result<OrderedSet<StateIndex>, AutomatonError>;

    /// Runs `word` starting in the set of states `origin` and returns the set of states that
    /// are reached. The whole word is validated before the run starts.
    fn reached_states_from<W>(
        &self,
        origin: OrderedSet<StateIndex>,
        word: W,
    ) -> Result<OrderedSet<StateIndex>, AutomatonError>
    where
        W: IntoIterator<Item = Self::Input>,
    {
        let word = word.into_iter().collect_vec();
        for input in &word {
            self.validate_input(input)?;
        }

        let mut frontier = origin;
        for (i, input) in word.iter().enumerate() {
            if frontier.is_empty() {
                trace!("run died after {i} of {} inputs", word.len());
                break;
            }
            let mut next = OrderedSet::new();
            for q in &frontier {
                next.extend(self.successors(*q, input)?);
            }
            trace!("after {:?} the frontier is {}", input, next.show());
            frontier = next;
        }
        Ok(frontier)
    }

    /// Returns the set of states reached from the initial state on `word`.
    fn reached_states<W>(&self, word: W) -> Result<OrderedSet<StateIndex>, AutomatonError>
    where
        W: IntoIterator<Item = Self::Input>,
    {
        self.reached_states_from(OrderedSet::from([self.initial()]), word)
    }

    /// Decides whether `word` is accepted. The empty word is accepted iff the initial state is
    /// accepting. Fails if an explicit automaton encounters a symbol that is not part of its
    /// alphabet, or if a deterministic symbolic automaton finds more than one satisfied guard.
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
    /// assert!(nfa.accepts("aaa".chars()).unwrap());
    /// assert!(!nfa.accepts("".chars()).unwrap());
    /// assert!(nfa.accepts("ab".chars()).is_err());
    /// ```
    fn accepts<W>(&self, word: W) -> Result<bool, AutomatonError>
    where
        W: IntoIterator<Item = Self::Input>,
    {
        Ok(self
            .reached_states(word)?
            .into_iter()
            .any(|q| self.is_accepting(q)))
    }

    /// Returns true if no word is accepted, that is if no accepting state can be reached from
    /// the initial state.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let dfa = TSBuilder::default()
    ///     .with_accepting([2])
    ///     .with_edges([(0, 'a', 1), (2, 'a', 0)])
    ///     .into_dfa(0)
    ///     .unwrap();
    /// assert!(dfa.is_empty_language());
    /// ```
    fn is_empty_language(&self) -> bool
    where
        Self: Sized,
    {
        !self.coreachable_state_indices().contains(&self.initial())
    }
}
