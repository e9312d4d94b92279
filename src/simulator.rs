use tracing::trace;

use crate::math::OrderedSet;
use crate::prelude::*;

/// Runs an automaton one input at a time. The simulator keeps the set of states that the inputs
/// consumed so far lead to, starting with the set containing only the initial state. For
/// deterministic automata this set has at most one element.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let dfa = TSBuilder::default()
///     .with_accepting([1])
///     .with_edges([(0, 'a', 1), (1, 'b', 0)])
///     .into_dfa(0)
///     .unwrap();
/// let mut sim = Simulator::new(&dfa);
/// assert!(!sim.is_started());
/// sim.step('a').unwrap();
/// assert!(sim.is_accepting());
/// assert!(sim.accepts("ba".chars()).unwrap());
/// sim.step('a').unwrap();
/// assert!(sim.is_failed());
/// sim.reset();
/// assert_eq!(sim.current_states().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Simulator<'a, Aut: FiniteAutomaton> {
    automaton: &'a Aut,
    current: OrderedSet<StateIndex>,
    consumed: usize,
}

impl<'a, Aut: FiniteAutomaton> Simulator<'a, Aut> {
    /// Creates a simulator that sits in the initial state of `automaton`.
    pub fn new(automaton: &'a Aut) -> Self {
        Self {
            automaton,
            current: OrderedSet::from([automaton.initial()]),
            consumed: 0,
        }
    }

    /// Goes back to the initial state.
    pub fn reset(&mut self) {
        self.current = OrderedSet::from([self.automaton.initial()]);
        self.consumed = 0;
    }

    /// Consumes one input. On error the simulator is left unchanged.
    pub fn step(&mut self, input: Aut::Input) -> Result<(), AutomatonError> {
        self.current = self
            .automaton
            .reached_states_from(self.current.clone(), [input])?;
        self.consumed += 1;
        trace!(
            "simulator is in {} after {} inputs",
            self.current.show(),
            self.consumed
        );
        Ok(())
    }

    /// Returns the set of states that the simulator is currently in.
    pub fn current_states(&self) -> &OrderedSet<StateIndex> {
        &self.current
    }

    /// Returns true once at least one input has been consumed since the last reset.
    pub fn is_started(&self) -> bool {
        self.consumed > 0
    }

    /// Returns true if one of the current states is accepting, i.e. if the inputs consumed so
    /// far form an accepted word.
    pub fn is_accepting(&self) -> bool {
        self.current.iter().any(|q| self.automaton.is_accepting(*q))
    }

    /// Returns true if the run has died because some transition was undefined. A failed
    /// simulator stays failed until it is reset.
    pub fn is_failed(&self) -> bool {
        self.current.is_empty()
    }

    /// Decides whether the inputs consumed so far followed by `word` form an accepted word.
    /// The simulator itself does not move.
    pub fn accepts<W>(&self, word: W) -> Result<bool, AutomatonError>
    where
        W: IntoIterator<Item = Aut::Input>,
    {
        Ok(self
            .automaton
            .reached_states_from(self.current.clone(), word)?
            .into_iter()
            .any(|q| self.automaton.is_accepting(q)))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn simulate_nfa_and_symbolic() {
        let nfa = TSBuilder::default()
            .with_accepting([2])
            .with_edges([(0, 'a', 0), (0, 'a', 1), (1, 'b', 2)])
            .into_nfa(0)
            .unwrap();
        let mut sim = Simulator::new(&nfa);
        sim.step('a').unwrap();
        assert_eq!(sim.current_states().len(), 2);
        assert!(sim.is_started());
        assert!(!sim.is_accepting());
        assert!(sim.accepts(['b']).unwrap());
        assert!(sim.step('c').is_err());
        assert_eq!(sim.current_states().len(), 2);
        sim.step('b').unwrap();
        assert!(sim.is_accepting());
        sim.step('b').unwrap();
        assert!(sim.is_failed());
        assert!(!sim.accepts(['a', 'b']).unwrap());

        let aut = SymbolicAutomaton::from_formulas(
            [0, 1],
            PropAlphabet::new(["p"]),
            0,
            [1],
            [(0, "p", 1)],
        )
        .unwrap();
        let mut sim = Simulator::new(&aut);
        assert!(!sim.is_accepting());
        sim.step(Interpretation::new().with("p", true)).unwrap();
        assert!(sim.is_accepting());
        sim.reset();
        assert!(!sim.is_started());
        assert_eq!(sim.current_states(), &math::OrderedSet::from([0]));
    }
}
