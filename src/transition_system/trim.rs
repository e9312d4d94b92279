use tracing::debug;

use crate::prelude::*;

use crate::math::OrderedSet;

/// Trimming removes the states that cannot contribute to the language of an automaton, which are
/// those that are not reachable from the initial state or from which no accepting state can be
/// reached. Implementors only have to say how they are restricted to a set of states, the
/// reachability analysis works on the [`TransitionSystem`] interface.
///
/// All operations return a new automaton whose states are numbered densely from `0`, in the
/// relative order of the original state indices. If the initial state would be removed, the
/// result is the automaton with a single, non-accepting state and no transitions.
pub trait Trim: Pointed + Sized {
    /// Restricts `self` to the states in `keep`, dropping every edge that has an endpoint outside
    /// of `keep`. If the initial state is not in `keep`, this yields the single-state automaton
    /// that rejects everything.
    fn restrict_states(&self, keep: &OrderedSet<StateIndex>) -> Self;

    /// Keeps only the states that are reachable from the initial state.
    fn reachable(&self) -> Self {
        self.restrict_states(&self.reachable_state_indices())
    }

    /// Keeps only the states from which an accepting state can be reached.
    fn coreachable(&self) -> Self {
        self.restrict_states(&self.coreachable_state_indices())
    }

    /// Keeps only the states that are both reachable and co-reachable. Trimming never changes
    /// the language and trimming twice gives the same automaton as trimming once.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let dfa = TSBuilder::default()
    ///     .with_accepting([1])
    ///     .with_edges([(0, 'a', 1), (0, 'b', 2), (2, 'a', 2), (3, 'a', 1)])
    ///     .into_dfa(0)
    ///     .unwrap();
    /// let trimmed = dfa.trim();
    /// assert_eq!(trimmed.size(), 2);
    /// assert!(trimmed.accepts("a".chars()).unwrap());
    /// ```
    fn trim(&self) -> Self {
        let coreachable = self.coreachable_state_indices();
        let keep: OrderedSet<StateIndex> = self
            .reachable_state_indices()
            .intersection(&coreachable)
            .copied()
            .collect();
        debug!(
            "trimming keeps {} of {} states",
            keep.len().max(1),
            self.size()
        );
        self.restrict_states(&keep)
    }

    /// Returns true if every state is reachable and co-reachable, or if `self` is the
    /// single-state automaton that rejects everything.
    fn is_trim(&self) -> bool {
        let reachable = self.reachable_state_indices();
        let coreachable = self.coreachable_state_indices();
        if coreachable.is_empty() {
            return self.size() == 1 && self.edge_count() == 0;
        }
        self.size() == reachable.len() && reachable.iter().all(|q| coreachable.contains(q))
    }
}

impl<L: Clone + std::fmt::Debug + Eq + std::hash::Hash> Trim for StateSpace<L> {
    fn restrict_states(&self, keep: &OrderedSet<StateIndex>) -> Self {
        self.restrict(keep)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn trim_and_partial_restrictions() {
        let nfa = TSBuilder::default()
            .with_accepting([2])
            .with_edges([
                (0, 'a', 1),
                (1, 'b', 2),
                (0, 'b', 3),
                (3, 'a', 3),
                (4, 'a', 2),
            ])
            .into_nfa(0)
            .unwrap();

        let trimmed = nfa.trim();
        assert_eq!(trimmed.size(), 3);
        assert!(trimmed.is_trim());
        assert!(!nfa.is_trim());
        assert_eq!(trimmed.trim(), trimmed);

        assert_eq!(nfa.reachable().size(), 4);
        assert_eq!(nfa.coreachable().size(), 4);
        assert!(trimmed.accepts("ab".chars()).unwrap());
        assert!(!trimmed.accepts("ba".chars()).unwrap());
    }

    #[test]
    fn trim_empty_language() {
        let dfa = TSBuilder::default()
            .with_accepting([3])
            .with_edges([(0, 'a', 1), (1, 'a', 0), (2, 'a', 3)])
            .into_dfa(0)
            .unwrap();
        let trimmed = dfa.trim();
        assert_eq!(trimmed.size(), 1);
        assert_eq!(trimmed.edge_count(), 0);
        assert!(trimmed.accepting_states().is_empty());
        assert!(trimmed.is_trim());
        assert!(!trimmed.accepts("".chars()).unwrap());
    }
}
