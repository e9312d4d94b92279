pub(crate) mod partition_refinement;

use tracing::debug;

use crate::math::{Map, OrderedMap, Partition};
use crate::prelude::*;

impl<A: Alphabet> SimpleDfa<A> {
    /// Computes the minimal deterministic automaton for the language of `self` using Moore's
    /// partition refinement. The automaton is first completed with a rejecting sink, then the
    /// partition into accepting and non-accepting states is refined until two states share a
    /// class iff they agree on acceptance and on the classes of their successors for every
    /// symbol. The classes become the states of the result, numbered in the order of the
    /// smallest state they contain, and a final [`Trim::trim`] removes the sink again.
    ///
    /// The result is unique up to the numbering of states, see [`SimpleDfa::renumbered`]. If the
    /// language is empty it is the single-state automaton that rejects everything.
    ///
    /// # Example
    /// ```
    /// use finite_automata::prelude::*;
    ///
    /// let dfa = TSBuilder::default()
    ///     .with_accepting([1, 2])
    ///     .with_edges([(0, 'a', 1), (0, 'b', 2), (1, 'a', 1), (2, 'a', 2)])
    ///     .into_dfa(0)
    ///     .unwrap();
    /// let minimal = dfa.minimize();
    /// assert_eq!(minimal.size(), 2);
    /// assert!(minimal.accepts("baa".chars()).unwrap());
    /// assert!(!minimal.accepts("ab".chars()).unwrap());
    /// ```
    pub fn minimize(&self) -> Self {
        let complete = self.complete();
        let space = complete.state_space();
        let states: Vec<StateIndex> = complete.state_indices().collect();

        // since `complete` is complete, the edges of each state are exactly one per symbol in
        // the order of the alphabet
        let delta: Map<StateIndex, Vec<StateIndex>> = states
            .iter()
            .map(|q| (*q, space.edges_of(*q).iter().map(|(_, p)| *p).collect()))
            .collect();

        let initial = Partition::from_class_assignment(states.iter().copied(), |q| {
            complete.is_accepting(q)
        });
        let partition = partition_refinement::moore_refinement(initial, |q, classes| {
            delta[&q].iter().map(|p| classes[p]).collect::<Vec<_>>()
        });

        let classes = partition.class_map();
        let mut quotient = StateSpace::dense(
            partition.size(),
            classes[&complete.initial()],
            partition
                .iter()
                .enumerate()
                .filter(|(_, class)| class.iter().any(|q| complete.is_accepting(*q)))
                .map(|(c, _)| c),
        );
        for c in 0..partition.size() {
            if let Some(representative) = partition.representative(c) {
                for (symbol, p) in space.edges_of(representative) {
                    quotient.push_edge(c, symbol.clone(), classes[p]);
                }
            }
        }
        let minimal = SimpleDfa::from_parts(complete.alphabet().clone(), quotient).trim();
        debug!(
            "minimized dfa with {} states to {} states",
            self.size(),
            minimal.size()
        );
        minimal
    }

    /// Returns true if `self` has as many states as its minimization.
    pub fn is_minimal(&self) -> bool {
        self.size() == self.minimize().size()
    }
}

impl<A: Alphabet> SimpleNfa<A> {
    /// Computes the minimal deterministic automaton for the language of `self` by determinizing
    /// and then minimizing.
    pub fn minimize(&self) -> SimpleDfa<A> {
        self.determinize().minimize()
    }
}

impl<O: GuardOracle> SymbolicDfa<O> {
    /// Computes a minimal deterministic symbolic automaton for the language of `self`. This
    /// works like [`SimpleDfa::minimize`], except that the successors of a state cannot be
    /// enumerated symbol by symbol. Instead two states `p` and `q` stay in the same class iff
    /// there are no two overlapping guards, one leaving `p` and one leaving `q`, that lead into
    /// different classes. In the quotient, the guards of the representative of a class are
    /// merged per target class.
    pub fn minimize(&self) -> Self {
        let complete = self.complete();
        let oracle = complete.oracle();
        let space = complete.state_space();

        let initial = Partition::from_class_assignment(complete.state_indices(), |q| {
            complete.is_accepting(q)
        });
        let partition =
            partition_refinement::compatibility_refinement(initial, |p, q, classes| {
                space.edges_of(p).iter().all(|(g, s)| {
                    space.edges_of(q).iter().all(|(h, t)| {
                        classes[s] == classes[t] || !oracle.overlapping(g, h)
                    })
                })
            });

        let classes = partition.class_map();
        let mut quotient = StateSpace::dense(
            partition.size(),
            classes[&complete.initial()],
            partition
                .iter()
                .enumerate()
                .filter(|(_, class)| class.iter().any(|q| complete.is_accepting(*q)))
                .map(|(c, _)| c),
        );
        for c in 0..partition.size() {
            let Some(representative) = partition.representative(c) else {
                continue;
            };
            let mut merged: OrderedMap<usize, O::Formula> = OrderedMap::new();
            for (guard, p) in space.edges_of(representative) {
                let target = classes[p];
                let guard = match merged.get(&target) {
                    Some(existing) => oracle.or(existing, guard),
                    None => guard.clone(),
                };
                merged.insert(target, guard);
            }
            for (target, guard) in merged {
                quotient.push_edge(c, guard, target);
            }
        }
        let minimal = SymbolicDfa::from_parts(oracle.clone(), quotient).trim();
        debug!(
            "minimized symbolic dfa with {} states to {} states",
            self.size(),
            minimal.size()
        );
        minimal
    }
}

impl<O: GuardOracle> SymbolicAutomaton<O> {
    /// Computes a minimal deterministic symbolic automaton for the language of `self` by
    /// determinizing and then minimizing.
    pub fn minimize(&self) -> SymbolicDfa<O> {
        self.determinize().minimize()
    }
}
