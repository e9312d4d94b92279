use std::{fmt::Debug, hash::Hash};

use itertools::Itertools;

use crate::prelude::*;

use crate::math::{OrderedMap, OrderedSet};

/// Contains the [`TSBuilder`], which allows for a concise construction of explicit automata.
pub mod builder;

/// Deals with analysing reachability in transition systems, both forwards from the initial
/// state and backwards from the accepting states.
pub mod reachable;

/// This module defines the reverse index which is used for walking edges backwards.
pub mod predecessors;

mod trim;
pub use trim::Trim;

/// States are opaque identifiers. They are chosen by whoever constructs an automaton and need not
/// be contiguous, only the transformations (trimming, minimization, determinization) produce
/// automata whose states are numbered densely from `0`.
pub type StateIndex = usize;

/// Represents an edge that is not associated to a transition system. It stores a label as well
/// as a source and target state index. For explicit automata the label is a symbol, for symbolic
/// ones it is a guard.
#[derive(Clone, Eq, PartialEq, Debug, Hash, PartialOrd, Ord)]
pub struct Edge<L> {
    source: StateIndex,
    label: L,
    target: StateIndex,
}

impl<L> Edge<L> {
    /// Creates a new edge with the given source, label and target.
    pub fn new(source: StateIndex, label: L, target: StateIndex) -> Self {
        Self {
            source,
            label,
            target,
        }
    }

    /// Returns the index of the source state of the edge.
    pub fn source(&self) -> StateIndex {
        self.source
    }

    /// Returns the index of the target state of the edge.
    pub fn target(&self) -> StateIndex {
        self.target
    }

    /// Gives a reference to the label of the edge.
    pub fn label(&self) -> &L {
        &self.label
    }

    /// Destructures the edge into its components.
    pub fn into_tuple(self) -> (StateIndex, L, StateIndex) {
        (self.source, self.label, self.target)
    }
}

impl<L> From<(StateIndex, L, StateIndex)> for Edge<L> {
    fn from((source, label, target): (StateIndex, L, StateIndex)) -> Self {
        Self::new(source, label, target)
    }
}

impl<L: Show> Show for Edge<L> {
    fn show(&self) -> String {
        format!(
            "({}, {}, {})",
            self.source.show(),
            self.label.show(),
            self.target.show()
        )
    }
}

/// Represents a reference to an edge in a transition system. This stores a lifetime
/// to the transition system and a reference to the label.
#[derive(Debug, Eq, PartialEq)]
pub struct EdgeReference<'ts, L> {
    source: StateIndex,
    label: &'ts L,
    target: StateIndex,
}

impl<'ts, L> Clone for EdgeReference<'ts, L> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<'ts, L> Copy for EdgeReference<'ts, L> {}

impl<'ts, L> EdgeReference<'ts, L> {
    /// Creates a new edge reference from the given components.
    pub fn new(source: StateIndex, label: &'ts L, target: StateIndex) -> Self {
        Self {
            source,
            label,
            target,
        }
    }

    /// Returns the index of the source state.
    pub fn source(&self) -> StateIndex {
        self.source
    }

    /// Returns the index of the target state.
    pub fn target(&self) -> StateIndex {
        self.target
    }

    /// Gives the reference to the label.
    pub fn label(&self) -> &'ts L {
        self.label
    }

    /// Clones the label and produces an owned [`Edge`].
    pub fn to_edge(&self) -> Edge<L>
    where
        L: Clone,
    {
        Edge::new(self.source, self.label.clone(), self.target)
    }
}

impl<'ts, L: PartialEq> PartialEq<(StateIndex, L, StateIndex)> for EdgeReference<'ts, L> {
    fn eq(&self, other: &(StateIndex, L, StateIndex)) -> bool {
        self.source == other.0 && self.label == &other.1 && self.target == other.2
    }
}

/// Iterator over the edges leaving one state of a [`StateSpace`].
#[derive(Debug, Clone)]
pub struct EdgesFrom<'ts, L> {
    source: StateIndex,
    it: std::slice::Iter<'ts, (L, StateIndex)>,
}

impl<'ts, L> Iterator for EdgesFrom<'ts, L> {
    type Item = EdgeReference<'ts, L>;

    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(label, target)| EdgeReference::new(self.source, label, *target))
    }
}

/// The most central trait of this crate. A transition system consists of a finite set of states,
/// some of which are accepting, and a set of labeled edges between them. The label type is a
/// symbol for explicit automata and a guard for symbolic ones.
pub trait TransitionSystem {
    /// The type of the labels on the edges.
    type Label: Clone + Debug + Eq + Hash;

    /// Type of the iterator over all state indices.
    type StateIndices<'this>: Iterator<Item = StateIndex>
    where
        Self: 'this;

    /// Type of the iterator over the edges leaving a state.
    type EdgesFromIter<'this>: Iterator<Item = EdgeReference<'this, Self::Label>>
    where
        Self: 'this;

    /// Returns an iterator over the indices of all states, in ascending order.
    fn state_indices(&self) -> Self::StateIndices<'_>;

    /// Returns an iterator over the edges leaving `state`, or `None` if the state does not exist.
    fn edges_from(&self, state: StateIndex) -> Option<Self::EdgesFromIter<'_>>;

    /// Returns true if `state` is an accepting state.
    fn is_accepting(&self, state: StateIndex) -> bool;

    /// Returns true if `state` is one of the states.
    fn contains_state(&self, state: StateIndex) -> bool {
        self.state_indices().any(|q| q == state)
    }

    /// The number of states.
    fn size(&self) -> usize {
        self.state_indices().count()
    }

    /// Collects the indices of all accepting states.
    fn accepting_states(&self) -> OrderedSet<StateIndex> {
        self.state_indices()
            .filter(|q| self.is_accepting(*q))
            .collect()
    }

    /// Collects all edges into a vector, ordered by their source state. This is what a
    /// collaborator that wants to render the automaton enumerates.
    fn transitions(&self) -> Vec<Edge<Self::Label>> {
        self.state_indices()
            .flat_map(|q| {
                self.edges_from(q)
                    .into_iter()
                    .flatten()
                    .map(|e| e.to_edge())
                    .collect_vec()
            })
            .collect()
    }

    /// The number of edges.
    fn edge_count(&self) -> usize {
        self.state_indices()
            .map(|q| self.edges_from(q).map(|it| it.count()).unwrap_or(0))
            .sum()
    }

    /// Returns the set of states that can be reached from `state` by following exactly one edge.
    fn targets_from(&self, state: StateIndex) -> OrderedSet<StateIndex> {
        self.edges_from(state)
            .into_iter()
            .flatten()
            .map(|e| e.target())
            .collect()
    }

    /// Builds the reverse index of the edges, see [`predecessors::PredecessorIndex`].
    fn predecessor_index(&self) -> predecessors::PredecessorIndex<'_, Self::Label>
    where
        Self: Sized,
    {
        predecessors::PredecessorIndex::new(self)
    }

    /// Returns an iterator over the indices of the states reachable from `origin` in
    /// breadth-first order.
    fn reachable_state_indices_from(
        &self,
        origin: StateIndex,
    ) -> reachable::ReachableStateIndices<'_, Self>
    where
        Self: Sized,
    {
        reachable::ReachableStateIndices::new(self, origin)
    }

    /// Returns the set of states from which some accepting state can be reached.
    fn coreachable_state_indices(&self) -> OrderedSet<StateIndex>
    where
        Self: Sized,
    {
        reachable::coreachable_state_indices(self)
    }

    /// Computes for every state the length of a shortest path to an accepting state, see
    /// [`reachable::levels_to_accepting_states`].
    fn levels_to_accepting_states(&self) -> OrderedMap<StateIndex, Option<usize>>
    where
        Self: Sized,
    {
        reachable::levels_to_accepting_states(self)
    }
}

/// Implementors of this trait have a distinguished (initial) state.
pub trait Pointed: TransitionSystem {
    /// Returns the index of the initial state.
    fn initial(&self) -> StateIndex;

    /// Returns true if the initial state is accepting.
    fn initial_accepting(&self) -> bool {
        self.is_accepting(self.initial())
    }

    /// Returns the set of states that are reachable from the initial state.
    fn reachable_state_indices(&self) -> OrderedSet<StateIndex>
    where
        Self: Sized,
    {
        self.reachable_state_indices_from(self.initial()).collect()
    }

    /// Returns true if every state is reachable from the initial state.
    fn is_accessible(&self) -> bool
    where
        Self: Sized,
    {
        self.reachable_state_indices_from(self.initial()).count() == self.size()
    }
}

/// The states, the initial state, the accepting states and the edges of an automaton, which is
/// everything except for the alphabet. Every variant of automaton wraps one of these. The
/// edges leaving a state are kept in insertion order, the states in ascending order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateSpace<L> {
    states: OrderedSet<StateIndex>,
    initial: StateIndex,
    accepting: OrderedSet<StateIndex>,
    edges: OrderedMap<StateIndex, Vec<(L, StateIndex)>>,
}

impl<L> StateSpace<L> {
    /// Creates a state space without edges after checking that the states are non-empty and
    /// that the initial and accepting states are among them.
    pub fn new<I, J>(states: I, initial: StateIndex, accepting: J) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = StateIndex>,
        J: IntoIterator<Item = StateIndex>,
    {
        let states: OrderedSet<_> = states.into_iter().collect();
        if states.is_empty() {
            return Err(AutomatonError::NoStates);
        }
        if !states.contains(&initial) {
            return Err(AutomatonError::UnknownInitialState(initial));
        }
        let accepting: OrderedSet<_> = accepting.into_iter().collect();
        if let Some(q) = accepting.iter().find(|q| !states.contains(q)) {
            return Err(AutomatonError::UnknownAcceptingState(*q));
        }
        Ok(Self {
            states,
            initial,
            accepting,
            edges: OrderedMap::new(),
        })
    }

    /// Creates a state space with the states `0..size`, this never fails as long as `initial`
    /// and the accepting states are below `size`. Only used by algorithms that produce automata.
    pub(crate) fn dense(
        size: usize,
        initial: StateIndex,
        accepting: impl IntoIterator<Item = StateIndex>,
    ) -> Self {
        debug_assert!(initial < size);
        let accepting: OrderedSet<_> = accepting.into_iter().collect();
        debug_assert!(accepting.iter().all(|q| *q < size));
        Self {
            states: (0..size).collect(),
            initial,
            accepting,
            edges: OrderedMap::new(),
        }
    }

    /// The state space with one state, which is initial, not accepting and has no edges. This is
    /// what trimming an automaton with empty language produces.
    pub fn rejecting() -> Self {
        Self::dense(1, 0, [])
    }

    /// Returns the set of states.
    pub fn states(&self) -> &OrderedSet<StateIndex> {
        &self.states
    }

    /// Returns the initial state.
    pub fn initial(&self) -> StateIndex {
        self.initial
    }

    /// Returns the set of accepting states.
    pub fn accepting(&self) -> &OrderedSet<StateIndex> {
        &self.accepting
    }

    /// Returns the edges leaving `state` as pairs of label and target.
    pub fn edges_of(&self, state: StateIndex) -> &[(L, StateIndex)] {
        self.edges.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the smallest index that is not a state. The states are sorted, so this is the
    /// first position whose state differs from the position itself.
    pub fn fresh_state(&self) -> StateIndex {
        self.states
            .iter()
            .enumerate()
            .find(|(i, q)| i != *q)
            .map_or(self.states.len(), |(i, _)| i)
    }

    /// Verifies that both endpoints of an edge exist. The label is only rendered when the
    /// check fails.
    pub(crate) fn check_endpoints(
        &self,
        origin: StateIndex,
        target: StateIndex,
        label: impl FnOnce() -> String,
    ) -> Result<(), AutomatonError> {
        match [origin, target].into_iter().find(|q| !self.states.contains(q)) {
            Some(state) => Err(AutomatonError::UnknownTransitionState {
                origin,
                label: label(),
                target,
                state,
            }),
            None => Ok(()),
        }
    }

    /// Adds a state, returns false if it was already present.
    pub(crate) fn add_state(&mut self, state: StateIndex, accepting: bool) -> bool {
        if accepting {
            self.accepting.insert(state);
        }
        self.states.insert(state)
    }

    /// Appends an edge without any checks.
    pub(crate) fn push_edge(&mut self, origin: StateIndex, label: L, target: StateIndex) {
        self.edges.entry(origin).or_default().push((label, target));
    }

    /// Gives mutable access to the edges leaving `origin`. Callers must leave at least one edge
    /// in the list, empty lists are never stored.
    pub(crate) fn edges_mut(&mut self, origin: StateIndex) -> &mut Vec<(L, StateIndex)> {
        self.edges.entry(origin).or_default()
    }

    /// Sorts the edges leaving each state by the given key and removes duplicate edges.
    pub(crate) fn sort_edges_by_key<K: Ord, F: Fn(&L, StateIndex) -> K>(&mut self, key: F)
    where
        L: PartialEq,
    {
        for edges in self.edges.values_mut() {
            edges.sort_by_key(|(label, target)| key(label, *target));
            edges.dedup();
        }
    }

    /// Restricts the state space to the states in `keep` and renumbers them densely, preserving
    /// their relative order. Edges between two kept states survive. If the initial state is not
    /// kept, the result is [`StateSpace::rejecting`].
    pub fn restrict(&self, keep: &OrderedSet<StateIndex>) -> Self
    where
        L: Clone,
    {
        if !keep.contains(&self.initial) {
            return Self::rejecting();
        }
        let kept: Vec<StateIndex> = self
            .states
            .iter()
            .filter(|q| keep.contains(q))
            .copied()
            .collect();
        let renaming: math::Map<StateIndex, StateIndex> =
            kept.iter().enumerate().map(|(i, q)| (*q, i)).collect();

        let mut out = Self::dense(
            kept.len(),
            renaming[&self.initial],
            self.accepting.iter().filter_map(|q| renaming.get(q).copied()),
        );
        for q in &kept {
            for (label, p) in self.edges_of(*q) {
                if let Some(target) = renaming.get(p) {
                    out.push_edge(renaming[q], label.clone(), *target);
                }
            }
        }
        out
    }

    /// Applies `f` to every label.
    pub fn map_labels<M, F: Fn(&L) -> M>(&self, f: F) -> StateSpace<M> {
        StateSpace {
            states: self.states.clone(),
            initial: self.initial,
            accepting: self.accepting.clone(),
            edges: self
                .edges
                .iter()
                .map(|(q, edges)| (*q, edges.iter().map(|(l, p)| (f(l), *p)).collect()))
                .collect(),
        }
    }
}

impl<L: Clone + Debug + Eq + Hash> TransitionSystem for StateSpace<L> {
    type Label = L;
    type StateIndices<'this> = std::iter::Copied<std::collections::btree_set::Iter<'this, StateIndex>> where Self: 'this;
    type EdgesFromIter<'this> = EdgesFrom<'this, L> where Self: 'this;

    fn state_indices(&self) -> Self::StateIndices<'_> {
        self.states.iter().copied()
    }

    fn edges_from(&self, state: StateIndex) -> Option<Self::EdgesFromIter<'_>> {
        if !self.states.contains(&state) {
            return None;
        }
        Some(EdgesFrom {
            source: state,
            it: self.edges_of(state).iter(),
        })
    }

    fn is_accepting(&self, state: StateIndex) -> bool {
        self.accepting.contains(&state)
    }

    fn contains_state(&self, state: StateIndex) -> bool {
        self.states.contains(&state)
    }

    fn size(&self) -> usize {
        self.states.len()
    }
}

impl<L: Clone + Debug + Eq + Hash> Pointed for StateSpace<L> {
    fn initial(&self) -> StateIndex {
        self.initial
    }
}

/// Implements [`TransitionSystem`] and [`Pointed`] for a type that has a field `space`
/// holding a [`StateSpace`] whose labels are of the given type.
macro_rules! delegate_state_space {
    ($ty:ident < $param:ident : $bound:path >, $label:ty) => {
        impl<$param: $bound> $crate::transition_system::TransitionSystem for $ty<$param> {
            type Label = $label;
            type StateIndices<'this> = <$crate::transition_system::StateSpace<$label> as $crate::transition_system::TransitionSystem>::StateIndices<'this> where Self: 'this;
            type EdgesFromIter<'this> = $crate::transition_system::EdgesFrom<'this, $label> where Self: 'this;

            fn state_indices(&self) -> Self::StateIndices<'_> {
                self.space.state_indices()
            }
            fn edges_from(
                &self,
                state: $crate::transition_system::StateIndex,
            ) -> Option<Self::EdgesFromIter<'_>> {
                self.space.edges_from(state)
            }
            fn is_accepting(&self, state: $crate::transition_system::StateIndex) -> bool {
                self.space.is_accepting(state)
            }
            fn contains_state(&self, state: $crate::transition_system::StateIndex) -> bool {
                self.space.contains_state(state)
            }
            fn size(&self) -> usize {
                self.space.size()
            }
        }

        impl<$param: $bound> $crate::transition_system::Pointed for $ty<$param> {
            fn initial(&self) -> $crate::transition_system::StateIndex {
                self.space.initial()
            }
        }
    };
}
pub(crate) use delegate_state_space;

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn state_space_validation() {
        assert_eq!(
            StateSpace::<char>::new([], 0, []),
            Err(AutomatonError::NoStates)
        );
        assert_eq!(
            StateSpace::<char>::new([0, 1], 2, []),
            Err(AutomatonError::UnknownInitialState(2))
        );
        assert_eq!(
            StateSpace::<char>::new([0, 1], 0, [1, 7]),
            Err(AutomatonError::UnknownAcceptingState(7))
        );
        let space = StateSpace::<char>::new([4, 9], 9, [4]).unwrap();
        assert_eq!(space.fresh_state(), 0);
        assert_eq!(StateSpace::<char>::new([0, 1, 3], 0, []).unwrap().fresh_state(), 2);
        assert_eq!(StateSpace::<char>::new([0, 1], 0, []).unwrap().fresh_state(), 2);
        assert_eq!(
            StateSpace::<char>::new([0, usize::MAX], 0, []).unwrap().fresh_state(),
            1
        );
        assert!(space
            .check_endpoints(4, 5, || "a".to_string())
            .is_err_and(|e| matches!(e, AutomatonError::UnknownTransitionState { state: 5, .. })));
    }

    #[test]
    fn restriction_renumbers() {
        let mut space = StateSpace::new([3, 5, 8], 5, [8]).unwrap();
        space.push_edge(5, 'a', 8);
        space.push_edge(8, 'b', 3);
        space.push_edge(3, 'a', 5);

        let restricted = space.restrict(&[5, 8].into_iter().collect());
        assert_eq!(restricted.size(), 2);
        assert_eq!(restricted.initial(), 0);
        assert!(restricted.is_accepting(1));
        assert_eq!(restricted.transitions(), vec![Edge::new(0, 'a', 1)]);

        let dropped = space.restrict(&[3, 8].into_iter().collect());
        assert_eq!(dropped, StateSpace::rejecting());
    }
}
