use crate::prelude::*;

use super::EdgeReference;

/// Reverse view of the edges of a [`TransitionSystem`]. The automata only store the edges that
/// leave a state, so walking backwards requires building this index first, which takes time
/// linear in the number of states and edges.
#[derive(Debug, Clone)]
pub struct PredecessorIndex<'ts, L> {
    preds: math::Map<StateIndex, Vec<EdgeReference<'ts, L>>>,
}

impl<'ts, L> PredecessorIndex<'ts, L> {
    /// Builds the index for the given transition system.
    pub fn new<Ts>(ts: &'ts Ts) -> Self
    where
        Ts: TransitionSystem<Label = L>,
    {
        let mut preds: math::Map<StateIndex, Vec<EdgeReference<'ts, L>>> = math::Map::default();
        for q in ts.state_indices() {
            for edge in ts.edges_from(q).into_iter().flatten() {
                preds.entry(edge.target()).or_default().push(edge);
            }
        }
        Self { preds }
    }

    /// Returns an iterator over the edges that lead into `state`.
    pub fn predecessors(
        &self,
        state: StateIndex,
    ) -> impl Iterator<Item = EdgeReference<'ts, L>> + '_ {
        self.preds.get(&state).into_iter().flatten().copied()
    }

    /// Returns an iterator over the sources of edges that lead into `state`. A source appears
    /// once per edge, so it may appear multiple times.
    pub fn sources_of(&self, state: StateIndex) -> impl Iterator<Item = StateIndex> + '_ {
        self.preds
            .get(&state)
            .into_iter()
            .flatten()
            .map(|e| e.source())
    }
}
