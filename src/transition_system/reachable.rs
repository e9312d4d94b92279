use std::collections::VecDeque;

use crate::prelude::*;

use crate::math::{OrderedMap, OrderedSet, Set};

/// Allows iterating over the indices of all states that are reachable from some origin in a
/// [`TransitionSystem`]. States are produced in breadth-first order, the edges leaving a state
/// are explored in the order in which the transition system yields them.
#[derive(Debug, Clone)]
pub struct ReachableStateIndices<'a, Ts: TransitionSystem> {
    ts: &'a Ts,
    seen: Set<StateIndex>,
    queue: VecDeque<StateIndex>,
}

impl<'a, Ts> ReachableStateIndices<'a, Ts>
where
    Ts: TransitionSystem,
{
    /// Starts the search in `origin`. If the state does not exist, the iterator is empty.
    pub fn new(ts: &'a Ts, origin: StateIndex) -> Self {
        let (seen, queue) = if ts.contains_state(origin) {
            (Set::from_iter([origin]), VecDeque::from([origin]))
        } else {
            (Set::default(), VecDeque::new())
        };
        Self { ts, seen, queue }
    }
}

impl<'a, Ts> Iterator for ReachableStateIndices<'a, Ts>
where
    Ts: TransitionSystem,
{
    type Item = StateIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let q = self.queue.pop_front()?;
        if let Some(it) = self.ts.edges_from(q) {
            for edge in it {
                let p = edge.target();
                if self.seen.insert(p) {
                    self.queue.push_back(p);
                }
            }
        }
        Some(q)
    }
}

/// Computes for every state the length of a shortest path to an accepting state, which is `None`
/// for states from which no accepting state can be reached. Accepting states have distance `0`.
/// Works as a backwards breadth-first search that starts in all accepting states at once.
pub fn levels_to_accepting_states<Ts: TransitionSystem>(
    ts: &Ts,
) -> OrderedMap<StateIndex, Option<usize>> {
    let index = ts.predecessor_index();
    let mut levels: OrderedMap<StateIndex, Option<usize>> =
        ts.state_indices().map(|q| (q, None)).collect();
    let mut queue = VecDeque::new();
    for q in ts.accepting_states() {
        levels.insert(q, Some(0));
        queue.push_back((q, 0));
    }

    while let Some((q, level)) = queue.pop_front() {
        for p in index.sources_of(q) {
            let entry = levels.entry(p).or_insert(None);
            if entry.is_none() {
                *entry = Some(level + 1);
                queue.push_back((p, level + 1));
            }
        }
    }
    levels
}

/// Returns the set of states from which an accepting state can be reached, the accepting
/// states themselves included.
pub fn coreachable_state_indices<Ts: TransitionSystem>(ts: &Ts) -> OrderedSet<StateIndex> {
    levels_to_accepting_states(ts)
        .into_iter()
        .filter_map(|(q, level)| level.map(|_| q))
        .collect()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::prelude::*;

    #[test]
    fn reachable_states() {
        let dfa = TSBuilder::default()
            .with_state_colors([false, false, true, false])
            .with_edges([
                (0, 'a', 1),
                (0, 'b', 0),
                (1, 'a', 2),
                (1, 'b', 0),
                (2, 'a', 2),
                (2, 'b', 2),
                (3, 'a', 0),
            ])
            .into_dfa(0)
            .unwrap();

        assert_eq!(dfa.reachable_state_indices_from(0).collect_vec(), vec![0, 1, 2]);
        assert_eq!(dfa.reachable_state_indices_from(2).collect_vec(), vec![2]);
        assert_eq!(dfa.reachable_state_indices_from(9).count(), 0);
        assert_eq!(
            dfa.reachable_state_indices().into_iter().collect_vec(),
            vec![0, 1, 2]
        );
        assert!(!dfa.is_accessible());
    }

    #[test_log::test]
    fn levels_and_coreachability() {
        let nfa = TSBuilder::default()
            .with_accepting([3])
            .with_edges([(0, 'a', 1), (1, 'a', 2), (2, 'a', 3), (0, 'b', 3), (3, 'a', 4)])
            .into_nfa(0)
            .unwrap();
        let levels = nfa.levels_to_accepting_states();
        assert_eq!(
            levels.values().copied().collect_vec(),
            vec![Some(1), Some(2), Some(1), Some(0), None]
        );
        assert_eq!(
            nfa.coreachable_state_indices().into_iter().collect_vec(),
            vec![0, 1, 2, 3]
        );
    }
}
