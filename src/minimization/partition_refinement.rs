use std::{collections::BTreeSet, hash::Hash};

use tracing::trace;

use crate::math::{Map, Partition};
use crate::prelude::*;

/// Splits the classes of `partition` until every class is stable under `signature`, which maps
/// a state and the current class of every state to some key. Two states stay in the same class
/// iff they are in the same class and have the same key. Classes of the result are numbered in
/// the order of their smallest element.
pub(crate) fn moore_refinement<K, F>(
    partition: Partition<StateIndex>,
    signature: F,
) -> Partition<StateIndex>
where
    K: Hash + Eq,
    F: Fn(StateIndex, &Map<StateIndex, usize>) -> K,
{
    let states: Vec<StateIndex> = partition.iter().flatten().copied().collect();
    let mut partition = partition;
    let mut round = 0;
    loop {
        let classes = partition.class_map();
        let refined = Partition::from_class_assignment(states.iter().copied(), |q| {
            (classes[&q], signature(q, &classes))
        });
        round += 1;
        trace!("refinement round {round} produced {} classes", refined.size());
        if refined.size() == partition.size() {
            return refined;
        }
        partition = refined;
    }
}

/// Splits the classes of `partition` until any two states of a class are `compatible`, given
/// the current class of every state. The relation must be an equivalence relation on each class
/// for every partition that occurs, a state is put into the first class whose smallest element it
/// is compatible with. Classes of the result are numbered in the order of their smallest element.
pub(crate) fn compatibility_refinement<F>(
    partition: Partition<StateIndex>,
    compatible: F,
) -> Partition<StateIndex>
where
    F: Fn(StateIndex, StateIndex, &Map<StateIndex, usize>) -> bool,
{
    let mut partition = partition;
    let mut round = 0;
    loop {
        let classes = partition.class_map();
        let mut refined: Vec<(StateIndex, BTreeSet<StateIndex>)> = vec![];
        for class in &partition {
            let start = refined.len();
            for &q in class {
                match refined[start..]
                    .iter_mut()
                    .find(|(representative, _)| compatible(*representative, q, &classes))
                {
                    Some((_, block)) => {
                        block.insert(q);
                    }
                    None => refined.push((q, BTreeSet::from([q]))),
                }
            }
        }
        refined.sort_by_key(|(representative, _)| *representative);

        round += 1;
        trace!("refinement round {round} produced {} classes", refined.len());
        let refined = Partition::from(
            refined
                .into_iter()
                .map(|(_, block)| block)
                .collect::<Vec<_>>(),
        );
        if refined.size() == partition.size() {
            return refined;
        }
        partition = refined;
    }
}
