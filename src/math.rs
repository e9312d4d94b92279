use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hash;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Type alias for sets whose iteration order is the order of the elements.
pub type OrderedSet<S> = BTreeSet<S>;
/// Type alias for maps whose iteration order is the order of the keys.
pub type OrderedMap<K, V> = BTreeMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// A partition is a different view on a congruence relation, by grouping elements of
/// type `I` into their respective classes under the relation.
///
/// Classes are kept in the order in which they were given, no class is empty and
/// the classes are pairwise disjoint.
#[derive(Debug, Clone)]
pub struct Partition<I: Hash + Eq>(Vec<BTreeSet<I>>);

impl<I: Hash + Eq> std::ops::Deref for Partition<I> {
    type Target = Vec<BTreeSet<I>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, I: Hash + Eq> IntoIterator for &'a Partition<I> {
    type Item = &'a BTreeSet<I>;
    type IntoIter = std::slice::Iter<'a, BTreeSet<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Hash + Eq> PartialEq for Partition<I> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|o| other.contains(o))
    }
}
impl<I: Hash + Eq> Eq for Partition<I> {}

impl<I: Hash + Eq + Ord + Copy> Partition<I> {
    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a new partition from an iterator that yields iterators which yield elements of
    /// type `I`. Empty classes are dropped.
    #[cfg(test)]
    pub(crate) fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|it| it.into_iter().collect::<BTreeSet<_>>())
                .filter(|class| !class.is_empty())
                .collect(),
        )
    }

    /// Groups the given elements by the class that `class_of` assigns to them. Classes are
    /// numbered in the order of their smallest element.
    pub fn from_class_assignment<F, K>(elements: impl IntoIterator<Item = I>, class_of: F) -> Self
    where
        F: Fn(I) -> K,
        K: Hash + Eq,
    {
        let mut ids: Map<K, usize> = Map::default();
        let mut classes: Vec<BTreeSet<I>> = vec![];
        for element in elements.into_iter().collect::<BTreeSet<_>>() {
            let next = ids.len();
            let id = *ids.entry(class_of(element)).or_insert(next);
            if id == classes.len() {
                classes.push(BTreeSet::new());
            }
            classes[id].insert(element);
        }
        Self(classes)
    }

    /// Returns the position of the class that contains `element`, if any.
    #[cfg(test)]
    pub(crate) fn class_of(&self, element: &I) -> Option<usize> {
        self.0.iter().position(|class| class.contains(element))
    }

    /// Returns a map that associates every element with the position of its class.
    pub fn class_map(&self) -> Map<I, usize> {
        self.0
            .iter()
            .enumerate()
            .flat_map(|(id, class)| class.iter().map(move |&element| (element, id)))
            .collect()
    }

    /// Returns the smallest element of the class with the given position.
    pub fn representative(&self, class: usize) -> Option<I> {
        self.0.get(class).and_then(|c| c.first().copied())
    }
}

impl<I: Hash + Eq + Ord> From<Vec<BTreeSet<I>>> for Partition<I> {
    fn from(value: Vec<BTreeSet<I>>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Partition;

    #[test]
    fn partition_from_assignment() {
        let p = Partition::from_class_assignment([5usize, 3, 1, 2, 4], |x| x % 2);
        assert_eq!(p.size(), 2);
        assert_eq!(p[0].iter().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(p[1].iter().copied().collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(p.class_of(&4), Some(1));
        assert_eq!(p.representative(1), Some(2));
        assert_eq!(p, Partition::new([vec![4, 2], vec![1, 5, 3]]));
    }
}
