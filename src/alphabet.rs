use std::{fmt::Debug, hash::Hash};

use itertools::Itertools;

use crate::prelude::*;

mod propositional;
pub use propositional::{Guard, GuardOracle, Interpretation, PropAlphabet};

/// A symbol of an alphabet, which is also the type of the elements of a word that is run
/// through an explicit automaton. Two symbols are the same iff they are equal.
pub trait Symbol: Clone + Eq + Ord + Hash + Debug + Show {}
impl<S: Clone + Eq + Ord + Hash + Debug + Show> Symbol for S {}

/// An alphabet abstracts a finite collection of [`Symbol`]s. It is immutable once it has been
/// constructed and only answers membership and size queries, as well as enumerating its symbols.
pub trait Alphabet: Clone + Debug {
    /// The type of symbols in this alphabet.
    type Symbol: Symbol;

    /// Type for an iterator over all symbols in the alphabet.
    type Universe<'this>: Iterator<Item = &'this Self::Symbol>
    where
        Self: 'this;

    /// Returns an iterator over all symbols in the alphabet. The order is fixed for a given
    /// alphabet, algorithms that need to visit symbols in a reproducible order rely on it.
    fn universe(&self) -> Self::Universe<'_>;

    /// Returns the position of the given symbol in [`Self::universe`], or `None` if the
    /// symbol is not part of the alphabet.
    fn position(&self, symbol: &Self::Symbol) -> Option<usize>;

    /// Returns true if the given symbol is present in the alphabet.
    fn contains(&self, symbol: &Self::Symbol) -> bool {
        self.position(symbol).is_some()
    }

    /// Returns the number of symbols in the alphabet.
    fn size(&self) -> usize;

    /// Returns true if the alphabet is empty.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl<A: Alphabet> Alphabet for &A {
    type Symbol = A::Symbol;
    type Universe<'this> = A::Universe<'this> where Self: 'this;
    fn universe(&self) -> Self::Universe<'_> {
        A::universe(self)
    }
    fn position(&self, symbol: &Self::Symbol) -> Option<usize> {
        A::position(self, symbol)
    }
    fn size(&self) -> usize {
        A::size(self)
    }
}

/// Represents an alphabet that is just a finite set of symbols. The symbols are kept sorted and
/// free of duplicates, so two alphabets built from the same symbols in a different order are
/// equal.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let alphabet = SimpleAlphabet::new(['b', 'a', 'b']);
/// assert_eq!(alphabet.size(), 2);
/// assert!(alphabet.contains(&'a'));
/// assert!(!alphabet.contains(&'c'));
/// ```
#[derive(Clone, Hash, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub struct SimpleAlphabet<S: Symbol = char>(Vec<S>);

/// A [`SimpleAlphabet`] whose symbols are `char`s, this is what [`TSBuilder`] produces by default.
pub type CharAlphabet = SimpleAlphabet<char>;

impl<S: Symbol> SimpleAlphabet<S> {
    /// Creates a new alphabet from the given symbols, duplicates are removed.
    pub fn new<I: IntoIterator<Item = S>>(symbols: I) -> Self {
        Self(symbols.into_iter().sorted().dedup().collect())
    }

    /// Returns the symbol at position `pos`, if it exists.
    pub fn nth(&self, pos: usize) -> Option<&S> {
        self.0.get(pos)
    }

    /// Returns the symbols as a slice, in the order of [`Alphabet::universe`].
    pub fn symbols(&self) -> &[S] {
        &self.0
    }
}

impl CharAlphabet {
    /// Creates a new [`CharAlphabet`] alphabet of the given size. The symbols are just the first `size` letters
    /// of the alphabet, i.e. 'a' to 'z'.
    pub fn of_size(size: usize) -> Self {
        assert!(size <= 26, "Alphabet is too large");
        Self((0..size).map(|i| (b'a' + i as u8) as char).collect())
    }
}

impl<S: Symbol> FromIterator<S> for SimpleAlphabet<S> {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<S: Symbol> Alphabet for SimpleAlphabet<S> {
    type Symbol = S;

    type Universe<'this> = std::slice::Iter<'this, S>
    where
        Self: 'this;

    fn universe(&self) -> Self::Universe<'_> {
        self.0.iter()
    }

    fn position(&self, symbol: &S) -> Option<usize> {
        self.0.binary_search(symbol).ok()
    }

    fn size(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn simple_alphabet() {
        let alphabet: SimpleAlphabet<u8> = [3, 1, 2, 3, 1].into_iter().collect();
        assert_eq!(alphabet.size(), 3);
        assert_eq!(alphabet.universe().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(alphabet.position(&3), Some(2));
        assert_eq!(alphabet.position(&4), None);
        assert!(!alphabet.is_empty());
        assert_eq!(alphabet, SimpleAlphabet::new([1, 2, 3]));

        assert_eq!(CharAlphabet::of_size(3), SimpleAlphabet::new(['c', 'b', 'a']));
        assert!(SimpleAlphabet::<char>::new([]).is_empty());
    }
}
