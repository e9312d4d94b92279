//! Library for working with finite automata over finite words in Rust.
//!
//! An automaton consists of a finite set of states, one designated initial state, a set of
//! accepting states and a transition relation. The crate distinguishes between automata whose
//! transitions are labeled by concrete symbols of an [`Alphabet`] and _symbolic_ automata whose
//! edges carry guards, i.e. propositional formulas over a fixed set of atomic propositions. For
//! the latter, a symbol is an [`alphabet::Interpretation`] (an assignment of truth values to the
//! propositions) and an edge can be taken whenever the interpretation satisfies its guard.
//!
//! There are four concrete kinds of automata:
//! - [`automaton::SimpleDfa`], which has at most one successor per state and symbol,
//! - [`automaton::SimpleNfa`], which may have arbitrarily many successors,
//! - [`automaton::SymbolicDfa`], a symbolic automaton whose guards leaving one state are pairwise
//!   mutually exclusive, and
//! - [`automaton::SymbolicAutomaton`], a symbolic automaton without that restriction.
//!
//! All of them implement [`TransitionSystem`] (enumerating states and edges) and
//! [`FiniteAutomaton`] (acceptance). Automata are immutable once constructed, every invariant is
//! checked when they are built and every transformation (see [`Trim`], the minimization and the
//! determinization) produces a new automaton with fresh state indices.
//!
//! The satisfiability questions that symbolic automata need to answer are delegated to a
//! [`alphabet::GuardOracle`]. The default oracle is [`alphabet::PropAlphabet`], which represents
//! guards as binary decision diagrams.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use finite_automata::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "random")]
    pub use super::random;
    pub use super::{
        alphabet::{
            Alphabet, CharAlphabet, Guard, GuardOracle, Interpretation, PropAlphabet,
            SimpleAlphabet, Symbol,
        },
        automaton::{
            FiniteAutomaton, SimpleDfa, SimpleNfa, SymbolicAutomaton, SymbolicDfa, Transition,
        },
        error::AutomatonError,
        math,
        show::Show,
        simulator::Simulator,
        transition_system::{
            builder::TSBuilder, reachable, Edge, Pointed, StateIndex, StateSpace, TransitionSystem,
            Trim,
        },
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

mod show;
pub use show::Show;

/// Defines the error type that is returned when constructing or querying an automaton fails.
pub mod error;
pub use error::AutomatonError;

/// Module that contains definitions for dealing with alphabets, both simple ones which are
/// just a collection of symbols and propositional ones, where symbols are interpretations of
/// a set of atomic propositions and edges are labeled with guards.
pub mod alphabet;
pub use alphabet::Alphabet;

/// This module defines the state space that underlies every automaton together with the
/// traits for iterating over states and edges.
pub mod transition_system;
pub use transition_system::{Pointed, TransitionSystem, Trim};

/// Defines the four kinds of automata and the acceptance engine that they share.
pub mod automaton;
pub use automaton::FiniteAutomaton;

/// Implements the subset construction, which turns a non-deterministic automaton into an
/// equivalent deterministic one.
pub mod determinization;

/// Contains the partition refinement algorithm that computes minimal deterministic automata.
/// This is feature gated behind the `minimize` feature.
#[cfg(feature = "minimize")]
pub mod minimization;

/// Allows running an automaton symbol by symbol.
pub mod simulator;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// A guard oracle for up to six propositions that represents a formula by its truth table.
    /// Bit `i` of a formula is set iff the assignment in which proposition `j` is true exactly
    /// when bit `j` of `i` is set satisfies the formula. It only parses literals.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct TruthTable {
        names: Vec<String>,
    }

    impl TruthTable {
        pub fn new<I: IntoIterator<Item = &'static str>>(names: I) -> Self {
            let names: Vec<String> = names.into_iter().map(String::from).collect();
            assert!(names.len() <= 6);
            Self { names }
        }
    }

    impl GuardOracle for TruthTable {
        type Formula = u64;

        fn propositions(&self) -> &[String] {
            &self.names
        }

        fn top(&self) -> u64 {
            match 1u32 << self.names.len() {
                64 => u64::MAX,
                rows => (1u64 << rows) - 1,
            }
        }

        fn bottom(&self) -> u64 {
            0
        }

        fn proposition(&self, name: &str) -> Result<u64, AutomatonError> {
            let j = self
                .names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| AutomatonError::MalformedGuard {
                    formula: name.to_string(),
                    reason: "unknown proposition".to_string(),
                })?;
            Ok((0..(1u32 << self.names.len()))
                .filter(|i| (i >> j) & 1 == 1)
                .fold(0, |acc, i| acc | (1u64 << i)))
        }

        fn parse(&self, formula: &str) -> Result<u64, AutomatonError> {
            match formula.trim() {
                "true" => Ok(self.top()),
                "false" => Ok(self.bottom()),
                negated if negated.starts_with('!') => {
                    Ok(self.not(&self.proposition(negated[1..].trim())?))
                }
                name => self.proposition(name),
            }
        }

        fn and(&self, left: &u64, right: &u64) -> u64 {
            left & right
        }

        fn or(&self, left: &u64, right: &u64) -> u64 {
            left | right
        }

        fn not(&self, formula: &u64) -> u64 {
            self.top() & !formula
        }

        fn is_satisfiable(&self, formula: &u64) -> bool {
            *formula != 0
        }

        fn equivalent(&self, left: &u64, right: &u64) -> bool {
            left == right
        }

        fn evaluate(&self, formula: &u64, interpretation: &Interpretation) -> bool {
            let row = self
                .names
                .iter()
                .enumerate()
                .filter(|(_, name)| interpretation.value(name))
                .fold(0u32, |acc, (j, _)| acc | (1 << j));
            (formula >> row) & 1 == 1
        }
    }

    /// The automaton that accepts all words over `{0, 1}` with an even number of `0`s and an
    /// even number of `1`s.
    pub fn even_zeros_and_ones() -> SimpleDfa {
        TSBuilder::default()
            .with_accepting([0])
            .with_edges([
                (0, '0', 2),
                (0, '1', 1),
                (1, '0', 3),
                (1, '1', 0),
                (2, '0', 0),
                (2, '1', 3),
                (3, '0', 1),
                (3, '1', 2),
            ])
            .into_dfa(0)
            .expect("the automaton is well formed")
    }

    /// A DFA over `{a, b}` in which states 2 to 4 are equivalent and state 5 is a rejecting sink.
    pub fn wiki_dfa() -> SimpleDfa {
        TSBuilder::default()
            .with_accepting([2, 3, 4])
            .with_edges([
                (0, 'a', 1),
                (0, 'b', 2),
                (1, 'a', 0),
                (1, 'b', 3),
                (2, 'a', 4),
                (2, 'b', 5),
                (3, 'a', 4),
                (3, 'b', 5),
                (4, 'a', 4),
                (4, 'b', 5),
                (5, 'a', 5),
                (5, 'b', 5),
            ])
            .into_dfa(0)
            .expect("the automaton is well formed")
    }
}
