use thiserror::Error;

use crate::transition_system::StateIndex;

/// Everything that can go wrong when an automaton is constructed or queried. Construction
/// errors are reported before any automaton object exists, so a value of one of the automaton
/// types always satisfies all of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// The set of states was empty.
    #[error("the set of states must not be empty")]
    NoStates,
    /// The designated initial state is not among the states.
    #[error("initial state {0} is not in the set of states")]
    UnknownInitialState(StateIndex),
    /// An accepting state is not among the states.
    #[error("accepting state {0} is not in the set of states")]
    UnknownAcceptingState(StateIndex),
    /// A transition starts or ends in a state that does not exist.
    #[error("transition ({origin}, {label}, {target}) references unknown state {state}")]
    UnknownTransitionState {
        /// The origin of the offending transition.
        origin: StateIndex,
        /// Rendering of the label of the offending transition.
        label: String,
        /// The target of the offending transition.
        target: StateIndex,
        /// The state that does not exist.
        state: StateIndex,
    },
    /// A transition is labeled with a symbol that is not part of the alphabet.
    #[error("transition from {state} uses symbol {symbol}, which is not in the alphabet")]
    UnknownTransitionSymbol {
        /// The origin of the offending transition.
        state: StateIndex,
        /// Rendering of the symbol.
        symbol: String,
    },
    /// A deterministic automaton would have two different successors for one state and symbol.
    #[error("state {state} has more than one successor on {symbol}")]
    Nondeterministic {
        /// The state with more than one successor.
        state: StateIndex,
        /// Rendering of the symbol.
        symbol: String,
    },
    /// Two guards leaving the same state of a deterministic symbolic automaton are satisfied by
    /// a common interpretation.
    #[error("guards {left} and {right} leaving state {state} are not mutually exclusive")]
    OverlappingGuards {
        /// The source state of both guards.
        state: StateIndex,
        /// Rendering of the guard that was already present.
        left: String,
        /// Rendering of the guard that was added.
        right: String,
    },
    /// A textual guard could not be turned into a formula.
    #[error("could not build guard from `{formula}`: {reason}")]
    MalformedGuard {
        /// The text that was given.
        formula: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A word contains a symbol that is not part of the alphabet of the automaton.
    #[error("symbol {0} is not part of the alphabet")]
    SymbolNotInAlphabet(String),
    /// An interpretation satisfies more than one guard leaving a state of an automaton that is
    /// supposed to be deterministic.
    #[error("interpretation {interpretation} satisfies more than one guard leaving state {state}")]
    AmbiguousGuards {
        /// The state whose guards overlap.
        state: StateIndex,
        /// Rendering of the interpretation.
        interpretation: String,
    },
}
