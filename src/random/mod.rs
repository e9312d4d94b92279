use fastrand::Rng;
use tracing::trace;

use crate::prelude::*;

/// Uses a sprout-like algorithm to generate a random DFA whose states are all reachable.
/// `symbols` determines the number of distinct symbols in the [`CharAlphabet`]. `probability`
/// determines the probability of a back edge to some state being inserted. The algorithm is as
/// follows:
/// 1. Start with a single state.
/// 2. For each symbol, go through the existing states in order and with probability `probability`
///    add a back edge to that state.
/// 3. If no back edge to some state was added, we insert an edge to a new state, unless there
///    are already `max_size` states, in which case the transition stays undefined.
/// 4. Repeat until all states and symbols have been treated.
///
/// Every state is accepting with probability one half.
pub fn generate_random_dfa(
    rng: &mut Rng,
    symbols: usize,
    probability: f64,
    max_size: usize,
) -> SimpleDfa {
    let alphabet = CharAlphabet::of_size(symbols);
    let mut edges = vec![];
    let mut size = 1;
    let mut current = 0;

    while current < size {
        'symbols: for symbol in alphabet.universe() {
            for target in 0..=current {
                if rng.f64() < probability {
                    edges.push((current, *symbol, target));
                    continue 'symbols;
                }
            }
            if size < max_size.max(1) {
                edges.push((current, *symbol, size));
                size += 1;
            }
        }
        current += 1;
    }

    let accepting: Vec<StateIndex> = (0..size).filter(|_| rng.bool()).collect();
    trace!("generated random dfa with {size} states and {} edges", edges.len());
    SimpleDfa::new(0..size, alphabet, 0, accepting, edges)
        .expect("generated automaton is well formed")
}

/// Generate a random DFA of size `size` by randomly drawing transitions. For each state and each
/// symbol, a transition to a uniformly drawn target is added with probability `density`.
/// Depending on the drawn transitions, some states may be unreachable or unable to reach an
/// accepting state, which makes these automata good inputs for trimming and minimization.
pub fn generate_random_dfa_sized(
    rng: &mut Rng,
    symbols: usize,
    size: usize,
    density: f64,
) -> SimpleDfa {
    let size = size.max(1);
    let alphabet = CharAlphabet::of_size(symbols);
    let mut edges = vec![];
    for q in 0..size {
        for symbol in alphabet.universe() {
            if rng.f64() < density {
                edges.push((q, *symbol, rng.usize(..size)));
            }
        }
    }
    let accepting: Vec<StateIndex> = (0..size).filter(|_| rng.bool()).collect();
    SimpleDfa::new(0..size, alphabet, 0, accepting, edges)
        .expect("generated automaton is well formed")
}

/// Generate a random NFA of size `size`. For each state and each symbol, the number of
/// successors is drawn uniformly from `0..=max_successors` and the successors themselves are
/// drawn uniformly from all states.
pub fn generate_random_nfa(
    rng: &mut Rng,
    symbols: usize,
    size: usize,
    max_successors: usize,
) -> SimpleNfa {
    let size = size.max(1);
    let alphabet = CharAlphabet::of_size(symbols);
    let mut edges = vec![];
    for q in 0..size {
        for symbol in alphabet.universe() {
            for _ in 0..rng.usize(..=max_successors) {
                edges.push((q, *symbol, rng.usize(..size)));
            }
        }
    }
    let accepting: Vec<StateIndex> = (0..size).filter(|_| rng.bool()).collect();
    SimpleNfa::new(0..size, alphabet, 0, accepting, edges)
        .expect("generated automaton is well formed")
}

/// Generate a random conjunction of literals over the propositions of `oracle`. Every
/// proposition occurs positively with probability one third and negatively with probability one
/// third, so the result is always satisfiable and is `true` if no proposition was picked.
pub fn generate_random_guard(rng: &mut Rng, oracle: &PropAlphabet) -> Guard {
    let mut guard = oracle.top();
    for name in oracle.propositions() {
        let literal = oracle
            .proposition(name)
            .expect("propositions of the oracle are known to it");
        match rng.u8(..3) {
            0 => guard = oracle.and(&guard, &literal),
            1 => guard = oracle.and(&guard, &oracle.not(&literal)),
            _ => {}
        }
    }
    guard
}

/// Generate a random symbolic automaton of size `size` over the given propositions. For each
/// state, the number of outgoing edges is drawn uniformly from `0..=max_edges`, each edge gets a
/// guard from [`generate_random_guard`] and a uniformly drawn target. Guards leaving a state may
/// overlap, so the result is usually nondeterministic.
pub fn generate_random_symbolic_automaton(
    rng: &mut Rng,
    propositions: &[&str],
    size: usize,
    max_edges: usize,
) -> SymbolicAutomaton {
    let size = size.max(1);
    let oracle = PropAlphabet::new(propositions.iter().copied());
    let mut edges = vec![];
    for q in 0..size {
        for _ in 0..rng.usize(..=max_edges) {
            edges.push((q, generate_random_guard(rng, &oracle), rng.usize(..size)));
        }
    }
    let accepting: Vec<StateIndex> = (0..size).filter(|_| rng.bool()).collect();
    trace!("generated random symbolic automaton with {size} states and {} edges", edges.len());
    SymbolicAutomaton::new(0..size, oracle, 0, accepting, edges)
        .expect("generated automaton is well formed")
}

/// Generate a random word over the universe of the `alphabet`.
/// The length of the word is drawn uniformly from the range `min_len..=max_len`.
pub fn generate_random_word(
    rng: &mut Rng,
    alphabet: &CharAlphabet,
    min_len: usize,
    max_len: usize,
) -> String {
    let charset = alphabet.symbols();
    if charset.is_empty() {
        return String::new();
    }
    let length = rng.usize(min_len..=max_len);
    (0..length)
        .map(|_| charset[rng.usize(..charset.len())])
        .collect()
}

/// Generate `number` random words over the universe of the `alphabet`, see
/// [`generate_random_word`]. The words need not be distinct.
pub fn generate_random_words(
    rng: &mut Rng,
    alphabet: &CharAlphabet,
    min_len: usize,
    max_len: usize,
    number: usize,
) -> Vec<String> {
    (0..number)
        .map(|_| generate_random_word(rng, alphabet, min_len, max_len))
        .collect()
}

/// Generate a random [`Interpretation`] of the given propositions, every proposition is true with
/// probability one half.
pub fn generate_random_interpretation(rng: &mut Rng, propositions: &[String]) -> Interpretation {
    propositions
        .iter()
        .map(|name| (name.clone(), rng.bool()))
        .collect()
}

/// Generate a random word of interpretations, see [`generate_random_interpretation`]. The length
/// of the word is drawn uniformly from the range `min_len..=max_len`.
pub fn generate_random_interpretations(
    rng: &mut Rng,
    propositions: &[String],
    min_len: usize,
    max_len: usize,
) -> Vec<Interpretation> {
    (0..rng.usize(min_len..=max_len))
        .map(|_| generate_random_interpretation(rng, propositions))
        .collect()
}

#[cfg(test)]
mod tests {
    use fastrand::Rng;

    use crate::prelude::*;

    use super::{
        generate_random_dfa, generate_random_dfa_sized, generate_random_guard,
        generate_random_interpretation, generate_random_interpretations, generate_random_nfa,
        generate_random_symbolic_automaton, generate_random_words,
    };

    #[test]
    fn random_dfa() {
        let mut rng = Rng::with_seed(17);
        let dfa = generate_random_dfa(&mut rng, 2, 0.3, 12);
        assert!(dfa.size() <= 12);
        assert!(dfa.is_accessible());
        assert_eq!(dfa.alphabet().size(), 2);
    }

    #[test]
    fn random_generators_are_reproducible() {
        let sized = generate_random_dfa_sized(&mut Rng::with_seed(3), 3, 8, 0.8);
        assert_eq!(sized.size(), 8);
        assert_eq!(sized, generate_random_dfa_sized(&mut Rng::with_seed(3), 3, 8, 0.8));

        let nfa = generate_random_nfa(&mut Rng::with_seed(5), 2, 5, 2);
        assert_eq!(nfa.size(), 5);
        assert_eq!(nfa, generate_random_nfa(&mut Rng::with_seed(5), 2, 5, 2));
    }

    #[test]
    fn random_words() {
        let mut rng = Rng::with_seed(11);
        let alphabet = CharAlphabet::of_size(2);
        let words = generate_random_words(&mut rng, &alphabet, 1, 10, 20);
        assert_eq!(words.len(), 20);
        assert!(words
            .iter()
            .all(|w| (1..=10).contains(&w.len()) && w.chars().all(|c| c == 'a' || c == 'b')));

        let props = vec!["p".to_string(), "q".to_string()];
        let interpretation = generate_random_interpretation(&mut rng, &props);
        for name in interpretation.true_propositions() {
            assert!(props.contains(&name.to_string()));
        }
    }

    #[test]
    fn random_symbolic_automaton() {
        let aut = generate_random_symbolic_automaton(&mut Rng::with_seed(23), &["p", "q"], 5, 3);
        assert_eq!(aut.size(), 5);
        assert_eq!(aut.propositions(), ["p".to_string(), "q".to_string()]);
        for edge in aut.transitions() {
            assert!(aut.alphabet().is_satisfiable(edge.label()));
        }
        assert_eq!(
            aut,
            generate_random_symbolic_automaton(&mut Rng::with_seed(23), &["p", "q"], 5, 3)
        );

        let props = PropAlphabet::new(["p", "q", "r"]);
        let mut rng = Rng::with_seed(4);
        for _ in 0..20 {
            assert!(props.is_satisfiable(&generate_random_guard(&mut rng, &props)));
        }
        let word = generate_random_interpretations(&mut rng, props.propositions(), 2, 5);
        assert!((2..=5).contains(&word.len()));
    }
}
