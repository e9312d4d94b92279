use fastrand::Rng;
use finite_automata::prelude::*;
use finite_automata::random::{
    generate_random_dfa, generate_random_dfa_sized, generate_random_interpretations,
    generate_random_nfa, generate_random_symbolic_automaton, generate_random_words,
};

const SEEDS: std::ops::Range<u64> = 0..40;

fn sample_words(rng: &mut Rng, alphabet: &CharAlphabet) -> Vec<String> {
    let mut words = generate_random_words(rng, alphabet, 0, 12, 60);
    words.push(String::new());
    words
}

#[test_log::test]
fn trim_preserves_language_and_is_idempotent() {
    for seed in SEEDS {
        let mut rng = Rng::with_seed(seed);
        let dfa = generate_random_dfa_sized(&mut rng, 2, 10, 0.7);
        let trimmed = dfa.trim();
        assert!(trimmed.size() <= dfa.size(), "seed {seed}");
        assert!(trimmed.is_trim() || trimmed.accepting_states().is_empty());
        assert_eq!(trimmed.trim(), trimmed, "seed {seed}");
        for word in sample_words(&mut rng, dfa.alphabet()) {
            assert_eq!(
                dfa.accepts(word.chars()).unwrap(),
                trimmed.accepts(word.chars()).unwrap(),
                "seed {seed}, word {word}"
            );
        }

        let nfa = generate_random_nfa(&mut rng, 2, 6, 2);
        let trimmed = nfa.trim();
        assert!(trimmed.size() <= nfa.size());
        assert_eq!(trimmed.trim(), trimmed, "seed {seed}");
        for word in sample_words(&mut rng, nfa.alphabet()) {
            assert_eq!(
                nfa.accepts(word.chars()).unwrap(),
                trimmed.accepts(word.chars()).unwrap(),
                "seed {seed}, word {word}"
            );
        }
    }
}

#[test_log::test]
fn minimization_preserves_language() {
    for seed in SEEDS {
        let mut rng = Rng::with_seed(seed);
        let dfa = generate_random_dfa(&mut rng, 3, 0.25, 15);
        let minimal = dfa.minimize();
        assert!(minimal.size() <= dfa.trim().size(), "seed {seed}");
        assert_eq!(minimal.minimize().size(), minimal.size(), "seed {seed}");
        assert!(minimal.is_minimal());
        for word in sample_words(&mut rng, dfa.alphabet()) {
            assert_eq!(
                dfa.accepts(word.chars()).unwrap(),
                minimal.accepts(word.chars()).unwrap(),
                "seed {seed}, word {word}"
            );
        }
    }
}

#[test_log::test]
fn determinization_preserves_language() {
    for seed in SEEDS {
        let mut rng = Rng::with_seed(seed);
        let nfa = generate_random_nfa(&mut rng, 2, 5, 2);
        let dfa = nfa.determinize();
        assert!(dfa.size() <= 1 << nfa.size());
        for word in sample_words(&mut rng, nfa.alphabet()) {
            assert_eq!(
                nfa.accepts(word.chars()).unwrap(),
                dfa.accepts(word.chars()).unwrap(),
                "seed {seed}, word {word}"
            );
        }
    }
}

#[test_log::test]
fn symbolic_determinization_and_minimization_preserve_language() {
    for seed in SEEDS {
        let mut rng = Rng::with_seed(seed);
        let aut = generate_random_symbolic_automaton(&mut rng, &["p", "q", "r"], 4, 3);
        let dfa = aut.determinize();
        let minimal = aut.minimize();
        assert!(minimal.size() <= dfa.trim().size(), "seed {seed}");
        assert_eq!(minimal.minimize().size(), minimal.size(), "seed {seed}");
        assert_eq!(aut.is_empty_language(), minimal.is_empty_language(), "seed {seed}");

        let mut words = vec![vec![]];
        for _ in 0..60 {
            words.push(generate_random_interpretations(
                &mut rng,
                aut.propositions(),
                1,
                8,
            ));
        }
        for word in words {
            let expected = aut.accepts(word.clone()).unwrap();
            assert_eq!(dfa.accepts(word.clone()).unwrap(), expected, "seed {seed}");
            assert_eq!(minimal.accepts(word).unwrap(), expected, "seed {seed}");
        }
    }
}

#[test_log::test]
fn minimal_automata_are_canonical() {
    for seed in SEEDS {
        let mut rng = Rng::with_seed(seed);
        let dfa = generate_random_dfa_sized(&mut rng, 2, 8, 0.9);
        let direct = dfa.minimize().renumbered();
        let roundabout = dfa.to_nfa().determinize().minimize().renumbered();
        assert_eq!(direct, roundabout, "seed {seed}");
        assert_eq!(direct, dfa.trim().minimize().renumbered(), "seed {seed}");
    }
}

#[test]
fn simulator_agrees_with_acceptance() {
    let mut rng = Rng::with_seed(99);
    let nfa = generate_random_nfa(&mut rng, 2, 6, 2);
    for word in sample_words(&mut rng, nfa.alphabet()) {
        let mut sim = Simulator::new(&nfa);
        for symbol in word.chars() {
            sim.step(symbol).unwrap();
        }
        assert_eq!(sim.is_accepting(), nfa.accepts(word.chars()).unwrap());
    }
}
