use std::{fmt::Debug, hash::Hash, sync::Arc};

use biodivine_lib_bdd::{
    boolean_expression::BooleanExpression, Bdd, BddPartialValuation, BddValuation,
    BddVariableSet,
};
use itertools::Itertools;
use tracing::trace;

use crate::prelude::*;

/// A concrete symbol of a symbolic automaton: an assignment of truth values to atomic
/// propositions. Propositions that are not mentioned are false, propositions that the automaton
/// does not know are ignored. Any interpretation is a legal input.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let i: Interpretation = [("a", true), ("b", false)].into_iter().collect();
/// assert!(i.value("a"));
/// assert!(!i.value("b"));
/// assert!(!i.value("c"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interpretation(math::OrderedMap<String, bool>);

impl Interpretation {
    /// Creates the interpretation in which every proposition is false.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `self` with the proposition `name` set to `value`.
    pub fn with<S: Into<String>>(mut self, name: S, value: bool) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Returns the truth value that `self` assigns to the proposition `name`.
    pub fn value(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    /// Iterates over the names of all propositions that are true.
    pub fn true_propositions(&self) -> impl Iterator<Item = &str> + '_ {
        self.0
            .iter()
            .filter_map(|(name, value)| if *value { Some(name.as_str()) } else { None })
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Interpretation {
    fn from_iter<T: IntoIterator<Item = (S, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Show for Interpretation {
    fn show(&self) -> String {
        format!(
            "{{{}}}",
            self.0
                .iter()
                .map(|(name, value)| if *value {
                    name.clone()
                } else {
                    format!("!{name}")
                })
                .join(", ")
        )
    }
}

/// The decision procedure that symbolic automata rely on. It constructs formulas over a fixed
/// set of atomic propositions, combines them and answers satisfiability, equivalence and
/// evaluation queries. Symbolic automata never look inside a [`GuardOracle::Formula`], they only
/// sequence calls to the oracle, so any sound implementation can be plugged in.
pub trait GuardOracle: Clone + Debug {
    /// The type of formulas, these label the edges of symbolic automata.
    type Formula: Clone + Debug + Eq + Hash;

    /// The names of the atomic propositions, in a fixed order.
    fn propositions(&self) -> &[String];

    /// The formula that every interpretation satisfies.
    fn top(&self) -> Self::Formula;

    /// The formula that no interpretation satisfies.
    fn bottom(&self) -> Self::Formula;

    /// The formula that consists of the single proposition `name`.
    fn proposition(&self, name: &str) -> Result<Self::Formula, AutomatonError>;

    /// Builds a formula from its textual representation.
    fn parse(&self, formula: &str) -> Result<Self::Formula, AutomatonError>;

    /// Conjunction of two formulas.
    fn and(&self, left: &Self::Formula, right: &Self::Formula) -> Self::Formula;

    /// Disjunction of two formulas.
    fn or(&self, left: &Self::Formula, right: &Self::Formula) -> Self::Formula;

    /// Negation of a formula.
    fn not(&self, formula: &Self::Formula) -> Self::Formula;

    /// Returns true if some interpretation satisfies `formula`.
    fn is_satisfiable(&self, formula: &Self::Formula) -> bool;

    /// Returns true if exactly the same interpretations satisfy both formulas.
    fn equivalent(&self, left: &Self::Formula, right: &Self::Formula) -> bool;

    /// Returns true if `interpretation` satisfies `formula`.
    fn evaluate(&self, formula: &Self::Formula, interpretation: &Interpretation) -> bool;

    /// A human readable rendering of `formula`, used for logging and error messages.
    fn describe(&self, formula: &Self::Formula) -> String {
        format!("{formula:?}")
    }

    /// Returns true if some interpretation satisfies both formulas.
    fn overlapping(&self, left: &Self::Formula, right: &Self::Formula) -> bool {
        self.is_satisfiable(&self.and(left, right))
    }

    /// Returns true if every interpretation satisfies `formula`.
    fn is_valid(&self, formula: &Self::Formula) -> bool {
        !self.is_satisfiable(&self.not(formula))
    }

    /// Conjunction of all given formulas, [`GuardOracle::top`] if there are none.
    fn conjunction<'a, I>(&self, formulas: I) -> Self::Formula
    where
        I: IntoIterator<Item = &'a Self::Formula>,
        Self::Formula: 'a,
    {
        formulas
            .into_iter()
            .fold(self.top(), |acc, f| self.and(&acc, f))
    }

    /// Disjunction of all given formulas, [`GuardOracle::bottom`] if there are none.
    fn disjunction<'a, I>(&self, formulas: I) -> Self::Formula
    where
        I: IntoIterator<Item = &'a Self::Formula>,
        Self::Formula: 'a,
    {
        formulas
            .into_iter()
            .fold(self.bottom(), |acc, f| self.or(&acc, f))
    }
}

/// A guard of the [`PropAlphabet`] oracle, which is a propositional formula represented as a
/// binary decision diagram. Guards can be combined with `&`, `|` and `!`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Guard {
    bdd: Bdd,
}

impl Guard {
    fn from_bdd(bdd: Bdd) -> Self {
        Self { bdd }
    }

    /// Gives a reference to the underlying decision diagram.
    pub fn bdd(&self) -> &Bdd {
        &self.bdd
    }

    /// Returns true if no interpretation satisfies `self`.
    pub fn is_false(&self) -> bool {
        self.bdd.is_false()
    }

    /// Returns true if every interpretation satisfies `self`.
    pub fn is_true(&self) -> bool {
        self.bdd.is_true()
    }
}

impl std::ops::BitAnd for Guard {
    type Output = Guard;

    fn bitand(self, rhs: Self) -> Self::Output {
        Guard::from_bdd(self.bdd.and(&rhs.bdd))
    }
}

impl std::ops::BitOr for Guard {
    type Output = Guard;

    fn bitor(self, rhs: Self) -> Self::Output {
        Guard::from_bdd(self.bdd.or(&rhs.bdd))
    }
}

impl std::ops::Not for Guard {
    type Output = Guard;

    fn not(self) -> Self::Output {
        Guard::from_bdd(self.bdd.not())
    }
}

/// Represents a propositional alphabet, which consists of a list of named atomic propositions.
/// A symbol of this alphabet is an [`Interpretation`] of the propositions, so there are `2^n`
/// symbols for `n` propositions. Edges are labeled with [`Guard`]s.
///
/// This is the default [`GuardOracle`]: guards are binary decision diagrams, which makes
/// satisfiability and equivalence checks cheap once a guard has been built.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let alphabet = PropAlphabet::new(["a", "b"]);
/// let guard = alphabet.parse("a & !b").unwrap();
/// assert!(alphabet.is_satisfiable(&guard));
/// assert!(alphabet.evaluate(&guard, &Interpretation::new().with("a", true)));
/// assert!(!alphabet.evaluate(&guard, &Interpretation::new().with("b", true)));
/// assert_eq!(alphabet.size(), 4);
/// ```
#[derive(Clone)]
pub struct PropAlphabet {
    names: Vec<String>,
    vars: Arc<BddVariableSet>,
}

impl PropAlphabet {
    /// Creates an alphabet over the given propositions. Duplicate names are removed, the order
    /// of first occurrence is kept.
    pub fn new<I>(propositions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let names: Vec<String> = propositions
            .into_iter()
            .map(Into::into)
            .unique()
            .collect();
        let vars = BddVariableSet::new(&names.iter().map(String::as_str).collect::<Vec<_>>());
        Self {
            names,
            vars: Arc::new(vars),
        }
    }

    /// The number of interpretations of the propositions, saturating at `usize::MAX`.
    pub fn size(&self) -> usize {
        2usize.saturating_pow(self.names.len() as u32)
    }

    fn valuation(&self, interpretation: &Interpretation) -> BddValuation {
        BddValuation::new(
            self.names
                .iter()
                .map(|name| interpretation.value(name))
                .collect(),
        )
    }

    fn clause_to_string(&self, clause: &BddPartialValuation) -> String {
        let mut literals = clause.to_values();
        literals.sort();
        if literals.is_empty() {
            return "true".to_string();
        }
        literals
            .into_iter()
            .map(|(var, value)| {
                let name = self.vars.name_of(var);
                if value {
                    name
                } else {
                    format!("!{name}")
                }
            })
            .join(" & ")
    }
}

impl Debug for PropAlphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PropAlphabet[{}]", self.names.join(", "))
    }
}

impl PartialEq for PropAlphabet {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}
impl Eq for PropAlphabet {}

impl GuardOracle for PropAlphabet {
    type Formula = Guard;

    fn propositions(&self) -> &[String] {
        &self.names
    }

    fn top(&self) -> Guard {
        Guard::from_bdd(self.vars.mk_true())
    }

    fn bottom(&self) -> Guard {
        Guard::from_bdd(self.vars.mk_false())
    }

    fn proposition(&self, name: &str) -> Result<Guard, AutomatonError> {
        let var = self
            .vars
            .var_by_name(name)
            .ok_or_else(|| AutomatonError::MalformedGuard {
                formula: name.to_string(),
                reason: "unknown proposition".to_string(),
            })?;
        Ok(Guard::from_bdd(self.vars.mk_var(var)))
    }

    fn parse(&self, formula: &str) -> Result<Guard, AutomatonError> {
        let expression =
            BooleanExpression::try_from(formula).map_err(|reason| AutomatonError::MalformedGuard {
                formula: formula.to_string(),
                reason,
            })?;
        let bdd = self.vars.safe_eval_expression(&expression).ok_or_else(|| {
            AutomatonError::MalformedGuard {
                formula: formula.to_string(),
                reason: "formula mentions an unknown proposition".to_string(),
            }
        })?;
        trace!("parsed guard `{formula}`");
        Ok(Guard::from_bdd(bdd))
    }

    fn and(&self, left: &Guard, right: &Guard) -> Guard {
        Guard::from_bdd(left.bdd.and(&right.bdd))
    }

    fn or(&self, left: &Guard, right: &Guard) -> Guard {
        Guard::from_bdd(left.bdd.or(&right.bdd))
    }

    fn not(&self, formula: &Guard) -> Guard {
        Guard::from_bdd(formula.bdd.not())
    }

    fn is_satisfiable(&self, formula: &Guard) -> bool {
        !formula.bdd.is_false()
    }

    fn equivalent(&self, left: &Guard, right: &Guard) -> bool {
        left.bdd.xor(&right.bdd).is_false()
    }

    fn evaluate(&self, formula: &Guard, interpretation: &Interpretation) -> bool {
        formula.bdd.eval_in(&self.valuation(interpretation))
    }

    fn describe(&self, formula: &Guard) -> String {
        let dnf = formula.bdd.to_optimized_dnf();
        match dnf.len() {
            0 => "false".to_string(),
            1 => self.clause_to_string(&dnf[0]),
            _ => dnf
                .iter()
                .map(|clause| format!("({})", self.clause_to_string(clause)))
                .join(" | "),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn guard_algebra() {
        let alphabet = PropAlphabet::new(["a", "b", "c"]);
        let a = alphabet.proposition("a").unwrap();
        let b = alphabet.proposition("b").unwrap();
        let parsed = alphabet.parse("a | (b & c)").unwrap();

        let abc = Interpretation::new().with("b", true).with("c", true);
        assert!(alphabet.evaluate(&parsed, &abc));
        assert!(!alphabet.evaluate(&parsed, &Interpretation::new()));
        assert!(alphabet.evaluate(&a, &Interpretation::new().with("a", true)));

        let contradiction = a.clone() & !a.clone();
        assert!(!alphabet.is_satisfiable(&contradiction));
        assert!(alphabet.is_valid(&(a.clone() | !a.clone())));

        assert!(alphabet.equivalent(
            &alphabet.parse("!(a & b)").unwrap(),
            &alphabet.or(&alphabet.not(&a), &alphabet.not(&b))
        ));
        assert!(!alphabet.equivalent(&a, &b));
        assert!(alphabet.overlapping(&a, &b));
        assert!(!alphabet.overlapping(&a, &alphabet.not(&a)));
        assert!(alphabet.equivalent(
            &alphabet.conjunction([&a, &b]),
            &alphabet.parse("a & b").unwrap()
        ));
        assert!(!alphabet.is_satisfiable(&alphabet.disjunction([])));
    }

    #[test]
    fn malformed_guards() {
        let alphabet = PropAlphabet::new(["a"]);
        assert!(matches!(
            alphabet.parse("a & x"),
            Err(AutomatonError::MalformedGuard { .. })
        ));
        assert!(matches!(
            alphabet.parse("a & (b"),
            Err(AutomatonError::MalformedGuard { .. })
        ));
        assert!(alphabet.proposition("b").is_err());
    }

    #[test]
    fn describing_guards() {
        let alphabet = PropAlphabet::new(["a", "b"]);
        assert_eq!(alphabet.describe(&alphabet.bottom()), "false");
        assert_eq!(alphabet.describe(&alphabet.top()), "true");
        assert_eq!(alphabet.describe(&alphabet.parse("a & !b").unwrap()), "a & !b");
        assert_eq!(
            Interpretation::new().with("a", true).with("b", false).show(),
            "{a, !b}"
        );
    }
}
