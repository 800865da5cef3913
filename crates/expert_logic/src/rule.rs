//! Rule definitions and the rule store.
//!
//! A rule line is either `condition => conclusion` or
//! `condition <=> conclusion`. A biconditional is stored as its two
//! implications, both tagged with the signature of the line they came from
//! so the justification builder expands the pair at most once.

use std::fmt;

use indexmap::IndexMap;
use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::facts::FactId;
use crate::lexer;
use crate::parser::{self, BinaryOp, Expr};
use crate::proof::Polarity;

const BICONDITIONAL: &str = "<=>";
const IMPLICATION: &str = "=>";

/// The relation a rule line declares between its two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    Implication,
    Biconditional,
}

impl Relation {
    /// Returns the textual marker of the relation.
    pub fn marker(&self) -> &'static str {
        match self {
            Relation::Implication => IMPLICATION,
            Relation::Biconditional => BICONDITIONAL,
        }
    }
}

/// A possibly negated fact in a rule conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub fact: FactId,
    pub negated: bool,
}

/// An interned identifier shared by every implication produced from the
/// same rule text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleSignature(usize);

impl RuleSignature {
    /// Position of the signature in interning order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single implication `condition => conclusion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Whether this implication came from `=>` or from one half of `<=>`.
    pub relation: Relation,
    /// Canonical condition text.
    pub condition_text: String,
    /// Canonical conclusion text.
    pub conclusion_text: String,
    /// The parsed condition.
    pub condition: Expr,
    /// The conjunction of literals this rule concludes.
    pub conclusion: Vec<Literal>,
    /// Canonical text of the whole line, shared by both halves of a biconditional.
    pub source: String,
}

impl Rule {
    /// Returns `true` if `fact` occurs as a letter token of the conclusion.
    pub fn concludes(&self, fact: FactId) -> bool {
        self.conclusion.iter().any(|l| l.fact == fact)
    }

    /// How the condition supports `fact`: inverted when the conclusion negates it.
    pub fn link_polarity(&self, fact: FactId) -> Polarity {
        if self
            .conclusion
            .iter()
            .any(|l| l.fact == fact && l.negated)
        {
            Polarity::Inverted
        } else {
            Polarity::Direct
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.condition_text, IMPLICATION, self.conclusion_text
        )
    }
}

/// One validated side of a rule line.
struct Side {
    text: String,
    expr: Expr,
}

impl Side {
    fn parse(raw: &str) -> Result<Self> {
        let tokens = lexer::tokenize(raw)?;
        if tokens.is_empty() {
            return Err(Error::Syntax("empty expression".to_string()));
        }
        parser::validate_structure(raw, &tokens)?;
        let expr = parser::parse_tokens(&tokens)?;
        Ok(Self {
            text: lexer::canonical(&tokens),
            expr,
        })
    }

    fn literals(&self) -> Result<Vec<Literal>> {
        self.expr
            .conjunction_literals()
            .map(|literals| {
                literals
                    .into_iter()
                    .map(|(fact, negated)| Literal { fact, negated })
                    .collect()
            })
            .ok_or_else(|| {
                Error::rule_format(
                    &self.text,
                    "conclusion must be a conjunction of optionally negated facts",
                )
            })
    }

    fn is_disjunction(&self) -> bool {
        matches!(
            self.expr,
            Expr::Binary {
                op: BinaryOp::Or,
                ..
            }
        )
    }
}

/// Splits a rule line into rules.
///
/// Returns no rules when the conclusion is a top-level disjunction, which
/// cannot be used for forward chaining. A biconditional yields the forward
/// implication followed by the reverse one; a reverse half whose conclusion
/// fails the conjunction restriction is dropped with a warning.
///
/// # Errors
///
/// * [`Error::Syntax`] when the line does not hold exactly one relation marker
///   or either side is empty.
/// * [`Error::Lex`] for characters outside the expression alphabet.
/// * [`Error::RuleFormat`] for malformed sides or a non-conjunctive conclusion.
pub fn extract_rule(line: &str) -> Result<Vec<Rule>> {
    let (relation, condition, conclusion) = split_relation(line)?;
    let condition = Side::parse(condition)?;
    let conclusion = Side::parse(conclusion)?;
    let source = format!("{}{}{}", condition.text, relation.marker(), conclusion.text);

    if conclusion.is_disjunction() {
        warn!("Dropping rule {}: disjunctive conclusion", source);
        return Ok(Vec::new());
    }

    let mut rules = vec![Rule {
        relation,
        condition_text: condition.text.clone(),
        conclusion_text: conclusion.text.clone(),
        condition: condition.expr.clone(),
        conclusion: conclusion.literals()?,
        source: source.clone(),
    }];

    if relation == Relation::Biconditional {
        match condition.literals() {
            Ok(literals) => rules.push(Rule {
                relation,
                condition_text: conclusion.text,
                conclusion_text: condition.text,
                condition: conclusion.expr,
                conclusion: literals,
                source,
            }),
            Err(e) => warn!("Keeping only the forward half of {}: {}", source, e),
        }
    }

    Ok(rules)
}

fn split_relation(line: &str) -> Result<(Relation, &str, &str)> {
    let (relation, marker) = if line.contains(BICONDITIONAL) {
        (Relation::Biconditional, BICONDITIONAL)
    } else if line.contains(IMPLICATION) {
        (Relation::Implication, IMPLICATION)
    } else {
        return Err(Error::Syntax(format!(
            "missing relation marker '=>' or '<=>' in \"{}\"",
            line.trim()
        )));
    };

    let parts: Vec<&str> = line.split(marker).collect();
    if parts.len() != 2 || parts.iter().any(|p| p.contains(IMPLICATION)) {
        return Err(Error::Syntax(format!(
            "expected exactly one relation marker in \"{}\"",
            line.trim()
        )));
    }
    Ok((relation, parts[0], parts[1]))
}

/// A rule stored with its interned signature.
#[derive(Debug, Clone)]
pub struct StoredRule {
    pub signature: RuleSignature,
    pub rule: Rule,
}

/// All rules of a rule base, indexed by signature.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: Vec<StoredRule>,
    signatures: IndexMap<String, RuleSignature>,
}

impl RuleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, interning the text of the line it came from.
    pub fn add(&mut self, rule: Rule) -> RuleSignature {
        let next = RuleSignature(self.signatures.len());
        let signature = *self.signatures.entry(rule.source.clone()).or_insert(next);
        trace!("Stored rule {} as signature {}", rule, signature.index());
        self.rules.push(StoredRule { signature, rule });
        signature
    }

    /// Extracts the rules of one line and stores them.
    ///
    /// # Returns
    ///
    /// The number of implications added.
    pub fn add_line(&mut self, line: &str) -> Result<usize> {
        let rules = extract_rule(line)?;
        let count = rules.len();
        for rule in rules {
            self.add(rule);
        }
        Ok(count)
    }

    /// Every stored rule whose conclusion mentions `fact`.
    pub fn rules_concluding(&self, fact: FactId) -> Vec<&StoredRule> {
        self.rules
            .iter()
            .filter(|stored| stored.rule.concludes(fact))
            .collect()
    }

    /// Looks up the interned text of a signature.
    pub fn source_of(&self, signature: RuleSignature) -> Option<&str> {
        self.signatures
            .get_index(signature.index())
            .map(|(text, _)| text.as_str())
    }

    /// Iterates over the stored rules in load order.
    pub fn iter(&self) -> impl Iterator<Item = &StoredRule> {
        self.rules.iter()
    }

    /// Number of distinct rule signatures.
    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    /// Number of stored implications.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rule is stored.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
