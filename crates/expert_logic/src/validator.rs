//! Tree Validator - Checks resolved justification trees for contradictions
//!
//! The validator recomputes a tree's values from fact-store lookups and
//! reports three kinds of conflict:
//! - an established fact whose derivation yields the opposite value
//! - sibling justifications of one fact that disagree (one holds, one fails)
//! - a resolved value that the recomputation does not confirm

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::evaluator::{apply_operator, combine_justifications};
use crate::facts::{FactId, FactStore, TruthValue};
use crate::proof::{NodeKind, ProofNode};

/// A trait defining the interface for a justification tree validator.
///
/// Implementors recompute the value of a tree and collect every
/// contradiction found on the way up.
pub trait TreeValidator {
    /// Checks a justification tree.
    fn check(&self, tree: &ProofNode) -> ValidationResult;
}

/// The default [`TreeValidator`], reading established values from a
/// [`FactStore`].
///
/// Cycle-cut leaves take the fact's established value, else the value
/// verified for the same fact earlier in the pass, else `Unknown`.
pub struct ConsistencyValidator<'a> {
    facts: &'a FactStore,
}

impl<'a> ConsistencyValidator<'a> {
    /// Creates a validator reading the given store.
    pub fn new(facts: &'a FactStore) -> Self {
        Self { facts }
    }

    fn check_node(
        &self,
        node: &ProofNode,
        verified: &mut HashMap<FactId, TruthValue>,
        result: &mut ValidationResult,
    ) -> TruthValue {
        match &node.kind {
            NodeKind::Boolean => node.value,
            NodeKind::Operator { op, operands } => apply_operator(
                *op,
                operands
                    .iter()
                    .map(|operand| {
                        operand
                            .polarity
                            .apply(self.check_node(operand, verified, result))
                    })
                    .collect::<Vec<_>>()
                    .into_iter(),
            ),
            NodeKind::Fact {
                fact,
                justifications,
                deferred,
            } => {
                let established = self.facts.established(*fact);
                if justifications.is_empty() {
                    return if *deferred {
                        established
                            .or_else(|| verified.get(fact).copied())
                            .unwrap_or(TruthValue::Unknown)
                    } else {
                        self.facts.get(*fact)
                    };
                }

                let candidates: Vec<TruthValue> = justifications
                    .iter()
                    .map(|child| {
                        child
                            .polarity
                            .apply(self.check_node(child, verified, result))
                    })
                    .collect();

                let holds = candidates.contains(&TruthValue::True);
                let fails = candidates.contains(&TruthValue::False);
                if holds && fails {
                    result.add_error(ValidationError::new(
                        ErrorKind::DivergentJustifications,
                        *fact,
                        format!("rules concluding {} disagree on its value", fact),
                    ));
                }

                let derived = combine_justifications(candidates);
                let value = match established {
                    Some(value) if derived.is_known() && value != derived => {
                        result.add_error(ValidationError::new(
                            ErrorKind::EstablishedMismatch,
                            *fact,
                            format!(
                                "{} is established as {} but derives as {}",
                                fact, value, derived
                            ),
                        ));
                        value
                    }
                    Some(value) => value,
                    None => derived,
                };
                verified.insert(*fact, value);
                value
            }
        }
    }
}

impl TreeValidator for ConsistencyValidator<'_> {
    fn check(&self, tree: &ProofNode) -> ValidationResult {
        let mut result = ValidationResult::valid();
        let mut verified = HashMap::new();
        let value = self.check_node(tree, &mut verified, &mut result);
        result.value = value;
        result
    }
}

/// The result of validating a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Value of the root as recomputed by the validator.
    pub value: TruthValue,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Creates an empty, valid result.
    pub fn valid() -> Self {
        Self {
            value: TruthValue::Unknown,
            errors: Vec::new(),
        }
    }

    /// Returns `true` if no contradiction was found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Records an error, marking the result invalid.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Records an error unless the recomputed value matches `resolved`.
    pub fn confirm(&mut self, fact: FactId, resolved: TruthValue) {
        if self.value != resolved {
            let message = format!(
                "{} resolves to {} but verifies as {}",
                fact, resolved, self.value
            );
            self.add_error(ValidationError::new(
                ErrorKind::UnconfirmedResolution,
                fact,
                message,
            ));
        }
    }

    /// Joins every error message into a single line.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A contradiction found in a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ErrorKind,
    /// The fact at which the conflict was detected.
    pub fact: FactId,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, fact: FactId, message: impl Into<String>) -> Self {
        Self {
            kind,
            fact,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Kinds of contradiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// An asserted or previously derived value disagrees with the derivation.
    EstablishedMismatch,
    /// One justification of a fact holds while another fails.
    DivergentJustifications,
    /// Resolution and verification computed different values.
    UnconfirmedResolution,
}
