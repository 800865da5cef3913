//! Bottom-up resolution of justification trees.
//!
//! Resolution walks a tree depth-first and annotates every node with its
//! computed value. The rule applied at fact nodes is disjunctive: a fact
//! is `True` as soon as one justification holds, `False` when every
//! justification fails, and `Unknown` otherwise.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::facts::{FactId, FactStore, TruthValue};
use crate::proof::{NodeKind, Operator, ProofNode};

/// Applies an operator to the link values of its operands.
///
/// `Not` uses its first operand only. An operator without operands is
/// `Unknown`.
pub fn apply_operator(op: Operator, mut operands: impl Iterator<Item = TruthValue>) -> TruthValue {
    let Some(first) = operands.next() else {
        return TruthValue::Unknown;
    };
    match op {
        Operator::Not => first.not(),
        Operator::And => operands.fold(first, TruthValue::and),
        Operator::Or => operands.fold(first, TruthValue::or),
        Operator::Xor => operands.fold(first, TruthValue::xor),
    }
}

/// Combines the values of a fact's justifications.
///
/// Any `True` wins, all `False` is `False`, anything else is `Unknown`.
/// A mix of `True` and `False` resolves to `True`; detecting that conflict
/// is left to validation.
pub fn combine_justifications(candidates: impl IntoIterator<Item = TruthValue>) -> TruthValue {
    let mut all_false = true;
    for candidate in candidates {
        match candidate {
            TruthValue::True => return TruthValue::True,
            TruthValue::False => {}
            TruthValue::Unknown => all_false = false,
        }
    }
    if all_false {
        TruthValue::False
    } else {
        TruthValue::Unknown
    }
}

/// The outcome of resolving a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Value of the root, before its polarity is applied.
    pub value: TruthValue,
    /// Copy of the input tree with every node's value computed.
    pub tree: ProofNode,
}

/// Resolves justification trees against a fact store.
pub struct Evaluator<'a> {
    facts: &'a FactStore,
}

impl<'a> Evaluator<'a> {
    pub fn new(facts: &'a FactStore) -> Self {
        Self { facts }
    }

    /// Resolves `tree`, leaving the input untouched.
    pub fn resolve(&self, tree: &ProofNode) -> Resolution {
        let mut resolved = HashMap::new();
        let tree = self.resolve_node(tree, &mut resolved);
        Resolution {
            value: tree.value,
            tree,
        }
    }

    fn resolve_node(
        &self,
        node: &ProofNode,
        resolved: &mut HashMap<FactId, TruthValue>,
    ) -> ProofNode {
        let mut out = node.clone();
        match &node.kind {
            NodeKind::Boolean => {}
            NodeKind::Operator { op, operands } => {
                let operands: Vec<ProofNode> = operands
                    .iter()
                    .map(|operand| self.resolve_node(operand, resolved))
                    .collect();
                out.value = apply_operator(*op, operands.iter().map(ProofNode::link_value));
                out.kind = NodeKind::Operator { op: *op, operands };
            }
            NodeKind::Fact {
                fact,
                justifications,
                deferred,
            } => {
                let established = self.facts.established(*fact);
                if justifications.is_empty() {
                    if *deferred {
                        // Cut by the cycle guard: reuse the value this pass
                        // already settled for the fact, if any.
                        out.value = established
                            .or_else(|| resolved.get(fact).copied())
                            .unwrap_or(TruthValue::Unknown);
                    }
                    return out;
                }

                let children: Vec<ProofNode> = justifications
                    .iter()
                    .map(|child| self.resolve_node(child, resolved))
                    .collect();
                let derived = combine_justifications(children.iter().map(ProofNode::link_value));
                out.value = match (derived, established) {
                    (TruthValue::Unknown, Some(value)) => value,
                    (derived, _) => derived,
                };
                resolved.insert(*fact, out.value);
                out.kind = NodeKind::Fact {
                    fact: *fact,
                    justifications: children,
                    deferred: false,
                };
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::JustificationBuilder;
    use crate::rule::RuleStore;

    fn fact(c: char) -> FactId {
        FactId::parse(c).unwrap()
    }

    fn resolve(lines: &[&str], known: &[char], query: char) -> TruthValue {
        let mut rules = RuleStore::new();
        for line in lines {
            rules.add_line(line).unwrap();
        }
        let mut facts = FactStore::new();
        for c in known {
            facts.assert_true(fact(*c));
        }
        let tree = JustificationBuilder::new(&rules, &facts).build(fact(query));
        Evaluator::new(&facts).resolve(&tree).value
    }

    #[test]
    fn test_apply_operator() {
        use TruthValue::*;
        assert_eq!(apply_operator(Operator::And, [True, Unknown].into_iter()), Unknown);
        assert_eq!(apply_operator(Operator::And, [False, Unknown].into_iter()), False);
        assert_eq!(apply_operator(Operator::Or, [True, Unknown].into_iter()), True);
        assert_eq!(apply_operator(Operator::Xor, [True, True].into_iter()), False);
        assert_eq!(apply_operator(Operator::Not, [Unknown].into_iter()), Unknown);
        assert_eq!(apply_operator(Operator::And, std::iter::empty()), Unknown);
    }

    #[test]
    fn test_combine_justifications() {
        use TruthValue::*;
        assert_eq!(combine_justifications([False, True]), True);
        assert_eq!(combine_justifications([False, False]), False);
        assert_eq!(combine_justifications([False, Unknown]), Unknown);
        assert_eq!(combine_justifications([Unknown, True]), True);
    }

    #[test]
    fn test_simple_implication() {
        assert_eq!(resolve(&["A => B"], &['A'], 'B'), TruthValue::True);
        assert_eq!(resolve(&["A => B"], &[], 'B'), TruthValue::False);
    }

    #[test]
    fn test_chain() {
        assert_eq!(resolve(&["A => B", "B => C"], &['A'], 'C'), TruthValue::True);
    }

    #[test]
    fn test_negated_conclusion() {
        assert_eq!(resolve(&["A => !B"], &['A'], 'B'), TruthValue::False);
        assert_eq!(resolve(&["A => !B"], &[], 'B'), TruthValue::True);
    }

    #[test]
    fn test_disjunctive_combination() {
        let lines = ["A => C", "B => C"];
        assert_eq!(resolve(&lines, &['B'], 'C'), TruthValue::True);
        assert_eq!(resolve(&lines, &[], 'C'), TruthValue::False);
    }

    #[test]
    fn test_cycle_is_undetermined() {
        let lines = ["A => B", "B => A", "C => A"];
        assert_eq!(resolve(&lines, &[], 'A'), TruthValue::Unknown);
        assert_eq!(resolve(&lines, &['C'], 'A'), TruthValue::True);
    }

    #[test]
    fn test_deferred_leaf_reuses_resolved_value() {
        let lines = ["B + B => C", "A => B"];
        assert_eq!(resolve(&lines, &['A'], 'C'), TruthValue::True);
    }

    #[test]
    fn test_unknown_keeps_established_value() {
        let mut rules = RuleStore::new();
        rules.add_line("A => B").unwrap();
        rules.add_line("B => A").unwrap();
        let mut facts = FactStore::new();
        facts.set_derived(fact('A'), TruthValue::False);
        // A's only support loops back through B, so its derived value is
        // unknown and the stored result stands.
        let tree = JustificationBuilder::new(&rules, &facts).build(fact('B'));
        let resolution = Evaluator::new(&facts).resolve(&tree);
        assert_eq!(resolution.value, TruthValue::False);
        assert_eq!(resolution.tree.children()[0].value, TruthValue::False);
    }

    #[test]
    fn test_resolution_annotates_every_node() {
        let mut rules = RuleStore::new();
        rules.add_line("A + B => C").unwrap();
        let mut facts = FactStore::new();
        facts.assert_true(fact('A'));
        let tree = JustificationBuilder::new(&rules, &facts).build(fact('C'));
        let resolution = Evaluator::new(&facts).resolve(&tree);

        let and = &resolution.tree.children()[0];
        assert_eq!(and.value, TruthValue::False);
        assert_eq!(and.children()[0].value, TruthValue::True);
        assert_eq!(and.children()[1].value, TruthValue::False);
        // The input is untouched.
        assert_eq!(tree.children()[0].value, TruthValue::Unknown);
    }
}
