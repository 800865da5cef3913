//! Justification tree construction.
//!
//! Starting from a queried fact, every rule that can conclude it
//! contributes its condition as a child subtree. Fact leaves of those
//! subtrees that are not already `True` are expanded the same way.
//!
//! Each rule signature is expanded at most once per top-level build, so
//! cyclic rule sets terminate. A fact leaf whose rules were all consumed
//! elsewhere in the tree is marked `deferred`.

use std::collections::HashSet;

use log::trace;

use crate::facts::{FactId, FactStore, TruthValue};
use crate::parser::Expr;
use crate::proof::{NodeKind, Operator, ProofNode};
use crate::rule::{RuleSignature, RuleStore};

/// Builds justification trees against a rule store and a fact store.
pub struct JustificationBuilder<'a> {
    rules: &'a RuleStore,
    facts: &'a FactStore,
}

impl<'a> JustificationBuilder<'a> {
    /// Creates a builder reading the given stores.
    pub fn new(rules: &'a RuleStore, facts: &'a FactStore) -> Self {
        Self { rules, facts }
    }

    /// Builds the full justification tree of `fact`.
    ///
    /// The root is a fact node seeded with the store's current value and
    /// always expanded, whatever that value is.
    pub fn build(&self, fact: FactId) -> ProofNode {
        let mut seen = HashSet::new();
        let tree = self.expand(fact, &mut seen);
        trace!(
            "Built tree for {}: {} nodes, {} rules expanded",
            fact,
            tree.size(),
            seen.len()
        );
        tree
    }

    fn expand(&self, fact: FactId, seen: &mut HashSet<RuleSignature>) -> ProofNode {
        let mut justifications = Vec::new();
        let mut skipped = false;

        // Attach every usable rule before descending, so sibling rules of
        // this fact are claimed by this node and not by a descendant.
        for stored in self.rules.rules_concluding(fact) {
            if !seen.insert(stored.signature) {
                trace!(
                    "Not re-expanding {} through {:?}",
                    fact,
                    self.rules.source_of(stored.signature)
                );
                skipped = true;
                continue;
            }
            trace!("Expanding {} through {}", fact, stored.rule);
            let subtree = self
                .attach(&stored.rule.condition)
                .with_polarity(stored.rule.link_polarity(fact));
            justifications.push(subtree);
        }

        for subtree in &mut justifications {
            self.expand_leaves(subtree, seen);
        }

        let mut node = ProofNode::fact(fact, self.facts.get(fact));
        node.kind = NodeKind::Fact {
            fact,
            deferred: skipped && justifications.is_empty(),
            justifications,
        };
        node
    }

    /// Materializes a condition with unexpanded fact leaves.
    fn attach(&self, expr: &Expr) -> ProofNode {
        match expr {
            Expr::Fact(fact) => ProofNode::fact(*fact, self.facts.get(*fact)),
            Expr::Not(inner) => ProofNode::operator(Operator::Not, vec![self.attach(inner)]),
            Expr::Binary { op, lhs, rhs } => {
                ProofNode::operator((*op).into(), vec![self.attach(lhs), self.attach(rhs)])
            }
        }
    }

    fn expand_leaves(&self, node: &mut ProofNode, seen: &mut HashSet<RuleSignature>) {
        if let Some(fact) = node.fact_id() {
            if self.facts.get(fact) != TruthValue::True {
                let polarity = node.polarity;
                *node = self.expand(fact, seen).with_polarity(polarity);
            }
            return;
        }
        if let NodeKind::Operator { operands, .. } = &mut node.kind {
            for operand in operands {
                self.expand_leaves(operand, seen);
            }
        }
    }
}
