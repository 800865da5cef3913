//! Justification (proof) trees.
//!
//! A justification tree is rooted at a queried fact. Each fact node owns
//! one subtree per rule that can conclude it, and each subtree is the
//! rule's condition with its own fact leaves expanded the same way. Trees
//! are built fresh for every query and never shared.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::facts::{FactId, TruthValue};
use crate::parser::BinaryOp;

/// Whether a subtree supports the fact it hangs from or its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Polarity {
    #[default]
    Direct,
    /// The owning rule concludes the negation of the fact.
    Inverted,
}

impl Polarity {
    /// Applies the polarity to a computed value.
    pub fn apply(self, value: TruthValue) -> TruthValue {
        match self {
            Polarity::Direct => value,
            Polarity::Inverted => value.not(),
        }
    }
}

/// Operator of an interior node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    And,
    Or,
    Xor,
    Not,
}

impl Operator {
    /// Human-readable label used when rendering trees.
    pub fn label(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Xor => "XOR",
            Operator::Not => "NOT",
        }
    }
}

impl From<BinaryOp> for Operator {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::And => Operator::And,
            BinaryOp::Or => Operator::Or,
            BinaryOp::Xor => Operator::Xor,
        }
    }
}

/// The variant-specific part of a [`ProofNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A fact, with one child per rule that can conclude it.
    Fact {
        fact: FactId,
        justifications: Vec<ProofNode>,
        /// Every rule concluding this fact was already expanded elsewhere in
        /// the same tree.
        deferred: bool,
    },
    /// A settled literal.
    Boolean,
    /// An operator applied to its operands.
    Operator {
        op: Operator,
        operands: Vec<ProofNode>,
    },
}

/// A node of a justification tree.
///
/// `value` is the node's own value before its polarity is applied: the
/// seeded fact-store value for fact nodes before resolution, and the
/// computed value after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNode {
    pub kind: NodeKind,
    pub polarity: Polarity,
    pub value: TruthValue,
}

impl ProofNode {
    /// Creates an unexpanded fact leaf.
    pub fn fact(fact: FactId, value: TruthValue) -> Self {
        Self {
            kind: NodeKind::Fact {
                fact,
                justifications: Vec::new(),
                deferred: false,
            },
            polarity: Polarity::Direct,
            value,
        }
    }

    /// Creates a literal leaf.
    pub fn boolean(value: TruthValue) -> Self {
        Self {
            kind: NodeKind::Boolean,
            polarity: Polarity::Direct,
            value,
        }
    }

    /// Creates an operator node whose value is not computed yet.
    pub fn operator(op: Operator, operands: Vec<ProofNode>) -> Self {
        Self {
            kind: NodeKind::Operator { op, operands },
            polarity: Polarity::Direct,
            value: TruthValue::Unknown,
        }
    }

    /// Sets the link polarity of this node.
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// The value handed to the parent, i.e. with the polarity applied.
    pub fn link_value(&self) -> TruthValue {
        self.polarity.apply(self.value)
    }

    /// Returns the fact of a fact node.
    pub fn fact_id(&self) -> Option<FactId> {
        match &self.kind {
            NodeKind::Fact { fact, .. } => Some(*fact),
            _ => None,
        }
    }

    /// Children of the node, in order.
    pub fn children(&self) -> &[ProofNode] {
        match &self.kind {
            NodeKind::Fact { justifications, .. } => justifications.as_slice(),
            NodeKind::Operator { operands, .. } => operands.as_slice(),
            NodeKind::Boolean => &[],
        }
    }

    /// Label of the node: the fact letter, the operator name, or the literal.
    pub fn label(&self) -> String {
        match &self.kind {
            NodeKind::Fact { fact, .. } => fact.to_string(),
            NodeKind::Operator { op, .. } => op.label().to_string(),
            NodeKind::Boolean => self.value.verdict().to_string(),
        }
    }

    /// Replaces the subtree with a literal leaf holding its value.
    pub fn collapse(&self) -> ProofNode {
        ProofNode::boolean(self.value).with_polarity(self.polarity)
    }

    /// Total number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(ProofNode::size).sum::<usize>()
    }

    /// Depth of the tree; a single node has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(ProofNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Serializes the tree into a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }

    /// Deserializes a tree from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(c: char) -> FactId {
        FactId::parse(c).unwrap()
    }

    fn sample() -> ProofNode {
        let mut root = ProofNode::fact(fact('C'), TruthValue::False);
        if let NodeKind::Fact { justifications, .. } = &mut root.kind {
            justifications.push(
                ProofNode::operator(
                    Operator::And,
                    vec![
                        ProofNode::fact(fact('A'), TruthValue::True),
                        ProofNode::fact(fact('B'), TruthValue::False),
                    ],
                )
                .with_polarity(Polarity::Inverted),
            );
        }
        root
    }

    #[test]
    fn test_polarity_apply() {
        assert_eq!(Polarity::Direct.apply(TruthValue::True), TruthValue::True);
        assert_eq!(Polarity::Inverted.apply(TruthValue::True), TruthValue::False);
        assert_eq!(Polarity::Inverted.apply(TruthValue::False), TruthValue::True);
        assert_eq!(
            Polarity::Inverted.apply(TruthValue::Unknown),
            TruthValue::Unknown
        );
    }

    #[test]
    fn test_tree_shape() {
        let tree = sample();
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.label(), "C");
        assert_eq!(tree.children()[0].label(), "AND");
        assert_eq!(tree.fact_id(), Some(fact('C')));
        assert_eq!(tree.children()[0].fact_id(), None);
    }

    #[test]
    fn test_collapse_keeps_value_and_polarity() {
        let mut node = sample().children()[0].clone();
        node.value = TruthValue::False;
        let leaf = node.collapse();
        assert_eq!(leaf.kind, NodeKind::Boolean);
        assert_eq!(leaf.polarity, Polarity::Inverted);
        assert_eq!(leaf.link_value(), TruthValue::True);
        assert!(leaf.children().is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let tree = sample();
        let json = tree.to_json().unwrap();
        assert!(json.contains("\"C\""));
        assert_eq!(ProofNode::from_json(&json).unwrap(), tree);
    }
}
