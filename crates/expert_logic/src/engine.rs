//! Query Engine with Backward Chaining
//!
//! For every queried fact the engine:
//! - builds a fresh justification tree from the rule store
//! - resolves it bottom-up against the current facts
//! - validates the resolved tree for contradictions
//! - writes the result back to the fact store when it is consistent

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::builder::JustificationBuilder;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::evaluator::Evaluator;
use crate::facts::{FactId, FactSnapshot, FactStore, TruthValue};
use crate::program::Program;
use crate::proof::{NodeKind, ProofNode};
use crate::render::{render_tree, RenderOptions};
use crate::rule::RuleStore;
use crate::validator::{ConsistencyValidator, TreeValidator};

/// Answers queries against a rule base.
///
/// Query order matters: a resolved query is written back to the fact store
/// and is visible to the queries that follow it.
pub struct QueryEngine {
    rules: RuleStore,
    facts: FactStore,
    /// Facts as loaded, restored by [`QueryEngine::reset_facts`].
    initial: FactSnapshot,
    config: Config,
    stats: EngineStats,
}

impl QueryEngine {
    /// Creates an engine over the given stores.
    pub fn new(rules: RuleStore, facts: FactStore, config: Config) -> Self {
        Self {
            initial: facts.snapshot(),
            rules,
            facts,
            config,
            stats: EngineStats::default(),
        }
    }

    /// Creates an engine from a loaded program. The program's queries are
    /// returned alongside so the caller can [`run`](Self::run) them.
    pub fn from_program(program: Program, config: Config) -> (Self, Vec<FactId>) {
        let engine = Self::new(program.rules, program.facts, config);
        (engine, program.queries)
    }

    /// Resolves a single fact.
    ///
    /// A contradiction is reported in the outcome; the fact store is then
    /// left unchanged for that fact.
    pub fn query(&mut self, fact: FactId) -> QueryOutcome {
        let tree = JustificationBuilder::new(&self.rules, &self.facts).build(fact);
        let resolution = Evaluator::new(&self.facts).resolve(&tree);
        let mut validation = ConsistencyValidator::new(&self.facts).check(&resolution.tree);
        if validation.is_valid() {
            validation.confirm(fact, resolution.value);
        }

        self.stats.queries += 1;
        self.stats.nodes_built += resolution.tree.size();
        self.stats.rules_expanded += count_justifications(&resolution.tree);

        let contradiction = if validation.is_valid() {
            self.facts.set_derived(fact, resolution.value);
            None
        } else {
            self.stats.contradictions += 1;
            let detail = validation.summary();
            warn!("Contradiction while resolving {}: {}", fact, detail);
            Some(detail)
        };

        debug!(
            "Query {} -> {} ({} nodes, depth {})",
            fact,
            resolution.value.verdict(),
            resolution.tree.size(),
            resolution.tree.depth()
        );

        QueryOutcome {
            fact,
            value: resolution.value,
            contradiction,
            tree: resolution.tree,
        }
    }

    /// Resolves facts in order, reporting each one independently.
    pub fn run(&mut self, queries: &[FactId]) -> Vec<QueryOutcome> {
        let outcomes: Vec<QueryOutcome> = queries.iter().map(|&fact| self.query(fact)).collect();
        debug!("Engine stats: {:?}", self.stats);
        outcomes
    }

    /// Marks facts as true, keeping everything else.
    pub fn assert_facts(&mut self, facts: &[FactId]) {
        for &fact in facts {
            self.facts.assert_true(fact);
        }
    }

    /// Replaces the whole fact set: every fact returns to its default,
    /// then `facts` are marked true.
    pub fn replace_facts(&mut self, facts: &[FactId]) {
        self.facts.reset();
        self.assert_facts(facts);
    }

    /// Restores the facts the engine was created with.
    pub fn reset_facts(&mut self) {
        self.facts.restore(&self.initial);
    }

    /// Renders an outcome's tree with the configured depth limit.
    pub fn render(&self, outcome: &QueryOutcome) -> String {
        render_tree(&outcome.tree, &RenderOptions::from(&self.config))
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Retrieves the statistics collected so far.
    pub fn stats(&self) -> EngineStats {
        self.stats.clone()
    }

    /// Resets all collected statistics.
    pub fn clear_stats(&mut self) {
        self.stats = EngineStats::default();
    }
}

fn count_justifications(node: &ProofNode) -> usize {
    let own = match &node.kind {
        NodeKind::Fact { justifications, .. } => justifications.len(),
        _ => 0,
    };
    own + node.children().iter().map(count_justifications).sum::<usize>()
}

/// The result of one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub fact: FactId,
    pub value: TruthValue,
    /// Description of the conflicts found, if any.
    pub contradiction: Option<String>,
    /// The resolved justification tree.
    pub tree: ProofNode,
}

impl QueryOutcome {
    /// `True`, `False` or `Undetermined`.
    pub fn verdict(&self) -> &'static str {
        self.value.verdict()
    }

    /// Returns `true` if validation found a conflict.
    pub fn is_contradiction(&self) -> bool {
        self.contradiction.is_some()
    }

    /// The contradiction as an [`Error`], if any.
    pub fn error(&self) -> Option<Error> {
        self.contradiction
            .as_ref()
            .map(|detail| Error::Contradiction {
                fact: self.fact,
                detail: detail.clone(),
            })
    }

    /// Serializes the outcome into a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }
}

/// Statistics about the engine's operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// The total number of queries resolved.
    pub queries: usize,
    /// The number of queries whose tree was contradictory.
    pub contradictions: usize,
    /// The total number of tree nodes built.
    pub nodes_built: usize,
    /// The total number of rule applications attached to trees.
    pub rules_expanded: usize,
}
