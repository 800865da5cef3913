//! Expert Logic - Backward-Chaining Propositional Inference Engine
//!
//! This crate answers queries over a rule base of propositional facts `A`
//! to `Z`. Each queried fact gets a justification tree built from every
//! rule that can conclude it; the tree is resolved with three-valued logic
//! and checked for contradictions before the answer is recorded.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Expert Logic Engine                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                   Loading                             │   │
//! │  │  Lexer │ Parser │ Rule Extraction │ Program          │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                           │                                  │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                   Query Engine                        │   │
//! │  │  Justification Builder │ Evaluator                   │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                           │                                  │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                   Validator                           │   │
//! │  │  Contradiction Detection │ Tree Rendering            │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use expert_logic::{evaluate, Config};
//!
//! let outcomes = evaluate("A + B => C\n=AB\n?C\n", &Config::default()).unwrap();
//! assert_eq!(outcomes[0].verdict(), "True");
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod facts;
pub mod lexer;
pub mod parser;
pub mod program;
pub mod proof;
pub mod render;
pub mod rule;
pub mod validator;

// Re-exports
pub use builder::JustificationBuilder;
pub use config::{Config, Strictness};
pub use engine::{EngineStats, QueryEngine, QueryOutcome};
pub use error::{Error, Result};
pub use evaluator::{Evaluator, Resolution};
pub use facts::{FactId, FactOrigin, FactStore, TruthValue};
pub use parser::Expr;
pub use program::Program;
pub use proof::{NodeKind, Operator, Polarity, ProofNode};
pub use render::{render_tree, RenderOptions};
pub use rule::{extract_rule, Relation, Rule, RuleSignature, RuleStore};
pub use validator::{ConsistencyValidator, TreeValidator, ValidationError, ValidationResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Loads a rule base and runs its queries in order.
pub fn evaluate(text: &str, config: &Config) -> Result<Vec<QueryOutcome>> {
    let program = Program::parse(text, config)?;
    let (mut engine, queries) = QueryEngine::from_program(program, config.clone());
    Ok(engine.run(&queries))
}
