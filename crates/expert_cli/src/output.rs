//! Formatting of query outcomes.

use expert_logic::{FactId, ProofNode, QueryEngine, QueryOutcome};
use serde::Serialize;

use crate::error::Result;

/// How outcomes are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Print the resolved justification tree under each verdict.
    pub tree: bool,
    /// Print outcomes as a JSON array instead of text.
    pub json: bool,
}

/// One line per outcome, followed by its tree when requested.
pub fn format_outcome(engine: &QueryEngine, outcome: &QueryOutcome, tree: bool) -> String {
    let mut out = match &outcome.contradiction {
        None => format!("{} is {}\n", outcome.fact, outcome.verdict()),
        Some(detail) => format!("{} is contradictory: {}\n", outcome.fact, detail),
    };
    if tree {
        out.push_str(&engine.render(outcome));
    }
    out
}

#[derive(Serialize)]
struct JsonOutcome<'a> {
    fact: FactId,
    value: &'static str,
    contradiction: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<&'a ProofNode>,
}

/// Renders outcomes as a pretty-printed JSON array.
pub fn format_json(outcomes: &[QueryOutcome], tree: bool) -> Result<String> {
    let entries: Vec<JsonOutcome<'_>> = outcomes
        .iter()
        .map(|outcome| JsonOutcome {
            fact: outcome.fact,
            value: outcome.verdict(),
            contradiction: outcome.contradiction.as_deref(),
            tree: tree.then_some(&outcome.tree),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Renders a batch of outcomes according to `options`.
pub fn format_outcomes(
    engine: &QueryEngine,
    outcomes: &[QueryOutcome],
    options: &OutputOptions,
) -> Result<String> {
    if options.json {
        let mut out = format_json(outcomes, options.tree)?;
        out.push('\n');
        return Ok(out);
    }
    Ok(outcomes
        .iter()
        .map(|outcome| format_outcome(engine, outcome, options.tree))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use expert_logic::{Config, Program};

    fn run(text: &str) -> (QueryEngine, Vec<QueryOutcome>) {
        let program = Program::parse(text, &Config::default()).unwrap();
        let (mut engine, queries) = QueryEngine::from_program(program, Config::default());
        let outcomes = engine.run(&queries);
        (engine, outcomes)
    }

    #[test]
    fn test_text_output() {
        let (engine, outcomes) = run("A => B\n=A\n?BC\n");
        let text = format_outcomes(&engine, &outcomes, &OutputOptions::default()).unwrap();
        assert_eq!(text, "B is True\nC is False\n");
    }

    #[test]
    fn test_contradiction_output() {
        let (engine, outcomes) = run("A => B\nA => !B\n=A\n?B\n");
        let text = format_outcome(&engine, &outcomes[0], false);
        assert!(text.starts_with("B is contradictory: "));
    }

    #[test]
    fn test_tree_output() {
        let (engine, outcomes) = run("A => B\n=A\n?B\n");
        let text = format_outcome(&engine, &outcomes[0], true);
        assert_eq!(text, "B is True\nB ✅\n└── A ✅\n");
    }

    #[test]
    fn test_json_output() {
        let (_, outcomes) = run("A => !B\n=A\n?B\n");
        let json = format_json(&outcomes, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["fact"], "B");
        assert_eq!(value[0]["value"], "False");
        assert!(value[0]["contradiction"].is_null());
        assert!(value[0].get("tree").is_none());

        let json = format_json(&outcomes, true).unwrap();
        assert!(json.contains("\"tree\""));
    }
}
