//! Integration tests for the query engine
//!
//! Tests complete rule bases from text to verdicts, including cycles,
//! contradictions, biconditionals and interactive re-querying.

use expert_logic::{
    evaluate, extract_rule, Config, Error, FactId, Program, QueryEngine, Relation, TruthValue,
};

fn fact(c: char) -> FactId {
    FactId::parse(c).unwrap()
}

fn verdicts(text: &str) -> Vec<(char, &'static str)> {
    evaluate(text, &Config::default())
        .unwrap()
        .iter()
        .map(|outcome| (outcome.fact.letter(), outcome.verdict()))
        .collect()
}

// ============================================================================
// End-to-End Resolution Tests
// ============================================================================

#[test]
fn test_chained_implications() {
    assert_eq!(verdicts("A => B\nB => C\n=A\n?C\n"), vec![('C', "True")]);
}

#[test]
fn test_closed_world_defaults() {
    assert_eq!(verdicts("A + B => C\n=\n?C\n"), vec![('C', "False")]);
}

#[test]
fn test_negated_conclusion() {
    assert_eq!(verdicts("A => !B\n=A\n?B\n"), vec![('B', "False")]);
}

#[test]
fn test_operator_precedence() {
    // AND binds tighter than OR, which binds tighter than XOR.
    let text = "\
A | B + C => D
A ^ B | C => E
=A
?DE
";
    assert_eq!(verdicts(text), vec![('D', "True"), ('E', "True")]);
}

#[test]
fn test_negated_group() {
    let text = "!(A + B) => C\n=A\n?C\n";
    assert_eq!(verdicts(text), vec![('C', "True")]);
}

#[test]
fn test_alternative_rules_are_independent() {
    let text = "\
A => C
B => C
=B
?C
";
    assert_eq!(verdicts(text), vec![('C', "True")]);
}

#[test]
fn test_conjunctive_conclusion() {
    let text = "A => B + !C\n=A\n?BC\n";
    assert_eq!(verdicts(text), vec![('B', "True"), ('C', "False")]);
}

#[test]
fn test_token_matching_in_conclusions() {
    let program = Program::parse("A => B + C\n=A\n?D\n", &Config::default()).unwrap();
    assert!(program.rules.rules_concluding(fact('D')).is_empty());
    assert_eq!(program.rules.rules_concluding(fact('C')).len(), 1);
}

// ============================================================================
// Cycle Tests
// ============================================================================

#[test]
fn test_cycle_terminates_undetermined() {
    let text = "\
A => B
B => A
C => A
?A
";
    assert_eq!(verdicts(text), vec![('A', "Undetermined")]);
}

#[test]
fn test_cycle_resolved_by_asserted_fact() {
    let text = "\
A => B
B => A
C => A
=C
?AB
";
    assert_eq!(verdicts(text), vec![('A', "True"), ('B', "True")]);
}

#[test]
fn test_self_reference_terminates() {
    assert_eq!(verdicts("A => A\n=\n?A\n"), vec![('A', "Undetermined")]);
}

// ============================================================================
// Contradiction Tests
// ============================================================================

#[test]
fn test_contradiction_flagged() {
    let outcomes = evaluate("A => B\nA => !B\n=A\n?B\n", &Config::default()).unwrap();
    assert!(outcomes[0].is_contradiction());
    assert!(matches!(outcomes[0].error(), Some(Error::Contradiction { .. })));
}

#[test]
fn test_contradiction_does_not_abort_run() {
    let text = "\
A => B
A => !B
A => C
=A
?BC
";
    let outcomes = evaluate(text, &Config::default()).unwrap();
    assert!(outcomes[0].is_contradiction());
    assert!(!outcomes[1].is_contradiction());
    assert_eq!(outcomes[1].value, TruthValue::True);
}

#[test]
fn test_asserted_fact_contradicted() {
    let outcomes = evaluate("A => !B\n=AB\n?B\n", &Config::default()).unwrap();
    assert!(outcomes[0].is_contradiction());
}

#[test]
fn test_contradiction_through_shared_intermediate_fact() {
    let text = "A => B\nB => C\nB => !C\n=A\n?C\n";
    let program = Program::parse(text, &Config::default()).unwrap();
    let (mut engine, queries) = QueryEngine::from_program(program, Config::default());
    let outcomes = engine.run(&queries);

    assert!(outcomes[0].is_contradiction());
    assert_ne!(engine.facts().get(fact('C')), TruthValue::True);
    assert_eq!(engine.stats().contradictions, 1);
}

// ============================================================================
// Biconditional Tests
// ============================================================================

#[test]
fn test_biconditional_expansion() {
    let rules = extract_rule("A <=> B").unwrap();
    assert_eq!(rules.len(), 2);
    assert!(rules.iter().all(|r| r.relation == Relation::Biconditional));
    assert_eq!(rules[0].to_string(), "A => B");
    assert_eq!(rules[1].to_string(), "B => A");
}

#[test]
fn test_biconditional_both_directions() {
    assert_eq!(verdicts("A <=> B\n=A\n?B\n"), vec![('B', "True")]);
    assert_eq!(verdicts("A <=> B\n=B\n?A\n"), vec![('A', "True")]);
}

// ============================================================================
// Engine State Tests
// ============================================================================

#[test]
fn test_idempotent_queries() {
    let text = "A + B => C\nC | D => E\n=AB\n?EEE\n";
    let outcomes = evaluate(text, &Config::default()).unwrap();
    assert!(outcomes.iter().all(|o| o.value == TruthValue::True));
    assert!(outcomes.iter().all(|o| !o.is_contradiction()));
}

#[test]
fn test_query_results_feed_later_queries() {
    let program = Program::parse("A => B\n=A\n?B\n", &Config::default()).unwrap();
    let (mut engine, queries) = QueryEngine::from_program(program, Config::default());
    engine.run(&queries);
    assert_eq!(engine.facts().get(fact('B')), TruthValue::True);
    assert_eq!(engine.facts().established(fact('B')), Some(TruthValue::True));
}

#[test]
fn test_interactive_requery() {
    let program = Program::parse("A + B => C\n=A\n?C\n", &Config::default()).unwrap();
    let (mut engine, queries) = QueryEngine::from_program(program, Config::default());
    assert_eq!(engine.run(&queries)[0].value, TruthValue::False);

    engine.replace_facts(&[fact('A'), fact('B')]);
    assert_eq!(engine.query(fact('C')).value, TruthValue::True);

    engine.reset_facts();
    assert_eq!(engine.query(fact('C')).value, TruthValue::False);
}

// ============================================================================
// Loading Tests
// ============================================================================

#[test]
fn test_lenient_loading_skips_bad_lines() {
    let text = "\
A => B
A & B => C
D => E | F
B => G
=A
?G
";
    let program = Program::parse(text, &Config::default()).unwrap();
    assert_eq!(program.rules.len(), 2);
    assert_eq!(program.warnings.len(), 2);
    assert_eq!(verdicts(text), vec![('G', "True")]);
}

#[test]
fn test_strict_loading_rejects_bad_lines() {
    let err = Program::parse("A & B => C\n=A\n?C\n", &Config::strict()).unwrap_err();
    assert!(matches!(err, Error::Line { line: 1, .. }));
}

#[test]
fn test_tree_json_round_trip() {
    let outcomes = evaluate("A + !B => C\n=A\n?C\n", &Config::default()).unwrap();
    let json = outcomes[0].tree.to_json().unwrap();
    let tree = expert_logic::ProofNode::from_json(&json).unwrap();
    assert_eq!(tree, outcomes[0].tree);
}
