//! Integration tests for rule-base file loading
//!
//! Tests reading rule bases from disk, strictness handling and the
//! interactive session on top of a loaded file.

use std::io::Write;

use expert_cli::{interactive, load_program, output, Error, OutputOptions};
use expert_logic::{Config, QueryEngine};
use tempfile::NamedTempFile;

fn rule_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const RULE_BASE: &str = "\
# Sample rule base
C          => E     # C implies E
A + B + C  => D     # A and B and C implies D
A | B      => C     # A or B implies C
A + !B     => F     # A and not B implies F
C | !G     => H     # C or not G implies H
V ^ W      => X     # V xor W implies X
A + B      => Y + Z # A and B implies Y and Z
C | D      => X | V # dropped: disjunctive conclusion
E + F      => !V    # E and F implies not V
A + B     <=> C     # A and B if and only if C

=ABG
?GVX
";

// ============================================================================
// File Loading Tests
// ============================================================================

#[test]
fn test_load_and_resolve_file() {
    let file = rule_file("A => B\nB => C\n=A\n?C\n");
    let program = load_program(file.path(), &Config::default()).unwrap();
    let (mut engine, queries) = QueryEngine::from_program(program, Config::default());
    let outcomes = engine.run(&queries);

    let text = output::format_outcomes(&engine, &outcomes, &OutputOptions::default()).unwrap();
    assert_eq!(text, "C is True\n");
}

#[test]
fn test_sample_rule_base() {
    let file = rule_file(RULE_BASE);
    let program = load_program(file.path(), &Config::default()).unwrap();
    assert_eq!(program.warnings.len(), 1);

    let (mut engine, queries) = QueryEngine::from_program(program, Config::default());
    let outcomes = engine.run(&queries);
    let verdicts: Vec<(char, &str)> = outcomes
        .iter()
        .map(|o| (o.fact.letter(), o.verdict()))
        .collect();
    assert_eq!(verdicts, vec![('G', "True"), ('V', "True"), ('X', "True")]);
    assert!(outcomes.iter().all(|o| !o.is_contradiction()));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_program(dir.path().join("absent.txt"), &Config::default()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_strict_file_loading() {
    let file = rule_file("A => B\n?B\n");
    assert!(load_program(file.path(), &Config::default()).is_ok());

    let err = load_program(file.path(), &Config::strict()).unwrap_err();
    assert_eq!(err.to_string(), "Syntax error: no initial facts provided");
}

// ============================================================================
// Interactive Session Tests
// ============================================================================

#[test]
fn test_interactive_session_on_loaded_file() {
    let file = rule_file("A + B => C\n=A\n?C\n");
    let program = load_program(file.path(), &Config::default()).unwrap();
    let (mut engine, queries) = QueryEngine::from_program(program, Config::default());
    engine.run(&queries);

    let mut out = Vec::new();
    interactive::run(
        &mut engine,
        "=AB ?C\nexit\n".as_bytes(),
        &mut out,
        &OutputOptions::default(),
    )
    .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "> C is True\n> \n");
}
