//! Rule-base loading.
//!
//! A rule base is line oriented. `#` starts a comment running to the end of
//! the line, and blank lines are ignored. A line starting with `=` lists
//! the initially true facts, a line starting with `?` lists the facts to
//! query, and every other line is a rule.

use log::{info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::facts::{FactId, FactStore};
use crate::rule::RuleStore;

/// A loaded rule base.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub rules: RuleStore,
    /// Facts with the initial assertions applied.
    pub facts: FactStore,
    /// Facts to query, in order, duplicates kept.
    pub queries: Vec<FactId>,
    /// Non-fatal diagnostics, one per skipped line or missing section.
    pub warnings: Vec<String>,
}

impl Program {
    /// Parses a rule base.
    ///
    /// Fact and query lines accumulate. A missing query line is always an
    /// error; malformed lines and a missing fact line are errors only in
    /// strict mode.
    pub fn parse(text: &str, config: &Config) -> Result<Program> {
        let mut program = Program::default();
        let mut has_facts = false;

        for (index, raw) in text.lines().enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            let loaded = if line.starts_with('=') {
                has_facts = true;
                parse_fact_line(line).map(|facts| {
                    for fact in facts {
                        program.facts.assert_true(fact);
                    }
                })
            } else if line.starts_with('?') {
                parse_query_line(line).map(|queries| program.queries.extend(queries))
            } else {
                program.rules.add_line(line).map(|count| {
                    if count == 0 {
                        program
                            .warnings
                            .push(format!("line {}: rule dropped: {}", index + 1, line));
                    }
                })
            };

            if let Err(e) = loaded {
                let e = e.at_line(index + 1);
                if config.is_strict() {
                    return Err(e);
                }
                warn!("Skipping {}", e);
                program.warnings.push(e.to_string());
            }
        }

        if !has_facts {
            if config.is_strict() {
                return Err(Error::Syntax("no initial facts provided".to_string()));
            }
            warn!("No initial facts provided, every fact defaults to False");
            program
                .warnings
                .push("no initial facts provided".to_string());
        }
        if program.queries.is_empty() {
            return Err(Error::Syntax("no queries provided".to_string()));
        }

        info!(
            "Loaded {} rules ({} signatures), {} true facts, {} queries",
            program.rules.len(),
            program.rules.signature_count(),
            program.facts.true_facts().len(),
            program.queries.len()
        );
        Ok(program)
    }
}

/// Removes a trailing `#` comment.
pub fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parses `=` followed by zero or more fact letters.
pub fn parse_fact_line(line: &str) -> Result<Vec<FactId>> {
    let Some(rest) = line.trim().strip_prefix('=') else {
        return Err(Error::Syntax(format!("not a fact line: {}", line)));
    };
    parse_letters(rest)
}

/// Parses `?` followed by one or more fact letters.
pub fn parse_query_line(line: &str) -> Result<Vec<FactId>> {
    let Some(rest) = line.trim().strip_prefix('?') else {
        return Err(Error::Syntax(format!("not a query line: {}", line)));
    };
    let queries = parse_letters(rest)?;
    if queries.is_empty() {
        return Err(Error::Syntax("empty query line".to_string()));
    }
    Ok(queries)
}

fn parse_letters(text: &str) -> Result<Vec<FactId>> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            FactId::parse(c)
                .ok_or_else(|| Error::Syntax(format!("'{}' is not a fact identifier", c)))
        })
        .collect()
}
