//! Interactive re-querying.
//!
//! After the rule base has been resolved, each input line can replace the
//! fact set and ask new queries against the same rules:
//!
//! ```text
//! > =AB
//! > ?C
//! C is True
//! > =A ?C
//! C is False
//! > reset
//! > quit
//! ```

use std::io::{BufRead, Write};

use expert_logic::program::{parse_fact_line, parse_query_line, strip_comment};
use expert_logic::{FactId, QueryEngine};
use log::{debug, warn};

use crate::error::Result;
use crate::output::{format_outcomes, OutputOptions};

const PROMPT: &str = "> ";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the fact set when `facts` is present, then resolve `queries`.
    Update {
        facts: Option<Vec<FactId>>,
        queries: Vec<FactId>,
    },
    /// Restore the facts of the loaded rule base.
    Reset,
    Quit,
    Empty,
}

/// Parses one input line.
pub fn parse_command(line: &str) -> Result<Command> {
    let line = strip_comment(line).trim();
    match line.to_ascii_lowercase().as_str() {
        "" => return Ok(Command::Empty),
        "reset" => return Ok(Command::Reset),
        "quit" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    let (facts_part, query_part) = match line.find('?') {
        Some(pos) => (&line[..pos], Some(&line[pos..])),
        None => (line, None),
    };
    let facts = if facts_part.trim().is_empty() {
        None
    } else {
        Some(parse_fact_line(facts_part)?)
    };
    let queries = match query_part {
        Some(part) => parse_query_line(part)?,
        None => Vec::new(),
    };
    Ok(Command::Update { facts, queries })
}

/// Reads commands from `input` until `quit` or end of input.
///
/// Bad lines are reported on `output` and do not end the session.
pub fn run<R: BufRead, W: Write>(
    engine: &mut QueryEngine,
    input: R,
    mut output: W,
    options: &OutputOptions,
) -> Result<()> {
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Empty) => {}
            Ok(Command::Reset) => {
                debug!("Restoring loaded facts");
                engine.reset_facts();
            }
            Ok(Command::Update { facts, queries }) => {
                if let Some(facts) = facts {
                    debug!("Replacing facts with {:?}", facts);
                    engine.replace_facts(&facts);
                }
                let outcomes = engine.run(&queries);
                write!(output, "{}", format_outcomes(engine, &outcomes, options)?)?;
            }
            Err(e) => {
                warn!("Ignoring input {:?}: {}", line, e);
                writeln!(output, "error: {}", e)?;
            }
        }
        write!(output, "{}", PROMPT)?;
        output.flush()?;
    }

    writeln!(output)?;
    Ok(())
}
