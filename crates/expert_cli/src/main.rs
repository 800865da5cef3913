//! Expert System - Propositional rule-base solver
//!
//! Resolves the queries of a rule-base file and prints one verdict per query.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use expert_cli::{interactive, load_program, output, OutputOptions, Result};
use expert_logic::{Config, QueryEngine, Strictness};

/// Propositional rule-base solver
#[derive(Parser, Debug)]
#[command(name = "expert-system")]
#[command(version)]
#[command(about = "Backward-chaining solver for propositional rule bases", long_about = None)]
struct Args {
    /// Rule-base file
    input: PathBuf,

    /// Treat malformed lines and a missing fact line as fatal
    #[arg(long)]
    strict: bool,

    /// Print the justification tree of each query
    #[arg(short, long)]
    tree: bool,

    /// Collapse tree nodes deeper than this
    #[arg(short, long)]
    depth: Option<usize>,

    /// Print outcomes as JSON
    #[arg(long)]
    json: bool,

    /// Keep reading facts and queries from standard input
    #[arg(short, long)]
    interactive: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("expert-system: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    // Flags override the environment
    let mut config = Config::from_env();
    if args.strict {
        config = config.with_strictness(Strictness::Strict);
    }
    if args.depth.is_some() {
        config = config.with_render_depth(args.depth);
    }
    let options = OutputOptions {
        tree: args.tree,
        json: args.json,
    };

    let program = load_program(&args.input, &config)?;
    let (mut engine, queries) = QueryEngine::from_program(program, config);

    let outcomes = engine.run(&queries);
    print!("{}", output::format_outcomes(&engine, &outcomes, &options)?);

    if args.interactive {
        let stdin = std::io::stdin();
        interactive::run(&mut engine, stdin.lock(), std::io::stdout(), &options)?;
    }

    log::debug!("Session stats: {:?}", engine.stats());
    Ok(())
}
