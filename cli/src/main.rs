use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use command_grammar_core::Grammar;
use command_grammar_loader::load_grammar;
use command_grammar_resolver::Resolver;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "grammar-resolve")]
#[command(about = "Resolve free-form input lines against a command grammar")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve one line of input and print the result as JSON.
    Resolve(ResolveArgs),
    /// Load and validate a grammar file.
    Check(CheckArgs),
    /// Resolve every line of a file in parallel.
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Grammar file (.json, .yaml, .yml or .xml).
    #[arg(short, long)]
    grammar: PathBuf,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
    /// Read the input from stdin instead of arguments.
    #[arg(long, conflicts_with = "text")]
    stdin: bool,
    /// Input words; joined with spaces.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    text: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Grammar file (.json, .yaml, .yml or .xml).
    #[arg(short, long)]
    grammar: PathBuf,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Grammar file (.json, .yaml, .yml or .xml).
    #[arg(short, long)]
    grammar: PathBuf,
    /// File with one input per line.
    #[arg(short, long)]
    input: PathBuf,
    /// Number of parallel jobs (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Resolve(args) => run_resolve(args),
        Command::Check(args) => run_check(args),
        Command::Batch(args) => run_batch(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<Grammar, String> {
    let grammar = load_grammar(path)
        .map_err(|err| format!("Failed to load grammar '{}': {err}", path.display()))?;
    debug!(
        path = %path.display(),
        commands = grammar.commands().len(),
        global_options = grammar.global_options().len(),
        "Grammar loaded"
    );
    Ok(grammar)
}

/// Joins shell words back into one line. Words containing spaces are
/// re-quoted so they stay a single token.
fn join_words(words: &[String]) -> String {
    words
        .iter()
        .map(|word| {
            if !word.contains(' ') {
                word.clone()
            } else if word.contains('"') {
                format!("'{word}'")
            } else {
                format!("\"{word}\"")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let resolver = Resolver::new(load(&args.grammar)?);

    let text = if args.stdin {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(|err| format!("Failed to read stdin: {err}"))?;
        raw.lines().collect::<Vec<_>>().join(" ")
    } else {
        join_words(&args.text)
    };

    let result = resolver.resolve(&text).map_err(|err| err.to_string())?;
    let json = result
        .to_json(args.pretty)
        .map_err(|err| format!("Failed to serialize result: {err}"))?;
    println!("{json}");
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let grammar = load(&args.grammar)?;

    println!(
        "Grammar '{}' is valid: {} command(s), {} global option(s).",
        args.grammar.display(),
        grammar.commands().len(),
        grammar.global_options().len()
    );
    if let Some(idx) = grammar.default_commands().next() {
        println!("Default command: {}", grammar.command(idx).name);
    }
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<(), String> {
    use rayon::prelude::*;

    let resolver = Resolver::new(load(&args.grammar)?);
    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;

    let lines: Vec<(usize, &str)> = raw
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line))
        .collect();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or(0))
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;

    let outcomes: Vec<Result<String, String>> = pool.install(|| {
        lines
            .par_iter()
            .map(|(number, line)| match resolver.resolve(line) {
                Ok(result) => result.to_json(false).map_err(|err| err.to_string()),
                Err(err) => Err(serde_json::json!({ "line": number, "error": err.to_string() })
                    .to_string()),
            })
            .collect()
    });

    let mut failed = 0;
    for outcome in &outcomes {
        match outcome {
            Ok(json) => println!("{json}"),
            Err(json) => {
                failed += 1;
                println!("{json}");
            }
        }
    }

    info!(lines = outcomes.len(), failed, "Batch complete");
    if failed > 0 {
        return Err(format!("{failed} of {} line(s) failed", outcomes.len()));
    }
    Ok(())
}
