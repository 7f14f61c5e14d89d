use clap::Parser as ClapParser;
use console::style;
use log::info;
use lox::{process, Options, Outcome, EX_DATAERR};
use lox_parser::parser::{ParserConfig, DEFAULT_MAX_DEPTH};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Parses Lox source and prints its syntax tree.
#[derive(ClapParser, Debug)]
#[command(name = "lox", version)]
struct Args {
    /// Script to parse. Starts an interactive prompt when omitted.
    path: Option<PathBuf>,
    /// Print the scanned tokens.
    #[arg(long)]
    tokens: bool,
    /// Print the program as Lox source instead of S-expressions.
    #[arg(long)]
    source: bool,
    /// Maximum nesting depth accepted by the parser.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = Options {
        tokens: args.tokens,
        as_source: args.source,
        parser: ParserConfig {
            max_depth: args.max_depth,
        },
    };

    match args.path {
        Some(path) => run_file(&path, &options),
        None => run_prompt(&options),
    }
}

fn run_file(path: &Path, options: &Options) -> io::Result<()> {
    info!("parsing {}", path.display());
    let content = fs::read_to_string(path)?;
    let outcome = process(&content, options);
    print_outcome(&outcome)?;
    if outcome.has_errors() {
        std::process::exit(EX_DATAERR);
    }
    Ok(())
}

/// Every line is parsed on its own, errors on one line do not affect the next.
fn run_prompt(options: &Options) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!();
            return Ok(());
        }

        print_outcome(&process(&input, options))?;
    }
}

fn print_outcome(outcome: &Outcome) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(outcome.output.as_bytes())?;
    stdout.flush()?;
    for error in &outcome.errors {
        eprintln!("{}", style(error).for_stderr().red());
    }
    Ok(())
}
