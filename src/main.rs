//! PLC Language CLI
//!
//! Command-line interface for running programs.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use colored::Colorize;
use num_traits::ToPrimitive;
use tracing::Level;

use plc_lang::{check, lex, run_with_config, Config, Diagnostic, DivisionScale, PlcError};

/// Run a program: lex, parse, analyze and interpret it, exiting with the
/// value returned by `main()`.
#[derive(Parser, Debug)]
#[command(name = "plc", version, about, long_about = None)]
struct Args {
    /// Source file to run
    file: PathBuf,

    /// Show tokenization output (lexer only)
    #[arg(short, long)]
    tokens: bool,

    /// Lex, parse and analyze without running
    #[arg(short, long)]
    check: bool,

    /// Fractional digits kept by Decimal division, instead of the dividend's
    #[arg(long, value_name = "DIGITS")]
    scale: Option<u32>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let filename = args.file.display().to_string();
    let source = fs::read_to_string(&args.file).unwrap_or_else(|e| {
        eprintln!("{} Failed to read file '{}': {}", "error:".red().bold(), filename, e);
        process::exit(1);
    });

    let result = if args.tokens {
        show_tokens(&source, &filename)
    } else if args.check {
        check_file(&source, &filename)
    } else {
        let mut config = Config::new();
        if let Some(scale) = args.scale {
            config = config.with_division_scale(DivisionScale::Fixed(scale));
        }
        run_file(&source, &config)
    };

    match result {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("{}", Diagnostic::with_source(error, &source).filename(filename));
            process::exit(1);
        }
    }
}

/// Log to stderr so program output on stdout stays clean
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run a program and turn `main()`'s value into a process exit code
fn run_file(source: &str, config: &Config) -> Result<i32, PlcError> {
    let outcome = run_with_config(source, config)?;

    match outcome.exit_value.to_i32() {
        Some(code) => Ok(code),
        None => {
            eprintln!(
                "{} exit value {} does not fit in an exit code",
                "error:".red().bold(),
                outcome.exit_value
            );
            Ok(1)
        }
    }
}

fn check_file(source: &str, filename: &str) -> Result<i32, PlcError> {
    let ast = check(source)?;

    println!(
        "{} {}: {} global(s), {} function(s)",
        "ok".green().bold(),
        filename,
        ast.globals.len(),
        ast.functions.len()
    );
    Ok(0)
}

/// Show tokens from lexing a file
fn show_tokens(source: &str, filename: &str) -> Result<i32, PlcError> {
    let tokens = lex(source)?;

    println!("Tokens for '{}':", filename);
    println!("{}", "=".repeat(60));

    for (i, token) in tokens.iter().enumerate() {
        println!("{:4}: {:12} @{:<6} | {}", i, token.kind.to_string(), token.offset, token.text);
    }

    println!("{}", "=".repeat(60));
    println!("Total tokens: {}", tokens.len());

    Ok(0)
}
