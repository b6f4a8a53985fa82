//! `edict` — parse a policy file and print what came out.
//!
//! Prints the AST in debug form (or JSON with `--json`) on success; on
//! failure, prints the aggregated error list to stderr and exits non-zero.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use edict_base::Arena;
use edict_language::{parse, InfixOperators, ParseOptions};

#[derive(ClapParser)]
#[command(name = "edict", version, about = "Parse an edict policy file")]
struct Args {
    /// Policy file to parse.
    file: PathBuf,

    /// Print the AST as JSON instead of debug form.
    #[arg(long)]
    json: bool,

    /// Enable packrat memoization.
    #[arg(long)]
    memoize: bool,

    /// Trace rule entries and exits (set RUST_LOG=debug to see them).
    #[arg(long)]
    debug: bool,

    /// Let semantic hard stops panic instead of becoming diagnostics.
    #[arg(long)]
    no_recover: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let bytes = match fs::read(&args.file) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("error: {}: {}", args.file.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let file = args.file.display().to_string();
    let arena = Arena::new();
    let operators = InfixOperators::default();
    let options = ParseOptions {
        debug: args.debug,
        memoize: args.memoize,
        recover: !args.no_recover,
    };

    match parse(&file, &bytes, &arena, &operators, options) {
        Ok(program) => {
            if args.json {
                match serde_json::to_string_pretty(&program) {
                    Ok(json) => println!("{}", json),
                    Err(err) => {
                        eprintln!("error: {}", err);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                println!("{:#?}", program);
            }
            ExitCode::SUCCESS
        }
        Err(errors) => {
            eprintln!("{}", errors);
            ExitCode::FAILURE
        }
    }
}
