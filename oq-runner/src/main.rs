mod repl;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use oq_core::dialect::Dialect;
use oq_core::parser::ParserConfig;
use oq_interpreter::EvaluatorConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use runner::ExecuteError;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Keyword dialect active at the start of the input (eng, trk or qzq)
    #[arg(short, long, default_value = "eng")]
    dialect: String,
    /// Maximum depth of nested function calls
    #[arg(long, default_value_t = EvaluatorConfig::default().max_call_depth)]
    max_call_depth: usize,
    /// Maximum depth of nested expressions
    #[arg(long, default_value_t = ParserConfig::default().max_nesting)]
    max_nesting: usize,
    /// Raise the log level (-v info, -vv debug, -vvv trace). RUST_LOG wins
    /// when set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Script to run. Starts the REPL when absent.
    path: Option<PathBuf>,
}

/// Options shared by batch mode and the REPL.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub dialect: Dialect,
    pub parser: ParserConfig,
    pub evaluator: EvaluatorConfig,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            dialect: Dialect::resolve(&self.dialect),
            parser: ParserConfig {
                max_nesting: self.max_nesting,
            },
            evaluator: EvaluatorConfig {
                max_call_depth: self.max_call_depth,
            },
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let settings = cli.settings();

    let Some(path) = cli.path else {
        return match repl::start(settings) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {}", err);
                ExitCode::FAILURE
            }
        };
    };

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: could not read {}: {}", path.display(), err);
            return ExitCode::FAILURE;
        }
    };

    match runner::execute(&source, settings) {
        Ok(Some(object)) => {
            println!("{}", object);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(ExecuteError::Parse(errors)) => {
            eprintln!("parser errors:");
            for error in errors {
                eprintln!("\t{}", error);
            }
            ExitCode::FAILURE
        }
        Err(ExecuteError::Evaluation(error)) => {
            eprintln!("ERROR: {}", error);
            ExitCode::FAILURE
        }
    }
}
