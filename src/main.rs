//! csv2beancount CLI
//!
//! Command-line interface for converting bank CSV exports into beancount entries.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- convert export.csv > ledger.beancount
//! cargo run -- --config ing.toml convert export.csv > ledger.beancount
//! cargo run -- convert --template entry.tmpl export.csv
//! cargo run -- convert --strategy async --batch-size 2000 --max-concurrent 8 export.csv
//! cargo run -- version
//! ```
//!
//! # Processing Strategies
//!
//! - **sync**: Streaming, one row at a time (default)
//! - **async**: Batched reading with parallel classification
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (bad config, file not found, malformed CSV, output failure, etc.)

use csv2beancount::cli::{self, Command, ConvertArgs, StrategyType};
use csv2beancount::config::Config;
use csv2beancount::io::load_template;
use csv2beancount::strategy::{self, ConvertJob};
use csv2beancount::types::ConvertError;
use std::path::Path;
use std::process;
use tracing::info;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const COMMIT: &str = match option_env!("GIT_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

fn main() {
    let args = cli::parse_args();
    cli::init_logging(&args);

    match &args.command {
        Command::Version => {
            println!("Version: {}\nCommit: {}", VERSION, COMMIT);
        }
        Command::Convert(convert) => {
            if let Err(e) = run_convert(args.config.as_deref(), convert) {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    }
}

fn run_convert(config_path: Option<&Path>, args: &ConvertArgs) -> Result<(), ConvertError> {
    let config = Config::load(config_path)?;
    let template = load_template(args.template.as_deref());
    let job = ConvertJob::new(config.layout, config.rules, template);

    let batch_config = if args.strategy == StrategyType::Async {
        Some(args.to_batch_config())
    } else {
        None
    };
    let strategy = strategy::create_strategy(args.strategy, batch_config);

    // Output goes to stdout
    let mut output = std::io::stdout().lock();
    let stats = strategy.process(&args.input_file, &job, &mut output)?;

    info!(
        written = stats.written,
        render_failures = stats.render_failures,
        "conversion finished"
    );
    Ok(())
}
