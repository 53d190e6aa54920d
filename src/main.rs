// ==============================================================================
// main.rs - Enrichment Splitter Entry Point
// ==============================================================================
// Description: Command line entry point for chart and cluster report reformatting
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use enrichment_splitter::config::{DEFAULT_OUTPUT_DIR, DEFAULT_ROWS_PER_PART};
use enrichment_splitter::{BatchReformatter, Mode, ReformatterConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tab-delimited chart or cluster report
    input: PathBuf,

    /// Report type; omitted means chart
    #[arg(value_enum, default_value_t = Mode::Chart)]
    mode: Mode,

    /// Directory receiving the generated files
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Data rows per part file
    #[arg(short, long, default_value_t = DEFAULT_ROWS_PER_PART)]
    rows_per_part: usize,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enrichment_splitter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Usage errors exit 1; --help and --version exit 0
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let config = ReformatterConfig::default()
        .with_output_dir(args.output_dir)
        .with_rows_per_part(args.rows_per_part);

    if let Err(e) = config.validate() {
        println!("ERROR: {}", e);
        println!("{}", Args::command().render_usage());
        process::exit(1);
    }

    info!("Enrichment Splitter starting...");

    let reformatter = BatchReformatter::new(config);
    match reformatter.run(&args.input, args.mode) {
        Ok(summary) => {
            info!(
                "Wrote {} files to {:?}",
                summary.files_written(),
                summary.output_dir
            );
        }
        Err(e) => {
            println!("ERROR: {:#}", e);
            process::exit(1);
        }
    }
}
