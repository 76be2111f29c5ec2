use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use astgen_core::admission::AdmissionBounds;
use astgen_core::batch::{BatchOptions, run_batch};
use astgen_core::parser::ParseMode;
use astgen_core::single::process_one;

#[derive(Debug, Parser)]
#[command(
    name = "astgen",
    version,
    about = "Exports source files as flattened JSON ASTs for ML corpora",
    long_about = "astgen parses source files and flattens each syntax tree into an ordered \
                  list of node records (id, type, value, children). Normal mode converts one \
                  file; batch mode expands a glob, processes files over a bounded worker pool \
                  and writes three correlated outputs: accepted ASTs, the matching file list \
                  and a failure log."
)]
pub struct Cli {
    /// File to parse, or glob pattern of inputs in batch mode
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Output file in normal mode, output prefix in batch mode
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Parse a method body instead of a full compilation unit
    #[arg(short, long)]
    pub method: bool,

    /// Process a batch of input; INPUT is treated as a glob pattern
    #[arg(long, requires = "output")]
    pub batch: bool,

    /// Minimum number of nodes (batch mode only)
    #[arg(long, value_name = "N", default_value_t = 20)]
    pub min_nodes: usize,

    /// Maximum number of nodes (batch mode only)
    #[arg(long, value_name = "N", default_value_t = 30_000)]
    pub max_nodes: usize,

    /// Number of parallel workers; 0 means available hardware parallelism
    #[arg(short = 'j', long, value_name = "N", default_value_t = 0)]
    pub workers: usize,
}

pub fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let _guard = astgen_core::logging::init_logging("cli", true);

    let parser = astgen_java::JavaParser::new()?;
    let mode = if cli.method {
        ParseMode::Fragment
    } else {
        ParseMode::CompilationUnit
    };

    if cli.batch {
        // clap's `requires` already rejects --batch without --output.
        let prefix = cli
            .output
            .ok_or("--output is required in batch mode")?;
        let options = BatchOptions {
            bounds: AdmissionBounds {
                min_nodes: cli.min_nodes,
                max_nodes: cli.max_nodes,
            },
            mode,
            workers: cli.workers,
        };
        let summary = run_batch(&parser, &cli.input, &prefix, &options)?;
        info!(
            "batch complete: {}/{} files accepted",
            summary.accepted, summary.total
        );
    } else {
        process_one(&parser, Path::new(&cli.input), cli.output.as_deref(), mode)?;
    }

    Ok(())
}
