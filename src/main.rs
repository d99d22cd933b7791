//! Rowflow CLI - run the batch ETL pipeline
//!
//! ```bash
//! rowflow run --config pipeline.json   # Full pipeline run
//! rowflow parse input.csv              # Debug: parse only, print JSON
//! ```
//!
//! Configuration loading and argument parsing live here, outside the
//! pipeline core; the core only ever sees a ready [`PipelineConfig`].

use clap::{Parser, Subcommand};
use rowflow::{read_table, run_pipeline, PipelineConfig, RunStatus};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rowflow")]
#[command(about = "Batch ETL pipeline for delimited tabular data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline from a JSON configuration file
    Run {
        /// Pipeline configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Parse an input file and print its rows as JSON
    Parse {
        /// Input delimited file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config } => cmd_run(&config),
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(config_path)
        .map_err(|e| format!("Cannot read config '{}': {}", config_path.display(), e))?;
    let config: PipelineConfig = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid config '{}': {}", config_path.display(), e))?;

    let outcome = run_pipeline(&config);

    eprintln!();
    eprintln!("Status:         {}", outcome.status);
    eprintln!("Rows processed: {}", outcome.log.rows_processed);
    eprintln!("Rows written:   {}", outcome.log.rows_written);
    eprintln!("Duration:       {:.3}s", outcome.log.duration_seconds);
    if let Some(ref error) = outcome.log.error {
        eprintln!("Error:          {}", error);
    }
    if let Some(ref log_file) = outcome.log_file {
        eprintln!("Execution log:  {}", log_file.display());
    }

    if outcome.status == RunStatus::Failure {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Parsing: {}", input.display());

    let table = read_table(input)?;

    eprintln!("   Encoding: {}", table.encoding);
    eprintln!(
        "   Delimiter: '{}'",
        match table.delimiter {
            '\t' => "\\t".to_string(),
            c => c.to_string(),
        }
    );
    eprintln!("   Columns: {}", table.headers.join(", "));
    eprintln!("Parsed {} rows", table.len());

    let json = serde_json::to_string_pretty(&table.rows)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            eprintln!("Output written to: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
