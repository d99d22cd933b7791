//! Pipeline orchestration.
//!
//! Sequences the stages (read → clean → transform → validate → write),
//! measures duration, and finalizes exactly one [`ExecutionLog`] per run.
//! Any fatal stage error short-circuits to the failure path; both paths
//! persist the log before the run is considered complete.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::clean;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_error, log_info, log_success, log_warning};
use crate::models::{ExecutionLog, RunStatus};
use crate::reader;
use crate::transform;
use crate::validate;
use crate::writer;

// =============================================================================
// Stages
// =============================================================================

/// Orchestrator states. A run advances through these in order; `Failed`
/// is terminal and reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Reading,
    Cleaning,
    Transforming,
    Validating,
    Writing,
    Logged,
    Done,
    Failed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Reading => "reading",
            Stage::Cleaning => "cleaning",
            Stage::Transforming => "transforming",
            Stage::Validating => "validating",
            Stage::Writing => "writing",
            Stage::Logged => "logged",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

fn enter(stage: Stage) {
    log_info(format!("→ {}", stage));
}

// =============================================================================
// Run Outcome
// =============================================================================

/// What the single entry point hands back to the caller.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub log: ExecutionLog,
    /// Where the execution log was persisted, when persisting succeeded.
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct RunCounts {
    rows_processed: usize,
    rows_written: usize,
}

// =============================================================================
// Entry Point
// =============================================================================

/// Run the pipeline described by `config`.
///
/// Every run, successful or not, finalizes one [`ExecutionLog`] and
/// attempts to persist it under `config.log_path` before returning.
pub fn run_pipeline(config: &PipelineConfig) -> RunOutcome {
    let started = Instant::now();
    let run_id = Uuid::new_v4();

    log_info(format!(
        "Pipeline '{}' starting (run {})",
        config.pipeline_name, run_id
    ));

    let mut warnings = Vec::new();
    let mut counts = RunCounts::default();
    let result = execute(config, &mut warnings, &mut counts);

    let duration_seconds = started.elapsed().as_secs_f64();

    let (status, error) = match &result {
        Ok(()) => {
            log_success(format!(
                "Pipeline completed: {} rows written in {:.3}s",
                counts.rows_written, duration_seconds
            ));
            (RunStatus::Success, None)
        }
        Err(e) => {
            let description = format!("{} during {}: {}", e.kind(), e.stage(), e);
            log_error(&description);
            (RunStatus::Failure, Some(description))
        }
    };

    let log = ExecutionLog {
        pipeline_name: config.pipeline_name.clone(),
        run_id,
        status,
        rows_processed: counts.rows_processed,
        rows_written: counts.rows_written,
        duration_seconds,
        output_path: config.output_path.display().to_string(),
        error,
        warnings,
        timestamp: Utc::now(),
    };

    // Both paths pass through here before the run is complete.
    enter(Stage::Logged);
    let log_file = match write_execution_log(&log, &config.log_path) {
        Ok(path) => {
            log_success(format!("Execution log saved to {}", path.display()));
            Some(path)
        }
        Err(e) => {
            log_error(format!("Could not persist execution log: {}", e));
            None
        }
    };

    enter(match status {
        RunStatus::Success => Stage::Done,
        RunStatus::Failure => Stage::Failed,
    });

    RunOutcome { status, log, log_file }
}

/// The stage sequence. Tables move by value from stage to stage; no
/// stage keeps a reference after handing its table on.
fn execute(
    config: &PipelineConfig,
    warnings: &mut Vec<String>,
    counts: &mut RunCounts,
) -> PipelineResult<()> {
    enter(Stage::Reading);
    let raw = reader::read_table(&config.input_path)?;
    counts.rows_processed = raw.len();
    log_success(format!(
        "Read {} rows ({}, delimiter '{}')",
        raw.len(),
        raw.encoding,
        format_delimiter(raw.delimiter)
    ));

    enter(Stage::Cleaning);
    let (cleaned, clean_report) = clean::clean(raw);
    match clean_report.summary() {
        Some(summary) => {
            log_warning(&summary);
            warnings.push(summary);
        }
        None => log_success(format!("All {} rows kept", cleaned.len())),
    }

    enter(Stage::Transforming);
    let typed = transform::transform(cleaned)?;
    log_success(format!("Transformed {} records", typed.len()));

    enter(Stage::Validating);
    let outcome = validate::validate(typed, config);
    let report = &outcome.report;
    let total = report.valid_count + report.invalid_count;

    if !validate::threshold_met(report, total, config.min_valid_fraction()) {
        return Err(PipelineError::ValidationThreshold {
            valid: report.valid_count,
            total,
            required: config.min_valid_fraction(),
        });
    }

    if report.invalid_count > 0 {
        let summary = format!(
            "validation: {} of {} records invalid; writing valid subset only",
            report.invalid_count, total
        );
        log_warning(&summary);
        warnings.push(summary);
        for violation in report.violations.iter().take(5) {
            log_warning(format!(
                "record {}: {} ({})",
                violation.record_id, violation.rule, violation.detail
            ));
        }
    } else {
        log_success(format!("All {} records valid", report.valid_count));
    }

    enter(Stage::Writing);
    counts.rows_written = writer::write_table(&outcome.valid, &config.output_path)?;
    log_success(format!(
        "Wrote {} rows to {}",
        counts.rows_written,
        config.output_path.display()
    ));

    Ok(())
}

/// Persist the execution log as pretty-printed JSON named after the run
/// timestamp, e.g. `execution_20240501_120000.json`.
fn write_execution_log(log: &ExecutionLog, dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let file = dir.join(format!(
        "execution_{}.json",
        log.timestamp.format("%Y%m%d_%H%M%S")
    ));

    let json = serde_json::to_string_pretty(log)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(&file, json)?;

    Ok(file)
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
