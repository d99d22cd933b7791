//! # Rowflow - batch ETL for delimited tabular data
//!
//! Rowflow ingests one delimited file per run, removes duplicate and
//! null-bearing rows, normalizes and enriches the survivors, validates
//! them against quality rules, persists the valid subset, and records a
//! structured execution log.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────┐   ┌─────────┐   ┌───────────┐   ┌──────────┐   ┌────────┐
//! │ Input    │──▶│ Reader │──▶│ Cleaner │──▶│Transformer│──▶│Validator │──▶│ Writer │
//! │ (CSV/TSV)│   │ (auto) │   │ (dedup) │   │ (coerce)  │   │ (rules)  │   │ (atomic)│
//! └──────────┘   └────────┘   └─────────┘   └───────────┘   └──────────┘   └────────┘
//!                                    orchestrator: timing + execution log
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rowflow::{run_pipeline, PipelineConfig};
//!
//! let config: PipelineConfig = serde_json::from_str(&std::fs::read_to_string("pipeline.json")?)?;
//! let outcome = run_pipeline(&config);
//! println!("{}: {} rows written", outcome.status, outcome.log.rows_written);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - hierarchical error types
//! - [`config`] - per-run configuration
//! - [`models`] - records, tables, reports, execution log
//! - [`reader`] - input parsing with encoding/delimiter auto-detection
//! - [`clean`] - duplicate and null removal
//! - [`transform`] - normalization, coercion, enrichment
//! - [`validate`] - quality rules and partitioning
//! - [`writer`] - atomic delimited output
//! - [`pipeline`] - orchestration and execution log

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Stages
pub mod clean;
pub mod reader;
pub mod transform;
pub mod validate;
pub mod writer;

// Orchestration
pub mod pipeline;

// Console logging
pub mod logs;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{PipelineError, ReadError, TransformError, WriteError};

// =============================================================================
// Re-exports - Configuration & Models
// =============================================================================

pub use config::PipelineConfig;
pub use models::{
    ExecutionLog, RawRecord, RawTable, Record, RecordTable, RuleViolation, RunStatus,
    ValidationReport, SCHEMA_FIELDS,
};

// =============================================================================
// Re-exports - Stages
// =============================================================================

pub use clean::{clean, CleanReport};
pub use reader::{detect_delimiter, detect_encoding, read_table};
pub use transform::{transform, transform_at};
pub use validate::{check_record, threshold_met, validate, ValidationOutcome};
pub use writer::{write_table, OUTPUT_FIELDS};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{run_pipeline, RunOutcome, Stage};
