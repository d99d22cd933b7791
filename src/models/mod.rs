//! Domain models for the rowflow pipeline.
//!
//! This module contains the data structures flowing between stages:
//!
//! - [`RawRecord`] / [`RawTable`] - rows as read, before coercion
//! - [`Record`] / [`RecordTable`] - typed rows after transformation
//! - [`ValidationReport`] - rule violations and counts
//! - [`ExecutionLog`] - the one-per-run structured outcome

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Column names every input file must carry, in canonical order.
pub const SCHEMA_FIELDS: [&str; 6] = ["id", "name", "email", "department", "salary", "hire_date"];

// =============================================================================
// Raw Records (as read)
// =============================================================================

/// One row exactly as read from the input file.
///
/// All fields are kept textual until the transformer coerces them;
/// two rows are exact duplicates when every field compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub salary: String,
    pub hire_date: String,
}

/// Ordered collection of raw rows plus parse metadata.
///
/// Row order is the file's original order and is preserved by every
/// stage unless rows are explicitly removed.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Header row as found in the file.
    pub headers: Vec<String>,
    /// Detected or assumed encoding.
    pub encoding: String,
    /// Detected delimiter, reused for output.
    pub delimiter: char,
    /// Data rows in original order.
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Typed Records (after transformation)
// =============================================================================

/// One fully-typed, normalized row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Unique row identifier.
    pub id: u64,
    pub name: String,
    /// Lower-cased, trimmed.
    pub email: String,
    /// Title-cased; empty when the optional field was absent.
    pub department: String,
    /// Rounded to two decimals.
    pub salary: f64,
    pub hire_date: NaiveDate,
    /// Wall-clock instant of the transformation.
    pub processed_at: DateTime<Utc>,
}

/// Ordered collection of typed rows.
#[derive(Debug, Clone)]
pub struct RecordTable {
    pub records: Vec<Record>,
    /// Carried from the input so the output uses the same delimited format.
    pub delimiter: char,
}

impl RecordTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// Validation Report
// =============================================================================

/// One quality-rule violation.
#[derive(Debug, Clone, Serialize)]
pub struct RuleViolation {
    /// Id of the offending record.
    pub record_id: u64,
    /// Name of the violated rule.
    pub rule: String,
    /// Human-readable detail.
    pub detail: String,
}

/// Outcome of evaluating the rule set against a table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<RuleViolation>,
    pub valid_count: usize,
    pub invalid_count: usize,
}

impl ValidationReport {
    pub fn is_all_valid(&self) -> bool {
        self.invalid_count == 0
    }
}

// =============================================================================
// Execution Log
// =============================================================================

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failure,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Success => write!(f, "success"),
            RunStatus::Failure => write!(f, "failure"),
        }
    }
}

/// Structured record of one pipeline run.
///
/// Exactly one of these is produced per run, success or failure, and
/// persisted under the configured log directory before the run completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionLog {
    pub pipeline_name: String,
    pub run_id: Uuid,
    pub status: RunStatus,
    /// Rows read from the input file.
    pub rows_processed: usize,
    /// Valid rows persisted to the output file.
    pub rows_written: usize,
    pub duration_seconds: f64,
    pub output_path: String,
    /// Taxonomy kind and failing stage, failure runs only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    /// Non-fatal notes: clean-stage drops, partial validation results.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
    pub timestamp: DateTime<Utc>,
}
