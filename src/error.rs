//! Error types for the rowflow pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ReadError`] - input file and parsing errors
//! - [`TransformError`] - field coercion errors
//! - [`WriteError`] - output persistence errors
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries. Each
//! [`PipelineError`] maps to a taxonomy kind and a failing stage,
//! both of which end up in the execution log.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Read Errors
// =============================================================================

/// Errors while reading and parsing the input file.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Input path does not exist.
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode file content.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// File has no content at all.
    #[error("Input file is empty")]
    EmptyFile,

    /// Header line yielded no column names.
    #[error("No headers found in input")]
    NoHeaders,

    /// A schema column is absent from the header.
    #[error("Missing column in header: {0}")]
    MissingColumn(String),

    /// A data row does not match the header width.
    #[error("Line {line}: expected {expected} fields, found {found}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
}

// =============================================================================
// Transform Errors
// =============================================================================

/// Errors while coercing raw fields to their target types.
///
/// Always fatal: downstream validation assumes well-typed fields,
/// so an uncoercible value means the input is corrupt, not merely dirty.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A field value could not be coerced to its declared type.
    #[error("Record '{record_id}': field '{field}' value '{value}' is not a valid {expected}")]
    Uncoercible {
        record_id: String,
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl TransformError {
    pub fn uncoercible(
        record_id: impl Into<String>,
        field: &'static str,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::Uncoercible {
            record_id: record_id.into(),
            field,
            value: value.into(),
            expected,
        }
    }
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors while persisting the output file.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Destination not writable, disk full, rename failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// Row serialization failed.
    #[error("Failed to serialize output: {0}")]
    Serialize(String),
}

impl From<csv::Error> for WriteError {
    fn from(e: csv::Error) -> Self {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => WriteError::Io(io),
            other => WriteError::Serialize(format!("{:?}", other)),
        }
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::pipeline::run_pipeline`]'s
/// internal stage sequence. It wraps all stage errors and adds the
/// validation threshold variant, which is decided at orchestration level.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reader error.
    #[error("{0}")]
    Read(#[from] ReadError),

    /// Transformer error.
    #[error("{0}")]
    Transform(#[from] TransformError),

    /// Writer error.
    #[error("{0}")]
    Write(#[from] WriteError),

    /// Too few records survived validation.
    #[error("Only {valid} of {total} records valid, required fraction {required}")]
    ValidationThreshold {
        valid: usize,
        total: usize,
        required: f64,
    },
}

impl PipelineError {
    /// Taxonomy kind, as recorded in the execution log.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Read(ReadError::NotFound(_)) => "InputNotFound",
            PipelineError::Read(_) => "ParseError",
            PipelineError::Transform(_) => "TransformError",
            PipelineError::ValidationThreshold { .. } => "ValidationThresholdError",
            PipelineError::Write(_) => "WriteError",
        }
    }

    /// Name of the stage the error surfaced in.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Read(_) => "reading",
            PipelineError::Transform(_) => "transforming",
            PipelineError::ValidationThreshold { .. } => "validating",
            PipelineError::Write(_) => "writing",
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for reader operations.
pub type ReadResult<T> = Result<T, ReadError>;

/// Result type for transformer operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for writer operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ReadError -> PipelineError
        let read_err = ReadError::NoHeaders;
        let pipeline_err: PipelineError = read_err.into();
        assert!(pipeline_err.to_string().contains("headers"));

        // TransformError -> PipelineError
        let transform_err = TransformError::uncoercible("17", "salary", "abc", "number");
        let pipeline_err: PipelineError = transform_err.into();
        assert!(pipeline_err.to_string().contains("salary"));
        assert!(pipeline_err.to_string().contains("17"));
    }

    #[test]
    fn test_kind_mapping() {
        let not_found: PipelineError = ReadError::NotFound(PathBuf::from("in.csv")).into();
        assert_eq!(not_found.kind(), "InputNotFound");

        let parse: PipelineError = ReadError::RowWidth {
            line: 3,
            expected: 6,
            found: 4,
        }
        .into();
        assert_eq!(parse.kind(), "ParseError");

        let threshold = PipelineError::ValidationThreshold {
            valid: 1,
            total: 10,
            required: 0.5,
        };
        assert_eq!(threshold.kind(), "ValidationThresholdError");
        assert_eq!(threshold.stage(), "validating");
    }

    #[test]
    fn test_row_width_message() {
        let err = ReadError::RowWidth {
            line: 5,
            expected: 6,
            found: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("Line 5"));
        assert!(msg.contains("expected 6"));
        assert!(msg.contains("found 3"));
    }
}
