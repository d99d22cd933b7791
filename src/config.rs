//! Pipeline configuration.
//!
//! A [`PipelineConfig`] is built by an external loader (the CLI reads it
//! from a JSON file) and handed to [`crate::pipeline::run_pipeline`] by
//! shared reference. It is immutable for the duration of a run; no stage
//! keeps a copy.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Static configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name recorded in the execution log.
    pub pipeline_name: String,

    /// Delimited input file.
    pub input_path: PathBuf,

    /// Destination for the valid records. Overwritten if present.
    pub output_path: PathBuf,

    /// Directory receiving one execution log file per run.
    pub log_path: PathBuf,

    /// Allowed department values. Empty list disables the rule.
    #[serde(default)]
    pub valid_departments: Vec<String>,

    /// Minimum fraction of post-clean records that must pass validation.
    /// Independently of this, at least one valid record is always required.
    #[serde(default)]
    pub min_valid_fraction: f64,
}

impl PipelineConfig {
    /// The configured threshold, clamped to `[0, 1]`.
    pub fn min_valid_fraction(&self) -> f64 {
        self.min_valid_fraction.clamp(0.0, 1.0)
    }
}
