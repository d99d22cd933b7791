//! Duplicate and null removal.
//!
//! Cleaning never fails: dropped rows are an expected steady-state
//! outcome, counted in the [`CleanReport`] and surfaced in the execution
//! log rather than raised as errors. The pass is idempotent, and after it
//! completes no two surviving rows share an `id`.

use std::collections::HashSet;

use crate::models::{RawRecord, RawTable};

/// Per-category counts of rows removed by one cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub input_rows: usize,
    /// Rows equal to an earlier row in every field.
    pub exact_duplicates: usize,
    /// Rows with an empty required field (`id`, `name`, `email`).
    pub missing_required: usize,
    /// Rows repeating an already-seen id with different content.
    pub duplicate_ids: usize,
    pub output_rows: usize,
}

impl CleanReport {
    pub fn rows_removed(&self) -> usize {
        self.exact_duplicates + self.missing_required + self.duplicate_ids
    }

    /// Warning line for the execution log, when anything was dropped.
    pub fn summary(&self) -> Option<String> {
        if self.rows_removed() == 0 {
            return None;
        }
        Some(format!(
            "clean: removed {} of {} rows ({} exact duplicates, {} missing required fields, {} duplicate ids)",
            self.rows_removed(),
            self.input_rows,
            self.exact_duplicates,
            self.missing_required,
            self.duplicate_ids,
        ))
    }
}

/// Remove duplicate and null-bearing rows, keeping first occurrences
/// in original order.
pub fn clean(table: RawTable) -> (RawTable, CleanReport) {
    let mut report = CleanReport {
        input_rows: table.rows.len(),
        ..CleanReport::default()
    };

    let mut seen_rows: HashSet<RawRecord> = HashSet::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(table.rows.len());

    for row in table.rows {
        if seen_rows.contains(&row) {
            report.exact_duplicates += 1;
            continue;
        }
        seen_rows.insert(row.clone());

        if has_missing_required(&row) {
            report.missing_required += 1;
            continue;
        }

        if seen_ids.contains(&row.id) {
            report.duplicate_ids += 1;
            continue;
        }
        seen_ids.insert(row.id.clone());

        kept.push(row);
    }

    report.output_rows = kept.len();

    let cleaned = RawTable {
        headers: table.headers,
        encoding: table.encoding,
        delimiter: table.delimiter,
        rows: kept,
    };

    (cleaned, report)
}

/// Required fields must be non-empty; optional fields (department) may
/// stay blank.
fn has_missing_required(row: &RawRecord) -> bool {
    row.id.is_empty() || row.name.is_empty() || row.email.is_empty()
}
