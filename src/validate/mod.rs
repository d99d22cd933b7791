//! Quality-rule evaluation.
//!
//! Every record is checked against the fixed rule set; one violation
//! marks it invalid. The table is partitioned into a valid subset
//! (forwarded to the writer, original order kept) and the violations are
//! collected in a [`ValidationReport`]. Per-record defects never fail the
//! run here; whether too few records survived is a pipeline-level
//! decision made against the configured threshold.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::models::{Record, RecordTable, RuleViolation, ValidationReport};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("invalid email regex")
});

/// A validated table: the valid subset plus the full report.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub valid: RecordTable,
    pub report: ValidationReport,
}

/// Evaluate the rule set against every record and partition the table.
pub fn validate(table: RecordTable, config: &PipelineConfig) -> ValidationOutcome {
    let mut report = ValidationReport::default();
    let mut valid = Vec::with_capacity(table.records.len());

    for record in table.records {
        let violations = check_record(&record, config);
        if violations.is_empty() {
            report.valid_count += 1;
            valid.push(record);
        } else {
            report.invalid_count += 1;
            report.violations.extend(violations);
        }
    }

    ValidationOutcome {
        valid: RecordTable {
            records: valid,
            delimiter: table.delimiter,
        },
        report,
    }
}

/// All rule violations for one record. Empty means valid.
pub fn check_record(record: &Record, config: &PipelineConfig) -> Vec<RuleViolation> {
    let mut violations = Vec::new();

    if record.salary < 0.0 {
        violations.push(violation(
            record,
            "non_negative_salary",
            format!("salary {} is negative", record.salary),
        ));
    }

    if !EMAIL_RE.is_match(&record.email) {
        violations.push(violation(
            record,
            "email_shape",
            format!("'{}' is not a local@domain address", record.email),
        ));
    }

    if record.hire_date > record.processed_at.date_naive() {
        violations.push(violation(
            record,
            "hire_date_not_future",
            format!("hire date {} is in the future", record.hire_date),
        ));
    }

    // Empty allow-list disables the department rule.
    if !config.valid_departments.is_empty()
        && !config
            .valid_departments
            .iter()
            .any(|d| d.eq_ignore_ascii_case(&record.department))
    {
        violations.push(violation(
            record,
            "department_allowed",
            format!("department '{}' is not in the allow-list", record.department),
        ));
    }

    violations
}

/// Whether enough records survived validation for the run to proceed.
///
/// At least one valid record is always required; on top of that the
/// valid fraction of `total` (the post-clean row count) must reach
/// `min_fraction`.
pub fn threshold_met(report: &ValidationReport, total: usize, min_fraction: f64) -> bool {
    if report.valid_count == 0 || total == 0 {
        return false;
    }
    report.valid_count as f64 / total as f64 >= min_fraction
}

fn violation(record: &Record, rule: &str, detail: String) -> RuleViolation {
    RuleViolation {
        record_id: record.id,
        rule: rule.to_string(),
        detail,
    }
}
