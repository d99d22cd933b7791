//! Output persistence.
//!
//! Serializes the valid table back to the delimited format it came from,
//! in canonical field order with `processed_at` appended. The write is
//! all-or-nothing: rows are serialized to a temporary sibling file which
//! is renamed over the destination, so a failed run never leaves a
//! partial output behind.

use std::path::{Path, PathBuf};

use crate::error::{WriteError, WriteResult};
use crate::models::RecordTable;

/// Output columns: transformer's canonical order plus `processed_at`.
pub const OUTPUT_FIELDS: [&str; 7] = [
    "id",
    "name",
    "email",
    "department",
    "salary",
    "hire_date",
    "processed_at",
];

/// Persist the table to `path`, overwriting any existing file.
///
/// Returns the number of data rows written.
pub fn write_table(table: &RecordTable, path: &Path) -> WriteResult<usize> {
    let bytes = serialize(table)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp = tmp_path(path);
    std::fs::write(&tmp, bytes)?;

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(WriteError::Io(e));
    }

    Ok(table.len())
}

/// Serialize the table to delimited bytes without touching the filesystem.
pub fn serialize(table: &RecordTable) -> WriteResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(table.delimiter as u8)
        .from_writer(Vec::new());

    writer.write_record(OUTPUT_FIELDS)?;

    for record in &table.records {
        writer.write_record([
            record.id.to_string(),
            record.name.clone(),
            record.email.clone(),
            record.department.clone(),
            format!("{:.2}", record.salary),
            record.hire_date.format("%Y-%m-%d").to_string(),
            record.processed_at.to_rfc3339(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| WriteError::Serialize(e.to_string()))
}

fn tmp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!("{}.tmp", file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(id: u64) -> Record {
        Record {
            id,
            name: "Alice".into(),
            email: "alice@example.com".into(),
            department: "Sales".into(),
            salary: 50_000.125,
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            processed_at: "2024-05-01T12:00:00Z".parse().unwrap(),
        }
    }

    fn table(records: Vec<Record>, delimiter: char) -> RecordTable {
        RecordTable { records, delimiter }
    }

    #[test]
    fn test_header_and_field_order() {
        let bytes = serialize(&table(vec![record(1)], ',')).unwrap();
        let content = String::from_utf8(bytes).unwrap();
        let mut lines = content.lines();

        assert_eq!(
            lines.next().unwrap(),
            "id,name,email,department,salary,hire_date,processed_at"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("1,Alice,alice@example.com,Sales,50000.13,2020-01-01,"));
    }

    #[test]
    fn test_input_delimiter_reused() {
        let bytes = serialize(&table(vec![record(1)], ';')).unwrap();
        let content = String::from_utf8(bytes).unwrap();
        assert!(content.starts_with("id;name;email;department;salary;hire_date;processed_at"));
    }

    #[test]
    fn test_write_creates_parent_and_counts_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out.csv");

        let written = write_table(&table(vec![record(1), record(2)], ','), &path).unwrap();
        assert_eq!(written, 2);
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale content").unwrap();

        write_table(&table(vec![record(9)], ','), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert!(content.contains("9,Alice"));
    }

    #[test]
    fn test_no_tmp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        write_table(&table(vec![record(1)], ','), &path).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["out.csv"]);
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let written = write_table(&table(vec![], ','), &path).unwrap();
        assert_eq!(written, 0);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
