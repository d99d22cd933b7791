//! Normalization, coercion, and enrichment.
//!
//! Turns a cleaned [`RawTable`] into a typed [`RecordTable`]: emails are
//! lower-cased and trimmed, departments title-cased, salaries coerced to
//! two-decimal numbers, hire dates canonicalized to `YYYY-MM-DD`, and a
//! `processed_at` timestamp is stamped on every record. An uncoercible
//! field aborts the whole run; validation downstream assumes well-typed
//! fields.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{TransformError, TransformResult};
use crate::models::{RawRecord, RawTable, Record, RecordTable};

/// Date layouts accepted on input. Output is always `%Y-%m-%d`.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Transform a cleaned table, stamping records with the current instant.
pub fn transform(table: RawTable) -> TransformResult<RecordTable> {
    transform_at(table, Utc::now())
}

/// Transform a cleaned table with an explicit `processed_at` instant.
pub fn transform_at(
    table: RawTable,
    processed_at: DateTime<Utc>,
) -> TransformResult<RecordTable> {
    let mut records = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        records.push(transform_row(row, processed_at)?);
    }

    Ok(RecordTable {
        records,
        delimiter: table.delimiter,
    })
}

fn transform_row(row: &RawRecord, processed_at: DateTime<Utc>) -> TransformResult<Record> {
    let id = row
        .id
        .trim()
        .parse::<u64>()
        .map_err(|_| TransformError::uncoercible(&row.id, "id", &row.id, "integer"))?;

    let salary = parse_salary(row)?;
    let hire_date = parse_hire_date(row)?;

    Ok(Record {
        id,
        name: row.name.trim().to_string(),
        email: row.email.trim().to_lowercase(),
        department: title_case(&row.department),
        salary,
        hire_date,
        processed_at,
    })
}

fn parse_salary(row: &RawRecord) -> TransformResult<f64> {
    let parsed = row.salary.trim().parse::<f64>();
    match parsed {
        Ok(v) if v.is_finite() => Ok(round_cents(v)),
        _ => Err(TransformError::uncoercible(
            &row.id,
            "salary",
            &row.salary,
            "number",
        )),
    }
}

fn parse_hire_date(row: &RawRecord) -> TransformResult<NaiveDate> {
    let value = row.hire_date.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    Err(TransformError::uncoercible(
        &row.id,
        "hire_date",
        &row.hire_date,
        "calendar date",
    ))
}

/// Round to two decimal places.
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Title-case each whitespace-separated word.
fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, email: &str, department: &str, salary: &str, hire_date: &str) -> RawRecord {
        RawRecord {
            id: id.into(),
            name: "Alice".into(),
            email: email.into(),
            department: department.into(),
            salary: salary.into(),
            hire_date: hire_date.into(),
        }
    }

    fn table(rows: Vec<RawRecord>) -> RawTable {
        RawTable {
            headers: crate::models::SCHEMA_FIELDS.iter().map(|s| s.to_string()).collect(),
            encoding: "utf-8".into(),
            delimiter: ',',
            rows,
        }
    }

    fn now() -> DateTime<Utc> {
        "2024-05-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_email_lowercased_and_trimmed() {
        let input = table(vec![raw("1", "  Alice.B@Example.COM ", "sales", "100", "2020-01-01")]);
        let out = transform_at(input, now()).unwrap();
        assert_eq!(out.records[0].email, "alice.b@example.com");
    }

    #[test]
    fn test_department_title_cased() {
        let input = table(vec![
            raw("1", "a@t.co", "human resources", "100", "2020-01-01"),
            raw("2", "b@t.co", "SALES", "100", "2020-01-01"),
        ]);
        let out = transform_at(input, now()).unwrap();
        assert_eq!(out.records[0].department, "Human Resources");
        assert_eq!(out.records[1].department, "Sales");
    }

    #[test]
    fn test_salary_rounded_to_cents() {
        let input = table(vec![raw("1", "a@t.co", "x", "1234.5678", "2020-01-01")]);
        let out = transform_at(input, now()).unwrap();
        assert_eq!(out.records[0].salary, 1234.57);
    }

    #[test]
    fn test_negative_salary_coerces() {
        // Sign errors are a validation concern, not a coercion failure.
        let input = table(vec![raw("1", "a@t.co", "x", "-10", "2020-01-01")]);
        let out = transform_at(input, now()).unwrap();
        assert_eq!(out.records[0].salary, -10.0);
    }

    #[test]
    fn test_date_layouts_canonicalized() {
        let input = table(vec![
            raw("1", "a@t.co", "x", "1", "2020-03-04"),
            raw("2", "b@t.co", "x", "1", "2020/03/04"),
            raw("3", "c@t.co", "x", "1", "03/04/2020"),
            raw("4", "d@t.co", "x", "1", "04.03.2020"),
        ]);
        let out = transform_at(input, now()).unwrap();
        let expected = NaiveDate::from_ymd_opt(2020, 3, 4).unwrap();
        for record in &out.records {
            assert_eq!(record.hire_date, expected);
        }
    }

    #[test]
    fn test_processed_at_stamped_on_all() {
        let instant = now();
        let input = table(vec![
            raw("1", "a@t.co", "x", "1", "2020-01-01"),
            raw("2", "b@t.co", "x", "1", "2020-01-01"),
        ]);
        let out = transform_at(input, instant).unwrap();
        assert!(out.records.iter().all(|r| r.processed_at == instant));
    }

    #[test]
    fn test_bad_salary_names_record() {
        let input = table(vec![raw("42", "a@t.co", "x", "lots", "2020-01-01")]);
        let err = transform_at(input, now()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("salary"));
        assert!(msg.contains("lots"));
    }

    #[test]
    fn test_bad_date_names_record() {
        let input = table(vec![raw("7", "a@t.co", "x", "1", "soon")]);
        let err = transform_at(input, now()).unwrap_err();
        assert!(err.to_string().contains("hire_date"));
        assert!(err.to_string().contains("7"));
    }

    #[test]
    fn test_bad_id_fails() {
        let input = table(vec![raw("first", "a@t.co", "x", "1", "2020-01-01")]);
        let err = transform_at(input, now()).unwrap_err();
        assert!(err.to_string().contains("id"));
    }

    #[test]
    fn test_order_preserved() {
        let input = table(vec![
            raw("5", "a@t.co", "x", "1", "2020-01-01"),
            raw("3", "b@t.co", "x", "1", "2020-01-01"),
            raw("8", "c@t.co", "x", "1", "2020-01-01"),
        ]);
        let out = transform_at(input, now()).unwrap();
        let ids: Vec<u64> = out.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 3, 8]);
    }

    #[test]
    fn test_title_case_helper() {
        assert_eq!(title_case("  research &  development "), "Research & Development");
        assert_eq!(title_case(""), "");
    }
}
