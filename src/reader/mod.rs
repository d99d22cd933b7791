//! Input file reader with encoding and delimiter auto-detection.
//!
//! Loads the delimited input file into a [`RawTable`]: the first line is
//! the header, every following non-empty line is one row. Values stay
//! textual here; coercion happens in the transformer.

use std::path::Path;

use crate::error::{ReadError, ReadResult};
use crate::models::{RawRecord, RawTable, SCHEMA_FIELDS};

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> ReadResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .or_else(|_| Ok(String::from_utf8_lossy(bytes).to_string())),
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(encoding_rs::ISO_8859_15.decode(bytes).0.to_string())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()),
        _ => {
            // Fallback: UTF-8 with lossy conversion
            Ok(String::from_utf8_lossy(bytes).to_string())
        }
    }
    .map_err(|e: std::string::FromUtf8Error| ReadError::Encoding(e.to_string()))
}

/// Detect the delimiter by counting occurrences in the first line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Read the input file into a [`RawTable`] with auto-detection.
///
/// Fails with [`ReadError::NotFound`] when the path does not exist and
/// with a parse error when the header is missing, a schema column is
/// absent, or a row's field count differs from the header's.
pub fn read_table<P: AsRef<Path>>(path: P) -> ReadResult<RawTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ReadError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    if bytes.is_empty() {
        return Err(ReadError::EmptyFile);
    }

    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);

    parse_content(&content, delimiter, encoding)
}

/// Parse decoded content with an explicit delimiter.
pub fn parse_content(content: &str, delimiter: char, encoding: String) -> ReadResult<RawTable> {
    let mut lines = content.lines();

    let header_line = lines.next().ok_or(ReadError::EmptyFile)?;

    let headers: Vec<String> = header_line
        .split(delimiter)
        .map(clean_cell)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(ReadError::NoHeaders);
    }

    let schema = SchemaIndex::from_headers(&headers)?;

    let mut rows = Vec::new();

    for (line_idx, line) in lines.enumerate() {
        let line_num = line_idx + 2; // +1 for 0-index, +1 for header

        if line.trim().is_empty() {
            continue;
        }

        let values: Vec<String> = line.split(delimiter).map(clean_cell).collect();

        if values.len() != headers.len() {
            return Err(ReadError::RowWidth {
                line: line_num,
                expected: headers.len(),
                found: values.len(),
            });
        }

        rows.push(schema.record(&values));
    }

    Ok(RawTable {
        headers,
        encoding,
        delimiter,
        rows,
    })
}

fn clean_cell(s: &str) -> String {
    s.trim().trim_matches('"').to_string()
}

/// Positions of the schema columns within the file's header.
struct SchemaIndex {
    id: usize,
    name: usize,
    email: usize,
    department: usize,
    salary: usize,
    hire_date: usize,
}

impl SchemaIndex {
    fn from_headers(headers: &[String]) -> ReadResult<Self> {
        let find = |column: &str| -> ReadResult<usize> {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(column))
                .ok_or_else(|| ReadError::MissingColumn(column.to_string()))
        };

        // Columns beyond the schema are ignored.
        Ok(Self {
            id: find(SCHEMA_FIELDS[0])?,
            name: find(SCHEMA_FIELDS[1])?,
            email: find(SCHEMA_FIELDS[2])?,
            department: find(SCHEMA_FIELDS[3])?,
            salary: find(SCHEMA_FIELDS[4])?,
            hire_date: find(SCHEMA_FIELDS[5])?,
        })
    }

    fn record(&self, values: &[String]) -> RawRecord {
        RawRecord {
            id: values[self.id].clone(),
            name: values[self.name].clone(),
            email: values[self.email].clone(),
            department: values[self.department].clone(),
            salary: values[self.salary].clone(),
            hire_date: values[self.hire_date].clone(),
        }
    }
}
