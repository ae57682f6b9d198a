//! CSV reading and writing for numeric datasets

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};

use crate::domain::{Dataset, DomainError};
use crate::infrastructure::files::{write_atomic, StagedWrites};

/// Tokens read as a missing value, in addition to an empty field
const MISSING_TOKENS: [&str; 6] = ["NaN", "nan", "NA", "N/A", "null", "NULL"];

/// Read a CSV file with a header row into a [`Dataset`]
pub fn read_csv(path: &Path) -> Result<Dataset, DomainError> {
    let file = File::open(path)
        .map_err(|e| DomainError::io(format!("Error loading data from {}: {}", path.display(), e)))?;

    parse_csv(BufReader::new(file)).map_err(|e| match e {
        DomainError::Dataset { message } => {
            DomainError::dataset(format!("{}: {}", path.display(), message))
        }
        other => other,
    })
}

/// Parse CSV text with a header row. Every cell must be numeric or missing.
pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset, DomainError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| DomainError::dataset(format!("Cannot read header row: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    if columns.iter().all(String::is_empty) {
        return Err(DomainError::dataset("CSV has no header row"));
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        // header is line 1
        let line = index + 2;
        let record =
            record.map_err(|e| DomainError::dataset(format!("Line {}: {}", line, e)))?;

        let row = record
            .iter()
            .zip(&columns)
            .map(|(field, column)| parse_cell(field, column, line))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    Dataset::new(columns, rows)
}

fn parse_cell(field: &str, column: &str, line: usize) -> Result<Option<f64>, DomainError> {
    if field.is_empty() || MISSING_TOKENS.contains(&field) {
        return Ok(None);
    }

    let value: f64 = field.parse().map_err(|_| {
        DomainError::dataset(format!(
            "Line {} column '{}': '{}' is not a number",
            line, column, field
        ))
    })?;

    if value.is_nan() {
        return Ok(None);
    }
    if value.is_infinite() {
        return Err(DomainError::dataset(format!(
            "Line {} column '{}': infinite value",
            line, column
        )));
    }

    Ok(Some(value))
}

/// Render a dataset as CSV; missing cells become empty fields
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>, DomainError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(dataset.columns())
        .map_err(|e| DomainError::internal(format!("CSV write failed: {}", e)))?;

    for row in dataset.rows() {
        let fields = row
            .iter()
            .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default());
        writer
            .write_record(fields)
            .map_err(|e| DomainError::internal(format!("CSV write failed: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| DomainError::internal(format!("CSV write failed: {}", e)))
}

/// Write a dataset to `path` atomically
pub fn write_csv(path: &Path, dataset: &Dataset) -> Result<(), DomainError> {
    let bytes = to_csv_bytes(dataset)?;
    write_atomic(path, &bytes)
}

/// Stage a dataset for `path` as part of a larger set of writes
pub fn stage_csv(writes: &mut StagedWrites, path: &Path, dataset: &Dataset) -> Result<(), DomainError> {
    let bytes = to_csv_bytes(dataset)?;
    writes.stage(path, &bytes)
}
