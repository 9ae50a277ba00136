// # Format Parser
//
// Turns raw import text into an `ImportBatch`. CSV goes through heuristic
// header matching, JSON is decoded directly into records.

use crate::import::types::{ImportBatch, ImportFormat, ImportRecord, PropertyValue};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that prevent any records from being produced
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV file must have at least a header row and one data row")]
    NotEnoughRows,
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON file must contain at least one object")]
    EmptyJson,
}

const NAME_FIELDS: [&str; 3] = ["name", "title", "item"];
const DESCRIPTION_FIELDS: [&str; 3] = ["description", "notes", "summary"];
const QUANTITY_FIELDS: [&str; 3] = ["quantity", "copies", "amount"];
const TAG_FIELDS: [&str; 3] = ["tags", "tag", "categories"];
const TAG_DELIMITERS: [char; 3] = [',', ';', '|'];

/// Columns that never become properties
const SKIP_FIELDS: [&str; 16] = [
    "name",
    "title",
    "item",
    "description",
    "notes",
    "summary",
    "quantity",
    "copies",
    "amount",
    "unit",
    "tags",
    "tag",
    "categories",
    "category",
    "id",
    "_id",
];

/// Pick a format for the content and parse it.
///
/// A `.json`/`.csv` filename suffix always wins; otherwise content starting
/// with `[` or `{` is treated as JSON and anything else as CSV.
pub fn parse(content: &str, filename: &str) -> Result<ImportBatch, ParseError> {
    let format = detect_format(content, filename);
    info!("Parsing '{}' as {}", filename, format);

    match format {
        ImportFormat::Json => parse_json(content),
        ImportFormat::Csv => parse_csv(content),
    }
}

pub fn detect_format(content: &str, filename: &str) -> ImportFormat {
    let filename = filename.to_lowercase();
    if filename.ends_with(".json") {
        return ImportFormat::Json;
    }
    if filename.ends_with(".csv") {
        return ImportFormat::Csv;
    }

    let trimmed = content.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        ImportFormat::Json
    } else {
        ImportFormat::Csv
    }
}

pub fn parse_csv(content: &str) -> Result<ImportBatch, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(content.as_bytes());

    let rows = reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, csv::Error>>()?;

    let Some((header, data_rows)) = rows.split_first() else {
        return Err(ParseError::NotEnoughRows);
    };
    if data_rows.is_empty() {
        return Err(ParseError::NotEnoughRows);
    }

    // Duplicate column names collapse onto the last occurrence
    let header_map: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_lowercase(), idx))
        .collect();

    let mut batch = ImportBatch::new(ImportFormat::Csv);
    for (row_idx, row) in data_rows.iter().enumerate() {
        match parse_csv_row(row, &header_map) {
            Ok(record) => batch.records.push(record),
            Err(cause) => {
                let message = format!("Row {}: {}", row_idx + 2, cause);
                debug!("Rejected CSV row: {}", message);
                batch.errors.push(message);
            }
        }
    }

    info!(
        "Parsed CSV: {} records accepted, {} rows rejected",
        batch.records.len(),
        batch.errors.len()
    );

    Ok(batch)
}

fn parse_csv_row(
    row: &csv::StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<ImportRecord, String> {
    let name = first_cell(row, header_map, &NAME_FIELDS)
        .ok_or_else(|| "missing required field 'name', 'title', or 'item'".to_string())?;

    let mut record = ImportRecord::named(name);
    record.description = first_cell(row, header_map, &DESCRIPTION_FIELDS).map(str::to_string);
    record.quantity = QUANTITY_FIELDS
        .iter()
        .filter_map(|field| cell(row, header_map, field))
        .find_map(|value| value.parse::<f64>().ok().filter(|q| q.is_finite()));
    record.unit = cell(row, header_map, "unit").map(str::to_string);
    if let Some(raw_tags) = first_cell(row, header_map, &TAG_FIELDS) {
        record.tags = split_tags(raw_tags);
    }

    for (header, &idx) in header_map {
        if header.is_empty() || SKIP_FIELDS.contains(&header.as_str()) {
            continue;
        }
        if let Some(value) = non_empty(row.get(idx)) {
            record
                .properties
                .insert(header.clone(), PropertyValue::from(value));
        }
    }

    Ok(record)
}

/// Trimmed, non-empty value of the named column
fn cell<'r>(
    row: &'r csv::StringRecord,
    header_map: &HashMap<String, usize>,
    field: &str,
) -> Option<&'r str> {
    header_map
        .get(field)
        .and_then(|&idx| non_empty(row.get(idx)))
}

fn first_cell<'r>(
    row: &'r csv::StringRecord,
    header_map: &HashMap<String, usize>,
    fields: &[&str],
) -> Option<&'r str> {
    fields
        .iter()
        .find_map(|field| cell(row, header_map, field))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Split a tag cell on the first delimiter present (comma, then semicolon,
/// then pipe). Only one delimiter kind is ever applied.
fn split_tags(raw: &str) -> Vec<String> {
    let pieces: Vec<&str> = match TAG_DELIMITERS.iter().find(|d| raw.contains(**d)) {
        Some(&delimiter) => raw.split(delimiter).collect(),
        None => vec![raw],
    };

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_json(content: &str) -> Result<ImportBatch, ParseError> {
    let elements: Vec<Value> = serde_json::from_str(content)?;
    if elements.is_empty() {
        return Err(ParseError::EmptyJson);
    }

    let records = elements
        .into_iter()
        .map(decode_json_record)
        .collect::<Result<Vec<ImportRecord>, serde_json::Error>>()?;

    // Invalid elements stay in the batch; they are only flagged
    let errors = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.name.is_empty())
        .map(|(idx, _)| format!("Object {}: name is required", idx + 1))
        .collect();

    let batch = ImportBatch {
        records,
        format: ImportFormat::Json,
        errors,
    };

    info!(
        "Parsed JSON: {} records, {} flagged",
        batch.records.len(),
        batch.errors.len()
    );

    Ok(batch)
}

/// Decode one array element. Field names match case-insensitively and a
/// `null` element becomes an empty record.
fn decode_json_record(element: Value) -> Result<ImportRecord, serde_json::Error> {
    match element {
        Value::Null => Ok(ImportRecord::default()),
        Value::Object(fields) => {
            let fields: Map<String, Value> = fields
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect();
            serde_json::from_value(Value::Object(fields))
        }
        other => serde_json::from_value(other),
    }
}
