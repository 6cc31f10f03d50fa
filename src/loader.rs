//! Shipment record loading from CSV files.
//!
//! The first row names the columns. Short rows are padded with empty strings
//! and fields beyond the header are ignored, so every record carries exactly
//! the header's columns.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, error};

use crate::error::{EcoTrackError, ErrorCode, Result};

pub const ORDER_ID: &str = "order_id";
pub const DISTANCE: &str = "distance";
pub const WEIGHT: &str = "weight";
pub const TRANSPORT_MODE: &str = "transport_mode";

const UTF8_BOM: char = '\u{feff}';

/// One shipment row, keyed by column name
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ShipmentRecord {
    /// 1-based line number in the source file
    pub line: u64,
    fields: BTreeMap<String, String>,
}

impl ShipmentRecord {
    pub fn new(line: u64, fields: BTreeMap<String, String>) -> Self {
        Self { line, fields }
    }

    /// Build a record from `(column, value)` pairs
    pub fn from_pairs<'a>(line: u64, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(
            line,
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// The order id, if present and non-blank
    pub fn order_id(&self) -> Option<&str> {
        self.get(ORDER_ID).map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn distance(&self) -> Option<&str> {
        self.get(DISTANCE)
    }

    pub fn weight(&self) -> Option<&str> {
        self.get(WEIGHT)
    }

    /// Raw transport mode; empty when the column is absent
    pub fn transport_mode(&self) -> &str {
        self.get(TRANSPORT_MODE).unwrap_or("")
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

/// Load every record from the CSV file at `path`, in file order.
pub fn load_records(path: &Path) -> Result<Vec<ShipmentRecord>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            error!("File {} not found.", path.display());
            return Err(EcoTrackError::not_found(path));
        }
        Err(e) => {
            error!("An error occurred while loading data: {}", e);
            return Err(EcoTrackError::load(
                ErrorCode::INPUT_IO_ERROR,
                path,
                "could not open file",
            )
            .with_source(e));
        }
    };

    let records = load_records_from_reader(file, path)?;
    debug!(
        "Data loaded successfully from file. Total records: {}",
        records.len()
    );
    Ok(records)
}

/// Load records from any reader; `source` is only used in error messages.
pub fn load_records_from_reader<R: Read>(reader: R, source: &Path) -> Result<Vec<ShipmentRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    // A leading UTF-8 byte order mark belongs to the file, not the first column
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(source, e))?
        .iter()
        .enumerate()
        .map(|(i, header)| match i {
            0 => header.trim_start_matches(UTF8_BOM).to_string(),
            _ => header.to_string(),
        })
        .collect();

    reader
        .records()
        .map(|row| -> Result<ShipmentRecord> {
            let row = row.map_err(|e| csv_error(source, e))?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            let fields = headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.clone(), row.get(i).unwrap_or("").to_string()))
                .collect();
            Ok(ShipmentRecord::new(line, fields))
        })
        .collect()
}

fn csv_error(source: &Path, e: csv::Error) -> EcoTrackError {
    error!("An error occurred while loading data: {}", e);
    let code = if e.is_io_error() {
        ErrorCode::INPUT_IO_ERROR
    } else {
        ErrorCode::INPUT_MALFORMED
    };
    let message = e.to_string();
    EcoTrackError::load(code, source, message).with_source(e)
}
