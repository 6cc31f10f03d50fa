//! Footprint aggregation over loaded shipment records.
//!
//! Each record contributes `distance * weight * factor(mode)`. A record with
//! an unusable distance or weight is skipped and reported back as a
//! [`RecordValueError`]; it never aborts the aggregation.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::factors::EmissionsFactorTable;
use crate::loader::{ShipmentRecord, DISTANCE, WEIGHT};

/// A single record whose values could not be used
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordValueError {
    #[error("line {line}: {field} '{value}' is not a number")]
    NotANumber {
        line: u64,
        order_id: Option<String>,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: {field} '{value}' must be a finite, non-negative number")]
    OutOfRange {
        line: u64,
        order_id: Option<String>,
        field: &'static str,
        value: String,
    },
}

impl RecordValueError {
    pub fn line(&self) -> u64 {
        match self {
            Self::NotANumber { line, .. } | Self::OutOfRange { line, .. } => *line,
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::NotANumber { field, .. } | Self::OutOfRange { field, .. } => field,
        }
    }
}

/// Result of one calculation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FootprintSummary {
    pub total: f64,
    /// Footprint per resolved transport mode
    pub by_mode: BTreeMap<String, f64>,
    pub processed: usize,
    pub skipped: Vec<RecordValueError>,
}

impl FootprintSummary {
    fn absorb(mut self, mode: String, emissions: f64) -> Self {
        self.total += emissions;
        *self.by_mode.entry(mode).or_insert(0.0) += emissions;
        self.processed += 1;
        self
    }

    fn skip(mut self, err: RecordValueError) -> Self {
        self.skipped.push(err);
        self
    }

    /// Combine two partial summaries
    pub fn merge(mut self, other: FootprintSummary) -> Self {
        self.total += other.total;
        for (mode, emissions) in other.by_mode {
            *self.by_mode.entry(mode).or_insert(0.0) += emissions;
        }
        self.processed += other.processed;
        self.skipped.extend(other.skipped);
        self
    }
}

/// Field name reported when `distance * weight * factor` overflows
pub const FOOTPRINT: &str = "footprint";

/// Parse a distance or weight value. Absent and blank values count as zero.
fn parse_quantity(
    record: &ShipmentRecord,
    field: &'static str,
    raw: Option<&str>,
) -> Result<f64, RecordValueError> {
    let value = raw.map(str::trim).unwrap_or("");
    if value.is_empty() {
        return Ok(0.0);
    }

    let parsed: f64 = value.parse().map_err(|_| RecordValueError::NotANumber {
        line: record.line,
        order_id: record.order_id().map(str::to_string),
        field,
        value: value.to_string(),
    })?;

    if !parsed.is_finite() || parsed < 0.0 {
        return Err(RecordValueError::OutOfRange {
            line: record.line,
            order_id: record.order_id().map(str::to_string),
            field,
            value: value.to_string(),
        });
    }

    Ok(parsed)
}

/// Footprint contributed by a single record
pub fn record_footprint(
    record: &ShipmentRecord,
    table: &EmissionsFactorTable,
) -> Result<f64, RecordValueError> {
    let distance = parse_quantity(record, DISTANCE, record.distance())?;
    let weight = parse_quantity(record, WEIGHT, record.weight())?;
    let emissions = distance * weight * table.factor_for(record.transport_mode());
    if !emissions.is_finite() {
        return Err(RecordValueError::OutOfRange {
            line: record.line,
            order_id: record.order_id().map(str::to_string),
            field: FOOTPRINT,
            value: format!("{distance} x {weight}"),
        });
    }
    Ok(emissions)
}

/// Sum the footprint of `records`, skipping records with unusable values.
pub fn calculate_footprint(
    records: &[ShipmentRecord],
    table: &EmissionsFactorTable,
) -> FootprintSummary {
    let summary = records
        .iter()
        .fold(FootprintSummary::default(), |summary, record| {
            match record_footprint(record, table) {
                Ok(emissions) => {
                    summary.absorb(table.resolve_mode(record.transport_mode()), emissions)
                }
                Err(e) => {
                    warn!("Value error while calculating footprint: {}", e);
                    summary.skip(e)
                }
            }
        });

    debug!(
        "Total carbon footprint calculated: {} ({} records, {} skipped)",
        summary.total,
        summary.processed,
        summary.skipped.len()
    );
    summary
}
