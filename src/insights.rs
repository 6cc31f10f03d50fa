//! Reduction suggestions for shipments sent by expensive transport modes.

use serde::Serialize;
use std::fmt;
use tracing::{debug, error};

use crate::error::{EcoTrackError, ErrorCode, Result};
use crate::factors::{normalize_mode, EmissionsFactorTable};
use crate::loader::ShipmentRecord;

/// Shown in place of a missing order id
pub const UNKNOWN_ORDER_ID: &str = "unknown";

/// Modes flagged when nothing else is configured
pub fn default_expensive_modes() -> Vec<String> {
    vec!["plane".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub order_id: String,
    pub transport_mode: String,
    pub line: u64,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Consider alternative transport for order ID {}",
            self.order_id
        )
    }
}

#[derive(Debug, Clone)]
pub struct InsightGenerator {
    expensive_modes: Vec<String>,
    factors: EmissionsFactorTable,
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new(default_expensive_modes())
    }
}

impl InsightGenerator {
    pub fn new<I, S>(expensive_modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            expensive_modes: expensive_modes
                .into_iter()
                .map(|m| normalize_mode(m.as_ref()))
                .collect(),
            factors: EmissionsFactorTable::default(),
        }
    }

    /// Resolve record modes against `factors` instead of the built-in table
    pub fn with_factor_table(mut self, factors: EmissionsFactorTable) -> Self {
        self.factors = factors;
        self
    }

    pub fn expensive_modes(&self) -> &[String] {
        &self.expensive_modes
    }

    /// Whether a raw mode string is in the expensive set. The mode is
    /// resolved like the calculator does, so blank and unknown modes count
    /// as the default mode.
    pub fn is_expensive(&self, mode: &str) -> bool {
        let mode = self.factors.resolve_mode(mode);
        self.expensive_modes.iter().any(|m| *m == mode)
    }

    /// One suggestion per record with an expensive mode, in record order.
    pub fn generate(&self, records: &[ShipmentRecord]) -> Result<Vec<Suggestion>> {
        if self.expensive_modes.iter().any(String::is_empty) {
            error!("Error generating insights: blank expensive transport mode");
            return Err(EcoTrackError::analysis(
                ErrorCode::ANALYSIS_INVALID_MODE,
                "expensive transport modes must not be blank",
            ));
        }

        let suggestions: Vec<Suggestion> = records
            .iter()
            .filter(|record| self.is_expensive(record.transport_mode()))
            .map(|record| Suggestion {
                order_id: record.order_id().unwrap_or(UNKNOWN_ORDER_ID).to_string(),
                transport_mode: self.factors.resolve_mode(record.transport_mode()),
                line: record.line,
            })
            .collect();

        debug!("Generated {} reduction suggestions.", suggestions.len());
        Ok(suggestions)
    }
}
