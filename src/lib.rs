//! # EcoTrack
//!
//! Estimates a company's carbon footprint from supply-chain shipment records
//! and suggests reductions for shipments sent by expensive transport modes.
//!
//! ## Usage
//!
//! ```bash
//! ecotrack [--input shipments.csv] [--config ecotrack.toml] [--expensive-mode plane]
//! ```
//!
//! ## Modules
//!
//! - `loader` - CSV shipment record loading
//! - `factors` - Emissions factor table per transport mode
//! - `calculator` - Footprint aggregation with per-record error recovery
//! - `insights` - Reduction suggestions for expensive transport modes
//! - `pipeline` - Run orchestration and reporting
//! - `config` - Layered configuration (defaults, TOML, environment)
//! - `error` - Fatal error types and error codes
//! - `cli` - Command-line arguments and logging setup
pub mod calculator;
pub mod cli;
pub mod config;
pub mod error;
pub mod factors;
pub mod insights;
pub mod loader;
pub mod pipeline;

pub use calculator::{calculate_footprint, FootprintSummary, RecordValueError};
pub use config::EcoTrackConfig;
pub use error::{EcoTrackError, ErrorCode};
pub use factors::EmissionsFactorTable;
pub use insights::{InsightGenerator, Suggestion};
pub use loader::{load_records, ShipmentRecord};
pub use pipeline::{AnalysisReport, Pipeline, ReportFormat, RunState};
