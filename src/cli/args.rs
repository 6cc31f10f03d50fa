//! CLI argument structures

use clap::Parser;
use std::path::PathBuf;

use crate::config::EcoTrackConfig;
use crate::pipeline::ReportFormat;

/// Estimate a supply chain's carbon footprint from shipment records
#[derive(Parser, Debug)]
#[command(name = "ecotrack")]
#[command(about = "ecotrack - Estimate a supply chain's carbon footprint and suggest reductions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Shipment CSV file (default: supply_chain_data.csv)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Transport mode to flag for reduction suggestions (repeatable)
    #[arg(long = "expensive-mode", value_name = "MODE")]
    pub expensive_modes: Vec<String>,

    /// Append diagnostics to this file (default: ecotrack.log)
    #[arg(long, value_name = "PATH", conflicts_with = "no_log_file")]
    pub log_file: Option<PathBuf>,

    /// Do not write a diagnostic log file
    #[arg(long)]
    pub no_log_file: bool,

    /// Report output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

impl Cli {
    /// Apply command-line flags over an already layered config
    pub fn apply_to(&self, config: &mut EcoTrackConfig) {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if !self.expensive_modes.is_empty() {
            config.expensive_modes = self.expensive_modes.clone();
        }
        if self.no_log_file {
            config.log_file = None;
        } else if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
        match self.verbose {
            0 => {}
            1 => config.log_level = "debug".to_string(),
            _ => config.log_level = "trace".to_string(),
        }
    }
}
