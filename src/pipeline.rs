//! Run orchestration: load, calculate, analyze, report.
//!
//! A run moves `Idle -> Loading -> Calculating -> Analyzing -> Reported`.
//! Any fatal error moves it to `Failed` and the remaining stages are skipped.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::calculator::{calculate_footprint, FootprintSummary};
use crate::config::EcoTrackConfig;
use crate::error::Result;
use crate::factors::EmissionsFactorTable;
use crate::insights::{InsightGenerator, Suggestion};
use crate::loader::load_records;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Loading,
    Calculating,
    Analyzing,
    Reported,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Calculating => "calculating",
            Self::Analyzing => "analyzing",
            Self::Reported => "reported",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Output format for a finished report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub input: PathBuf,
    pub records: usize,
    pub footprint: FootprintSummary,
    pub suggestions: Vec<Suggestion>,
    pub states: Vec<RunState>,
}

impl AnalysisReport {
    pub fn total(&self) -> f64 {
        self.footprint.total
    }

    pub fn total_line(&self) -> String {
        format!("Total carbon footprint: {:.2} CO2e", self.footprint.total)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if !self.suggestions.is_empty() {
            out.push_str("Suggestions to reduce carbon footprint:\n");
            for suggestion in &self.suggestions {
                out.push_str(&suggestion.to_string());
                out.push('\n');
            }
        }
        out.push_str(&self.total_line());
        out.push('\n');
        out
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render(&self, format: ReportFormat) -> serde_json::Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => self.render_json().map(|mut s| {
                s.push('\n');
                s
            }),
        }
    }
}

pub struct Pipeline {
    input: PathBuf,
    factors: EmissionsFactorTable,
    insights: InsightGenerator,
    states: Vec<RunState>,
}

impl Pipeline {
    pub fn new(
        input: impl Into<PathBuf>,
        factors: EmissionsFactorTable,
        insights: InsightGenerator,
    ) -> Self {
        let insights = insights.with_factor_table(factors.clone());
        Self {
            input: input.into(),
            factors,
            insights,
            states: vec![RunState::Idle],
        }
    }

    /// Pipeline with the default factor table and expensive modes
    pub fn with_defaults(input: impl Into<PathBuf>) -> Self {
        Self::new(
            input,
            EmissionsFactorTable::default(),
            InsightGenerator::default(),
        )
    }

    pub fn from_config(config: &EcoTrackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.input.clone(),
            config.factor_table()?,
            InsightGenerator::new(&config.expensive_modes),
        ))
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn state(&self) -> RunState {
        self.states.last().copied().unwrap_or(RunState::Idle)
    }

    /// Every state the latest run passed through, starting at `Idle`
    pub fn states(&self) -> &[RunState] {
        &self.states
    }

    fn transition(&mut self, next: RunState) {
        debug!("Run state: {} -> {}", self.state(), next);
        self.states.push(next);
    }

    fn fail<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            error!("Run aborted during {}: {}", self.state(), e);
            self.transition(RunState::Failed);
        }
        result
    }

    /// Execute one full run against the configured input.
    pub fn run(&mut self) -> Result<AnalysisReport> {
        self.states = vec![RunState::Idle];
        debug!(
            "Starting run against {} (expensive modes: {})",
            self.input().display(),
            self.insights.expensive_modes().join(", ")
        );

        self.transition(RunState::Loading);
        let loaded = load_records(&self.input);
        let records = self.fail(loaded)?;
        info!(
            "Loaded {} shipment records from {}",
            records.len(),
            self.input().display()
        );

        self.transition(RunState::Calculating);
        let footprint = calculate_footprint(&records, &self.factors);
        if !footprint.skipped.is_empty() {
            warn!(
                "Skipped {} of {} records with invalid distance or weight",
                footprint.skipped.len(),
                records.len()
            );
        }

        self.transition(RunState::Analyzing);
        let analyzed = self.insights.generate(&records);
        let suggestions = self.fail(analyzed)?;
        info!("Generated {} reduction suggestions", suggestions.len());

        self.transition(RunState::Reported);
        info!("Total carbon footprint: {:.2} CO2e", footprint.total);

        Ok(AnalysisReport {
            input: self.input.clone(),
            records: records.len(),
            footprint,
            suggestions,
            states: self.states.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EcoTrackError;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = "order_id,distance,weight,transport_mode\n\
                          1,100,2,truck\n\
                          2,50,1,plane\n";

    fn write_input(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("supply_chain_data.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_successful_run_reaches_reported() {
        let dir = TempDir::new().unwrap();
        let mut pipeline = Pipeline::with_defaults(write_input(&dir, SAMPLE));
        let report = pipeline.run().unwrap();

        assert!((report.total() - 6.5).abs() < 1e-9);
        assert_eq!(report.records, 2);
        assert_eq!(
            report.suggestions.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["Consider alternative transport for order ID 2"]
        );
        assert_eq!(
            pipeline.states(),
            &[
                RunState::Idle,
                RunState::Loading,
                RunState::Calculating,
                RunState::Analyzing,
                RunState::Reported,
            ]
        );
        assert_eq!(report.states, pipeline.states());
    }

    #[test]
    fn test_malformed_row_is_skipped() {
        let dir = TempDir::new().unwrap();
        let content = format!("{SAMPLE}3,abc,5,train\n");
        let mut pipeline = Pipeline::with_defaults(write_input(&dir, &content));
        let report = pipeline.run().unwrap();

        assert!((report.total() - 6.5).abs() < 1e-9);
        assert_eq!(report.footprint.skipped.len(), 1);
        assert_eq!(pipeline.state(), RunState::Reported);
    }

    #[test]
    fn test_missing_input_fails_during_loading() {
        let dir = TempDir::new().unwrap();
        let mut pipeline = Pipeline::with_defaults(dir.path().join("missing.csv"));
        let err = pipeline.run().unwrap_err();

        assert!(matches!(err, EcoTrackError::NotFound { .. }));
        assert_eq!(
            pipeline.states(),
            &[RunState::Idle, RunState::Loading, RunState::Failed]
        );
    }

    #[test]
    fn test_analysis_failure_aborts_run() {
        let dir = TempDir::new().unwrap();
        let mut pipeline = Pipeline::new(
            write_input(&dir, SAMPLE),
            EmissionsFactorTable::default(),
            InsightGenerator::new([""]),
        );
        let err = pipeline.run().unwrap_err();

        assert!(matches!(err, EcoTrackError::Analysis { .. }));
        assert_eq!(pipeline.state(), RunState::Failed);
        assert!(pipeline.states().contains(&RunState::Analyzing));
        assert!(!pipeline.states().contains(&RunState::Reported));
    }

    #[test]
    fn test_unknown_mode_flagged_and_booked_as_truck() {
        let dir = TempDir::new().unwrap();
        let input = write_input(
            &dir,
            "order_id,distance,weight,transport_mode\n1,10,1,hovercraft\n2,10,1,\n",
        );
        let mut pipeline = Pipeline::new(
            input,
            EmissionsFactorTable::default(),
            InsightGenerator::new(["truck"]),
        );
        let report = pipeline.run().unwrap();

        assert_eq!(report.footprint.by_mode.keys().collect::<Vec<_>>(), vec!["truck"]);
        assert_eq!(
            report
                .suggestions
                .iter()
                .map(|s| s.order_id.as_str())
                .collect::<Vec<_>>(),
            vec!["1", "2"]
        );
    }

    #[test]
    fn test_rerun_resets_states() {
        let dir = TempDir::new().unwrap();
        let mut pipeline = Pipeline::with_defaults(write_input(&dir, SAMPLE));
        pipeline.run().unwrap();
        pipeline.run().unwrap();
        assert_eq!(pipeline.states().len(), 5);
    }

    #[test]
    fn test_from_config_applies_overrides() {
        let dir = TempDir::new().unwrap();
        let config = EcoTrackConfig {
            input: write_input(&dir, SAMPLE),
            expensive_modes: vec!["truck".to_string(), "plane".to_string()],
            factors: [("plane".to_string(), 0.1)].into_iter().collect(),
            ..Default::default()
        };
        let report = Pipeline::from_config(&config).unwrap().run().unwrap();
        assert!((report.total() - 9.0).abs() < 1e-9);
        assert_eq!(report.suggestions.len(), 2);
    }

    #[test]
    fn test_render_text() {
        let dir = TempDir::new().unwrap();
        let report = Pipeline::with_defaults(write_input(&dir, SAMPLE))
            .run()
            .unwrap();
        assert_eq!(
            report.render_text(),
            "Suggestions to reduce carbon footprint:\n\
             Consider alternative transport for order ID 2\n\
             Total carbon footprint: 6.50 CO2e\n"
        );
    }

    #[test]
    fn test_render_text_without_suggestions() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "order_id,distance,weight,transport_mode\n1,10,1,ship\n");
        let report = Pipeline::with_defaults(input).run().unwrap();
        assert_eq!(report.render_text(), "Total carbon footprint: 0.10 CO2e\n");
    }

    #[test]
    fn test_render_json() {
        let dir = TempDir::new().unwrap();
        let report = Pipeline::with_defaults(write_input(&dir, SAMPLE))
            .run()
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&report.render(ReportFormat::Json).unwrap()).unwrap();
        assert_eq!(json["records"], 2);
        assert_eq!(json["suggestions"][0]["order_id"], "2");
        assert_eq!(json["states"][4], "reported");
    }
}
