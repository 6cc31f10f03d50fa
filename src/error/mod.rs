use std::path::PathBuf;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// Fatal errors that abort an EcoTrack run.
///
/// Per-record value problems are not represented here; those are
/// [`crate::calculator::RecordValueError`] and never leave the calculator.
#[derive(Error, Debug)]
pub enum EcoTrackError {
    #[error("The specified data file could not be found: {}", .path.display())]
    NotFound { code: u16, path: PathBuf },

    #[error("An error occurred while loading data from {}: {message}", .path.display())]
    Load {
        code: u16,
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("An error occurred while generating insights: {message}")]
    Analysis { code: u16, message: String },

    #[error("Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl EcoTrackError {
    /// Input file does not exist
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            code: ErrorCode::INPUT_NOT_FOUND,
            path: path.into(),
        }
    }

    /// Input file exists but could not be turned into records
    pub fn load(code: u16, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Load {
            code,
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn analysis(code: u16, message: impl Into<String>) -> Self {
        Self::Analysis {
            code,
            message: message.into(),
        }
    }

    pub fn config(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach an underlying cause to a `Load` or `Config` error
    pub fn with_source(mut self, err: impl std::error::Error + Send + Sync + 'static) -> Self {
        match &mut self {
            Self::Load { source, .. } | Self::Config { source, .. } => {
                *source = Some(Box::new(err));
            }
            Self::NotFound { .. } | Self::Analysis { .. } => {}
        }
        self
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::NotFound { code, .. }
            | Self::Load { code, .. }
            | Self::Analysis { code, .. }
            | Self::Config { code, .. } => *code,
        }
    }
}

pub type Result<T> = std::result::Result<T, EcoTrackError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_not_found_message_names_path() {
        let err = EcoTrackError::not_found("missing.csv");
        assert_eq!(err.code(), ErrorCode::INPUT_NOT_FOUND);
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn test_with_source_attaches_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = EcoTrackError::load(ErrorCode::INPUT_IO_ERROR, "data.csv", "read failed")
            .with_source(io);
        assert!(err.source().is_some());
        assert_eq!(err.code(), ErrorCode::INPUT_IO_ERROR);
    }

    #[test]
    fn test_with_source_ignored_for_analysis() {
        let io = std::io::Error::other("boom");
        let err = EcoTrackError::analysis(ErrorCode::ANALYSIS_INVALID_MODE, "bad").with_source(io);
        assert!(err.source().is_none());
    }
}
