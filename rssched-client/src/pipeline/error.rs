//! Pipeline error type.

use std::path::PathBuf;

use super::scenario::NetworkMaskError;
use crate::config::ConfigError;
use crate::scenario::{LoadError, ScenarioError};
use crate::selection::SelectionError;

/// Any error that aborts a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    NetworkMask(#[from] NetworkMaskError),

    #[error("configuration conflict: {0}")]
    Config(#[from] ConfigError),

    #[error("inconsistent scenario: {0}")]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Load(#[from] LoadError),

    /// Output could not be written
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    /// A sink found the context without data an earlier filter should add
    #[error("pipeline context has no {0}")]
    Incomplete(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err: PipelineError = SelectionError::LineNotFound("RE1".into()).into();
        assert_eq!(err.to_string(), "no transit line found in scenario with id RE1");

        let err: PipelineError = ConfigError::TerminalDepotIdCollision("dpt_sA".into()).into();
        assert_eq!(
            err.to_string(),
            "configuration conflict: automatically created depot id dpt_sA is already used by a configured depot"
        );

        let err = PipelineError::Io {
            path: "out/x.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "failed to write out/x.json: missing");
    }
}
