//! JSON sinks of the request pipeline.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::RequestPipe;
use crate::config::RequestConfig;
use crate::pipeline::output::create_parent;
use crate::pipeline::{PipelineError, Sink};

/// Writes the configuration the request was built from to
/// `{instance_id}_request_config.json`.
#[derive(Debug, Clone)]
pub struct RequestConfigWriter {
    config: Arc<RequestConfig>,
}

impl RequestConfigWriter {
    pub fn new(config: Arc<RequestConfig>) -> Self {
        Self { config }
    }

    pub fn path(&self) -> PathBuf {
        self.config
            .output_directory
            .join(format!("{}_request_config.json", self.config.instance_id))
    }
}

impl Sink<RequestPipe> for RequestConfigWriter {
    fn consume(&self, _: &RequestPipe) -> Result<(), PipelineError> {
        let path = self.path();
        write_json(&path, &*self.config)?;
        info!(path = %path.display(), "Wrote request config");
        Ok(())
    }
}

/// Writes the composed request to `{instance_id}_request.json`.
#[derive(Debug, Clone)]
pub struct RequestJsonWriter {
    output_directory: PathBuf,
    instance_id: String,
}

impl RequestJsonWriter {
    pub fn new(output_directory: impl Into<PathBuf>, instance_id: impl Into<String>) -> Self {
        Self {
            output_directory: output_directory.into(),
            instance_id: instance_id.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.output_directory
            .join(format!("{}_request.json", self.instance_id))
    }
}

impl Sink<RequestPipe> for RequestJsonWriter {
    fn consume(&self, pipe: &RequestPipe) -> Result<(), PipelineError> {
        let request = pipe
            .request
            .as_ref()
            .ok_or(PipelineError::Incomplete("request"))?;
        let path = self.path();
        write_json(&path, request)?;
        info!(path = %path.display(), routes = request.routes.len(), "Wrote request");
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    create_parent(path)?;
    let io_error = |source: std::io::Error| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::request::{Request, RequestComposer};
    use crate::pipeline::Filter;
    use crate::scenario::test_support::small_scenario;
    use crate::selection::{FilterStrategy, NoFilterStrategy};
    use tempfile::TempDir;

    fn config(dir: &Path) -> Arc<RequestConfig> {
        Arc::new(
            RequestConfig::builder()
                .run_id("kelheim")
                .instance_id("it")
                .input_directory(dir.join("in"))
                .output_directory(dir.join("out"))
                .build()
                .unwrap(),
        )
    }

    fn pipe() -> RequestPipe {
        let scenario = small_scenario();
        let selection = NoFilterStrategy.filter(&scenario.schedule).unwrap();
        RequestPipe {
            scenario,
            selection,
            ..RequestPipe::default()
        }
    }

    #[test]
    fn config_roundtrips_through_file() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let writer = RequestConfigWriter::new(config.clone());
        writer.consume(&pipe()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("out/it_request_config.json")).unwrap();
        let back: RequestConfig = serde_json::from_str(&content).unwrap();
        assert_eq!(back, *config);
    }

    #[test]
    fn request_is_written() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let mut pipe = pipe();
        RequestComposer::new(config.clone()).apply(&mut pipe).unwrap();

        let writer = RequestJsonWriter::new(&config.output_directory, &config.instance_id);
        writer.consume(&pipe).unwrap();

        let content = std::fs::read_to_string(writer.path()).unwrap();
        let request: Request = serde_json::from_str(&content).unwrap();
        assert_eq!(request.info.instance_id, "it");
        assert_eq!(request.routes.len(), 2);
    }

    #[test]
    fn missing_request_is_an_error() {
        let dir = TempDir::new().unwrap();
        let writer = RequestJsonWriter::new(dir.path(), "it");
        let err = writer.consume(&pipe()).unwrap_err();
        assert!(matches!(err, PipelineError::Incomplete("request")));
    }
}
