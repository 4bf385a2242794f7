//! Shared helpers of the file sinks.

use std::fs;
use std::path::Path;

use super::PipelineError;

/// Create the directory `path` will be written into.
pub(crate) fn create_parent(path: &Path) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
