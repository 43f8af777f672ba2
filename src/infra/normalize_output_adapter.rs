use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::app::ports::NormalizeOutputPort;
use crate::common::error::Result;
use crate::domain::CanonicalRecord;

/// File-based implementation of NormalizeOutputPort.
/// Writes each artifact as a pretty-printed JSON array at `<output_dir>/<name>.json`.
pub struct FileNormalizeOutputAdapter {
    output_dir: PathBuf,
}

impl FileNormalizeOutputAdapter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.json"))
    }
}

impl NormalizeOutputPort for FileNormalizeOutputAdapter {
    fn write_artifact(&self, name: &str, records: &[CanonicalRecord]) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_path(name);

        // two-space indentation, non-ASCII written as-is
        let body = serde_json::to_string_pretty(records)?;
        fs::write(&path, body)?;

        info!(path = %path.display(), records = records.len(), "wrote normalized artifact");
        Ok(path)
    }
}
