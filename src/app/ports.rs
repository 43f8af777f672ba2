use std::path::{Path, PathBuf};

use crate::common::error::Result;
use crate::domain::CanonicalRecord;

/// Where input artifacts come from.
pub trait InputSourcePort: Send + Sync {
    /// Expand user-supplied targets (files or directories) into artifact paths, in processing order.
    fn discover(&self, targets: &[PathBuf]) -> Vec<PathBuf>;

    /// Read one artifact as UTF-8 text.
    fn read(&self, path: &Path) -> Result<String>;
}

/// Where canonical records go.
pub trait NormalizeOutputPort: Send + Sync {
    /// Persist one artifact's records under `name`; returns the location written.
    fn write_artifact(&self, name: &str, records: &[CanonicalRecord]) -> Result<PathBuf>;
}
