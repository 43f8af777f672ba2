use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::app::ports::InputSourcePort;
use crate::common::error::Result;

/// Reads input artifacts from the local filesystem.
///
/// A file target is taken as-is. A directory target contributes every regular file
/// directly inside it whose extension matches, sorted by path.
pub struct FsInputSourceAdapter {
    extension: String,
}

impl FsInputSourceAdapter {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }

    fn scan_dir(&self, dir: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.has_extension(path))
            .collect();
        found.sort();
        debug!(dir = %dir.display(), count = found.len(), "scanned input directory");
        found
    }
}

impl InputSourcePort for FsInputSourceAdapter {
    fn discover(&self, targets: &[PathBuf]) -> Vec<PathBuf> {
        let mut artifacts = Vec::new();
        for target in targets {
            if target.is_dir() {
                artifacts.extend(self.scan_dir(target));
            } else if target.is_file() {
                artifacts.push(target.clone());
            } else {
                warn!(path = %target.display(), "input path does not exist, ignoring");
            }
        }
        artifacts
    }

    fn read(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }
}
