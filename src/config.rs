use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_INPUT_EXTENSION, DEFAULT_LOG_DIR, DEFAULT_OUTPUT_DIR,
};
use crate::common::error::{NormalizeError, Result};

pub const CONFIG_PATH_ENV: &str = "HOSPITAL_JOBS_CONFIG";
pub const OUTPUT_DIR_ENV: &str = "HOSPITAL_JOBS_OUTPUT_DIR";
pub const LOG_DIR_ENV: &str = "HOSPITAL_JOBS_LOG_DIR";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub normalize: NormalizeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Where `<stem>.json` output artifacts are written
    pub output_dir: PathBuf,
    /// Extension of input artifacts picked up from directories
    pub extension: String,
    /// Normalize records of one artifact in parallel
    pub parallel: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: DEFAULT_INPUT_EXTENSION.to_string(),
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl Config {
    /// Load `config.toml` (or the file named by `HOSPITAL_JOBS_CONFIG`) and apply env overrides.
    ///
    /// A missing file is not an error; every setting has a default.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Self::from_file(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            NormalizeError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.normalize.extension.trim().is_empty() {
            return Err(NormalizeError::Config("normalize.extension must not be empty".into()));
        }
        Ok(config)
    }

    /// Overlay environment values; `lookup` is injected so tests do not touch the process env.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(dir) = non_blank(OUTPUT_DIR_ENV) {
            self.normalize.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_blank(LOG_DIR_ENV) {
            self.logging.dir = PathBuf::from(dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.normalize.output_dir, PathBuf::from("normalized"));
        assert_eq!(config.normalize.extension, "json");
        assert!(config.normalize.parallel);
        assert_eq!(config.logging.dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml_str(
            r#"
            [normalize]
            output_dir = "out/jobs"
            parallel = false
            "#,
        )
        .unwrap();

        assert_eq!(config.normalize.output_dir, PathBuf::from("out/jobs"));
        assert!(!config.normalize.parallel);
        assert_eq!(config.normalize.extension, "json");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(matches!(
            Config::from_toml_str("[normalize]\nparallel = \"yes\""),
            Err(NormalizeError::Toml(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[normalize]\nextension = \" \""),
            Err(NormalizeError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(OUTPUT_DIR_ENV, "/tmp/out"), (LOG_DIR_ENV, "  ")].into();
        let mut config = Config::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.normalize.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.logging.dir, PathBuf::from("logs"));
    }
}
