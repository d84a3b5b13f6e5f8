//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from a YAML file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};
use crate::grid::CsvGridSource;

use super::types::ServiceConfig;

/// Loads and provides access to the service configuration.
///
/// # Example
///
/// ```no_run
/// use milk_rate_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/rate-engine.yaml").unwrap();
/// println!("Rate chart: {}", loader.grid_source_path().display());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ServiceConfig,
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or misses a required field
    ///   (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config: ServiceConfig =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self { config, base_dir })
    }

    /// Returns the underlying service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the address the HTTP server should bind to.
    pub fn bind_address(&self) -> &str {
        &self.config.server.bind_address
    }

    /// Returns the default tracing filter directive.
    pub fn log_filter(&self) -> &str {
        &self.config.logging.filter
    }

    /// Returns the rate chart path, resolved against the config file's directory.
    pub fn grid_source_path(&self) -> PathBuf {
        self.base_dir.join(&self.config.grid.source_path)
    }

    /// Returns the configured rate chart source.
    pub fn grid_source(&self) -> CsvGridSource {
        CsvGridSource::new(self.grid_source_path())
    }
}
