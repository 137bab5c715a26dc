use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "demand-dash.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Dataset locations and display knobs. Every field is optional in the
/// JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub forecast_csv: PathBuf,
    pub lifecycle_csv: PathBuf,
    pub shortfall_csv: PathBuf,
    pub fulfillment_csv: PathBuf,
    /// Rows in the top-performing SKU table.
    pub top_n: usize,
    /// Months visible at once in the month-wise accuracy strip.
    pub visible_months: usize,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            forecast_csv: PathBuf::from("data/forecast.csv"),
            lifecycle_csv: PathBuf::from("data/lifecycle.csv"),
            shortfall_csv: PathBuf::from("data/shortfall.csv"),
            fulfillment_csv: PathBuf::from("data/fulfillment.csv"),
            top_n: 10,
            visible_months: 4,
            window_size: [1280.0, 860.0],
        }
    }
}

impl DashboardConfig {
    /// Read `path`, or [`DEFAULT_CONFIG_FILE`] when `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No {} found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        let config: DashboardConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.top_n = self.top_n.max(1);
        self.visible_months = self.visible_months.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "forecast_csv": "/srv/fc.csv", "top_n": 0 }}"#).unwrap();

        let config = DashboardConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.forecast_csv, PathBuf::from("/srv/fc.csv"));
        assert_eq!(config.lifecycle_csv, PathBuf::from("data/lifecycle.csv"));
        assert_eq!(config.top_n, 1);
        assert_eq!(config.visible_months, 4);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = DashboardConfig::load(Some(Path::new("/nope/demand-dash.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = DashboardConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
