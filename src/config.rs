// Copyright Catenary Transit Initiatives
// Tunable constants for the map engine

use crate::city_clusters::UNKNOWN_CITY_LABEL;
use crate::proximity_grouping::DEFAULT_PROXIMITY_THRESHOLD;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Zoom at and above which the map switches from city clusters to proximity groups.
    /// Also the zoom used when flying to a clicked city cluster.
    pub cluster_zoom: f64,
    /// Merge distance for proximity groups, in raw degrees.
    pub proximity_threshold: f64,
    pub group_focus_zoom: f64,
    pub panel_focus_zoom: f64,
    pub detail_focus_zoom: f64,
    pub polygon_fit_max_zoom: f64,
    pub polygon_fit_padding_px: u32,
    pub unknown_city_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cluster_zoom: 13.0,
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            group_focus_zoom: 14.0,
            panel_focus_zoom: 14.0,
            detail_focus_zoom: 15.0,
            polygon_fit_max_zoom: 15.0,
            polygon_fit_padding_px: 50,
            unknown_city_label: UNKNOWN_CITY_LABEL.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EngineConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.proximity_threshold.is_finite() && self.proximity_threshold > 0.0) {
            return Err(ConfigError::Invalid {
                field: "proximity_threshold",
                reason: format!(
                    "must be finite and positive, got {}",
                    self.proximity_threshold
                ),
            });
        }

        let zooms = [
            ("cluster_zoom", self.cluster_zoom),
            ("group_focus_zoom", self.group_focus_zoom),
            ("panel_focus_zoom", self.panel_focus_zoom),
            ("detail_focus_zoom", self.detail_focus_zoom),
            ("polygon_fit_max_zoom", self.polygon_fit_max_zoom),
        ];
        for (field, zoom) in zooms {
            if !zoom.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be finite, got {}", zoom),
                });
            }
        }

        if self.unknown_city_label.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "unknown_city_label",
                reason: "must not be blank".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cluster_zoom, 13.0);
        assert_eq!(config.proximity_threshold, 0.01);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let raw = r#"{"proximity_threshold": 0.02}"#;
        let config: EngineConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.proximity_threshold, 0.02);
        assert_eq!(config.detail_focus_zoom, 15.0);
        assert_eq!(config.unknown_city_label, "unknown");
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let config = EngineConfig {
            proximity_threshold: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "proximity_threshold",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_non_finite_zoom() {
        let config = EngineConfig {
            panel_focus_zoom: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = EngineConfig::from_json_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
