//! Pipeline configuration
//!
//! The source projection, the normalization horizon, and the lease
//! boundary ring, loaded from TOML and passed explicitly into the pipeline
//! at construction time. There is no process-global configuration: two
//! pipelines with different settings can coexist in one process.
//!
//! ## Loading order
//!
//! 1. `ACMPROD_CONFIG` environment variable (path to a TOML file)
//! 2. `acmprod.toml` in the current working directory
//! 3. Built-in defaults (UTM zone 14N, 12-month horizon, the ACM lease
//!    outline)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable naming an explicit config path.
const CONFIG_ENV: &str = "ACMPROD_CONFIG";
/// Config filename probed in the working directory.
const CONFIG_LOCAL: &str = "acmprod.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Source coordinate reference system: one fixed UTM zone on WGS84.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// UTM zone number (1-60)
    pub utm_zone: u8,
    /// Northern-hemisphere grid (no false northing)
    pub northern_hemisphere: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        // The ACM lease sits in UTM zone 14N (EPSG:32614).
        Self {
            utm_zone: 14,
            northern_hemisphere: true,
        }
    }
}

/// Aggregation tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Fixed horizon for the normalized dataset (months)
    pub cutoff_months: u32,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self { cutoff_months: 12 }
    }
}

/// The lease outline as a closed ring of UTM vertices (first == last).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// `[easting, northing]` pairs in metres
    pub ring_utm: Vec<[f64; 2]>,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            ring_utm: vec![
                [629_254.0, 2_294_990.0],
                [629_205.0, 2_305_136.0],
                [643_050.0, 2_305_249.0],
                [643_137.0, 2_295_102.0],
                [629_254.0, 2_294_990.0],
            ],
        }
    }
}

/// Everything the pipeline needs, in one explicit value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub projection: ProjectionConfig,
    pub aggregation: AggregationConfig,
    pub boundary: BoundaryConfig,
}

impl PipelineConfig {
    /// Load using the documented order: env var, local file, defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "loaded pipeline config from {CONFIG_ENV}");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "failed to load config from {CONFIG_ENV}, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{CONFIG_ENV} points to a non-existent file, falling back");
            }
        }

        let local = PathBuf::from(CONFIG_LOCAL);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("loaded pipeline config from ./{CONFIG_LOCAL}");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "failed to load ./{CONFIG_LOCAL}, using defaults");
                }
            }
        }

        info!("no {CONFIG_LOCAL} found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=60).contains(&self.projection.utm_zone) {
            return Err(ConfigError::Invalid(format!(
                "utm_zone {} out of range (1-60)",
                self.projection.utm_zone
            )));
        }
        let ring = &self.boundary.ring_utm;
        if ring.len() < 4 {
            return Err(ConfigError::Invalid(format!(
                "boundary ring needs at least 4 vertices, got {}",
                ring.len()
            )));
        }
        if ring.first() != ring.last() {
            return Err(ConfigError::Invalid(
                "boundary ring is not closed (first vertex != last vertex)".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        config.validate().expect("default config must validate");
        assert_eq!(config.projection.utm_zone, 14);
        assert_eq!(config.aggregation.cutoff_months, 12);
        assert_eq!(config.boundary.ring_utm.len(), 5);
        assert_eq!(
            config.boundary.ring_utm.first(),
            config.boundary.ring_utm.last()
        );
    }

    #[test]
    fn test_empty_toml_parses_to_defaults() {
        let config: PipelineConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config.projection.utm_zone, 14);
    }

    #[test]
    fn test_partial_toml_overrides_one_section() {
        let config: PipelineConfig = toml::from_str(
            "[aggregation]\ncutoff_months = 6\n",
        )
        .expect("partial TOML should parse");
        assert_eq!(config.aggregation.cutoff_months, 6);
        assert_eq!(config.projection.utm_zone, 14);
    }

    #[test]
    fn test_unclosed_ring_is_rejected() {
        let mut config = PipelineConfig::default();
        config.boundary.ring_utm.pop();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_zone_is_rejected() {
        let mut config = PipelineConfig::default();
        config.projection.utm_zone = 0;
        assert!(config.validate().is_err());
    }
}
