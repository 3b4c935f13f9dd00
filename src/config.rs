// src/config.rs

use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

// Records closer than this to a cluster representative are the same physical location
pub const MIN_DISTANCE_MILES: f64 = 0.4;

pub const EARTH_RADIUS_MILES: f64 = 3959.0;

// 4 decimal places is roughly 11m
pub const COORDINATE_DECIMALS: usize = 4;

/// Joins the address part and the city part of an address key.
pub const KEY_SEPARATOR: &str = " | ";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_INPUT_FILE: &str = "data/greater_boston.geojson";
pub const DEFAULT_OUTPUT_FILE: &str = "data/duplicate_addresses.json";

// File name fragments of our own outputs, skipped when scanning the data directory
pub const EXCLUDED_SOURCE_FRAGMENTS: [&str; 2] = ["greater_boston", "duplicate"];

pub const SUMMARY_LIMIT: usize = 20;

/// Greater Boston core cities.
pub const GREATER_BOSTON: [&str; 10] = [
    "BOSTON",
    "CAMBRIDGE",
    "SOMERVILLE",
    "BROOKLINE",
    "CHELSEA",
    "REVERE",
    "EVERETT",
    "MALDEN",
    "MEDFORD",
    "WINTHROP",
];

/// Tunables for the clustering engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub min_distance_miles: f64,
    /// Number of chunks the parallel driver splits key groups into.
    pub workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_distance_miles: MIN_DISTANCE_MILES,
            workers: 1,
        }
    }
}

impl EngineConfig {
    pub fn with_threshold(min_distance_miles: f64) -> Result<Self, ConfigError> {
        validate_threshold(min_distance_miles)?;
        Ok(Self {
            min_distance_miles,
            ..Self::default()
        })
    }
}

fn validate_threshold(value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold(value))
    }
}

/// Everything the binaries need, resolved from the environment.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub engine: EngineConfig,
    pub summary_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            input_file: PathBuf::from(DEFAULT_INPUT_FILE),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            engine: EngineConfig::default(),
            summary_limit: SUMMARY_LIMIT,
        }
    }
}

impl PipelineConfig {
    /// Reads `DUPES_*` overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with the variable source injected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("DUPES_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(input) = lookup("DUPES_INPUT_FILE") {
            config.input_file = PathBuf::from(input);
        }
        if let Some(output) = lookup("DUPES_OUTPUT_FILE") {
            config.output_file = PathBuf::from(output);
        }
        if let Some(raw) = lookup("DUPES_MIN_DISTANCE_MILES") {
            let value = parse_var::<f64>("DUPES_MIN_DISTANCE_MILES", &raw)?;
            validate_threshold(value)?;
            config.engine.min_distance_miles = value;
        }
        if let Some(raw) = lookup("DUPES_WORKERS") {
            let workers = parse_var::<usize>("DUPES_WORKERS", &raw)?;
            if workers == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "DUPES_WORKERS".to_string(),
                    value: raw,
                });
            }
            config.engine.workers = workers;
        }
        if let Some(raw) = lookup("DUPES_SUMMARY_LIMIT") {
            config.summary_limit = parse_var::<usize>("DUPES_SUMMARY_LIMIT", &raw)?;
        }

        debug!("Resolved pipeline config: {:?}", config);
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

/// Loads the first `.env` style file that exists. Variables already set win.
pub fn load_env_files(candidates: &[&str]) -> Option<PathBuf> {
    for candidate in candidates {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        match dotenv::from_path(path) {
            Ok(()) => {
                info!("Loaded environment variables from {}", path.display());
                return Some(path.to_path_buf());
            }
            Err(e) => log::warn!("Failed to load environment from {}: {}", path.display(), e),
        }
    }
    info!("No .env file found, using environment variables from system");
    None
}
