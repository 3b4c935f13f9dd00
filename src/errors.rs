// src/errors.rs

use std::path::PathBuf;

/// Errors raised while turning GeoJSON lines into address records.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Invalid GeoJSON feature: {0}")]
    InvalidFeature(#[from] serde_json::Error),

    #[error("Coordinate {axis} must be a number, got {value}")]
    InvalidCoordinate {
        axis: &'static str,
        value: serde_json::Value,
    },

    #[error("{}:{}: {}", .path.display(), .line, .source)]
    AtLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<IngestError>,
    },

    #[error("IO error reading {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub fn at_line(self, path: impl Into<PathBuf>, line: usize) -> Self {
        IngestError::AtLine {
            path: path.into(),
            line,
            source: Box::new(self),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Distance threshold must be a positive number of miles, got {0}")]
    InvalidThreshold(f64),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}
