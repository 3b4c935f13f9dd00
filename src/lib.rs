// src/lib.rs
pub mod config;
pub mod errors;
pub mod ingest;
pub mod manual;
pub mod matching;
pub mod models;
pub mod region;
pub mod results;

// Re-export common types for easier access
pub use config::{EngineConfig, PipelineConfig};
pub use errors::{ConfigError, IngestError};
pub use models::{AddressKey, AddressRecord, DuplicateGroup, DuplicateLocation, DuplicateReport};

// Re-export important functionality
pub use matching::{find_duplicates, find_duplicates_parallel, normalize_street};
pub use matching::geospatial::haversine_miles;
