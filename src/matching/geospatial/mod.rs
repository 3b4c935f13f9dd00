// src/matching/geospatial/mod.rs

// Distance clustering of the records that share an address key

mod core;
mod utils;

pub use self::core::cluster_locations;
pub use self::utils::haversine_miles;
