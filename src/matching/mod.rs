// src/matching/mod.rs
pub mod address;
pub mod geospatial;
pub mod street;

pub use address::{find_duplicates, find_duplicates_parallel, group_by_address};
pub use street::normalize_street;
