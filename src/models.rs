// src/models.rs

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{COORDINATE_DECIMALS, KEY_SEPARATOR};

//------------------------------------------------------------------------------
// INPUT
//------------------------------------------------------------------------------

/// One address point as it enters the engine.
///
/// Text fields use the empty string for missing values. Coordinates are
/// `None` when the source feature had no usable geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddressRecord {
    pub number: String,
    pub street: String,
    pub city: String,
    pub postcode: String,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

impl AddressRecord {
    pub fn new(
        number: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        postcode: impl Into<String>,
        lon: Option<f64>,
        lat: Option<f64>,
    ) -> Self {
        Self {
            number: number.into(),
            street: street.into(),
            city: city.into(),
            postcode: postcode.into(),
            lon,
            lat,
        }
    }

    /// `(lat, lon)` when both coordinates are present.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

//------------------------------------------------------------------------------
// GROUPING
//------------------------------------------------------------------------------

/// Grouping key: `"<NUMBER> <NORMALIZED STREET>"` paired with the city.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddressKey {
    pub address: String,
    pub city: String,
}

impl AddressKey {
    pub fn new(address: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
        }
    }
}

impl fmt::Display for AddressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.address, KEY_SEPARATOR, self.city)
    }
}

/// A record with its key-derivation already applied: upper-cased, trimmed
/// and with a present position.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub city: String,
    pub postcode: String,
    pub lat: f64,
    pub lon: f64,
}

/// Records of one address key judged to be the same physical location.
/// The first member is the representative and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCluster {
    members: Vec<GeoPoint>,
}

impl LocationCluster {
    pub fn new(representative: GeoPoint) -> Self {
        Self {
            members: vec![representative],
        }
    }

    pub fn representative(&self) -> &GeoPoint {
        &self.members[0]
    }

    pub fn push(&mut self, point: GeoPoint) {
        self.members.push(point);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

//------------------------------------------------------------------------------
// OUTPUT
//------------------------------------------------------------------------------

/// Representative of one cluster as written to the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateLocation {
    pub city: String,
    pub postcode: String,
    pub lon: f64,
    pub lat: f64,
}

impl From<&GeoPoint> for DuplicateLocation {
    fn from(point: &GeoPoint) -> Self {
        Self {
            city: point.city.clone(),
            postcode: point.postcode.clone(),
            lon: round_coordinate(point.lon),
            lat: round_coordinate(point.lat),
        }
    }
}

/// An address whose records resolve to two or more distinct locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub address: String,
    /// Number of clusters, not number of raw records.
    pub count: usize,
    pub locations: Vec<DuplicateLocation>,
}

/// Final artifact of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub total: usize,
    pub duplicates: Vec<DuplicateGroup>,
}

impl DuplicateReport {
    pub fn new(duplicates: Vec<DuplicateGroup>) -> Self {
        Self {
            total: duplicates.len(),
            duplicates,
        }
    }
}

/// Rounds to `COORDINATE_DECIMALS` places from the exact binary value, so a
/// stored `-71.09965` (really `-71.0996499...`) becomes `-71.0996`.
pub fn round_coordinate(value: f64) -> f64 {
    let formatted = format!("{:.*}", COORDINATE_DECIMALS, value);
    match formatted.parse::<f64>() {
        Ok(rounded) => rounded,
        Err(e) => {
            warn!("Could not round coordinate {}: {}", value, e);
            value
        }
    }
}
