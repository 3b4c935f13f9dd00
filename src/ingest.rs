// src/ingest.rs
//
// Line-delimited GeoJSON to AddressRecord conversion

use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::errors::IngestError;
use crate::models::AddressRecord;

#[derive(Debug, Default, Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<RawProperties>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

// Unknown properties (hash, unit, district, ...) are ignored
#[derive(Debug, Default, Deserialize)]
struct RawProperties {
    #[serde(default)]
    number: Option<String>,
    #[serde(default)]
    street: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    postcode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawGeometry {
    #[serde(default)]
    coordinates: Option<Vec<Value>>,
}

/// Parses one GeoJSON feature line. Blank lines yield `Ok(None)`.
///
/// Missing or null text properties become empty strings. Missing geometry,
/// null coordinates or a coordinate array shorter than two yield absent
/// coordinates. A coordinate that is present but not a number is an error.
pub fn parse_feature_line(line: &str) -> Result<Option<AddressRecord>, IngestError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let feature: RawFeature = serde_json::from_str(line)?;
    let props = feature.properties.unwrap_or_default();
    let coords = feature
        .geometry
        .and_then(|g| g.coordinates)
        .unwrap_or_default();

    let (lon, lat) = if coords.len() >= 2 {
        (
            coordinate("longitude", &coords[0])?,
            coordinate("latitude", &coords[1])?,
        )
    } else {
        (None, None)
    };

    Ok(Some(AddressRecord {
        number: props.number.unwrap_or_default(),
        street: props.street.unwrap_or_default(),
        city: props.city.unwrap_or_default(),
        postcode: props.postcode.unwrap_or_default(),
        lon,
        lat,
    }))
}

/// The `city` property of a feature line, empty when absent.
pub(crate) fn feature_city(line: &str) -> Result<String, IngestError> {
    let feature: RawFeature = serde_json::from_str(line)?;
    Ok(feature
        .properties
        .and_then(|p| p.city)
        .unwrap_or_default())
}

fn coordinate(axis: &'static str, value: &Value) -> Result<Option<f64>, IngestError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        other => Err(IngestError::InvalidCoordinate {
            axis,
            value: other.clone(),
        }),
    }
}

/// Calls `on_line` with every line of `path` and its 1-based line number.
pub(crate) fn for_each_line<F>(path: &Path, mut on_line: F) -> Result<(), IngestError>
where
    F: FnMut(usize, &str) -> Result<(), IngestError>,
{
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        on_line(idx + 1, &line).map_err(|e| e.at_line(path, idx + 1))?;
    }
    Ok(())
}

/// Reads every feature of a line-delimited GeoJSON file, in file order.
pub fn read_feature_file(path: &Path) -> Result<Vec<AddressRecord>, IngestError> {
    info!("Reading address features from {}", path.display());
    let mut records = Vec::new();

    for_each_line(path, |_, line| {
        if let Some(record) = parse_feature_line(line)? {
            records.push(record);
        }
        Ok(())
    })?;

    info!("Read {} address records from {}", records.len(), path.display());
    Ok(records)
}

/// Lists `*.geojson` files directly inside `dir`, sorted by path, skipping
/// file names that contain any of `exclude`.
pub fn discover_source_files(dir: &Path, exclude: &[&str]) -> Result<Vec<PathBuf>, IngestError> {
    let io_err = |source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("geojson") {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if exclude.iter().any(|fragment| name.contains(fragment)) {
            debug!("Skipping {} (generated file)", path.display());
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_feature() {
        let line = concat!(
            r#"{"type":"Feature","properties":{"hash":"ab12","number":"100","#,
            r#""street":"Washington Street","unit":"","city":"Boston","district":"","#,
            r#""region":"MA","postcode":"02109","id":""},"#,
            r#""geometry":{"type":"Point","coordinates":[-71.05779,42.35899]}}"#
        );
        let record = parse_feature_line(line).unwrap().unwrap();
        assert_eq!(record.number, "100");
        assert_eq!(record.street, "Washington Street");
        assert_eq!(record.city, "Boston");
        assert_eq!(record.postcode, "02109");
        assert_eq!(record.lon, Some(-71.05779));
        assert_eq!(record.lat, Some(42.35899));
    }

    #[test]
    fn test_blank_line_is_skipped() {
        assert!(parse_feature_line("   ").unwrap().is_none());
    }

    #[test]
    fn test_missing_fields_become_empty_or_absent() {
        let record = parse_feature_line(r#"{"properties":{"number":null,"street":"MAIN ST"}}"#)
            .unwrap()
            .unwrap();
        assert_eq!(record.number, "");
        assert_eq!(record.city, "");
        assert_eq!(record.lon, None);
        assert_eq!(record.lat, None);

        let line = r#"{"properties":null,"geometry":{"coordinates":[null,42.1]}}"#;
        let record = parse_feature_line(line).unwrap().unwrap();
        assert_eq!(record.street, "");
        assert_eq!(record.lon, None);
        assert_eq!(record.lat, Some(42.1));
    }

    #[test]
    fn test_non_numeric_coordinate_is_rejected() {
        let line = concat!(
            r#"{"properties":{"number":"1","street":"MAIN ST"},"#,
            r#""geometry":{"coordinates":["-71.0",42.0]}}"#
        );
        let err = parse_feature_line(line).unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidCoordinate {
                axis: "longitude",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = parse_feature_line("{not json").unwrap_err();
        assert!(matches!(err, IngestError::InvalidFeature(_)));
    }
}
