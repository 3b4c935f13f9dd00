// src/matching/geospatial/core.rs

use log::trace;

use super::utils::haversine_miles;
use crate::models::{AddressRecord, GeoPoint, LocationCluster};

/// Splits the records of one address key into distinct physical locations.
///
/// Single greedy pass in arrival order: each record is compared with every
/// existing cluster's representative in creation order and joins the first
/// one closer than `min_distance_miles`. Otherwise it opens a new cluster.
/// Representatives are never revised and records are never reassigned, so the
/// result depends on input order but is deterministic for a given order.
///
/// Records without both coordinates are skipped.
pub fn cluster_locations(
    records: &[AddressRecord],
    min_distance_miles: f64,
) -> Vec<LocationCluster> {
    let mut clusters: Vec<LocationCluster> = Vec::new();

    for record in records {
        let Some((lat, lon)) = record.position() else {
            continue;
        };
        let point = GeoPoint {
            city: record.city.clone(),
            postcode: record.postcode.clone(),
            lat,
            lon,
        };

        let home = clusters.iter().position(|cluster| {
            let rep = cluster.representative();
            haversine_miles(rep.lat, rep.lon, point.lat, point.lon) < min_distance_miles
        });

        match home {
            Some(idx) => clusters[idx].push(point),
            None => {
                trace!(
                    "Opening cluster {} at ({:.5}, {:.5})",
                    clusters.len(),
                    point.lat,
                    point.lon
                );
                clusters.push(LocationCluster::new(point));
            }
        }
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    // One mile of latitude, in degrees
    const MILE_LAT: f64 = 1.0 / 69.0976;

    fn at(lat: f64, lon: f64) -> AddressRecord {
        AddressRecord::new("1", "MAIN ST", "BOSTON", "02108", Some(lon), Some(lat))
    }

    #[test]
    fn test_nearby_points_share_a_cluster() {
        let records = vec![at(42.36, -71.06), at(42.36 + 0.01 * MILE_LAT, -71.06)];
        let clusters = cluster_locations(&records, 0.4);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 2);
    }

    #[test]
    fn test_far_points_split() {
        let records = vec![at(42.36, -71.06), at(42.36 + MILE_LAT, -71.06)];
        assert_eq!(cluster_locations(&records, 0.4).len(), 2);
    }

    #[test]
    fn test_first_match_wins_and_representative_is_fixed() {
        // B is 0.5 miles north of A, C is 0.25 miles north of A: within
        // threshold of both representatives, so it must land in A's cluster.
        let a = at(42.36, -71.06);
        let b = at(42.36 + 0.5 * MILE_LAT, -71.06);
        let c = at(42.36 + 0.25 * MILE_LAT, -71.06);
        let clusters = cluster_locations(&[a.clone(), b.clone(), c], 0.4);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
        assert_eq!(clusters[0].representative().lat, a.lat.unwrap());
        assert_eq!(clusters[1].len(), 1);
        assert_eq!(clusters[1].representative().lat, b.lat.unwrap());
    }

    #[test]
    fn test_chained_points_are_not_transitively_merged() {
        // Each step is 0.3 miles but the third point is 0.6 from the representative
        let records = vec![
            at(42.36, -71.06),
            at(42.36 + 0.3 * MILE_LAT, -71.06),
            at(42.36 + 0.6 * MILE_LAT, -71.06),
        ];
        let clusters = cluster_locations(&records, 0.4);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
    }

    #[test]
    fn test_threshold_is_strict() {
        let records = vec![at(42.36, -71.06), at(43.36, -71.06)];
        let distance = haversine_miles(42.36, -71.06, 43.36, -71.06);
        assert_eq!(cluster_locations(&records, distance).len(), 2);
        assert_eq!(cluster_locations(&records, distance + 1e-6).len(), 1);
    }

    #[test]
    fn test_records_without_coordinates_are_skipped() {
        let mut missing_lat = at(42.36, -71.06);
        missing_lat.lat = None;
        let mut missing_lon = at(42.36, -71.06);
        missing_lon.lon = None;

        assert!(cluster_locations(&[missing_lat.clone(), missing_lon.clone()], 0.4).is_empty());

        let clusters = cluster_locations(&[missing_lat, at(42.0, -71.0), missing_lon], 0.4);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 1);
    }
}
