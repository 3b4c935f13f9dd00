// src/matching/address.rs
use anyhow::{Context, Result};
use futures::future::try_join_all;
use indexmap::IndexMap;
use log::{debug, info};
use std::time::Instant;

use super::geospatial::cluster_locations;
use super::street::normalize_street;
use crate::config::EngineConfig;
use crate::models::{
    AddressKey, AddressRecord, DuplicateGroup, DuplicateLocation, LocationCluster,
};

/// Records per address key, keys in first-seen order, records in arrival order.
pub type AddressGroups = IndexMap<AddressKey, Vec<AddressRecord>>;

/// Canonicalizes a record and derives its grouping key.
///
/// Number, street and city are trimmed and upper-cased, the postcode is only
/// trimmed, and the street suffix is abbreviated. Returns `None` when the
/// number or street is empty, which is how incomplete records are dropped.
pub fn derive_key(record: &AddressRecord) -> Option<(AddressKey, AddressRecord)> {
    let number = record.number.trim().to_uppercase();
    let street = record.street.trim().to_uppercase();
    if number.is_empty() || street.is_empty() {
        return None;
    }

    let street = normalize_street(&street);
    let city = record.city.trim().to_uppercase();
    let key = AddressKey::new(format!("{} {}", number, street), city.clone());

    let canonical = AddressRecord {
        number,
        street,
        city,
        postcode: record.postcode.trim().to_string(),
        lon: record.lon,
        lat: record.lat,
    };
    Some((key, canonical))
}

/// Groups the main stream followed by the manual entries by address key.
pub fn group_by_address<I, E>(records: I, extra_records: E) -> AddressGroups
where
    I: IntoIterator<Item = AddressRecord>,
    E: IntoIterator<Item = AddressRecord>,
{
    let mut groups = AddressGroups::new();
    let mut seen = 0usize;
    let mut skipped = 0usize;

    for record in records.into_iter().chain(extra_records) {
        seen += 1;
        match derive_key(&record) {
            Some((key, canonical)) => groups.entry(key).or_default().push(canonical),
            None => skipped += 1,
        }
    }

    debug!(
        "Grouped {} records into {} address keys ({} skipped without number or street)",
        seen,
        groups.len(),
        skipped
    );
    groups
}

/// Clusters every group independently, keeping group order.
pub fn cluster_groups<G>(
    groups: G,
    min_distance_miles: f64,
) -> Vec<(AddressKey, Vec<LocationCluster>)>
where
    G: IntoIterator<Item = (AddressKey, Vec<AddressRecord>)>,
{
    groups
        .into_iter()
        .map(|(key, records)| {
            let clusters = cluster_locations(&records, min_distance_miles);
            (key, clusters)
        })
        .collect()
}

/// Keeps keys with two or more clusters, most clusters first.
///
/// The sort is stable, so keys with equal counts stay in first-seen order.
pub fn emit_duplicates<C>(clustered: C) -> Vec<DuplicateGroup>
where
    C: IntoIterator<Item = (AddressKey, Vec<LocationCluster>)>,
{
    let mut dupes: Vec<DuplicateGroup> = clustered
        .into_iter()
        .filter(|(_, clusters)| clusters.len() >= 2)
        .map(|(key, clusters)| {
            debug!("{} resolves to {} distinct locations", key, clusters.len());
            DuplicateGroup {
                address: key.address,
                count: clusters.len(),
                locations: clusters
                    .iter()
                    .map(|cluster| DuplicateLocation::from(cluster.representative()))
                    .collect(),
            }
        })
        .collect();

    dupes.sort_by(|a, b| b.count.cmp(&a.count));
    dupes
}

/// Finds addresses whose records resolve to two or more distinct locations.
///
/// `extra_records` are processed as if appended to the end of `records`.
pub fn find_duplicates<I, E>(
    records: I,
    extra_records: E,
    config: &EngineConfig,
) -> Vec<DuplicateGroup>
where
    I: IntoIterator<Item = AddressRecord>,
    E: IntoIterator<Item = AddressRecord>,
{
    info!(
        "Starting duplicate address detection (threshold {} mi)...",
        config.min_distance_miles
    );
    let start_time = Instant::now();

    let groups = group_by_address(records, extra_records);
    let clustered = cluster_groups(groups, config.min_distance_miles);
    let dupes = emit_duplicates(clustered);

    info!(
        "Duplicate address detection complete: {} duplicate addresses in {:.2?}",
        dupes.len(),
        start_time.elapsed()
    );
    dupes
}

/// Same result as `find_duplicates`, with the per-key clustering spread over
/// `config.workers` blocking tasks.
///
/// Groups are split into contiguous chunks of the first-seen key order and the
/// chunk results are concatenated in that same order before sorting.
pub async fn find_duplicates_parallel<I, E>(
    records: I,
    extra_records: E,
    config: &EngineConfig,
) -> Result<Vec<DuplicateGroup>>
where
    I: IntoIterator<Item = AddressRecord>,
    E: IntoIterator<Item = AddressRecord>,
{
    let start_time = Instant::now();
    let groups = group_by_address(records, extra_records);
    let workers = config.workers.max(1);
    let chunk_size = groups.len().div_ceil(workers).max(1);
    let min_distance_miles = config.min_distance_miles;

    info!(
        "Clustering {} address keys across {} workers ({} keys per chunk)",
        groups.len(),
        workers,
        chunk_size
    );

    let mut pending = groups.into_iter();
    let mut tasks = Vec::with_capacity(workers);
    loop {
        let chunk: Vec<(AddressKey, Vec<AddressRecord>)> =
            pending.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        tasks.push(tokio::task::spawn_blocking(move || {
            cluster_groups(chunk, min_distance_miles)
        }));
    }

    let chunk_results = try_join_all(tasks)
        .await
        .context("Clustering worker task failed")?;
    let dupes = emit_duplicates(chunk_results.into_iter().flatten());

    info!(
        "Parallel duplicate address detection complete: {} duplicate addresses in {:.2?}",
        dupes.len(),
        start_time.elapsed()
    );
    Ok(dupes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_canonicalizes_fields() {
        let record = AddressRecord::new(
            " 12a ",
            " beacon street ",
            "boston ",
            " 02108 ",
            Some(-71.06),
            Some(42.36),
        );
        let (key, canonical) = derive_key(&record).unwrap();
        assert_eq!(key.address, "12A BEACON ST");
        assert_eq!(key.city, "BOSTON");
        assert_eq!(key.to_string(), "12A BEACON ST | BOSTON");
        assert_eq!(canonical.postcode, "02108");
        assert_eq!(canonical.lat, Some(42.36));
    }

    #[test]
    fn test_derive_key_drops_incomplete_records() {
        let no_number = AddressRecord::new("  ", "MAIN ST", "BOSTON", "", None, None);
        let no_street = AddressRecord::new("5", "", "BOSTON", "", None, None);
        assert!(derive_key(&no_number).is_none());
        assert!(derive_key(&no_street).is_none());

        // City may be empty
        let no_city = AddressRecord::new("5", "MAIN ST", "", "", None, None);
        assert_eq!(derive_key(&no_city).unwrap().0.city, "");
    }

    #[test]
    fn test_group_by_address_appends_extras_last() {
        let main = vec![
            AddressRecord::new("1", "ELM STREET", "MALDEN", "02148", Some(-71.1), Some(42.4)),
            AddressRecord::new("2", "OAK ST", "MALDEN", "02148", Some(-71.1), Some(42.4)),
        ];
        let extra = vec![AddressRecord::new(
            "1",
            "ELM ST",
            "MALDEN",
            "02149",
            Some(-71.0),
            Some(42.5),
        )];

        let groups = group_by_address(main, extra);
        let keys: Vec<String> = groups.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["1 ELM ST | MALDEN", "2 OAK ST | MALDEN"]);

        let elm = &groups[&AddressKey::new("1 ELM ST", "MALDEN")];
        assert_eq!(elm.len(), 2);
        assert_eq!(elm[1].postcode, "02149");
    }

    #[test]
    fn test_same_address_in_different_cities_never_merges() {
        let records = vec![
            AddressRecord::new("1", "MAIN ST", "BOSTON", "02108", Some(-71.06), Some(42.36)),
            AddressRecord::new("1", "MAIN ST", "CAMBRIDGE", "02139", Some(-71.10), Some(42.37)),
        ];
        let dupes = find_duplicates(records, Vec::new(), &EngineConfig::default());
        assert!(dupes.is_empty());
    }

    #[test]
    fn test_emit_sorts_by_count_and_keeps_ties_in_order() {
        let cluster = |lat: f64| {
            LocationCluster::new(crate::models::GeoPoint {
                city: "BOSTON".to_string(),
                postcode: "02108".to_string(),
                lat,
                lon: -71.0,
            })
        };
        let clustered = vec![
            (AddressKey::new("1 A ST", "BOSTON"), vec![cluster(42.0), cluster(43.0)]),
            (AddressKey::new("2 B ST", "BOSTON"), vec![cluster(42.0)]),
            (
                AddressKey::new("3 C ST", "BOSTON"),
                vec![cluster(42.0), cluster(43.0), cluster(44.0)],
            ),
            (AddressKey::new("4 D ST", "BOSTON"), vec![cluster(42.0), cluster(43.0)]),
        ];

        let dupes = emit_duplicates(clustered);
        let order: Vec<(&str, usize)> = dupes
            .iter()
            .map(|d| (d.address.as_str(), d.count))
            .collect();
        assert_eq!(order, vec![("3 C ST", 3), ("1 A ST", 2), ("4 D ST", 2)]);
    }
}
