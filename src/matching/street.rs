// src/matching/street.rs
//
// Street suffix normalization applied before building address keys

use std::collections::HashMap;
use std::sync::LazyLock;

/// Full road-type word (or variant spelling) to its standard abbreviation.
/// Already-abbreviated forms map to themselves.
const SUFFIX_ABBREVIATIONS: [(&str, &str); 37] = [
    ("STREET", "ST"),
    ("STREETS", "ST"),
    ("AVENUE", "AVE"),
    ("AV", "AVE"),
    ("BOULEVARD", "BLVD"),
    ("DRIVE", "DR"),
    ("ROAD", "RD"),
    ("LANE", "LN"),
    ("COURT", "CT"),
    ("PLACE", "PL"),
    ("CIRCLE", "CIR"),
    ("TERRACE", "TER"),
    ("TERR", "TER"),
    ("TRAIL", "TRL"),
    ("WAY", "WAY"),
    ("PARKWAY", "PKWY"),
    ("PKY", "PKWY"),
    ("HIGHWAY", "HWY"),
    ("SQUARE", "SQ"),
    ("CROSSING", "XING"),
    ("POINT", "PT"),
    ("LOOP", "LOOP"),
    ("PATH", "PATH"),
    ("PIKE", "PIKE"),
    ("TURNPIKE", "TPKE"),
    ("EXTENSION", "EXT"),
    ("ALLEY", "ALY"),
    ("COMMONS", "CMNS"),
    ("CRESCENT", "CRES"),
    ("HEIGHTS", "HTS"),
    ("HILL", "HL"),
    ("LANDING", "LNDG"),
    ("PARK", "PARK"),
    ("RIDGE", "RDG"),
    ("RUN", "RUN"),
    ("WALK", "WALK"),
    ("WHARF", "WHRF"),
];

static SUFFIX_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| SUFFIX_ABBREVIATIONS.into_iter().collect());

/// Abbreviates the trailing road-type token of an upper-cased street name.
///
/// Only the last token is looked at, and only exact (case-sensitive) table
/// hits are replaced. Runs of whitespace collapse to single spaces. Input with
/// no tokens is returned unchanged.
pub fn normalize_street(street: &str) -> String {
    let mut parts: Vec<&str> = street.split_whitespace().collect();
    let Some(last) = parts.last_mut() else {
        return street.to_string();
    };
    if let Some(abbreviation) = SUFFIX_MAP.get(*last) {
        *last = *abbreviation;
    }
    parts.join(" ")
}
