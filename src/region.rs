// src/region.rs
//
// City allowlist filter that produces the engine's input file

use log::info;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::GREATER_BOSTON;
use crate::errors::IngestError;
use crate::ingest::{feature_city, for_each_line};

#[derive(Debug, Clone)]
pub struct RegionFilter {
    cities: HashSet<String>,
}

impl RegionFilter {
    pub fn new<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            cities: cities
                .into_iter()
                .map(|c| c.as_ref().trim().to_uppercase())
                .collect(),
        }
    }

    pub fn greater_boston() -> Self {
        Self::new(GREATER_BOSTON)
    }

    pub fn matches(&self, city: &str) -> bool {
        self.cities.contains(&city.trim().to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub kept: usize,
    pub total: usize,
    pub files: usize,
}

/// Copies every feature line of `sources` whose city passes `filter` into
/// `output`, one feature per line. Blank lines are not counted.
pub fn filter_sources(
    sources: &[PathBuf],
    filter: &RegionFilter,
    output: &Path,
) -> Result<FilterStats, IngestError> {
    let write_err = |source| IngestError::Io {
        path: output.to_path_buf(),
        source,
    };

    let mut out = BufWriter::new(File::create(output).map_err(write_err)?);
    let mut stats = FilterStats {
        files: sources.len(),
        ..FilterStats::default()
    };

    for source in sources {
        info!("Processing {}...", source.display());
        for_each_line(source, |_, line| {
            let line = line.trim();
            if line.is_empty() {
                return Ok(());
            }
            stats.total += 1;
            if filter.matches(&feature_city(line)?) {
                writeln!(out, "{}", line).map_err(write_err)?;
                stats.kept += 1;
            }
            Ok(())
        })?;
    }

    out.flush().map_err(write_err)?;
    info!(
        "Kept {} / {} addresses from {} files",
        stats.kept, stats.total, stats.files
    );
    Ok(stats)
}
