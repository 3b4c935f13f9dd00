// src/results.rs

use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::{DuplicateGroup, DuplicateReport};

/// Writes the report as compact JSON and returns the file size in bytes.
pub fn write_report(path: &Path, report: &DuplicateReport) -> Result<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, report).context("Failed to serialize duplicate report")?;
    writer.flush().context("Failed to flush duplicate report")?;

    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat report file {}", path.display()))?
        .len();
    Ok(size)
}

/// `ADDRESS — N locations: CITY POSTCODE, CITY POSTCODE`
pub fn summary_line(group: &DuplicateGroup) -> String {
    let cities: Vec<String> = group
        .locations
        .iter()
        .map(|loc| format!("{} {}", loc.city, loc.postcode))
        .collect();
    format!(
        "{} — {} locations: {}",
        group.address,
        group.count,
        cities.join(", ")
    )
}

/// Logs the report size and the first `limit` groups.
pub fn log_summary(path: &Path, size_bytes: u64, report: &DuplicateReport, limit: usize) {
    let size_mb = size_bytes as f64 / 1024.0 / 1024.0;
    info!(
        "Saved {} duplicate addresses to {} ({:.1} MB)",
        report.total,
        path.display(),
        size_mb
    );

    if report.duplicates.is_empty() || limit == 0 {
        return;
    }
    info!("Top {}:", limit.min(report.duplicates.len()));
    for group in report.duplicates.iter().take(limit) {
        info!("  {}", summary_line(group));
    }
}
