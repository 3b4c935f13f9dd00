// src/bin/filter_region.rs
use anyhow::{Context, Result};
use log::{info, warn};

use addr_dedupe_lib::{
    config::{self, EXCLUDED_SOURCE_FRAGMENTS, PipelineConfig},
    ingest,
    region::{self, RegionFilter},
};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    config::load_env_files(&[".env", ".env.local", "../.env"]);
    let pipeline_config = PipelineConfig::from_env().context("Invalid pipeline configuration")?;

    let sources =
        ingest::discover_source_files(&pipeline_config.data_dir, &EXCLUDED_SOURCE_FRAGMENTS)
            .with_context(|| {
                format!(
                    "Failed to list source files in {}",
                    pipeline_config.data_dir.display()
                )
            })?;
    if sources.is_empty() {
        warn!(
            "No .geojson source files found in {}",
            pipeline_config.data_dir.display()
        );
    }

    let filter = RegionFilter::greater_boston();
    info!(
        "Filtering {} source files to {} cities into {}",
        sources.len(),
        filter.len(),
        pipeline_config.input_file.display()
    );

    region::filter_sources(&sources, &filter, &pipeline_config.input_file)
        .context("Region filtering failed")?;
    Ok(())
}
