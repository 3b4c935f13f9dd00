// src/main.rs
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

use addr_dedupe_lib::{
    config::{self, PipelineConfig},
    ingest, manual,
    matching,
    models::DuplicateReport,
    results,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    info!("Starting duplicate address detection pipeline");
    let start_time = Instant::now();

    config::load_env_files(&[".env", ".env.local", "../.env"]);
    let pipeline_config = PipelineConfig::from_env().context("Invalid pipeline configuration")?;

    let records = ingest::read_feature_file(&pipeline_config.input_file).with_context(|| {
        format!(
            "Failed to read address features from {}",
            pipeline_config.input_file.display()
        )
    })?;
    let extra = manual::manual_entries();
    info!(
        "Loaded {} records plus {} manual entries",
        records.len(),
        extra.len()
    );

    let engine = &pipeline_config.engine;
    let dupes = if engine.workers > 1 {
        matching::find_duplicates_parallel(records, extra, engine).await?
    } else {
        matching::find_duplicates(records, extra, engine)
    };

    let report = DuplicateReport::new(dupes);
    let size = results::write_report(&pipeline_config.output_file, &report)?;
    results::log_summary(
        &pipeline_config.output_file,
        size,
        &report,
        pipeline_config.summary_limit,
    );

    info!("Pipeline completed in {:.2?}", start_time.elapsed());
    Ok(())
}
