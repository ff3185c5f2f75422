//! Statement upload command

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tally_core::{Categorizer, Config, IngestionPipeline, UPLOAD_MESSAGE};

use super::core::open_db;

pub fn cmd_upload(config: &Config, file: &Path, user: i64, no_train: bool) -> Result<()> {
    // The extension gate belongs to the caller, not the pipeline
    let is_csv = file
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        bail!("Only CSV files are supported for now.");
    }

    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    let db = open_db(config)?;
    let categorizer = Arc::new(Categorizer::open(&config.model_path));
    let pipeline = IngestionPipeline::new(db, categorizer)
        .with_retrain(config.retrain_on_upload && !no_train);

    println!("📥 Uploading {}...", file.display());

    let outcome = pipeline.upload(&raw, user)?;

    println!("✅ {}", UPLOAD_MESSAGE);
    println!("   Imported: {}", outcome.count);

    let categorized = outcome
        .transactions
        .iter()
        .filter(|t| t.category != tally_core::FALLBACK_CATEGORY)
        .count();
    if categorized > 0 {
        println!("   Categorized: {categorized}");
    }

    Ok(())
}
