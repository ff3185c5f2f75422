//! Category model commands

use anyhow::Result;
use tally_core::{Categorizer, Config, TrainOutcome};

use super::core::open_db;

pub fn cmd_train(config: &Config) -> Result<()> {
    let db = open_db(config)?;
    let categorizer = Categorizer::open(&config.model_path);

    let examples = db.labeled_examples_all()?;
    println!("🧠 Training on {} labeled transactions...", examples.len());

    match categorizer.train(&examples)? {
        TrainOutcome::Trained { classes, examples } => {
            println!("✅ Model trained ({classes} categories, {examples} examples)");
        }
        TrainOutcome::Skipped => {
            println!("Nothing to train on yet — upload or add labeled transactions first.");
        }
    }
    Ok(())
}

pub fn cmd_predict(config: &Config, description: &str, amount: f64) -> Result<()> {
    let categorizer = Categorizer::open(&config.model_path);
    println!("{}", categorizer.predict(description, amount));
    Ok(())
}
