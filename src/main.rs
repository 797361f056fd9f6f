//! # Nutri Scrape
//!
//! A two-phase scraper that turns the nutrition-fact pages of
//! [diyetkolik.com](https://www.diyetkolik.com) into a per-100g CSV table
//! for a fixed list of foods.
//!
//! ## Phases
//!
//! 1. **`train`**: fetch one example page, locate the expected field values
//!    in its structure, and persist the learned selector rules as a model
//!    artifact. Run once, inspected by hand.
//! 2. **`export`**: load the model, walk the scannable food list strictly
//!    one slug at a time (fetch, extract, normalize), and print the CSV.
//!
//! ## Output
//!
//! The CSV goes to standard output; all logging goes to standard error so
//! the stream can be redirected into a file untouched. Any fault (network,
//! layout mismatch, malformed number) aborts the batch mid-stream with the
//! already-printed lines left behind.
//!
//! ## Usage
//!
//! ```sh
//! nutri_scrape train
//! nutri_scrape export > foods.csv
//! ```

use clap::Parser;
use futures::pin_mut;
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod foods;
mod models;
mod normalize;
mod outputs;
mod pattern;
mod scrapers;

use cli::{Cli, Commands};
use foods::FoodRegistry;
use models::{FIELD_ALIASES, FoodRecord, RawFoodRecord, SeedRecord};
use outputs::csv;
use pattern::SelectorModel;
use scrapers::diyetkolik;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr; stdout carries nothing but the CSV stream.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(io::stderr)
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match args.command {
        Commands::Train { ref seed } => run_train(&args.model, seed.as_deref()).await,
        Commands::Export { ref foods } => run_export(&args.model, foods.as_deref()).await,
    }
}

/// Train the extraction model from the seed page and persist it.
///
/// The learned rules are verified once against the seed page itself and the
/// result is printed for human inspection; a field the learner could not
/// place shows up as `(not located)`.
#[instrument(level = "info", skip_all, fields(model = %model_path.display()))]
async fn run_train(model_path: &Path, seed_path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let seed = match seed_path {
        Some(path) => SeedRecord::from_yaml_file(path)?,
        None => diyetkolik::default_seed(),
    };
    info!(url = %seed.url, fields = seed.fields.len(), "Training extraction model");

    let html = diyetkolik::fetch_page(&seed.url).await?;
    let model = SelectorModel::learn(&html, &seed);
    info!(rules = model.rules.len(), "Learned extraction rules");

    // Verification pass over the same page, printed in column order.
    let extraction = model.extract(&html)?;
    for alias in FIELD_ALIASES {
        match extraction.get(alias).and_then(|values| values.first()) {
            Some(value) => println!("{alias}: {value:?}"),
            None => println!("{alias}: (not located)"),
        }
    }

    model.save(model_path)?;
    info!(path = %model_path.display(), "Model saved");
    Ok(())
}

/// Apply the persisted model to every scannable food and print the CSV.
///
/// Strictly sequential: one fetch, then its processing, then the next slug.
/// The first failure of any step aborts the whole batch.
#[instrument(level = "info", skip_all, fields(model = %model_path.display()))]
async fn run_export(model_path: &Path, foods_path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let start_time = std::time::Instant::now();

    let model = SelectorModel::load(model_path)?;
    let registry = match foods_path {
        Some(path) => FoodRegistry::from_yaml_file(path)?,
        None => FoodRegistry::builtin(),
    };
    info!(
        scannable = registry.scannable.len(),
        broken = registry.broken.len(),
        "Loaded food registry; broken names are kept as a record only and never fetched"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    csv::write_header(&mut out)?;

    let records = stream::iter(registry.scannable.iter()).then(|slug| export_one(&model, slug));
    pin_mut!(records);
    while let Some(record) = records.next().await {
        let record = record?;
        csv::write_record(&mut out, &record)?;
    }
    out.flush()?;

    let elapsed = start_time.elapsed();
    info!(
        count = registry.scannable.len(),
        secs = elapsed.as_secs(),
        "Export complete"
    );
    Ok(())
}

/// Fetch, extract, and normalize a single food.
#[instrument(level = "info", skip_all, fields(%slug))]
async fn export_one(model: &SelectorModel, slug: &str) -> Result<FoodRecord, Box<dyn Error>> {
    let url = diyetkolik::food_url(slug)?;
    let html = diyetkolik::fetch_page(&url).await?;
    let extraction = model.extract(&html)?;
    let raw = RawFoodRecord::from_extraction(&extraction)?;
    let record = normalize::normalize(&raw)?;
    debug!(name = %record.name, kcal = record.kcal, "Normalized record");
    Ok(record)
}
