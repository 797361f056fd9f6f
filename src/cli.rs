//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and subcommands using the `clap`
//! crate. The model path is shared by both subcommands and can also be set
//! through the environment.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Teach the extraction model from the built-in example page
/// nutri_scrape train
///
/// # Print the nutrition CSV for the built-in food list
/// nutri_scrape export > foods.csv
///
/// # Use a custom model location and food list
/// nutri_scrape --model ./models/diyetkolik.json export --foods my-foods.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the persisted extraction model
    #[arg(
        short,
        long,
        env = "NUTRI_SCRAPE_MODEL",
        default_value = "./scraper-info"
    )]
    pub model: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Learn extraction rules from a seed page and persist the model
    Train {
        /// YAML file with the seed URL and expected field values
        /// (the built-in example page is used when omitted)
        #[arg(short, long)]
        seed: Option<PathBuf>,
    },
    /// Apply the persisted model to the food list and print the CSV
    Export {
        /// YAML file overriding the built-in food registry
        #[arg(short, long)]
        foods: Option<PathBuf>,
    },
}
