//! Data models for nutrition records and their processed representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`SeedRecord`]: The human-supplied example used once to teach the extraction model
//! - [`Extraction`]: Raw extraction output keyed by field alias
//! - [`RawFoodRecord`]: One scraped record with every field still a string
//! - [`FoodRecord`]: The normalized per-100g record ready for CSV output
//!
//! # Field order
//!
//! [`FIELD_ALIASES`] fixes the canonical field order. It defines the CSV
//! column order, the order in which seed values are taught to the model,
//! and the order the trainer prints its verification result in.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;

/// Field aliases in canonical column order: the name first, kcal second,
/// then the remaining nutrients.
pub const FIELD_ALIASES: [&str; 13] = [
    "name", "kcal", "carb", "prot", "fat", "fibr", "chol", "sodi", "pota", "calc", "vitA", "vitC",
    "iron",
];

/// Raw extraction output: field alias mapped to the matched texts for that
/// field. The first entry of each list is authoritative; later entries carry
/// no meaning.
pub type Extraction = BTreeMap<String, Vec<String>>;

/// One example page and its expected field values, used once to teach the
/// extraction model the page's structure.
///
/// The values must be verbatim substrings of the rendered page, incidental
/// whitespace included, because the model learns by locating them in the
/// page structure.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRecord {
    /// Page the model is trained against.
    pub url: String,
    /// Expected field values exactly as they appear in the page text,
    /// keyed by field alias.
    pub fields: BTreeMap<String, String>,
}

impl SeedRecord {
    /// Load a seed record from a YAML file.
    ///
    /// # Expected layout
    ///
    /// ```yaml
    /// url: https://www.diyetkolik.com/kac-kalori/muzlu-kek
    /// fields:
    ///   name: "Muzlu Kek"
    ///   kcal: "470          "
    /// ```
    pub fn from_yaml_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read seed file {}: {e}", path.display()))?;
        let seed: Self = serde_yaml::from_str(&yaml)?;
        Ok(seed)
    }

    /// Seed fields in canonical alias order. Aliases absent from the seed
    /// are skipped, aliases outside [`FIELD_ALIASES`] are ignored.
    pub fn ordered_fields(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        FIELD_ALIASES
            .iter()
            .filter_map(move |alias| self.fields.get(*alias).map(|value| (*alias, value.as_str())))
    }
}

/// One scraped record with every field still in its raw string form.
///
/// Built from an [`Extraction`] by an explicit field-by-field mapping step;
/// a missing alias is an error at that step, before any parsing happens.
#[derive(Debug, Clone)]
pub struct RawFoodRecord {
    pub name: String,
    /// Scraped kcal. Validated during normalization but never emitted; the
    /// emitted kcal is always recomputed from the macronutrients.
    pub kcal: String,
    pub carb: String,
    pub prot: String,
    pub fat: String,
    pub fibr: String,
    pub chol: String,
    pub sodi: String,
    pub pota: String,
    pub calc: String,
    pub vit_a: String,
    pub vit_c: String,
    pub iron: String,
}

impl RawFoodRecord {
    /// Build a typed record from the raw extraction output.
    ///
    /// Each field is looked up by alias; the first matched text wins.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first alias that is missing from the
    /// extraction result, which aborts the batch for that run.
    pub fn from_extraction(extraction: &Extraction) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            name: first_value(extraction, "name")?,
            kcal: first_value(extraction, "kcal")?,
            carb: first_value(extraction, "carb")?,
            prot: first_value(extraction, "prot")?,
            fat: first_value(extraction, "fat")?,
            fibr: first_value(extraction, "fibr")?,
            chol: first_value(extraction, "chol")?,
            sodi: first_value(extraction, "sodi")?,
            pota: first_value(extraction, "pota")?,
            calc: first_value(extraction, "calc")?,
            vit_a: first_value(extraction, "vitA")?,
            vit_c: first_value(extraction, "vitC")?,
            iron: first_value(extraction, "iron")?,
        })
    }
}

fn first_value(extraction: &Extraction, alias: &str) -> Result<String, Box<dyn Error>> {
    extraction
        .get(alias)
        .and_then(|values| values.first())
        .cloned()
        .ok_or_else(|| format!("field {alias:?} missing from extraction result").into())
}

/// A normalized per-100g nutrition record ready for CSV output.
///
/// All numeric fields except `kcal` have been through stepwise rounding;
/// `kcal` is recomputed from the rounded carbohydrate, protein, and fat
/// values and truncated to a whole number.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodRecord {
    pub name: String,
    pub kcal: i64,
    pub carb: f64,
    pub prot: f64,
    pub fat: f64,
    pub fibr: f64,
    pub chol: f64,
    pub sodi: f64,
    pub pota: f64,
    pub calc: f64,
    pub vit_a: f64,
    pub vit_c: f64,
    pub iron: f64,
}
