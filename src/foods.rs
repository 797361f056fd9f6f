//! The food-name registry: which slugs get scraped and which are known bad.

use serde::Deserialize;
use std::error::Error;
use std::path::Path;

// Names beginning with A or B are fully covered through
// https://www.diyetkolik.com/kac-kalori/arama/b?p=9
const SCANNABLE: &[&str] = &[
    "ananas",
    "antep-fistigi-butun",
    "armut",
    "asure",
    "avokado",
    "ay-cekirdegi",
    "ayran",
    "ayva",
    "balkabagi",
    "beyti-kebabi",
    "boza",
    "baklava",
    "baileys",
    "barbun",
    "beyaz-lahana",
    "beyaz-peynir",
    "beyaz-uzum",
    "biber-tursusu",
    "bira",
    "bitter-cikolata",
    "bogurtlen",
    "brokoli",
    "bruksel-lahanasi",
    "bulgur-pilavi",
    "ceviz",
    "cevizli-baklava",
    "cilek",
    "fistik",
    "greyfurt",
    "haslanmis-patates",
    "hindi-salam",
    "kavun",
    "kivi",
    "limon",
    "makarna",
    "marul",
    "muz",
    "pekmez",
    "portakal",
    "sekersiz-filtre-kahve",
    "semizotu",
    "tereyagli-pirinc-pilavi",
    "yumurta",
];

// Pages the trained model cannot read. Kept as a record only; these are
// never fetched and never produce output.
const BROKEN: &[&str] = &[
    "ahududu", "badem", "biber", "cay", "sogan", "domates", "lahana", "ispanak", "findik",
];

/// The two immutable slug lists handed to the extractor at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct FoodRegistry {
    /// Slugs known to work with the current extraction rules.
    pub scannable: Vec<String>,
    /// Slugs known to fail. Never processed.
    #[serde(default)]
    pub broken: Vec<String>,
}

impl FoodRegistry {
    /// The built-in registry.
    pub fn builtin() -> Self {
        Self {
            scannable: SCANNABLE.iter().map(|s| s.to_string()).collect(),
            broken: BROKEN.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Load a registry from a YAML file with `scannable` and (optionally)
    /// `broken` lists.
    pub fn from_yaml_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read food registry {}: {e}", path.display()))?;
        let registry: Self = serde_yaml::from_str(&yaml)?;
        Ok(registry)
    }
}
