//! Learned-selector extraction model.
//!
//! The model is taught once from a single example page. For every wanted
//! field value it locates the deepest element whose text matches the value,
//! records the element's CSS path together with the match's ordinal among
//! all elements sharing that path, and keeps the resulting rule set.
//! Applying the model to another page with the same layout selects the same
//! structural positions and returns whatever text sits there now.
//!
//! # Model artifact
//!
//! The rule set is persisted as a JSON file:
//!
//! ```text
//! {
//!   "version": 1,
//!   "seed_url": "https://www.diyetkolik.com/kac-kalori/muzlu-kek",
//!   "trained_at": "2025-08-06T09:14:02+03:00",
//!   "rules": [
//!     { "alias": "kcal", "path": "html > body > ... > span.food-kcal", "index": 0 },
//!     ...
//!   ]
//! }
//! ```
//!
//! The artifact layout is owned by this module; consumers only load what
//! [`SelectorModel::save`] wrote. Loading rejects artifacts written with a
//! different format version.
//!
//! # Silent partiality
//!
//! A seed value that cannot be located on the page yields no rule, only a
//! warning. The trainer's printed verification pass is the one place where
//! a human is expected to notice a hole in the rule set.

use crate::models::{Extraction, SeedRecord};
use chrono::Local;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Format version stamped into every artifact. Bump when the rule layout
/// changes so stale models are retrained instead of misapplied.
pub const MODEL_VERSION: u32 = 1;

/// One learned extraction rule: which elements to select and which match
/// to take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Field alias the extracted text is reported under.
    pub alias: String,
    /// CSS path of the element the seed value was found in.
    pub path: String,
    /// Ordinal of the match among all elements selected by `path`.
    pub index: usize,
}

/// A trained extraction model: one [`FieldRule`] per locatable seed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorModel {
    pub version: u32,
    pub seed_url: String,
    pub trained_at: String,
    pub rules: Vec<FieldRule>,
}

impl SelectorModel {
    /// Learn one rule per seed field from the rendered seed page.
    ///
    /// For each expected value the deepest element whose trimmed text equals
    /// the trimmed value wins; ties go to the earliest element in document
    /// order. Values that appear nowhere on the page are skipped with a
    /// warning and produce no rule.
    #[instrument(level = "info", skip_all, fields(url = %seed.url))]
    pub fn learn(html: &str, seed: &SeedRecord) -> Self {
        let document = Html::parse_document(html);
        let everything = Selector::parse("*").unwrap();

        let mut rules = Vec::new();
        for (alias, value) in seed.ordered_fields() {
            let wanted = value.trim();
            if wanted.is_empty() {
                warn!(alias, "Seed value is blank; field will not be extracted");
                continue;
            }

            let mut best: Option<(usize, ElementRef)> = None;
            for element in document.select(&everything) {
                if element.text().collect::<String>().trim() != wanted {
                    continue;
                }
                let depth = element.ancestors().count();
                match best {
                    Some((best_depth, _)) if depth <= best_depth => {}
                    _ => best = Some((depth, element)),
                }
            }

            let Some((_, element)) = best else {
                warn!(alias, value = wanted, "Seed value not found on page; field will not be extracted");
                continue;
            };

            let path = css_path(&element);
            let Ok(selector) = Selector::parse(&path) else {
                warn!(alias, %path, "Derived path does not parse as a selector; field will not be extracted");
                continue;
            };
            let Some(index) = document
                .select(&selector)
                .position(|candidate| candidate.id() == element.id())
            else {
                continue;
            };

            debug!(alias, %path, index, "Learned rule");
            rules.push(FieldRule {
                alias: alias.to_string(),
                path,
                index,
            });
        }

        Self {
            version: MODEL_VERSION,
            seed_url: seed.url.clone(),
            trained_at: Local::now().to_rfc3339(),
            rules,
        }
    }

    /// Apply the rule set to a page and collect the matched texts per alias.
    ///
    /// A rule whose path or ordinal no longer matches anything contributes
    /// no entry; the structural mismatch then surfaces as a missing field
    /// when the record is mapped.
    pub fn extract(&self, html: &str) -> Result<Extraction, Box<dyn Error>> {
        let document = Html::parse_document(html);
        let mut extraction = Extraction::new();

        for rule in &self.rules {
            let selector = Selector::parse(&rule.path)
                .map_err(|e| format!("model rule {:?} has an unusable path: {e}", rule.alias))?;
            if let Some(element) = document.select(&selector).nth(rule.index) {
                let text = element.text().collect::<String>();
                extraction.entry(rule.alias.clone()).or_default().push(text);
            } else {
                debug!(alias = %rule.alias, path = %rule.path, "Rule matched nothing on this page");
            }
        }

        Ok(extraction)
    }

    /// Persist the model artifact as JSON.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .map_err(|e| format!("cannot write model to {}: {e}", path.display()))?;
        Ok(())
    }

    /// Load a previously saved model artifact.
    ///
    /// # Errors
    ///
    /// Fails if the file is unreadable, is not a model artifact, or was
    /// written with a different [`MODEL_VERSION`].
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let json = fs::read_to_string(path)
            .map_err(|e| format!("cannot read model at {}: {e}", path.display()))?;
        let model: Self = serde_json::from_str(&json)?;
        if model.version != MODEL_VERSION {
            return Err(format!(
                "model at {} has format version {}, expected {MODEL_VERSION}; retrain it",
                path.display(),
                model.version
            )
            .into());
        }
        debug!(
            seed_url = %model.seed_url,
            trained_at = %model.trained_at,
            rules = model.rules.len(),
            "Loaded extraction model"
        );
        Ok(model)
    }
}

/// CSS path of an element from the document root down, one segment per
/// ancestor: tag name plus `#id` and `.class` qualifiers where they form
/// valid identifiers.
fn css_path(element: &ElementRef) -> String {
    let mut segments: Vec<String> = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .map(|ancestor| css_segment(&ancestor))
        .collect();
    segments.reverse();
    segments.push(css_segment(element));
    segments.join(" > ")
}

fn css_segment(element: &ElementRef) -> String {
    let value = element.value();
    let mut segment = value.name().to_string();
    if let Some(id) = value.id().filter(|id| is_css_identifier(id)) {
        segment.push('#');
        segment.push_str(id);
    }
    for class in value.classes().filter(|class| is_css_identifier(class)) {
        segment.push('.');
        segment.push_str(class);
    }
    segment
}

/// Conservative identifier check so generated paths always re-parse.
/// Classes with exotic characters are left out of the path rather than
/// escaped.
fn is_css_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawFoodRecord;
    use std::collections::BTreeMap;

    const SEED_PAGE: &str = r#"<html><body>
      <div class="food-detail">
        <h1 class="food-name">Muzlu Kek</h1>
        <span class="food-kcal">470          </span>
        <table class="nutrition-facts">
          <tr><td class="label">Karbonhidrat</td><td class="value">42.5155984349</td></tr>
          <tr><td class="label">Protein</td><td class="value">6.65013660836</td></tr>
          <tr><td class="label">Yağ</td><td class="value">20.760028451 </td></tr>
          <tr><td class="label">Lif</td><td class="value">2.44969317776</td></tr>
          <tr><td class="label">Kolesterol</td><td class="value">55.2965920674</td></tr>
          <tr><td class="label">Sodyum</td><td class="value">166.624843001</td></tr>
          <tr><td class="label">Potasyum</td><td class="value">236.521709684</td></tr>
          <tr><td class="label">Kalsiyum</td><td class="value">32.4951510164</td></tr>
          <tr><td class="label">A Vitamini</td><td class="value">51.1415141472</td></tr>
          <tr><td class="label">C Vitamini</td><td class="value">3.77289299749</td></tr>
          <tr><td class="label">Demir</td><td class="value">1.24777388002</td></tr>
        </table>
      </div>
    </body></html>"#;

    const MUZ_PAGE: &str = r#"<html><body>
      <div class="food-detail">
        <h1 class="food-name">Muz</h1>
        <span class="food-kcal">89</span>
        <table class="nutrition-facts">
          <tr><td class="label">Karbonhidrat</td><td class="value">22.84</td></tr>
          <tr><td class="label">Protein</td><td class="value">1.09</td></tr>
          <tr><td class="label">Yağ</td><td class="value">0.33</td></tr>
          <tr><td class="label">Lif</td><td class="value">2.6</td></tr>
          <tr><td class="label">Kolesterol</td><td class="value">0</td></tr>
          <tr><td class="label">Sodyum</td><td class="value">1</td></tr>
          <tr><td class="label">Potasyum</td><td class="value">358</td></tr>
          <tr><td class="label">Kalsiyum</td><td class="value">5</td></tr>
          <tr><td class="label">A Vitamini</td><td class="value">64</td></tr>
          <tr><td class="label">C Vitamini</td><td class="value">8.7</td></tr>
          <tr><td class="label">Demir</td><td class="value">0.26</td></tr>
        </table>
      </div>
    </body></html>"#;

    fn seed() -> SeedRecord {
        let fields: BTreeMap<String, String> = [
            ("name", "Muzlu Kek"),
            ("kcal", "470          "),
            ("carb", "42.5155984349"),
            ("prot", "6.65013660836"),
            ("fat", "20.760028451 "),
            ("fibr", "2.44969317776"),
            ("chol", "55.2965920674"),
            ("sodi", "166.624843001"),
            ("pota", "236.521709684"),
            ("calc", "32.4951510164"),
            ("vitA", "51.1415141472"),
            ("vitC", "3.77289299749"),
            ("iron", "1.24777388002"),
        ]
        .into_iter()
        .map(|(alias, value)| (alias.to_string(), value.to_string()))
        .collect();
        SeedRecord {
            url: "https://www.diyetkolik.com/kac-kalori/muzlu-kek".to_string(),
            fields,
        }
    }

    #[test]
    fn test_learn_finds_all_seed_fields() {
        let model = SelectorModel::learn(SEED_PAGE, &seed());
        assert_eq!(model.version, MODEL_VERSION);
        assert_eq!(model.rules.len(), 13);

        let aliases: Vec<&str> = model.rules.iter().map(|r| r.alias.as_str()).collect();
        assert_eq!(aliases[0], "name");
        assert_eq!(aliases[1], "kcal");
        assert_eq!(aliases[12], "iron");
    }

    #[test]
    fn test_learn_prefers_deepest_element() {
        let model = SelectorModel::learn(SEED_PAGE, &seed());
        let name_rule = model.rules.iter().find(|r| r.alias == "name").unwrap();
        assert!(name_rule.path.ends_with("h1.food-name"), "{}", name_rule.path);

        let carb_rule = model.rules.iter().find(|r| r.alias == "carb").unwrap();
        assert!(carb_rule.path.ends_with("td.value"), "{}", carb_rule.path);
        assert_eq!(carb_rule.index, 0);

        let iron_rule = model.rules.iter().find(|r| r.alias == "iron").unwrap();
        assert_eq!(iron_rule.index, 10);
    }

    #[test]
    fn test_learn_skips_unlocatable_values() {
        let mut seed = seed();
        seed.fields
            .insert("carb".to_string(), "not on the page".to_string());
        let model = SelectorModel::learn(SEED_PAGE, &seed);
        assert_eq!(model.rules.len(), 12);
        assert!(model.rules.iter().all(|r| r.alias != "carb"));
    }

    #[test]
    fn test_extract_verbatim_including_whitespace() {
        let model = SelectorModel::learn(SEED_PAGE, &seed());
        let extraction = model.extract(SEED_PAGE).unwrap();
        assert_eq!(extraction["name"], vec!["Muzlu Kek".to_string()]);
        assert_eq!(extraction["kcal"], vec!["470          ".to_string()]);
        assert_eq!(extraction["fat"], vec!["20.760028451 ".to_string()]);
    }

    #[test]
    fn test_extract_transfers_to_same_layout() {
        let model = SelectorModel::learn(SEED_PAGE, &seed());
        let extraction = model.extract(MUZ_PAGE).unwrap();

        let raw = RawFoodRecord::from_extraction(&extraction).unwrap();
        assert_eq!(raw.name, "Muz");
        assert_eq!(raw.kcal, "89");
        assert_eq!(raw.carb, "22.84");
        assert_eq!(raw.prot, "1.09");
        assert_eq!(raw.fat, "0.33");
        assert_eq!(raw.iron, "0.26");
    }

    #[test]
    fn test_extract_on_mismatched_page_yields_missing_fields() {
        let model = SelectorModel::learn(SEED_PAGE, &seed());
        let extraction = model.extract("<html><body><p>gone</p></body></html>").unwrap();
        assert!(extraction.is_empty());
        assert!(RawFoodRecord::from_extraction(&extraction).is_err());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let model = SelectorModel::learn(SEED_PAGE, &seed());
        let path = std::env::temp_dir().join("nutri_scrape_model_roundtrip.json");
        model.save(&path).unwrap();
        let loaded = SelectorModel::load(&path).unwrap();
        assert_eq!(loaded, model);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_other_versions() {
        let path = std::env::temp_dir().join("nutri_scrape_model_version.json");
        let artifact = r#"{
            "version": 999,
            "seed_url": "https://example.com",
            "trained_at": "2025-08-06T00:00:00+03:00",
            "rules": []
        }"#;
        std::fs::write(&path, artifact).unwrap();
        let err = SelectorModel::load(&path).unwrap_err();
        assert!(err.to_string().contains("version"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_css_identifier_filter() {
        assert!(is_css_identifier("food-name"));
        assert!(is_css_identifier("value"));
        assert!(!is_css_identifier("md:flex"));
        assert!(!is_css_identifier("2col"));
        assert!(!is_css_identifier(""));
    }
}
