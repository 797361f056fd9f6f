//! Record normalization: transliteration, rounding, and kcal recomputation.
//!
//! Every scraped record passes through three steps before it is printed:
//!
//! 1. **Transliteration**: the food name has its Turkish-specific letters
//!    mapped to their closest ASCII equivalents; anything still outside
//!    ASCII afterwards is dropped.
//! 2. **Stepwise rounding**: each numeric field is rounded to a decimal
//!    precision chosen by its magnitude, a significant-figure heuristic
//!    rather than a fixed precision.
//! 3. **kcal recomputation**: the calorie column is overwritten with the
//!    energy-conversion formula applied to the *rounded* carbohydrate,
//!    protein, and fat values. The scraped kcal is parsed (a malformed
//!    value is still a fault) but never emitted.

use crate::models::{FoodRecord, RawFoodRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;

/// First numeric token in a raw field string. Accepts a comma decimal
/// separator, which some locales render instead of a point.
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(?:[.,]\d+)?").unwrap());

/// Map Turkish-specific letters to their closest ASCII equivalents and drop
/// every character that is still non-ASCII afterwards.
///
/// The table covers exactly the dotted/undotted and diacritic forms used in
/// Turkish orthography, in both cases. Characters outside the table that are
/// already ASCII pass through unchanged; anything else is removed rather
/// than substituted.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(turkish_to_ascii("Muzlu Kek"), "Muzlu Kek");
/// assert_eq!(turkish_to_ascii("çöğüşı"), "cogusi");
/// ```
pub fn turkish_to_ascii(name: &str) -> String {
    let mut ascii = String::with_capacity(name.len());
    for ch in name.chars() {
        let mapped = match ch {
            'ı' => 'i',
            'ğ' => 'g',
            'ü' => 'u',
            'ö' => 'o',
            'ş' => 's',
            'ç' => 'c',
            'İ' => 'I',
            'Ğ' => 'G',
            'Ü' => 'U',
            'Ö' => 'O',
            'Ş' => 'S',
            'Ç' => 'C',
            other => other,
        };
        if mapped.is_ascii() {
            ascii.push(mapped);
        }
    }
    ascii
}

/// Round a value to a decimal precision chosen by its magnitude.
///
/// The bracket is picked on the pre-rounding value, lower bound inclusive:
///
/// | Input          | Precision  |
/// |----------------|------------|
/// | `>= 100`       | 0 decimals |
/// | `[10, 100)`    | 1 decimal  |
/// | `[1, 10)`      | 2 decimals |
/// | `< 1`          | 3 decimals |
///
/// Rounding can carry a value into the next bracket; the bracket is not
/// re-evaluated afterwards. `9.999` stays in the `[1, 10)` bracket and
/// rounds to `10.0` at 2-decimal precision.
pub fn stepwise_round(value: f64) -> f64 {
    if value >= 100.0 {
        round_to(value, 0)
    } else if value >= 10.0 {
        round_to(value, 1)
    } else if value >= 1.0 {
        round_to(value, 2)
    } else {
        round_to(value, 3)
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Recompute the calorie value from rounded macronutrients: 4 kcal per gram
/// of carbohydrate and protein, 9 kcal per gram of fat, truncated to a
/// whole number.
pub fn recompute_kcal(carb: f64, prot: f64, fat: f64) -> i64 {
    ((carb + prot) * 4.0 + fat * 9.0) as i64
}

/// Reduce a raw field string to its numeric value.
///
/// The first numeric token is taken (units and surrounding whitespace are
/// ignored) and a comma decimal separator is normalized to a point.
///
/// # Errors
///
/// Returns an error if the string contains no numeric token.
pub fn parse_value(raw: &str) -> Result<f64, Box<dyn Error>> {
    let token = NUMBER
        .find(raw)
        .ok_or_else(|| format!("no numeric value in {raw:?}"))?;
    Ok(token.as_str().replace(',', ".").parse::<f64>()?)
}

/// Run the full normalization pipeline on one raw record.
///
/// # Errors
///
/// Any malformed numeric field is an error; there is no partial output for
/// a record.
pub fn normalize(raw: &RawFoodRecord) -> Result<FoodRecord, Box<dyn Error>> {
    let name = turkish_to_ascii(raw.name.trim());

    // The scraped kcal only proves the page still matches the trained
    // layout. It is validated here and then discarded.
    parse_value(&raw.kcal)?;

    let carb = stepwise_round(parse_value(&raw.carb)?);
    let prot = stepwise_round(parse_value(&raw.prot)?);
    let fat = stepwise_round(parse_value(&raw.fat)?);
    let fibr = stepwise_round(parse_value(&raw.fibr)?);
    let chol = stepwise_round(parse_value(&raw.chol)?);
    let sodi = stepwise_round(parse_value(&raw.sodi)?);
    let pota = stepwise_round(parse_value(&raw.pota)?);
    let calc = stepwise_round(parse_value(&raw.calc)?);
    let vit_a = stepwise_round(parse_value(&raw.vit_a)?);
    let vit_c = stepwise_round(parse_value(&raw.vit_c)?);
    let iron = stepwise_round(parse_value(&raw.iron)?);

    let kcal = recompute_kcal(carb, prot, fat);

    Ok(FoodRecord {
        name,
        kcal,
        carb,
        prot,
        fat,
        fibr,
        chol,
        sodi,
        pota,
        calc,
        vit_a,
        vit_c,
        iron,
    })
}
