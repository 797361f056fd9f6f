//! diyetkolik.com nutrition-fact pages.
//!
//! Every food item lives at a stable, unauthenticated URL built from the
//! calorie-search path prefix and the food's slug, e.g.
//! `https://www.diyetkolik.com/kac-kalori/muz`. The pages share one layout,
//! which is what makes a single trained selector model applicable to all
//! of them.

use crate::models::SeedRecord;
use reqwest::get;
use std::error::Error;
use tracing::{debug, instrument};
use url::Url;

/// Path prefix all food pages hang off of. The trailing slash matters for
/// slug joining.
pub const BASE_URL: &str = "https://www.diyetkolik.com/kac-kalori/";

/// Build the page URL for one food slug.
pub fn food_url(slug: &str) -> Result<String, Box<dyn Error>> {
    let base = Url::parse(BASE_URL)?;
    Ok(base.join(slug)?.to_string())
}

/// Fetch one page body. Plain GET, no custom headers, no retries; any
/// network failure propagates to the caller.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_page(url: &str) -> Result<String, Box<dyn Error>> {
    let body = get(url).await?.text().await?;
    debug!(bytes = body.len(), "Fetched page");
    Ok(body)
}

/// The built-in training example: the muzlu-kek page with its expected
/// values copied verbatim from the rendered page, incidental whitespace
/// included. The kcal value is only used to locate the kcal slot; the
/// emitted kcal is always recomputed.
pub fn default_seed() -> SeedRecord {
    let fields = [
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
        url: format!("{BASE_URL}muzlu-kek"),
        fields,
    }
}
