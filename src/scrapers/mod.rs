//! Site access for nutrition-fact pages.
//!
//! One submodule per supported site. Each exposes the site's URL scheme
//! (base address plus slug concatenation), a page fetcher, and the default
//! seed example used to train the extraction model against that site.
//!
//! | Site | Module | Notes |
//! |------|--------|-------|
//! | diyetkolik.com | [`diyetkolik`] | Per-100g values under `/kac-kalori/<slug>` |

pub mod diyetkolik;
