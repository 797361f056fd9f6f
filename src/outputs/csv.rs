//! CSV rendering of normalized food records.
//!
//! The column order is fixed by [`crate::models::FIELD_ALIASES`]: name
//! first, kcal second, nutrients after. Numeric fields print in their
//! minimal form (no padding, no trailing `.0`), so `358.0` prints as `358`
//! and `22.8` stays `22.8`. Fields are never quoted; food names on the
//! source site do not contain commas.

use crate::models::FoodRecord;
use itertools::Itertools;
use std::io::{self, Write};

/// Header line, matching the record field order exactly.
pub const CSV_HEADER: &str =
    "name,kcal,carb(g),prot(g),fat(g),fibr(g),chol(mg),sodi(mg),pota(mg),calc(mg),vitA(iu),vitC(mg),iron(mg)";

/// Render one record as a CSV line (no trailing newline).
pub fn record_line(record: &FoodRecord) -> String {
    let nutrients = [
        record.carb,
        record.prot,
        record.fat,
        record.fibr,
        record.chol,
        record.sodi,
        record.pota,
        record.calc,
        record.vit_a,
        record.vit_c,
        record.iron,
    ];
    format!("{},{},{}", record.name, record.kcal, nutrients.iter().join(","))
}

/// Write the header line.
pub fn write_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{CSV_HEADER}")
}

/// Write one record line.
pub fn write_record<W: Write>(out: &mut W, record: &FoodRecord) -> io::Result<()> {
    writeln!(out, "{}", record_line(record))
}
