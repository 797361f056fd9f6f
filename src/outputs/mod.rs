//! Output generation.
//!
//! One submodule per format. The only format today is CSV on standard
//! output: a fixed header line followed by one record per scraped food,
//! streamed as records are produced so partial output survives an abort.

pub mod csv;
