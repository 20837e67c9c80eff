//! Dataset Module - labeled URL inputs and the combined training export
//!
//! Inputs are CSV files with a `url` column, one file per class. The
//! combined export keeps every URL with its label and the exact feature
//! vector the classifier was trained on, in CSV for auditability.

pub mod export;
pub mod loader;
pub mod record;

#[cfg(test)]
mod tests;

pub use export::{read_sample, CombinedWriter};
pub use loader::{load_labeled, load_urls};
pub use record::{DatasetRecord, LabeledUrl};
