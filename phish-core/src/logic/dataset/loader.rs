use std::path::Path;

use csv::ReaderBuilder;

use super::record::LabeledUrl;
use crate::logic::model::Label;
use crate::{CoreError, CoreResult};

const URL_COLUMN: &str = "url";

/// Read the `url` column of a CSV file and tag every row with `label`.
/// Rows with an empty or absent URL are dropped.
pub fn load_urls(path: &Path, label: Label) -> CoreResult<Vec<LabeledUrl>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let column = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == URL_COLUMN)
        .ok_or_else(|| CoreError::MissingColumn {
            column: URL_COLUMN.to_string(),
            path: path.display().to_string(),
        })?;

    let mut samples = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record?;
        match record.get(column) {
            Some(url) if !url.is_empty() => samples.push(LabeledUrl {
                url: url.to_string(),
                label,
            }),
            _ => dropped += 1,
        }
    }

    log::info!(
        "Loaded {} {} URLs from {} ({} rows dropped)",
        samples.len(),
        label,
        path.display(),
        dropped
    );
    Ok(samples)
}

/// Phishing rows first, then legitimate ones
pub fn load_labeled(phishing: &Path, legitimate: &Path) -> CoreResult<Vec<LabeledUrl>> {
    let mut samples = load_urls(phishing, Label::Phishing)?;
    samples.extend(load_urls(legitimate, Label::Legitimate)?);
    if samples.is_empty() {
        return Err(CoreError::EmptyDataset);
    }
    Ok(samples)
}
