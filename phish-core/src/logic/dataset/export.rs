use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Writer};

use super::record::DatasetRecord;
use crate::logic::features::layout::FEATURE_NAMES;
use crate::{CoreError, CoreResult};

/// Streams the combined dataset to CSV: `url,type,label,feature_0..feature_46`
pub struct CombinedWriter {
    writer: Writer<File>,
    path: PathBuf,
    rows: usize,
}

impl CombinedWriter {
    pub fn create(path: &Path) -> CoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = Writer::from_path(path)?;

        let mut header = vec!["url", "type", "label"];
        header.extend(FEATURE_NAMES.iter());
        writer.write_record(&header)?;

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            rows: 0,
        })
    }

    pub fn append(&mut self, record: &DatasetRecord<'_>) -> CoreResult<()> {
        let mut row = Vec::with_capacity(3 + FEATURE_NAMES.len());
        row.push(record.url.to_string());
        row.push(record.label.as_str().to_string());
        row.push(record.label.index().to_string());
        row.extend(record.features.as_slice().iter().map(|v| v.to_string()));
        self.writer.write_record(&row)?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and return the number of data rows written
    pub fn finish(mut self) -> CoreResult<usize> {
        self.writer.flush()?;
        log::info!("Exported {} rows to {}", self.rows, self.path.display());
        Ok(self.rows)
    }
}

/// First data row of a combined export as `feature_N → value`.
/// `Ok(None)` when the file has no data rows.
pub fn read_sample(path: &Path) -> CoreResult<Option<BTreeMap<String, f32>>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut columns = Vec::with_capacity(FEATURE_NAMES.len());
    for name in FEATURE_NAMES {
        let index = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CoreError::MissingColumn {
                column: name.to_string(),
                path: path.display().to_string(),
            })?;
        columns.push((name, index));
    }

    let record = match reader.records().next() {
        Some(record) => record?,
        None => return Ok(None),
    };

    let mut sample = BTreeMap::new();
    for (name, index) in columns {
        let value = record
            .get(index)
            .and_then(|v| v.trim().parse::<f32>().ok())
            .ok_or_else(|| {
                CoreError::InvalidArtifact(format!("non-numeric {} in {}", name, path.display()))
            })?;
        sample.insert(name.to_string(), value);
    }
    Ok(Some(sample))
}
