//! Artifact Envelope
//!
//! Classifier and vectorizer are written as two independent files with the
//! same envelope: a header (kind, feature layout, checksum) plus a bincode
//! payload. Loading rejects the wrong kind, a stale layout or a payload
//! whose SHA-256 no longer matches.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::logic::features::layout::{layout_hash, validate_layout, FEATURE_VERSION};
use crate::{CoreError, CoreResult};

const ARTIFACT_MAGIC: [u8; 4] = *b"PHGA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    Classifier,
    Vectorizer,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Classifier => f.write_str("classifier"),
            ArtifactKind::Vectorizer => f.write_str("vectorizer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    pub magic: [u8; 4],
    pub kind: ArtifactKind,
    pub feature_version: u8,
    pub layout_hash: u32,
    /// Shared by the classifier and vectorizer of one training run
    pub model_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Hex SHA-256 of the payload
    pub checksum: String,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    header: ArtifactHeader,
    payload: Vec<u8>,
}

fn checksum(payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hex::encode(hasher.finalize())
}

/// Serialize `value` into an artifact file, creating parent directories
pub fn save<T: Serialize>(
    path: &Path,
    kind: ArtifactKind,
    model_id: Uuid,
    value: &T,
) -> CoreResult<ArtifactHeader> {
    let payload = bincode::serialize(value)?;
    let header = ArtifactHeader {
        magic: ARTIFACT_MAGIC,
        kind,
        feature_version: FEATURE_VERSION,
        layout_hash: layout_hash(),
        model_id,
        created_at: Utc::now(),
        checksum: checksum(&payload),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let bytes = bincode::serialize(&Envelope { header: header.clone(), payload })?;
    fs::write(path, bytes)?;

    log::info!("Saved {} artifact to {} ({})", kind, path.display(), header.checksum);
    Ok(header)
}

/// Read and verify an artifact file
pub fn load<T: DeserializeOwned>(path: &Path, kind: ArtifactKind) -> CoreResult<(ArtifactHeader, T)> {
    let bytes = fs::read(path)?;
    let envelope: Envelope = bincode::deserialize(&bytes)
        .map_err(|e| CoreError::InvalidArtifact(format!("unreadable envelope: {}", e)))?;
    let header = envelope.header;

    if header.magic != ARTIFACT_MAGIC {
        return Err(CoreError::InvalidArtifact("bad magic".to_string()));
    }
    if header.kind != kind {
        return Err(CoreError::InvalidArtifact(format!(
            "expected {} artifact, found {}",
            kind, header.kind
        )));
    }
    validate_layout(header.feature_version, header.layout_hash)?;

    let actual = checksum(&envelope.payload);
    if actual != header.checksum {
        return Err(CoreError::Checksum {
            expected: header.checksum,
            actual,
        });
    }

    let value = bincode::deserialize(&envelope.payload)?;
    log::info!("Loaded {} artifact from {} (model {})", kind, path.display(), header.model_id);
    Ok((header, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        weights: Vec<f64>,
    }

    fn sample() -> Payload {
        Payload { weights: vec![0.25, 0.5, 0.75] }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("model.bin");
        let id = Uuid::new_v4();

        let saved = save(&path, ArtifactKind::Classifier, id, &sample()).unwrap();
        let (header, value): (ArtifactHeader, Payload) = load(&path, ArtifactKind::Classifier).unwrap();

        assert_eq!(header, saved);
        assert_eq!(header.model_id, id);
        assert_eq!(value, sample());
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");
        save(&path, ArtifactKind::Classifier, Uuid::new_v4(), &sample()).unwrap();

        let result: CoreResult<(ArtifactHeader, Payload)> = load(&path, ArtifactKind::Vectorizer);
        assert!(matches!(result, Err(CoreError::InvalidArtifact(_))));
    }

    #[test]
    fn test_tampered_payload_fails_checksum() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");
        save(&path, ArtifactKind::Classifier, Uuid::new_v4(), &sample()).unwrap();

        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        fs::write(&path, bytes).unwrap();

        let result: CoreResult<(ArtifactHeader, Payload)> = load(&path, ArtifactKind::Classifier);
        assert!(matches!(result, Err(CoreError::Checksum { .. })));
    }

    #[test]
    fn test_stale_layout_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let payload = bincode::serialize(&sample()).unwrap();
        let envelope = Envelope {
            header: ArtifactHeader {
                magic: ARTIFACT_MAGIC,
                kind: ArtifactKind::Classifier,
                feature_version: FEATURE_VERSION,
                layout_hash: layout_hash() ^ 1,
                model_id: Uuid::new_v4(),
                created_at: Utc::now(),
                checksum: checksum(&payload),
            },
            payload,
        };
        fs::write(&path, bincode::serialize(&envelope).unwrap()).unwrap();

        let result: CoreResult<(ArtifactHeader, Payload)> = load(&path, ArtifactKind::Classifier);
        assert!(matches!(result, Err(CoreError::LayoutMismatch(_))));
    }

    #[test]
    fn test_garbage_and_missing_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");
        fs::write(&path, b"not an artifact").unwrap();

        let garbage: CoreResult<(ArtifactHeader, Payload)> = load(&path, ArtifactKind::Classifier);
        assert!(garbage.is_err());

        let missing: CoreResult<(ArtifactHeader, Payload)> =
            load(&dir.path().join("absent.bin"), ArtifactKind::Classifier);
        assert!(matches!(missing, Err(CoreError::Io(_))));
    }
}
