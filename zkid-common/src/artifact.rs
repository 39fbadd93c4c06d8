//! On-disk artifacts: synchronous JSON writes and the batch manifest.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::{FixtureError, Result};

pub const MANIFEST_VERSION: u32 = 1;
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub path: String,
    pub blake3: String,
    pub size: u64,
}

impl ArtifactFile {
    pub fn from_bytes(path: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            path: path.into(),
            blake3: hash_bytes_hex(bytes),
            size: bytes.len() as u64,
        }
    }
}

/// Summary of one batch run, written next to the fixtures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureManifest {
    pub manifest_version: u32,
    pub scenario: String,
    pub fixtures: Vec<ArtifactFile>,
    /// Indices that failed and were skipped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_indices: Vec<usize>,
}

impl FixtureManifest {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            manifest_version: MANIFEST_VERSION,
            scenario: scenario.into(),
            fixtures: Vec::new(),
            failed_indices: Vec::new(),
        }
    }
}

pub fn hash_bytes_hex(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Pretty JSON with tab indentation.
pub fn to_pretty_json(value: &impl Serialize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    value
        .serialize(&mut serializer)
        .map_err(|err| FixtureError::invalid_input(format!("failed to encode json: {err}")))?;
    Ok(buf)
}

/// Write `bytes` to `path` and flush them to disk before returning.
pub fn write_file_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| FixtureError::io(parent, err))?;
    }
    let mut file = File::create(path).map_err(|err| FixtureError::io(path, err))?;
    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .map_err(|err| FixtureError::io(path, err))
}

/// Serialize `value` as tab-indented JSON and write it synchronously.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<Vec<u8>> {
    let bytes = to_pretty_json(value)?;
    write_file_synced(path, &bytes)?;
    Ok(bytes)
}

/// Read and parse a JSON artifact. Absence or bad JSON is `MissingArtifact`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|err| FixtureError::missing_artifact(path, err))?;
    serde_json::from_slice(&bytes).map_err(|err| FixtureError::missing_artifact(path, err))
}

pub fn write_manifest(dir: &Path, manifest: &FixtureManifest) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_FILE);
    write_json(&path, manifest)?;
    Ok(path)
}

pub fn read_manifest(dir: &Path) -> Result<FixtureManifest> {
    read_json(&dir.join(MANIFEST_FILE))
}
