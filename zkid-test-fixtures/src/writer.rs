//! Per-index fixture persistence. Every write is flushed before it returns so
//! a later step (or the process exit) never races an in-flight write.

use std::path::{Path, PathBuf};

use tracing::info;
use zkid_common::{
    read_json, write_json, write_manifest, ArtifactFile, FixtureManifest, Result,
};

use crate::record::FixtureRecord;

pub fn fixture_file_name(index: usize) -> String {
    format!("input_{index}.json")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenFixture {
    pub index: usize,
    pub path: PathBuf,
    pub artifact: ArtifactFile,
}

#[derive(Clone, Debug)]
pub struct FixtureWriter {
    output_dir: PathBuf,
}

impl FixtureWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn fixture_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(fixture_file_name(index))
    }

    pub fn write(&self, index: usize, record: &FixtureRecord) -> Result<WrittenFixture> {
        let path = self.fixture_path(index);
        let bytes = write_json(&path, record)?;
        let artifact = ArtifactFile::from_bytes(fixture_file_name(index), &bytes);
        info!(
            index,
            path = %path.display(),
            size = artifact.size,
            "wrote fixture"
        );
        Ok(WrittenFixture {
            index,
            path,
            artifact,
        })
    }

    /// Persisted record for `index`; `MissingArtifact` if it was never written.
    pub fn read_back(&self, index: usize) -> Result<FixtureRecord> {
        read_json(&self.fixture_path(index))
    }

    pub fn write_manifest(&self, manifest: &FixtureManifest) -> Result<PathBuf> {
        write_manifest(&self.output_dir, manifest)
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use zkid_common::{hash_bytes_hex, FixtureError};

    use super::*;

    #[test]
    fn writes_tab_indented_json_and_reads_it_back() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FixtureWriter::new(dir.path().join("nested"));
        let record = FixtureRecord::new().with_scalar("root", &BigUint::from(7u32));

        let written = writer.write(2, &record).unwrap();
        assert_eq!(written.path, dir.path().join("nested").join("input_2.json"));

        let bytes = std::fs::read(&written.path).unwrap();
        assert_eq!(bytes, b"{\n\t\"root\": \"7\"\n}");
        assert_eq!(written.artifact.blake3, hash_bytes_hex(&bytes));
        assert_eq!(writer.read_back(2).unwrap(), record);
    }

    #[test]
    fn read_back_of_unwritten_index_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FixtureWriter::new(dir.path());
        assert!(matches!(
            writer.read_back(0),
            Err(FixtureError::MissingArtifact { .. })
        ));
    }

    #[test]
    fn unwritable_destination_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let writer = FixtureWriter::new(blocker.join("sub"));
        assert!(matches!(
            writer.write(0, &FixtureRecord::new()),
            Err(FixtureError::Io { .. })
        ));
    }
}
