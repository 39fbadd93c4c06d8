//! Externally supplied proof / verifying-key artifacts.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use zkid_common::{read_json, FixtureError, Result, VkElement};

use crate::record::remove_fields;

/// Verifying-key fields folded into the friend-chain commitment, in order.
pub const DEFAULT_VK_FIELDS: [&str; 4] = ["negalfa1xbeta2", "gamma2", "delta2", "IC"];

/// Field the chained circuit must not receive as a private input.
pub const PUB_INPUT_FIELD: &str = "pubInput";

#[derive(Clone, Debug, PartialEq)]
pub struct ProofArtifact {
    source: PathBuf,
    fields: Map<String, Value>,
}

impl ProofArtifact {
    /// Read a JSON object from `path`. Absence or malformed JSON is `MissingArtifact`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match read_json::<Value>(path)? {
            Value::Object(fields) => Ok(Self {
                source: path.to_path_buf(),
                fields,
            }),
            _ => Err(FixtureError::missing_artifact(
                path,
                "proof artifact is not a JSON object",
            )),
        }
    }

    pub fn from_fields(source: impl Into<PathBuf>, fields: Map<String, Value>) -> Self {
        Self {
            source: source.into(),
            fields,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Named group elements, in the order given by `names`.
    pub fn vk_elements<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<VkElement>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let value = self.fields.get(name).ok_or_else(|| {
                    FixtureError::missing_artifact(
                        &self.source,
                        format!("verifying-key field {name} is absent"),
                    )
                })?;
                VkElement::from_json(value).map_err(|err| {
                    FixtureError::missing_artifact(&self.source, format!("field {name}: {err}"))
                })
            })
            .collect()
    }

    /// Every field except `excluded`, in source order.
    pub fn passthrough<S: AsRef<str>>(&self, excluded: &[S]) -> Map<String, Value> {
        remove_fields(&self.fields, excluded)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use num_bigint::BigUint;
    use serde_json::json;

    use super::*;

    #[test]
    fn loads_vk_elements_in_requested_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proof.json");
        fs::write(
            &path,
            r#"{"gamma2": [["3", "4"]], "negalfa1xbeta2": [["1"], ["2"]], "pubInput": ["9"]}"#,
        )
        .unwrap();

        let proof = ProofArtifact::load(&path).unwrap();
        let elements = proof.vk_elements(&["negalfa1xbeta2", "gamma2"]).unwrap();
        assert_eq!(elements[0].coordinates(), &[BigUint::from(1u32), BigUint::from(2u32)]);
        assert_eq!(elements[1].coordinates(), &[BigUint::from(3u32), BigUint::from(4u32)]);

        let passthrough = proof.passthrough(&[PUB_INPUT_FIELD]);
        assert_eq!(
            Value::Object(passthrough),
            json!({"gamma2": [["3", "4"]], "negalfa1xbeta2": [["1"], ["2"]]})
        );
    }

    #[test]
    fn absent_file_and_field_are_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ProofArtifact::load(dir.path().join("absent.json")),
            Err(FixtureError::MissingArtifact { .. })
        ));

        let proof = ProofArtifact::from_fields("inline", Map::new());
        assert!(matches!(
            proof.vk_elements(&DEFAULT_VK_FIELDS),
            Err(FixtureError::MissingArtifact { .. })
        ));
    }

    #[test]
    fn non_object_json_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proof.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(ProofArtifact::load(&path).is_err());
    }
}
