//! Model artifact: the serialized bundle produced by the offline training
//! job and consumed by the inference pipeline.
//!
//! On disk an artifact is a single JSON document with five structural keys:
//!
//! ```text
//! {
//!   "classifier":    { "kind": "random_forest", ... },
//!   "scaler":        { "mean": [...], "std": [...] },
//!   "feature_names": ["alcohol", ...],
//!   "target_names":  ["cultivar_0", ...],
//!   "metadata":      { "algorithm": "...", "test_accuracy": ... }
//! }
//! ```
//!
//! [`ArtifactBundle`] is the typed wire form; [`ModelArtifact`] is the
//! loaded, immutable in-memory form exposing the scaler and classifier only
//! through their capability traits.

use crate::error::{Result, ViniferaError};
use crate::preprocessing::StandardScaler;
use crate::traits::{Classifier, ScalingTransform};
use crate::tree::RandomForestClassifier;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// Structural keys every artifact document must carry.
pub const REQUIRED_KEYS: [&str; 5] = [
    "classifier",
    "scaler",
    "feature_names",
    "target_names",
    "metadata",
];

/// Descriptive artifact metadata - arbitrary JSON (algorithm name, accuracy
/// figures, training date, provenance). Read-only, informational.
pub type ModelMetadata = BTreeMap<String, JsonValue>;

/// Serialized classifier, tagged by kind so the artifact's model
/// implementation is substitutable without touching pipeline logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    /// Pre-grown random forest (majority voting).
    RandomForest(RandomForestClassifier),
}

impl ClassifierSpec {
    fn check_consistent(&self) -> Result<()> {
        match self {
            ClassifierSpec::RandomForest(forest) => forest.check_consistent(),
        }
    }

    fn max_feature_index(&self) -> Option<usize> {
        match self {
            ClassifierSpec::RandomForest(forest) => forest.max_feature_index(),
        }
    }

    fn into_classifier(self) -> Box<dyn Classifier> {
        match self {
            ClassifierSpec::RandomForest(forest) => Box::new(forest),
        }
    }
}

/// Typed wire form of an artifact.
///
/// The offline training job builds one of these and calls
/// [`ArtifactBundle::save`]; the registry loads it back through
/// [`ModelArtifact::load`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactBundle {
    /// Trained classifier.
    pub classifier: ClassifierSpec,
    /// Fitted feature scaler.
    pub scaler: StandardScaler,
    /// Canonical feature order; also the set of required input keys.
    pub feature_names: Vec<String>,
    /// Class names; index i names the class the classifier labels i.
    pub target_names: Vec<String>,
    /// Descriptive metadata.
    pub metadata: ModelMetadata,
}

impl ArtifactBundle {
    /// Writes the bundle as a JSON artifact file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ViniferaError::internal(format!("failed to serialize artifact: {e}")))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Converts the wire form into the loaded artifact, enforcing the
    /// structural invariants.
    ///
    /// # Errors
    ///
    /// Returns an artifact-corrupt error if any invariant fails.
    pub fn into_artifact(self) -> Result<ModelArtifact> {
        self.scaler.check_consistent()?;
        self.classifier.check_consistent()?;

        if self.feature_names.is_empty() {
            return Err(ViniferaError::corrupt("feature_names is empty"));
        }
        let unique: HashSet<&str> = self.feature_names.iter().map(String::as_str).collect();
        if unique.len() != self.feature_names.len() {
            return Err(ViniferaError::corrupt(
                "feature_names contains duplicate entries",
            ));
        }

        let n_features = self.feature_names.len();
        if self.scaler.n_features() != n_features {
            return Err(ViniferaError::corrupt(format!(
                "scaler was fitted on {} features but artifact names {n_features}",
                self.scaler.n_features()
            )));
        }
        if let Some(max_feature) = self.classifier.max_feature_index() {
            if max_feature >= n_features {
                return Err(ViniferaError::corrupt(format!(
                    "classifier references feature {max_feature} but artifact names {n_features}"
                )));
            }
        }

        let classifier = self.classifier.into_classifier();
        if classifier.n_classes() != self.target_names.len() {
            return Err(ViniferaError::corrupt(format!(
                "classifier emits {} classes but artifact names {}",
                classifier.n_classes(),
                self.target_names.len()
            )));
        }

        Ok(ModelArtifact {
            classifier,
            scaler: Box::new(self.scaler),
            feature_names: self.feature_names,
            target_names: self.target_names,
            metadata: self.metadata,
        })
    }
}

/// The loaded model artifact. Immutable for the process lifetime.
pub struct ModelArtifact {
    classifier: Box<dyn Classifier>,
    scaler: Box<dyn ScalingTransform>,
    feature_names: Vec<String>,
    target_names: Vec<String>,
    metadata: ModelMetadata,
}

impl ModelArtifact {
    /// Loads and validates an artifact file.
    ///
    /// # Errors
    ///
    /// - [`ViniferaError::ArtifactNotFound`] if `path` does not exist.
    /// - [`ViniferaError::ArtifactCorrupt`] if the file is not valid JSON,
    ///   lacks a required structural key, or violates a shape invariant.
    /// - [`ViniferaError::Io`] for any other read failure.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ViniferaError::ArtifactNotFound {
                    path: path.display().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let value: JsonValue = serde_json::from_str(&raw)
            .map_err(|e| ViniferaError::corrupt(format!("not valid JSON: {e}")))?;
        let object = value
            .as_object()
            .ok_or_else(|| ViniferaError::corrupt("top-level value is not an object"))?;

        // Report all absent structural keys at once, mirroring the
        // validator's exhaustive missing-feature reporting.
        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| !object.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(ViniferaError::corrupt(format!(
                "missing required keys: {}",
                missing.join(", ")
            )));
        }

        let bundle: ArtifactBundle = serde_json::from_value(value)
            .map_err(|e| ViniferaError::corrupt(e.to_string()))?;
        bundle.into_artifact()
    }

    /// The trained classifier, behind its capability trait.
    #[must_use]
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// The fitted scaling transform, behind its capability trait.
    #[must_use]
    pub fn scaler(&self) -> &dyn ScalingTransform {
        self.scaler.as_ref()
    }

    /// Canonical feature order; also the required input keys.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Class names, indexed by classifier output.
    #[must_use]
    pub fn target_names(&self) -> &[String] {
        &self.target_names
    }

    /// Descriptive metadata.
    #[must_use]
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

impl std::fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("feature_names", &self.feature_names)
            .field("target_names", &self.target_names)
            .field("n_classes", &self.classifier.n_classes())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DecisionTreeClassifier, TreeNode};
    use serde_json::json;

    fn stump(feature: usize, threshold: f64, low: usize, high: usize) -> DecisionTreeClassifier {
        DecisionTreeClassifier::new(TreeNode::Split {
            feature,
            threshold,
            left: Box::new(TreeNode::Leaf { class: low }),
            right: Box::new(TreeNode::Leaf { class: high }),
        })
    }

    fn sample_bundle() -> ArtifactBundle {
        let forest = RandomForestClassifier::new(
            vec![stump(0, 0.0, 0, 1), stump(1, 0.0, 1, 2)],
            3,
        )
        .expect("valid forest");

        let mut metadata = ModelMetadata::new();
        metadata.insert("algorithm".to_string(), json!("Random Forest"));
        metadata.insert("test_accuracy".to_string(), json!(0.972));
        metadata.insert("trained_on".to_string(), json!("2026-01-21"));

        ArtifactBundle {
            classifier: ClassifierSpec::RandomForest(forest),
            scaler: StandardScaler::from_params(vec![13.0, 2.3], vec![0.8, 1.1])
                .expect("valid params"),
            feature_names: vec!["alcohol".to_string(), "malic_acid".to_string()],
            target_names: vec![
                "cultivar_0".to_string(),
                "cultivar_1".to_string(),
                "cultivar_2".to_string(),
            ],
            metadata,
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("wine_cultivar_model.json");

        sample_bundle().save(&path).expect("save should succeed");
        let artifact = ModelArtifact::load(&path).expect("load should succeed");

        assert_eq!(artifact.feature_names(), ["alcohol", "malic_acid"]);
        assert_eq!(artifact.target_names().len(), 3);
        assert_eq!(artifact.classifier().n_classes(), 3);
        assert_eq!(artifact.scaler().n_features(), 2);
        assert_eq!(
            artifact.metadata().get("algorithm"),
            Some(&json!("Random Forest"))
        );
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.json");
        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(err, ViniferaError::ArtifactNotFound { .. }));
    }

    #[test]
    fn test_load_invalid_json_is_corrupt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("garbage.json");
        fs::write(&path, "not json at all {").expect("write");

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(err, ViniferaError::ArtifactCorrupt { .. }));
    }

    #[test]
    fn test_load_reports_all_missing_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("partial.json");
        fs::write(
            &path,
            serde_json::to_string(&json!({
                "feature_names": ["alcohol"],
                "metadata": {}
            }))
            .expect("serialize"),
        )
        .expect("write");

        let err = ModelArtifact::load(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("classifier"));
        assert!(msg.contains("scaler"));
        assert!(msg.contains("target_names"));
    }

    #[test]
    fn test_load_non_object_is_corrupt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("array.json");
        fs::write(&path, "[1, 2, 3]").expect("write");

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(err.to_string().contains("not an object"));
    }

    #[test]
    fn test_scaler_feature_count_mismatch_is_corrupt() {
        let mut bundle = sample_bundle();
        bundle.feature_names.push("ash".to_string());
        let err = bundle.into_artifact().unwrap_err();
        assert!(err.to_string().contains("fitted on 2 features"));
    }

    #[test]
    fn test_class_count_mismatch_is_corrupt() {
        let mut bundle = sample_bundle();
        bundle.target_names.pop();
        let err = bundle.into_artifact().unwrap_err();
        assert!(err.to_string().contains("emits 3 classes"));
    }

    #[test]
    fn test_classifier_feature_out_of_range_is_corrupt() {
        let mut bundle = sample_bundle();
        bundle.classifier = ClassifierSpec::RandomForest(
            RandomForestClassifier::new(vec![stump(7, 0.0, 0, 1)], 3).expect("valid forest"),
        );
        let err = bundle.into_artifact().unwrap_err();
        assert!(err.to_string().contains("feature 7"));
    }

    #[test]
    fn test_duplicate_feature_names_is_corrupt() {
        let mut bundle = sample_bundle();
        bundle.feature_names = vec!["alcohol".to_string(), "alcohol".to_string()];
        let err = bundle.into_artifact().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_classifier_spec_is_tagged_by_kind() {
        let bundle = sample_bundle();
        let json = serde_json::to_value(&bundle).expect("serialize");
        assert_eq!(json["classifier"]["kind"], json!("random_forest"));
    }
}
