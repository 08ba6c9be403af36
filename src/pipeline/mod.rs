//! End-to-end inference pipeline.
//!
//! One request flows: validate -> vectorize -> scale -> classify ->
//! assemble. The artifact comes from the registry at the start of every
//! call; the first error ends the request, and nothing is retried.
//!
//! # Example
//!
//! ```no_run
//! use vinifera::pipeline::Pipeline;
//! use vinifera::validate::InputMapping;
//! use serde_json::json;
//!
//! let pipeline = Pipeline::new("model/wine_cultivar_model.json");
//!
//! let mut input = InputMapping::new();
//! input.insert("alcohol".to_string(), json!(13.5));
//! // ... remaining features ...
//!
//! match pipeline.predict(&input) {
//!     Ok(result) => println!("{} ({:.1}%)", result.cultivar_name, result.confidence * 100.0),
//!     Err(e) if e.is_client_error() => eprintln!("bad request: {}", e.client_message()),
//!     Err(e) => eprintln!("server error: {e}"),
//! }
//! ```

use crate::artifact::{ModelArtifact, ModelMetadata};
use crate::error::{Result, ViniferaError};
use crate::registry::ModelRegistry;
use crate::validate::{self, InputMapping};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Caller-facing prediction result. Immutable per request.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    /// Predicted class index.
    pub prediction: usize,
    /// Name of the predicted class (`target_names[prediction]`).
    pub cultivar_name: String,
    /// Probability mass assigned to the predicted class, 0.0-1.0.
    pub confidence: f64,
    /// Full probability distribution keyed by class name; sums to 1.0
    /// within floating-point tolerance.
    pub probabilities: BTreeMap<String, f64>,
    /// Echo of the numeric feature values actually fed to the classifier,
    /// keyed by feature name, for caller auditing.
    pub input_features: BTreeMap<String, f64>,
}

/// Read-only model description for discovery and health checks.
#[derive(Debug, Clone, Serialize)]
pub struct ModelDescription {
    /// Canonical feature order; also the required input keys.
    pub feature_names: Vec<String>,
    /// Class names, indexed by classifier output.
    pub target_names: Vec<String>,
    /// Descriptive metadata (algorithm, accuracy figures, provenance).
    pub metadata: ModelMetadata,
}

/// Projects a validated input mapping into the canonical feature order.
///
/// Position i holds the numeric value of `input[feature_names[i]]`,
/// independent of the order keys appear in the mapping. Extra keys are
/// silently dropped.
///
/// # Errors
///
/// Returns an internal error if a required feature is absent or
/// non-coercible; the validator ran first, so either indicates a contract
/// violation between stages.
pub fn build_feature_vector(input: &InputMapping, feature_names: &[String]) -> Result<Vec<f64>> {
    feature_names
        .iter()
        .map(|name| {
            input
                .get(name.as_str())
                .and_then(validate::coerce_numeric)
                .ok_or_else(|| {
                    ViniferaError::internal(format!(
                        "feature {name} passed validation but could not be vectorized"
                    ))
                })
        })
        .collect()
}

/// Combines classifier output with target names into the caller-facing
/// result. Either fully succeeds or fails; no partial results.
///
/// # Errors
///
/// Returns an internal error if the class index or distribution length is
/// inconsistent with `target_names`.
pub fn assemble(
    class_index: usize,
    probabilities: &[f64],
    target_names: &[String],
    input_features: BTreeMap<String, f64>,
) -> Result<PredictionResult> {
    if probabilities.len() != target_names.len() {
        return Err(ViniferaError::internal(format!(
            "classifier produced {} probabilities for {} classes",
            probabilities.len(),
            target_names.len()
        )));
    }
    let cultivar_name = target_names.get(class_index).ok_or_else(|| {
        ViniferaError::internal(format!(
            "predicted class {class_index} is outside {} target names",
            target_names.len()
        ))
    })?;

    Ok(PredictionResult {
        prediction: class_index,
        cultivar_name: cultivar_name.clone(),
        confidence: probabilities[class_index],
        probabilities: target_names
            .iter()
            .cloned()
            .zip(probabilities.iter().copied())
            .collect(),
        input_features,
    })
}

/// The inference pipeline: the crate's one stateful entry point.
///
/// Owns the [`ModelRegistry`] and exposes the two operations the hosting
/// layer calls: [`Pipeline::predict`] and [`Pipeline::describe_model`].
#[derive(Debug)]
pub struct Pipeline {
    registry: ModelRegistry,
}

impl Pipeline {
    /// Creates a pipeline serving the artifact at `path`. The artifact is
    /// loaded lazily on the first operation.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            registry: ModelRegistry::new(path),
        }
    }

    /// Access to the underlying registry (e.g., for eager startup loads).
    #[must_use]
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Runs one synchronous prediction.
    ///
    /// # Errors
    ///
    /// - [`ViniferaError::ArtifactNotFound`] / [`ViniferaError::ArtifactCorrupt`]
    ///   if the artifact cannot be loaded.
    /// - [`ViniferaError::Validation`] for missing or non-numeric features.
    /// - [`ViniferaError::Internal`] for contract violations past
    ///   validation.
    pub fn predict(&self, input: &InputMapping) -> Result<PredictionResult> {
        let artifact = self.registry.artifact()?;
        validate::validate(input, artifact.feature_names())?;

        let vector = build_feature_vector(input, artifact.feature_names())?;
        let scaled = artifact.scaler().transform(&vector)?;
        let probabilities = artifact.classifier().predict_distribution(&scaled)?;
        let class_index = artifact.classifier().predict(&scaled)?;

        let input_features = artifact
            .feature_names()
            .iter()
            .cloned()
            .zip(vector.iter().copied())
            .collect();
        assemble(
            class_index,
            &probabilities,
            artifact.target_names(),
            input_features,
        )
    }

    /// Describes the loaded model without running inference.
    ///
    /// # Errors
    ///
    /// Fails only if the artifact cannot be loaded.
    pub fn describe_model(&self) -> Result<ModelDescription> {
        let artifact = self.registry.artifact()?;
        Ok(describe(&artifact))
    }
}

fn describe(artifact: &ModelArtifact) -> ModelDescription {
    ModelDescription {
        feature_names: artifact.feature_names().to_vec(),
        target_names: artifact.target_names().to_vec(),
        metadata: artifact.metadata().clone(),
    }
}
