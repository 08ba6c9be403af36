//! Capability traits at the pipeline's seams.
//!
//! The pipeline never names a concrete model type: the artifact exposes its
//! fitted scaler and classifier through these traits, so the underlying
//! implementation is substitutable without touching pipeline logic.

use crate::error::{Result, ViniferaError};

/// A fitted, dimensionality-preserving feature scaling transform.
pub trait ScalingTransform: Send + Sync {
    /// Number of features the transform was fitted on.
    fn n_features(&self) -> usize;

    /// Applies the fitted transform to one raw feature vector.
    ///
    /// Output length equals input length. Pure function of the input and the
    /// fitted state.
    ///
    /// # Errors
    ///
    /// Returns an error if the input dimensionality does not match the
    /// fitted dimensionality.
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>>;
}

/// A trained multi-class classifier over scaled feature vectors.
pub trait Classifier: Send + Sync {
    /// Number of classes the classifier emits.
    fn n_classes(&self) -> usize;

    /// Probability distribution over classes for one scaled vector.
    ///
    /// Entries are non-negative and sum to 1 within floating-point
    /// tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector is inconsistent with the trained
    /// model (e.g., a split references a feature index past the end).
    fn predict_distribution(&self, features: &[f64]) -> Result<Vec<f64>>;

    /// Predicted class index for one scaled vector.
    ///
    /// Defaults to the argmax of [`predict_distribution`], so the predicted
    /// index always corresponds to the maximum probability entry.
    ///
    /// [`predict_distribution`]: Classifier::predict_distribution
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Classifier::predict_distribution`].
    fn predict(&self, features: &[f64]) -> Result<usize> {
        let distribution = self.predict_distribution(features)?;
        argmax(&distribution)
            .ok_or_else(|| ViniferaError::internal("classifier produced an empty distribution"))
    }
}

/// Index of the maximum entry, ties broken toward the lower index.
#[must_use]
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
