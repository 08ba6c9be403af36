//! Fitted preprocessing transforms applied before classification.
//!
//! Training happens offline; this module only replays fitted parameters at
//! inference time.
//!
//! # Example
//!
//! ```
//! use vinifera::preprocessing::StandardScaler;
//! use vinifera::traits::ScalingTransform;
//!
//! let scaler = StandardScaler::from_params(vec![10.0, 100.0], vec![2.0, 50.0])
//!     .expect("params should be consistent");
//!
//! let scaled = scaler.transform(&[12.0, 50.0]).expect("transform should succeed");
//! assert_eq!(scaled, vec![1.0, -1.0]);
//! ```

use crate::error::{Result, ViniferaError};
use crate::traits::ScalingTransform;
use serde::{Deserialize, Serialize};

/// Threshold below which a feature's standard deviation is treated as zero
/// and division is skipped.
const STD_EPSILON: f64 = 1e-10;

fn default_true() -> bool {
    true
}

/// Standardizes features using a fitted mean and standard deviation.
///
/// The standard score of a sample x is: z = (x - mean) / std
///
/// Parameters come from the offline training job via the model artifact;
/// constant features (std below `1e-10`) are centered but not divided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature (computed during offline fit).
    mean: Vec<f64>,
    /// Standard deviation of each feature (computed during offline fit).
    std: Vec<f64>,
    /// Whether to center the data (subtract mean).
    #[serde(default = "default_true")]
    with_mean: bool,
    /// Whether to scale the data (divide by std).
    #[serde(default = "default_true")]
    with_std: bool,
}

impl StandardScaler {
    /// Creates a scaler from fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `mean` and `std` differ in length or are empty.
    pub fn from_params(mean: Vec<f64>, std: Vec<f64>) -> Result<Self> {
        let scaler = Self {
            mean,
            std,
            with_mean: true,
            with_std: true,
        };
        scaler.check_consistent()?;
        Ok(scaler)
    }

    /// Sets whether to center the data by subtracting the mean.
    #[must_use]
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.with_mean = with_mean;
        self
    }

    /// Sets whether to scale the data by dividing by standard deviation.
    #[must_use]
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.with_std = with_std;
        self
    }

    /// Returns the fitted mean of each feature.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Returns the fitted standard deviation of each feature.
    #[must_use]
    pub fn std(&self) -> &[f64] {
        &self.std
    }

    /// Verifies the fitted parameters describe a usable transform.
    ///
    /// Deserialization bypasses [`StandardScaler::from_params`], so artifact
    /// loading re-runs this check.
    ///
    /// # Errors
    ///
    /// Returns an artifact-corrupt error on empty or mismatched parameters,
    /// or on non-finite fitted values.
    pub fn check_consistent(&self) -> Result<()> {
        if self.mean.is_empty() {
            return Err(ViniferaError::corrupt("scaler has no fitted parameters"));
        }
        if self.mean.len() != self.std.len() {
            return Err(ViniferaError::corrupt(format!(
                "scaler mean has {} entries but std has {}",
                self.mean.len(),
                self.std.len()
            )));
        }
        if self
            .mean
            .iter()
            .chain(self.std.iter())
            .any(|v| !v.is_finite())
        {
            return Err(ViniferaError::corrupt(
                "scaler parameters contain non-finite values",
            ));
        }
        Ok(())
    }
}

impl ScalingTransform for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardizes one raw feature vector using the fitted mean and std.
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.mean.len() {
            return Err(ViniferaError::internal(format!(
                "scaler expects {} features, got {}",
                self.mean.len(),
                features.len()
            )));
        }

        let mut scaled = Vec::with_capacity(features.len());
        for (j, &value) in features.iter().enumerate() {
            let mut v = value;
            if self.with_mean {
                v -= self.mean[j];
            }
            if self.with_std && self.std[j] > STD_EPSILON {
                v /= self.std[j];
            }
            scaled.push(v);
        }
        Ok(scaled)
    }
}
