//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use vinifera::prelude::*;
//! ```

pub use crate::artifact::{ArtifactBundle, ClassifierSpec, ModelArtifact, ModelMetadata};
pub use crate::error::{Result, ViniferaError};
pub use crate::pipeline::{ModelDescription, Pipeline, PredictionResult};
pub use crate::preprocessing::StandardScaler;
pub use crate::registry::ModelRegistry;
pub use crate::traits::{Classifier, ScalingTransform};
pub use crate::tree::{DecisionTreeClassifier, RandomForestClassifier, TreeNode};
pub use crate::validate::InputMapping;
