//! Vinifera: wine cultivar inference pipeline in pure Rust.
//!
//! Serves single-record, synchronous cultivar predictions from a
//! pre-trained classifier artifact: lazy one-time artifact loading, input
//! validation, canonical feature-vector assembly, scaling, classification,
//! and structured result assembly with confidence reporting.
//!
//! The hosting HTTP layer is an external collaborator: it decodes wire
//! payloads into an input mapping, calls [`pipeline::Pipeline::predict`] or
//! [`pipeline::Pipeline::describe_model`], and maps
//! [`error::ViniferaError::is_client_error`] to its status classes.
//!
//! # Quick Start
//!
//! ```no_run
//! use vinifera::prelude::*;
//! use serde_json::json;
//!
//! let pipeline = Pipeline::new("model/wine_cultivar_model.json");
//!
//! let mut input = InputMapping::new();
//! input.insert("alcohol".to_string(), json!(13.5));
//! input.insert("malic_acid".to_string(), json!(2.0));
//! // ... remaining features ...
//!
//! let result = pipeline.predict(&input)?;
//! println!("{} (confidence {:.2})", result.cultivar_name, result.confidence);
//! # Ok::<(), ViniferaError>(())
//! ```
//!
//! # Modules
//!
//! - [`artifact`]: serialized model bundle, loading and structural checks
//! - [`registry`]: process-lifetime artifact cache (at-most-one load)
//! - [`validate`]: input validation and numeric coercion
//! - [`pipeline`]: vector assembly, prediction, result assembly
//! - [`preprocessing`]: fitted scaling transform
//! - [`tree`]: inference-only decision trees and random forests
//! - [`traits`]: capability seams for scaler and classifier
//! - [`error`]: error taxonomy

pub mod artifact;
pub mod error;
pub mod pipeline;
pub mod prelude;
pub mod preprocessing;
pub mod registry;
pub mod traits;
pub mod tree;
pub mod validate;

pub use error::{Result, ViniferaError};
pub use pipeline::{Pipeline, PredictionResult};
pub use registry::ModelRegistry;
