//! Input validation against the artifact's required feature list.
//!
//! Missing features are detected exhaustively before any value is coerced,
//! so a request missing several features always reports all of them in one
//! message, in canonical feature order.

use crate::error::{Result, ViniferaError};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Raw per-request input: feature name to caller-supplied scalar.
///
/// Values may be JSON numbers or numeric strings; keys beyond the required
/// feature list are ignored. Key matching is exact and case-sensitive.
pub type InputMapping = HashMap<String, JsonValue>;

/// Coerces a caller-supplied value to f64.
///
/// Accepts JSON numbers and strings that parse as floats (including "inf"
/// and "NaN" spellings, which the validator then rejects as non-finite).
/// Everything else is `None`.
#[must_use]
pub fn coerce_numeric(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Validates an input mapping against the required feature names.
///
/// # Errors
///
/// Returns a [`ViniferaError::Validation`] naming:
/// - every missing feature at once ("Missing required features: a, b"), or
/// - the first feature whose value cannot be coerced to a number, or
/// - the first feature whose coerced value is not finite.
pub fn validate(input: &InputMapping, feature_names: &[String]) -> Result<()> {
    let missing: Vec<&str> = feature_names
        .iter()
        .filter(|name| !input.contains_key(name.as_str()))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(ViniferaError::validation(format!(
            "Missing required features: {}",
            missing.join(", ")
        )));
    }

    for name in feature_names {
        let Some(value) = input.get(name.as_str()) else {
            continue;
        };
        match coerce_numeric(value) {
            None => {
                return Err(ViniferaError::validation(format!(
                    "Invalid value for {name}: must be a number"
                )));
            }
            Some(v) if !v.is_finite() => {
                return Err(ViniferaError::validation(format!(
                    "Invalid value for {name}: must be a finite number"
                )));
            }
            Some(_) => {}
        }
    }

    Ok(())
}
