//! Process-lifetime model registry.
//!
//! The registry is the single point where the artifact is read from
//! storage. The first successful call loads and caches it; every later call
//! returns the cached handle without touching disk. The load runs under one
//! mutex, so concurrent first calls perform at most one storage read.
//!
//! There is no reload operation; a new artifact requires a process restart.

use crate::artifact::ModelArtifact;
use crate::error::{Result, ViniferaError};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Owns the configured artifact path and the cached artifact.
///
/// # Example
///
/// ```no_run
/// use vinifera::registry::ModelRegistry;
///
/// let registry = ModelRegistry::new("model/wine_cultivar_model.json");
/// let artifact = registry.artifact()?;
/// println!("features: {:?}", artifact.feature_names());
/// # Ok::<(), vinifera::error::ViniferaError>(())
/// ```
#[derive(Debug)]
pub struct ModelRegistry {
    path: PathBuf,
    cached: Mutex<Option<Arc<ModelArtifact>>>,
}

impl ModelRegistry {
    /// Creates a registry for the given artifact path. Nothing is read
    /// until the first [`ModelRegistry::artifact`] call.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            cached: Mutex::new(None),
        }
    }

    /// Configured artifact path.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// True once an artifact has been loaded and cached.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cached.lock().map(|c| c.is_some()).unwrap_or(false)
    }

    /// Returns the cached artifact, loading it from storage on first call.
    ///
    /// Idempotent and side-effect-free after the first success: all later
    /// calls return a clone of the same `Arc`. A failed load is not cached,
    /// so calls keep failing identically while the file stays absent or
    /// corrupt.
    ///
    /// # Errors
    ///
    /// Propagates [`ModelArtifact::load`] failures; returns an internal
    /// error if the cache mutex was poisoned by a panicking thread.
    pub fn artifact(&self) -> Result<Arc<ModelArtifact>> {
        let mut slot = self
            .cached
            .lock()
            .map_err(|_| ViniferaError::internal("model cache mutex poisoned"))?;

        if let Some(artifact) = slot.as_ref() {
            return Ok(Arc::clone(artifact));
        }

        let artifact = Arc::new(ModelArtifact::load(&self.path)?);
        *slot = Some(Arc::clone(&artifact));
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactBundle, ClassifierSpec, ModelMetadata};
    use crate::preprocessing::StandardScaler;
    use crate::tree::{DecisionTreeClassifier, RandomForestClassifier, TreeNode};
    use std::fs;

    fn write_artifact(path: &std::path::Path) {
        let forest = RandomForestClassifier::new(
            vec![DecisionTreeClassifier::new(TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: Box::new(TreeNode::Leaf { class: 0 }),
                right: Box::new(TreeNode::Leaf { class: 1 }),
            })],
            2,
        )
        .expect("valid forest");

        ArtifactBundle {
            classifier: ClassifierSpec::RandomForest(forest),
            scaler: StandardScaler::from_params(vec![0.0], vec![1.0]).expect("valid params"),
            feature_names: vec!["alcohol".to_string()],
            target_names: vec!["cultivar_0".to_string(), "cultivar_1".to_string()],
            metadata: ModelMetadata::new(),
        }
        .save(path)
        .expect("save should succeed");
    }

    #[test]
    fn test_first_call_loads_and_caches() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("model.json");
        write_artifact(&path);

        let registry = ModelRegistry::new(&path);
        assert!(!registry.is_loaded());

        let first = registry.artifact().expect("load should succeed");
        assert!(registry.is_loaded());

        let second = registry.artifact().expect("cached fetch should succeed");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_no_storage_read_after_first_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("model.json");
        write_artifact(&path);

        let registry = ModelRegistry::new(&path);
        let first = registry.artifact().expect("load should succeed");

        // Deleting the file proves later calls never touch storage.
        fs::remove_file(&path).expect("remove");
        let second = registry.artifact().expect("cached fetch should succeed");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_artifact_fails_every_call() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = ModelRegistry::new(dir.path().join("absent.json"));

        for _ in 0..3 {
            let err = registry.artifact().unwrap_err();
            assert!(matches!(err, ViniferaError::ArtifactNotFound { .. }));
        }
        assert!(!registry.is_loaded());
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("model.json");

        let registry = ModelRegistry::new(&path);
        assert!(registry.artifact().is_err());

        // Next call re-attempts the load from storage.
        write_artifact(&path);
        assert!(registry.artifact().is_ok());
    }

    #[test]
    fn test_concurrent_first_calls_share_one_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("model.json");
        write_artifact(&path);

        let registry = Arc::new(ModelRegistry::new(&path));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.artifact().expect("load should succeed"))
            })
            .collect();

        let artifacts: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();
        for artifact in &artifacts[1..] {
            assert!(Arc::ptr_eq(&artifacts[0], artifact));
        }
    }
}
