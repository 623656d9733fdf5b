//! The externally visible container handle and its contents.

use std::sync::Arc;

use glam::Vec3;
use parking_lot::{Mutex, MutexGuard};

use crate::config::PlaceholderSpec;

/// Provisional box mesh standing in for a model that is still generating.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderMesh {
    pub size: Vec3,
    pub color: Vec3,
    disposed: bool,
}

impl PlaceholderMesh {
    pub(crate) fn new(spec: PlaceholderSpec) -> Self {
        Self {
            size: spec.size,
            color: spec.color,
            disposed: false,
        }
    }

    /// Release the placeholder's resources. Idempotent.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Final artifact produced by a model loader.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub url: String,
    pub mesh_count: usize,
}

/// What a container currently holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelContent {
    Placeholder(PlaceholderMesh),
    Model(LoadedModel),
    Empty,
}

impl ModelContent {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ModelContent::Placeholder(_))
    }

    pub fn is_model(&self) -> bool {
        matches!(self, ModelContent::Model(_))
    }
}

/// Owned handle returned to the caller for one model key.
///
/// The caller inserts it into its own scene graph; the engine owns write
/// access to the contents until the cache entry is marked ready, after which
/// no further automatic mutation occurs.
#[derive(Debug, Clone)]
pub struct ModelContainer {
    inner: Arc<Mutex<ModelContent>>,
}

impl ModelContainer {
    pub(crate) fn with_placeholder(spec: PlaceholderSpec) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ModelContent::Placeholder(PlaceholderMesh::new(
                spec,
            )))),
        }
    }

    /// Snapshot of the current content.
    pub fn content(&self) -> ModelContent {
        self.inner.lock().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.lock().is_model()
    }

    /// Remove the current content, e.g. when the caller pulls the placeholder
    /// out of its scene graph. The engine treats an emptied container as
    /// "placeholder already detached" and skips disposal during the swap.
    pub fn detach(&self) -> ModelContent {
        std::mem::replace(&mut *self.inner.lock(), ModelContent::Empty)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ModelContent> {
        self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_placeholder() {
        let container = ModelContainer::with_placeholder(PlaceholderSpec::default());
        assert!(container.content().is_placeholder());
        assert!(!container.is_loaded());
    }

    #[test]
    fn detach_leaves_empty() {
        let container = ModelContainer::with_placeholder(PlaceholderSpec::default());
        let detached = container.detach();
        assert!(detached.is_placeholder());
        assert_eq!(container.content(), ModelContent::Empty);
    }

    #[test]
    fn placeholder_dispose_is_idempotent() {
        let mut placeholder = PlaceholderMesh::new(PlaceholderSpec::default());
        assert!(!placeholder.is_disposed());
        placeholder.dispose();
        placeholder.dispose();
        assert!(placeholder.is_disposed());
    }
}
