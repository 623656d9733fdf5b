//! Placeholder to final-artifact transition, and viewer disposal.

use tracing::{debug, warn};

use crate::container::{LoadedModel, ModelContainer, ModelContent};
use crate::splat::SplatViewer;

/// Swap the final artifact into `container`, exactly once.
///
/// The placeholder is detached and disposed if it is still attached; an
/// externally emptied container skips that step. Returns false when a final
/// artifact is already present, leaving the container untouched.
pub(crate) fn swap_in(container: &ModelContainer, model: LoadedModel) -> bool {
    let mut content = container.lock();
    match &mut *content {
        ModelContent::Model(_) => false,
        ModelContent::Placeholder(placeholder) => {
            placeholder.dispose();
            debug!("swapped placeholder for '{}'", model.url);
            *content = ModelContent::Model(model);
            true
        }
        ModelContent::Empty => {
            debug!("attached '{}' to emptied container", model.url);
            *content = ModelContent::Model(model);
            true
        }
    }
}

/// Best-effort disposal of an externally held splat viewer: detach it from
/// its parent, then release its resources. A release failure is logged and
/// swallowed; disposal never throws back to the caller.
pub fn dispose_viewer(viewer: &SplatViewer) {
    viewer.detach();
    if let Err(e) = viewer.release() {
        warn!("splat viewer release failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaceholderSpec;
    use crate::splat::SplatViewerConfig;

    fn model(url: &str) -> LoadedModel {
        LoadedModel {
            url: url.to_string(),
            mesh_count: 1,
        }
    }

    #[test]
    fn swap_happens_exactly_once() {
        let container = ModelContainer::with_placeholder(PlaceholderSpec::default());
        assert!(swap_in(&container, model("a.glb")));
        assert!(container.is_loaded());

        // A second swap is a no-op and keeps the first artifact.
        assert!(!swap_in(&container, model("b.glb")));
        match container.content() {
            ModelContent::Model(loaded) => assert_eq!(loaded.url, "a.glb"),
            other => panic!("expected model, got {:?}", other),
        }
    }

    #[test]
    fn swap_into_externally_detached_container() {
        let container = ModelContainer::with_placeholder(PlaceholderSpec::default());
        container.detach();
        assert!(swap_in(&container, model("a.glb")));
        assert!(container.is_loaded());
    }

    #[test]
    fn dispose_viewer_is_best_effort() {
        let viewer = SplatViewer::new(SplatViewerConfig::default(), "main", "s.splat");
        viewer.attach_to("root");

        dispose_viewer(&viewer);
        assert_eq!(viewer.parent(), None);
        assert!(viewer.is_disposed());

        // Disposing again hits the release error path without panicking.
        dispose_viewer(&viewer);
    }
}
