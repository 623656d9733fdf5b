//! Splat viewer handles and their construction options.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

/// Viewer construction options.
#[derive(Debug, Clone, PartialEq)]
pub struct SplatViewerConfig {
    pub self_driven_mode: bool,
    pub gpu_accelerated_sort: bool,
    pub shared_memory_for_workers: bool,
    pub antialiased: bool,
    pub spherical_harmonics_degree: u8,
}

impl Default for SplatViewerConfig {
    fn default() -> Self {
        Self {
            self_driven_mode: true,
            gpu_accelerated_sort: true,
            shared_memory_for_workers: false,
            antialiased: false,
            spherical_harmonics_degree: 0,
        }
    }
}

/// Caller-supplied overrides; any present key wins over the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplatViewerOverrides {
    pub self_driven_mode: Option<bool>,
    pub gpu_accelerated_sort: Option<bool>,
    pub shared_memory_for_workers: Option<bool>,
    pub antialiased: Option<bool>,
    pub spherical_harmonics_degree: Option<u8>,
}

impl SplatViewerConfig {
    /// Layer `overrides` on top of these defaults.
    pub fn layered(&self, overrides: &SplatViewerOverrides) -> SplatViewerConfig {
        SplatViewerConfig {
            self_driven_mode: overrides.self_driven_mode.unwrap_or(self.self_driven_mode),
            gpu_accelerated_sort: overrides
                .gpu_accelerated_sort
                .unwrap_or(self.gpu_accelerated_sort),
            shared_memory_for_workers: overrides
                .shared_memory_for_workers
                .unwrap_or(self.shared_memory_for_workers),
            antialiased: overrides.antialiased.unwrap_or(self.antialiased),
            spherical_harmonics_degree: overrides
                .spherical_harmonics_degree
                .unwrap_or(self.spherical_harmonics_degree),
        }
    }
}

/// Raised when a viewer's resources were already released.
#[derive(Debug, Error)]
#[error("splat viewer already released")]
pub struct AlreadyReleased;

#[derive(Debug)]
struct ViewerState {
    parent: Option<String>,
    disposed: bool,
}

/// Composite viewer holding one named splat scene.
///
/// Cloning shares the same underlying viewer state.
#[derive(Debug, Clone)]
pub struct SplatViewer {
    config: SplatViewerConfig,
    scene_name: String,
    scene_url: String,
    state: Arc<Mutex<ViewerState>>,
}

impl SplatViewer {
    pub fn new(
        config: SplatViewerConfig,
        scene_name: impl Into<String>,
        scene_url: impl Into<String>,
    ) -> Self {
        Self {
            config,
            scene_name: scene_name.into(),
            scene_url: scene_url.into(),
            state: Arc::new(Mutex::new(ViewerState {
                parent: None,
                disposed: false,
            })),
        }
    }

    pub fn config(&self) -> &SplatViewerConfig {
        &self.config
    }

    pub fn scene_name(&self) -> &str {
        &self.scene_name
    }

    pub fn scene_url(&self) -> &str {
        &self.scene_url
    }

    /// Attach to a node in the caller's scene graph.
    pub fn attach_to(&self, parent: impl Into<String>) {
        self.state.lock().parent = Some(parent.into());
    }

    pub fn parent(&self) -> Option<String> {
        self.state.lock().parent.clone()
    }

    /// Detach from the current parent, if any.
    pub fn detach(&self) {
        self.state.lock().parent = None;
    }

    /// Release viewer resources. Fails if already released.
    pub fn release(&self) -> Result<(), AlreadyReleased> {
        let mut state = self.state.lock();
        if state.disposed {
            return Err(AlreadyReleased);
        }
        state.disposed = true;
        Ok(())
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_defaults() {
        let defaults = SplatViewerConfig::default();
        let layered = defaults.layered(&SplatViewerOverrides {
            antialiased: Some(true),
            spherical_harmonics_degree: Some(2),
            ..Default::default()
        });
        assert!(layered.antialiased);
        assert_eq!(layered.spherical_harmonics_degree, 2);
        // Untouched keys keep the defaults.
        assert_eq!(layered.self_driven_mode, defaults.self_driven_mode);
        assert_eq!(layered.gpu_accelerated_sort, defaults.gpu_accelerated_sort);
    }

    #[test]
    fn empty_overrides_are_identity() {
        let defaults = SplatViewerConfig::default();
        assert_eq!(defaults.layered(&SplatViewerOverrides::default()), defaults);
    }

    #[test]
    fn release_twice_fails() {
        let viewer = SplatViewer::new(SplatViewerConfig::default(), "main", "s.splat");
        assert!(viewer.release().is_ok());
        assert!(viewer.release().is_err());
        assert!(viewer.is_disposed());
    }

    #[test]
    fn attach_detach_roundtrip() {
        let viewer = SplatViewer::new(SplatViewerConfig::default(), "main", "s.splat");
        assert_eq!(viewer.parent(), None);
        viewer.attach_to("root");
        assert_eq!(viewer.parent().as_deref(), Some("root"));
        viewer.detach();
        assert_eq!(viewer.parent(), None);
    }
}
