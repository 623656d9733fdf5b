use std::time::Duration;

use glam::Vec3;

use crate::splat::SplatViewerConfig;

/// Retry policy for background resolution tasks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollConfig {
    /// When false, every task makes a single attempt and never reschedules.
    pub enabled: bool,
    /// Fixed delay between attempts.
    pub interval: Duration,
    /// Maximum elapsed time, measured from task start, within which the next
    /// attempt must still fit.
    pub ceiling: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(5),
            ceiling: Duration::from_secs(120),
        }
    }
}

/// Geometry and color for the provisional box shown while a model generates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderSpec {
    pub size: Vec3,
    pub color: Vec3,
}

impl Default for PlaceholderSpec {
    fn default() -> Self {
        Self {
            size: Vec3::ONE,
            color: Vec3::splat(0.6),
        }
    }
}

/// Engine-wide configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub poll: PollConfig,
    pub placeholder: PlaceholderSpec,
    /// Viewer defaults layered under per-call overrides.
    pub viewer: SplatViewerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_defaults() {
        let poll = PollConfig::default();
        assert!(poll.enabled);
        assert!(poll.interval < poll.ceiling);
    }

    #[test]
    fn placeholder_defaults_to_unit_box() {
        let spec = PlaceholderSpec::default();
        assert_eq!(spec.size, Vec3::ONE);
    }
}
