//! Process-wide resolution cache, single source of truth for "has this ID
//! already resolved, and to what".

use std::collections::HashMap;

use crate::container::ModelContainer;
use crate::descriptor::ModelDescriptor;
use crate::key::AssetKey;
use crate::resolve::ResolvedWorld;
use crate::splat::SplatViewer;

/// Per-key resolution state.
///
/// `ready` flips false to true at most once and never reverts. Entries are
/// created on first request and removed only by an explicit cache clear.
#[derive(Debug, Clone)]
pub enum CacheEntry {
    Model {
        container: ModelContainer,
        ready: bool,
        /// Latest raw descriptor seen for this key, updated on every attempt.
        descriptor: Option<ModelDescriptor>,
    },
    World {
        /// Best-so-far snapshot; upgraded in place while polling continues.
        resolved: ResolvedWorld,
        ready: bool,
    },
    Splat {
        viewer: SplatViewer,
    },
}

impl CacheEntry {
    pub fn is_ready(&self) -> bool {
        match self {
            CacheEntry::Model { ready, .. } | CacheEntry::World { ready, .. } => *ready,
            CacheEntry::Splat { .. } => true,
        }
    }
}

/// Mapping from typed key to resolution state.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: HashMap<AssetKey, CacheEntry>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &AssetKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &AssetKey) -> Option<&mut CacheEntry> {
        self.entries.get_mut(key)
    }

    pub fn insert(&mut self, key: AssetKey, entry: CacheEntry) {
        self.entries.insert(key, entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaceholderSpec;

    #[test]
    fn insert_get_clear() {
        let mut cache = CacheStore::new();
        let key = AssetKey::model("m1");
        assert!(cache.get(&key).is_none());

        cache.insert(
            key.clone(),
            CacheEntry::Model {
                container: ModelContainer::with_placeholder(PlaceholderSpec::default()),
                ready: false,
                descriptor: None,
            },
        );
        assert!(!cache.get(&key).unwrap().is_ready());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn splat_entries_are_always_ready() {
        let entry = CacheEntry::Splat {
            viewer: SplatViewer::new(Default::default(), "main", "s.splat"),
        };
        assert!(entry.is_ready());
    }

    #[test]
    fn world_entry_readiness_tracks_flag() {
        let entry = CacheEntry::World {
            resolved: ResolvedWorld::default(),
            ready: true,
        };
        assert!(entry.is_ready());
    }
}
