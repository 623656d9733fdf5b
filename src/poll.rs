//! Registry of in-flight polling tasks, enabling external cancellation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

use crate::key::AssetKey;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Cancellation handle for one key's scheduled polling.
///
/// At most one live handle exists per key. The generation number lets a
/// task whose attempt was already in flight when it got cancelled or
/// replaced detect that its result is stale before mutating shared state.
#[derive(Debug, Clone)]
pub struct PollHandle {
    token: CancellationToken,
    generation: u64,
}

impl PollHandle {
    fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Mapping from typed key to its live polling handle.
#[derive(Debug, Default)]
pub struct PollRegistry {
    handles: HashMap<AssetKey, PollHandle>,
}

impl PollRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh handle for `key`, invalidating any still-pending one.
    pub fn register(&mut self, key: AssetKey) -> PollHandle {
        let handle = PollHandle::new();
        if let Some(old) = self.handles.insert(key, handle.clone()) {
            old.token.cancel();
        }
        handle
    }

    pub fn contains(&self, key: &AssetKey) -> bool {
        self.handles.contains_key(key)
    }

    /// True while `handle` is still the registered handle for `key`.
    pub fn is_live(&self, key: &AssetKey, handle: &PollHandle) -> bool {
        !handle.is_cancelled()
            && self.handles.get(key).map(|h| h.generation) == Some(handle.generation)
    }

    /// Remove and cancel the handle for `key`. Returns whether one existed.
    pub fn cancel(&mut self, key: &AssetKey) -> bool {
        match self.handles.remove(key) {
            Some(handle) => {
                handle.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Remove `handle`'s entry after its task finished, without cancelling.
    /// A newer handle registered for the same key is left alone.
    pub fn clear(&mut self, key: &AssetKey, handle: &PollHandle) {
        if self.handles.get(key).map(|h| h.generation) == Some(handle.generation) {
            self.handles.remove(key);
        }
    }

    /// Cancel every registered key, leaving the registry empty.
    pub fn cancel_all(&mut self) {
        for handle in self.handles.values() {
            handle.token.cancel();
        }
        self.handles.clear();
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_replaces_and_cancels_old_handle() {
        let mut registry = PollRegistry::new();
        let key = AssetKey::model("m1");
        let first = registry.register(key.clone());
        let second = registry.register(key.clone());

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!registry.is_live(&key, &first));
        assert!(registry.is_live(&key, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn cancel_removes_entry() {
        let mut registry = PollRegistry::new();
        let key = AssetKey::model("m1");
        let handle = registry.register(key.clone());

        assert!(registry.cancel(&key));
        assert!(handle.is_cancelled());
        assert!(!registry.contains(&key));
        assert!(!registry.cancel(&key));
    }

    #[test]
    fn clear_only_removes_own_generation() {
        let mut registry = PollRegistry::new();
        let key = AssetKey::world("w1");
        let old = registry.register(key.clone());
        let new = registry.register(key.clone());

        registry.clear(&key, &old);
        assert!(registry.contains(&key));

        registry.clear(&key, &new);
        assert!(!registry.contains(&key));
    }

    #[test]
    fn cancel_all_empties_registry() {
        let mut registry = PollRegistry::new();
        let a = registry.register(AssetKey::model("a"));
        let b = registry.register(AssetKey::world("b"));

        registry.cancel_all();
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
        assert!(registry.is_empty());
    }
}
