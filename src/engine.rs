//! The asset resolution and polling engine.
//!
//! One engine instance owns the cache store and poll registry. Callers get
//! an immediately usable handle (or best-effort partial result) from every
//! entry point; network and load latency is absorbed by background tasks
//! spawned onto the runtime the engine was created in.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStore};
use crate::config::{EngineConfig, PlaceholderSpec, PollConfig};
use crate::container::{LoadedModel, ModelContainer};
use crate::descriptor::ModelDescriptor;
use crate::error::ResolveError;
use crate::fetch::DescriptorFetcher;
use crate::key::AssetKey;
use crate::loader::{ModelLoader, SplatViewerFactory};
use crate::poll::{PollHandle, PollRegistry};
use crate::resolve::{self, ResolvedWorld};
use crate::splat::{SplatViewer, SplatViewerOverrides};
use crate::swap;
use crate::task::{decide_next, AttemptOutcome, Decision};

/// Observer invoked with the raw descriptor on every fetch attempt,
/// successful or not yet ready.
pub type DescriptorCallback = Box<dyn Fn(&ModelDescriptor) + Send + Sync>;
/// Invoked exactly once when the final artifact replaces the placeholder.
pub type ModelReadyCallback = Box<dyn Fn(&LoadedModel, &ModelDescriptor) + Send + Sync>;
/// Invoked once, when a world first has sufficient data to present.
pub type WorldReadyCallback = Box<dyn Fn(&ResolvedWorld) + Send + Sync>;
/// Invoked for every recoverable or terminal failure.
pub type ErrorCallback = Box<dyn Fn(&ResolveError) + Send + Sync>;

/// Per-request options for [`ResolverEngine::resolve_model`].
#[derive(Default)]
pub struct ModelResolveOptions {
    /// Placeholder geometry/color; the engine default when `None`.
    pub placeholder: Option<PlaceholderSpec>,
    pub on_descriptor: Option<DescriptorCallback>,
    pub on_loaded: Option<ModelReadyCallback>,
    pub on_error: Option<ErrorCallback>,
}

/// Per-request options for [`ResolverEngine::resolve_world`].
#[derive(Default)]
pub struct WorldResolveOptions {
    pub on_ready: Option<WorldReadyCallback>,
    pub on_error: Option<ErrorCallback>,
}

/// Options for one-shot splat loads.
#[derive(Default)]
pub struct SplatLoadOptions {
    pub overrides: SplatViewerOverrides,
    /// Name of the single scene attached to the viewer; "main" when `None`.
    pub scene_name: Option<String>,
    pub on_error: Option<ErrorCallback>,
}

#[derive(Default)]
struct EngineState {
    cache: CacheStore,
    polls: PollRegistry,
}

/// Asset resolution engine. Construction is init; [`ResolverEngine::shutdown`]
/// cancels all in-flight work.
pub struct ResolverEngine {
    fetcher: Arc<dyn DescriptorFetcher>,
    loader: Arc<dyn ModelLoader>,
    viewers: Arc<dyn SplatViewerFactory>,
    config: EngineConfig,
    runtime: Handle,
    state: Arc<Mutex<EngineState>>,
}

impl ResolverEngine {
    /// Create an engine bound to the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime context.
    pub fn new(
        fetcher: Arc<dyn DescriptorFetcher>,
        loader: Arc<dyn ModelLoader>,
        viewers: Arc<dyn SplatViewerFactory>,
        config: EngineConfig,
    ) -> Self {
        info!(
            "resolver engine created (polling {})",
            if config.poll.enabled { "enabled" } else { "disabled" }
        );
        Self {
            fetcher,
            loader,
            viewers,
            config,
            runtime: Handle::current(),
            state: Arc::new(Mutex::new(EngineState::default())),
        }
    }

    /// Resolve a model by ID.
    ///
    /// Returns an immediately usable container holding a placeholder; a
    /// background task polls the backend and swaps the final artifact in.
    /// Requesting a key that is ready, or that already has a live task,
    /// returns the cached container with no new fetch. A key whose previous
    /// task gave up is driven again with a fresh task on the same container.
    pub fn resolve_model(&self, id: &str, opts: ModelResolveOptions) -> ModelContainer {
        let key = AssetKey::model(id);
        let (container, handle) = {
            let mut state = self.state.lock();
            let existing = match state.cache.get(&key) {
                Some(CacheEntry::Model {
                    container, ready, ..
                }) => Some((container.clone(), *ready)),
                _ => None,
            };
            match existing {
                Some((container, ready)) => {
                    if ready || state.polls.contains(&key) {
                        debug!("cache hit for {}", key);
                        return container;
                    }
                    let handle = state.polls.register(key.clone());
                    (container, handle)
                }
                None => {
                    let spec = opts.placeholder.unwrap_or(self.config.placeholder);
                    let container = ModelContainer::with_placeholder(spec);
                    state.cache.insert(
                        key.clone(),
                        CacheEntry::Model {
                            container: container.clone(),
                            ready: false,
                            descriptor: None,
                        },
                    );
                    let handle = state.polls.register(key.clone());
                    (container, handle)
                }
            }
        };

        debug!("starting model resolution for {}", key);
        self.runtime.spawn(run_model_task(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.loader),
            self.config.poll,
            Arc::clone(&self.state),
            key,
            container.clone(),
            handle,
            opts,
        ));
        container
    }

    /// Resolve a world by ID.
    ///
    /// The first fetch runs inline and the call resolves with the best-effort
    /// partial result immediately; background polling then upgrades the
    /// cached snapshot until a splat or panorama URL appears, at which point
    /// `on_ready` fires once. The returned value can therefore go stale:
    /// re-query [`ResolverEngine::cached_world`] after `on_ready`.
    ///
    /// The only propagated error is a first-fetch failure while polling is
    /// disabled; every other failure is delivered through `on_error`.
    pub async fn resolve_world(
        &self,
        id: &str,
        opts: WorldResolveOptions,
    ) -> Result<ResolvedWorld, ResolveError> {
        let key = AssetKey::world(id);
        let previous = {
            let state = self.state.lock();
            match state.cache.get(&key) {
                Some(CacheEntry::World { resolved, ready }) => {
                    if *ready || state.polls.contains(&key) {
                        debug!("cache hit for {}", key);
                        return Ok(resolved.clone());
                    }
                    // A gave-up key is driven again; keep its best-so-far
                    // snapshot in case the fresh first fetch fails too.
                    Some(resolved.clone())
                }
                _ => None,
            }
        };

        let started = Instant::now();
        let (partial, ready) = match self.fetcher.fetch_world(id).await {
            Ok(descriptor) => {
                let resolved = ResolvedWorld::from_descriptor(descriptor);
                let ready = resolved.is_ready();
                (resolved, ready)
            }
            Err(e) => {
                if !self.config.poll.enabled {
                    return Err(ResolveError::FetchFailed(e));
                }
                report(&opts.on_error, &ResolveError::FetchFailed(e));
                (previous.unwrap_or_default(), false)
            }
        };

        let mut state = self.state.lock();
        state.cache.insert(
            key.clone(),
            CacheEntry::World {
                resolved: partial.clone(),
                ready,
            },
        );
        if ready {
            drop(state);
            debug!("{} ready on first attempt", key);
            if let Some(cb) = &opts.on_ready {
                cb(&partial);
            }
            return Ok(partial);
        }
        if !self.config.poll.enabled {
            drop(state);
            debug!("{} not ready and polling disabled", key);
            return Ok(partial);
        }

        let handle = state.polls.register(key.clone());
        drop(state);
        debug!("continuing world resolution for {} in background", key);
        self.runtime.spawn(run_world_task(
            Arc::clone(&self.fetcher),
            self.config.poll,
            Arc::clone(&self.state),
            key,
            handle,
            opts,
            started,
        ));
        Ok(partial)
    }

    /// One-shot splat load from an already resolved URL. No retry: failure
    /// is reported through `on_error` and yields `None`.
    pub async fn load_splat(&self, url: &str, opts: SplatLoadOptions) -> Option<SplatViewer> {
        if !self.viewers.available() {
            report(
                &opts.on_error,
                &ResolveError::DependencyUnavailable("splat viewer"),
            );
            return None;
        }
        let config = self.config.viewer.layered(&opts.overrides);
        let scene_name = opts.scene_name.as_deref().unwrap_or("main");
        match self.viewers.create(config, scene_name, url).await {
            Ok(viewer) => {
                debug!("splat viewer created for '{}'", url);
                Some(viewer)
            }
            Err(e) => {
                report(&opts.on_error, &e);
                None
            }
        }
    }

    /// Resolve a world's best splat into a viewer, cached under the splat
    /// key. Returns `None` while the world has no splat URL yet.
    pub async fn resolve_world_splat(
        &self,
        id: &str,
        opts: SplatLoadOptions,
    ) -> Option<SplatViewer> {
        let key = AssetKey::splat(id);
        {
            let state = self.state.lock();
            if let Some(CacheEntry::Splat { viewer }) = state.cache.get(&key) {
                debug!("cache hit for {}", key);
                return Some(viewer.clone());
            }
        }

        let world = match self.cached_world(id) {
            Some(world) => world,
            None => match self.resolve_world(id, WorldResolveOptions::default()).await {
                Ok(world) => world,
                Err(e) => {
                    report(&opts.on_error, &e);
                    return None;
                }
            },
        };
        let url = world.splat_url?;

        let viewer = self.load_splat(&url, opts).await?;
        self.state
            .lock()
            .cache
            .insert(key, CacheEntry::Splat {
                viewer: viewer.clone(),
            });
        Some(viewer)
    }

    /// Container for a previously requested model key, ready or not.
    pub fn cached_model(&self, id: &str) -> Option<ModelContainer> {
        match self.state.lock().cache.get(&AssetKey::model(id)) {
            Some(CacheEntry::Model { container, .. }) => Some(container.clone()),
            _ => None,
        }
    }

    /// Latest raw descriptor seen for a model key.
    pub fn cached_model_descriptor(&self, id: &str) -> Option<ModelDescriptor> {
        match self.state.lock().cache.get(&AssetKey::model(id)) {
            Some(CacheEntry::Model { descriptor, .. }) => descriptor.clone(),
            _ => None,
        }
    }

    /// Best-so-far snapshot for a world key.
    pub fn cached_world(&self, id: &str) -> Option<ResolvedWorld> {
        match self.state.lock().cache.get(&AssetKey::world(id)) {
            Some(CacheEntry::World { resolved, .. }) => Some(resolved.clone()),
            _ => None,
        }
    }

    /// Viewer previously built for a world's splat.
    pub fn cached_splat(&self, id: &str) -> Option<SplatViewer> {
        match self.state.lock().cache.get(&AssetKey::splat(id)) {
            Some(CacheEntry::Splat { viewer }) => Some(viewer.clone()),
            _ => None,
        }
    }

    /// Whether `key` has resolved. Once true, never reverts.
    pub fn is_ready(&self, key: &AssetKey) -> bool {
        self.state
            .lock()
            .cache
            .get(key)
            .map(CacheEntry::is_ready)
            .unwrap_or(false)
    }

    /// Cancel the scheduled polling for `key`. Ready state and container
    /// contents are untouched. Returns whether a task was registered.
    pub fn cancel(&self, key: &AssetKey) -> bool {
        self.state.lock().polls.cancel(key)
    }

    /// Cancel every registered key, leaving the poll registry empty.
    pub fn cancel_all(&self) {
        self.state.lock().polls.cancel_all();
    }

    /// Drop every cache entry, cancelling in-flight resolution first.
    pub fn clear_cache(&self) {
        let mut state = self.state.lock();
        state.polls.cancel_all();
        state.cache.clear();
    }

    /// Tear the engine down: cancel all in-flight work.
    pub fn shutdown(&self) {
        self.cancel_all();
        info!("resolver engine shut down");
    }

    /// Number of keys with a live polling task.
    pub fn pending_polls(&self) -> usize {
        self.state.lock().polls.len()
    }

    /// Number of cached keys.
    pub fn cache_len(&self) -> usize {
        self.state.lock().cache.len()
    }
}

fn report(callback: &Option<ErrorCallback>, error: &ResolveError) {
    if let Some(cb) = callback {
        cb(error);
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_model_task(
    fetcher: Arc<dyn DescriptorFetcher>,
    loader: Arc<dyn ModelLoader>,
    config: PollConfig,
    state: Arc<Mutex<EngineState>>,
    key: AssetKey,
    container: ModelContainer,
    handle: PollHandle,
    opts: ModelResolveOptions,
) {
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let outcome = match fetcher.fetch_model(key.id()).await {
            Ok(descriptor) => {
                if let Some(cb) = &opts.on_descriptor {
                    cb(&descriptor);
                }
                {
                    // The fetch may have been in flight when the key was
                    // cancelled or replaced; drop a stale result untouched.
                    let mut state = state.lock();
                    if !state.polls.is_live(&key, &handle) {
                        debug!("{} no longer live, dropping fetch result", key);
                        return;
                    }
                    if let Some(CacheEntry::Model {
                        descriptor: slot, ..
                    }) = state.cache.get_mut(&key)
                    {
                        *slot = Some(descriptor.clone());
                    }
                }

                match resolve::mesh_url(&descriptor.meshes).map(str::to_owned) {
                    None => AttemptOutcome::NotReady,
                    Some(url) => {
                        if !loader.available() {
                            report(
                                &opts.on_error,
                                &ResolveError::DependencyUnavailable("model loader"),
                            );
                            state.lock().polls.clear(&key, &handle);
                            return;
                        }
                        match loader.load(&url).await {
                            Ok(model) => {
                                let swapped = {
                                    let mut state = state.lock();
                                    if !state.polls.is_live(&key, &handle) {
                                        debug!("{} no longer live, dropping artifact", key);
                                        return;
                                    }
                                    let swapped = swap::swap_in(&container, model.clone());
                                    if let Some(CacheEntry::Model { ready, .. }) =
                                        state.cache.get_mut(&key)
                                    {
                                        *ready = true;
                                    }
                                    state.polls.clear(&key, &handle);
                                    swapped
                                };
                                if swapped {
                                    info!("{} resolved after {} attempt(s)", key, attempts);
                                    if let Some(cb) = &opts.on_loaded {
                                        cb(&model, &descriptor);
                                    }
                                }
                                AttemptOutcome::Loaded
                            }
                            Err(e) => {
                                report(&opts.on_error, &e);
                                AttemptOutcome::LoadFailed
                            }
                        }
                    }
                }
            }
            Err(e) => {
                report(&opts.on_error, &ResolveError::FetchFailed(e));
                AttemptOutcome::FetchFailed
            }
        };

        match decide_next(outcome, started.elapsed(), &config) {
            Decision::Done => return,
            Decision::Retry(interval) => {
                let token = handle.token();
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("{} polling cancelled", key);
                        return;
                    }
                    _ = sleep(interval) => {}
                }
                if !state.lock().polls.is_live(&key, &handle) {
                    return;
                }
            }
            Decision::GiveUp { report_exhausted } => {
                warn!("{} gave up after {} attempt(s)", key, attempts);
                state.lock().polls.clear(&key, &handle);
                if report_exhausted {
                    report(&opts.on_error, &ResolveError::PollingExhausted { attempts });
                }
                return;
            }
        }
    }
}

async fn run_world_task(
    fetcher: Arc<dyn DescriptorFetcher>,
    config: PollConfig,
    state: Arc<Mutex<EngineState>>,
    key: AssetKey,
    handle: PollHandle,
    opts: WorldResolveOptions,
    started: Instant,
) {
    // The inline first attempt already ran.
    let mut attempts: u32 = 1;
    let mut outcome = AttemptOutcome::NotReady;

    loop {
        match decide_next(outcome, started.elapsed(), &config) {
            Decision::Done => return,
            Decision::Retry(interval) => {
                let token = handle.token();
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("{} polling cancelled", key);
                        return;
                    }
                    _ = sleep(interval) => {}
                }
                if !state.lock().polls.is_live(&key, &handle) {
                    return;
                }
            }
            Decision::GiveUp { report_exhausted } => {
                warn!("{} gave up after {} attempt(s)", key, attempts);
                state.lock().polls.clear(&key, &handle);
                if report_exhausted {
                    report(&opts.on_error, &ResolveError::PollingExhausted { attempts });
                }
                return;
            }
        }

        attempts += 1;
        outcome = match fetcher.fetch_world(key.id()).await {
            Ok(descriptor) => {
                let resolved = ResolvedWorld::from_descriptor(descriptor);
                let ready = resolved.is_ready();
                let mut st = state.lock();
                if !st.polls.is_live(&key, &handle) {
                    debug!("{} no longer live, dropping fetch result", key);
                    return;
                }
                st.cache.insert(
                    key.clone(),
                    CacheEntry::World {
                        resolved: resolved.clone(),
                        ready,
                    },
                );
                if ready {
                    st.polls.clear(&key, &handle);
                    drop(st);
                    info!("{} ready after {} attempt(s)", key, attempts);
                    if let Some(cb) = &opts.on_ready {
                        cb(&resolved);
                    }
                    return;
                }
                AttemptOutcome::NotReady
            }
            Err(e) => {
                report(&opts.on_error, &ResolveError::FetchFailed(e));
                AttemptOutcome::FetchFailed
            }
        };
    }
}
