//! genasset - resolution and polling engine for remotely generated 3D assets
//!
//! Turns an opaque asset ID into an immediately usable placeholder and a
//! bounded background task that polls the generation backend until the final
//! artifact can be swapped in. Repeated requests for the same typed key are
//! idempotent and served from a process-wide cache.

pub mod cache;
pub mod config;
pub mod container;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod key;
pub mod loader;
pub mod poll;
pub mod resolve;
pub mod splat;
mod swap;
pub mod task;

pub use cache::{CacheEntry, CacheStore};
pub use config::{EngineConfig, PlaceholderSpec, PollConfig};
pub use container::{LoadedModel, ModelContainer, ModelContent, PlaceholderMesh};
pub use descriptor::{
    MeshSet, ModelDescriptor, ModelFormats, SplatFiles, UrlRecord, WorldDescriptor,
};
pub use engine::{
    DescriptorCallback, ErrorCallback, ModelReadyCallback, ModelResolveOptions, ResolverEngine,
    SplatLoadOptions, WorldReadyCallback, WorldResolveOptions,
};
pub use error::{FetchError, ResolveError};
pub use fetch::{DescriptorFetcher, HttpDescriptorFetcher};
pub use key::{AssetKey, AssetKind};
pub use loader::{
    HttpModelLoader, LocalViewerFactory, ModelLoader, NoModelSupport, NoSplatSupport,
    SplatViewerFactory,
};
pub use poll::{PollHandle, PollRegistry};
pub use resolve::{ResolvedFormats, ResolvedWorld, SplatTiers};
pub use splat::{AlreadyReleased, SplatViewer, SplatViewerConfig, SplatViewerOverrides};
pub use swap::dispose_viewer;
pub use task::{decide_next, AttemptOutcome, Decision};
