//! Injected capability handles: artifact loading and viewer construction.
//!
//! Both traits expose an availability probe so the engine can treat a missing
//! host capability as a standing condition instead of crashing.

use async_trait::async_trait;
use tracing::debug;

use crate::container::LoadedModel;
use crate::error::{FetchError, ResolveError};
use crate::splat::{SplatViewer, SplatViewerConfig};

/// Loads a final model artifact from a resolved URL.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Whether artifact loading is usable in the host environment.
    fn available(&self) -> bool {
        true
    }

    async fn load(&self, url: &str) -> Result<LoadedModel, ResolveError>;
}

/// Builds splat viewers around a single named scene.
#[async_trait]
pub trait SplatViewerFactory: Send + Sync {
    /// Whether the alternate-viewer capability is usable in the host.
    fn available(&self) -> bool {
        true
    }

    async fn create(
        &self,
        config: SplatViewerConfig,
        scene_name: &str,
        url: &str,
    ) -> Result<SplatViewer, ResolveError>;
}

/// Stock loader: downloads the artifact and decodes it as glTF 2.0.
pub struct HttpModelLoader {
    client: reqwest::Client,
}

impl HttpModelLoader {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelLoader for HttpModelLoader {
    async fn load(&self, url: &str) -> Result<LoadedModel, ResolveError> {
        let failed = |reason: String| ResolveError::LoadFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("server returned {}", status)));
        }
        let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;

        let (document, _buffers, _images) =
            gltf::import_slice(&bytes).map_err(|e| failed(e.to_string()))?;
        let mesh_count = document.meshes().len();
        debug!("loaded '{}': {} mesh(es)", url, mesh_count);

        Ok(LoadedModel {
            url: url.to_string(),
            mesh_count,
        })
    }
}

/// Factory constructing plain viewer handles; rendering lives outside the
/// engine.
pub struct LocalViewerFactory;

#[async_trait]
impl SplatViewerFactory for LocalViewerFactory {
    async fn create(
        &self,
        config: SplatViewerConfig,
        scene_name: &str,
        url: &str,
    ) -> Result<SplatViewer, ResolveError> {
        Ok(SplatViewer::new(config, scene_name, url))
    }
}

/// Stand-in for hosts without splat support: always unavailable.
pub struct NoSplatSupport;

#[async_trait]
impl SplatViewerFactory for NoSplatSupport {
    fn available(&self) -> bool {
        false
    }

    async fn create(
        &self,
        _config: SplatViewerConfig,
        _scene_name: &str,
        _url: &str,
    ) -> Result<SplatViewer, ResolveError> {
        Err(ResolveError::DependencyUnavailable("splat viewer"))
    }
}

/// Stand-in for hosts without model loading: always unavailable.
pub struct NoModelSupport;

#[async_trait]
impl ModelLoader for NoModelSupport {
    fn available(&self) -> bool {
        false
    }

    async fn load(&self, _url: &str) -> Result<LoadedModel, ResolveError> {
        Err(ResolveError::DependencyUnavailable("model loader"))
    }
}
