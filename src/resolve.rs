//! Best-URL selection over asset descriptors.
//!
//! Pure functions with no side effects. A `None` result means the backend has
//! not produced that artifact yet; it is the caller's "not ready" signal, not
//! an error.

use crate::descriptor::{MeshSet, ModelDescriptor, SplatFiles, UrlRecord, WorldDescriptor};

/// Resolved alternate-format URLs, one slot per known format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedFormats {
    pub usdz: Option<String>,
    pub fbx: Option<String>,
}

/// Every splat tier resolved independently, regardless of which is best.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplatTiers {
    pub low_res: Option<String>,
    pub medium_res: Option<String>,
    pub high_res: Option<String>,
}

/// Best mesh URL for a model: textured mesh, then optimized mesh, then raw
/// mesh. A missing sub-record and a missing `url` field are both skipped.
pub fn mesh_url(meshes: &MeshSet) -> Option<&str> {
    [&meshes.textured_mesh, &meshes.optimized_mesh, &meshes.mesh]
        .into_iter()
        .find_map(|record| record.as_ref()?.url.as_deref())
}

/// Resolve every known alternate format independently, reusing the mesh
/// ranking per format. Missing formats map to `None`.
pub fn mesh_formats(descriptor: &ModelDescriptor) -> ResolvedFormats {
    let formats = descriptor.formats.as_ref();
    let pick = |set: Option<&MeshSet>| set.and_then(mesh_url).map(str::to_owned);
    ResolvedFormats {
        usdz: pick(formats.and_then(|f| f.usdz.as_ref())),
        fbx: pick(formats.and_then(|f| f.fbx.as_ref())),
    }
}

/// Best splat URL for a world: high, then medium, then low resolution.
pub fn splat_url(files: &SplatFiles) -> Option<&str> {
    [&files.high_res, &files.medium_res, &files.low_res]
        .into_iter()
        .find_map(|record| record.as_ref()?.url.as_deref())
}

/// Resolve every splat tier, each slot independently `None` when absent.
/// For callers that pick a tier explicitly instead of taking the best.
pub fn splat_tiers(files: &SplatFiles) -> SplatTiers {
    let url = |record: &Option<UrlRecord>| record.as_ref().and_then(|r| r.url.clone());
    SplatTiers {
        low_res: url(&files.low_res),
        medium_res: url(&files.medium_res),
        high_res: url(&files.high_res),
    }
}

/// Flat resolution of a world descriptor, the shape callers consume.
///
/// Worlds have no placeholder/swap step; resolution is this data-shape
/// upgrade over the raw descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedWorld {
    pub splat_url: Option<String>,
    pub splat_tiers: SplatTiers,
    pub panorama_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub collider_url: Option<String>,
    pub captions: Vec<String>,
    pub status: Option<String>,
    pub descriptor: WorldDescriptor,
}

impl ResolvedWorld {
    pub fn from_descriptor(descriptor: WorldDescriptor) -> Self {
        let files = descriptor.splat_files.as_ref();
        let record_url = |record: &Option<UrlRecord>| record.as_ref().and_then(|r| r.url.clone());
        Self {
            splat_url: files.and_then(splat_url).map(str::to_owned),
            splat_tiers: files.map(splat_tiers).unwrap_or_default(),
            panorama_url: record_url(&descriptor.panorama),
            thumbnail_url: record_url(&descriptor.thumbnail),
            collider_url: record_url(&descriptor.collider),
            captions: descriptor.captions.clone(),
            status: descriptor.status.clone(),
            descriptor,
        }
    }

    /// A world is ready once it has something presentable: a splat file or a
    /// panorama.
    pub fn is_ready(&self) -> bool {
        self.splat_url.is_some() || self.panorama_url.is_some()
    }
}
