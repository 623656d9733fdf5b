//! Raw descriptors returned by the generation backend.
//!
//! Generation runs asynchronously on the server, so any nested record may be
//! missing at any point in an asset's lifetime. Every field is optional or
//! defaulted; a descriptor with any subset of fields present is valid input.

use serde::{Deserialize, Serialize};

/// A single URL-bearing sub-record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UrlRecord {
    pub url: Option<String>,
}

/// The ranked mesh encodings of a model, highest fidelity first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeshSet {
    pub textured_mesh: Option<UrlRecord>,
    pub optimized_mesh: Option<UrlRecord>,
    pub mesh: Option<UrlRecord>,
}

/// Alternate-format encodings nested under a model descriptor. Each known
/// format carries its own ranked mesh trio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelFormats {
    pub usdz: Option<MeshSet>,
    pub fbx: Option<MeshSet>,
}

/// A model generation record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelDescriptor {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: Option<String>,
    #[serde(flatten)]
    pub meshes: MeshSet,
    pub formats: Option<ModelFormats>,
}

/// Splat point-cloud files at each quality tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SplatFiles {
    pub low_res: Option<UrlRecord>,
    pub medium_res: Option<UrlRecord>,
    pub high_res: Option<UrlRecord>,
}

/// A world generation record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldDescriptor {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: Option<String>,
    pub splat_files: Option<SplatFiles>,
    pub panorama: Option<UrlRecord>,
    pub thumbnail: Option<UrlRecord>,
    pub collider: Option<UrlRecord>,
    pub captions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_minimal_json() {
        let descriptor: ModelDescriptor = serde_json::from_str(r#"{"_id": "m1"}"#).unwrap();
        assert_eq!(descriptor.id, "m1");
        assert!(descriptor.meshes.textured_mesh.is_none());
        assert!(descriptor.formats.is_none());
    }

    #[test]
    fn model_partial_meshes() {
        let json = r#"{
            "_id": "m2",
            "status": "generating",
            "optimizedMesh": { "url": "a.glb" },
            "mesh": { "url": "b.glb" }
        }"#;
        let descriptor: ModelDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.status.as_deref(), Some("generating"));
        assert!(descriptor.meshes.textured_mesh.is_none());
        assert_eq!(
            descriptor.meshes.optimized_mesh.unwrap().url.as_deref(),
            Some("a.glb")
        );
        assert_eq!(descriptor.meshes.mesh.unwrap().url.as_deref(), Some("b.glb"));
    }

    #[test]
    fn model_formats_nested_trio() {
        let json = r#"{
            "_id": "m3",
            "formats": {
                "usdz": { "texturedMesh": { "url": "m.usdz" } }
            }
        }"#;
        let descriptor: ModelDescriptor = serde_json::from_str(json).unwrap();
        let formats = descriptor.formats.unwrap();
        let usdz = formats.usdz.unwrap();
        assert_eq!(usdz.textured_mesh.unwrap().url.as_deref(), Some("m.usdz"));
        assert!(formats.fbx.is_none());
    }

    #[test]
    fn world_splat_files_camel_case() {
        let json = r#"{
            "_id": "w1",
            "splatFiles": { "lowRes": { "url": "x" }, "highRes": { "url": "z" } },
            "captions": ["a room"]
        }"#;
        let descriptor: WorldDescriptor = serde_json::from_str(json).unwrap();
        let files = descriptor.splat_files.unwrap();
        assert_eq!(files.low_res.unwrap().url.as_deref(), Some("x"));
        assert!(files.medium_res.is_none());
        assert_eq!(files.high_res.unwrap().url.as_deref(), Some("z"));
        assert_eq!(descriptor.captions, vec!["a room"]);
    }

    #[test]
    fn url_record_without_url_field() {
        // A sub-record may exist before its URL does.
        let record: UrlRecord = serde_json::from_str(r#"{}"#).unwrap();
        assert!(record.url.is_none());
    }
}
