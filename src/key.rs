use std::fmt;

/// The kind of remotely generated asset a key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Model,
    World,
    Splat,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Model => "model",
            AssetKind::World => "world",
            AssetKind::Splat => "splat",
        }
    }
}

/// Typed cache key identifying one logical resolution process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey {
    kind: AssetKind,
    id: String,
}

impl AssetKey {
    pub fn new(kind: AssetKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn model(id: impl Into<String>) -> Self {
        Self::new(AssetKind::Model, id)
    }

    pub fn world(id: impl Into<String>) -> Self {
        Self::new(AssetKind::World, id)
    }

    pub fn splat(id: impl Into<String>) -> Self {
        Self::new(AssetKind::Splat, id)
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_prefix() {
        assert_eq!(AssetKey::model("abc123").to_string(), "model:abc123");
        assert_eq!(AssetKey::world("w1").to_string(), "world:w1");
        assert_eq!(AssetKey::splat("w1").to_string(), "splat:w1");
    }

    #[test]
    fn same_id_different_kind_is_distinct() {
        assert_ne!(AssetKey::model("x"), AssetKey::world("x"));
        assert_eq!(AssetKey::model("x"), AssetKey::model("x"));
    }
}
