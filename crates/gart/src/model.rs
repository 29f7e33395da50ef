use serde::{Deserialize, Serialize};

/// Broad category of a downloadable asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Music,
    Model3d,
    Texture,
    Sound,
    Document,
    Other,
}

impl AssetType {
    /// Map the site's display label onto a category. Unknown labels
    /// (2D art, concept art, future additions) land in `Other`.
    pub fn from_site_label(label: &str) -> Self {
        match label.trim() {
            "Music" => Self::Music,
            "3D Art" => Self::Model3d,
            "Texture" => Self::Texture,
            "Sound Effect" => Self::Sound,
            "Document" => Self::Document,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Model3d => "3d",
            Self::Texture => "texture",
            Self::Sound => "sfx",
            Self::Document => "doc",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One downloadable file belonging to an asset.
///
/// `validator` is the server-supplied freshness token (entity tag), opaque
/// and compared by equality only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFile {
    pub name: String,
    pub size: u64,
    pub validator: String,
}

/// A fully described asset, built once per describe call from a parsed
/// detail page. Immutable after construction; never cached across calls.
///
/// `files` keeps the page's document order, which makes download ordering
/// deterministic across repeated describes of an unchanged asset.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub kind: AssetType,
    pub author: Option<String>,
    pub favorites: u32,
    /// Site display order, duplicates removed.
    pub tags: Vec<String>,
    pub licenses: Vec<String>,
    pub attribution: Option<String>,
    pub files: Vec<AssetFile>,
}

impl Asset {
    /// One-line form used by the command surface.
    pub fn summary_line(&self) -> String {
        format!(
            "{} {} ({} favorites, {} tags)",
            self.id,
            self.kind,
            self.favorites,
            self.tags.len()
        )
    }
}

/// One search hit, in the order the server returned it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub id: String,
    pub title: String,
    /// Tags shown on the result tile. Drives client-side AND filtering.
    pub tags: Vec<String>,
}
