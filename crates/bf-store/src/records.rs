//! Records returned by store backends.

use serde::{Deserialize, Serialize};

/// Flattened, loosely-typed field storage for a page or block.
pub type FieldValues = serde_json::Map<String, serde_json::Value>;

/// A stored page: title plus serialized block markup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page identifier.
    #[serde(default)]
    pub id: String,
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Raw serialized block markup.
    #[serde(default)]
    pub content: String,
}

/// A media item as known to the system of record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Attachment id.
    #[serde(default)]
    pub id: u64,
    /// Stored URL (may be relative to the media host).
    pub url: String,
    /// Pixel width, if known.
    #[serde(default)]
    pub width: Option<u32>,
    /// Pixel height, if known.
    #[serde(default)]
    pub height: Option<u32>,
    /// Alternative text.
    #[serde(default, alias = "alt", alias = "altText")]
    pub alt_text: String,
    /// Descriptive title from the media library.
    #[serde(default)]
    pub title: String,
    /// Original upload filename.
    #[serde(default)]
    pub filename: String,
}

/// A navigation menu as known to the system of record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRecord {
    /// Menu id.
    pub id: u64,
    /// Menu name as shown in the admin.
    pub name: String,
}

/// Which of the two setting stores an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// The site-local store; may be reset by environment migrations.
    Primary,
    /// The durable/global store that survives such resets.
    Secondary,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}
