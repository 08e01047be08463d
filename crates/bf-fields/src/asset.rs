//! Media reference resolution.

use std::sync::Arc;

use bf_store::{AssetRecord, AssetSource};
use serde_json::{Map, Value};

use crate::tree::AssetDescriptor;

/// Keys whose presence next to `url` marks an object as an inline asset.
///
/// A bare `{title, url, target}` link object is not an asset.
const ASSET_COMPANION_KEYS: &[&str] = &[
    "id", "width", "height", "alt", "altText", "alt_text", "mime_type", "mimeType", "sizes",
    "filename",
];

/// True if `url` is an absolute http(s) URL.
#[must_use]
pub fn is_absolute_url(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    (lower.starts_with("http://") && url.len() > "http://".len())
        || (lower.starts_with("https://") && url.len() > "https://".len())
}

/// Resolves media references into [`AssetDescriptor`]s.
///
/// A reference is either an attachment id (positive integer or numeric
/// string) or an inline object. Inline objects with an `id` are looked up by
/// id so deleted media is detected; inline objects without an id are taken
/// as they are. Stored URLs are made absolute against the media base URL.
#[derive(Clone)]
pub struct AssetResolver {
    source: Arc<dyn AssetSource>,
    base_url: Option<String>,
}

impl std::fmt::Debug for AssetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetResolver")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AssetResolver {
    /// Create a resolver backed by an asset source.
    #[must_use]
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            base_url: None,
        }
    }

    /// Set the base URL used to absolutize relative media URLs.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = Some(base_url.trim_end_matches('/').to_owned());
        self
    }

    /// The configured media base URL.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// The asset source lookups go to.
    #[must_use]
    pub fn source(&self) -> &dyn AssetSource {
        self.source.as_ref()
    }

    /// Resolve any supported reference shape.
    ///
    /// Returns `None` for empty values, unknown ids and URLs that cannot be
    /// made absolute. Never fails.
    #[must_use]
    pub fn resolve(&self, reference: &Value) -> Option<AssetDescriptor> {
        match reference {
            Value::Number(_) | Value::String(_) => self.resolve_id(reference_id(reference)?),
            Value::Object(map) => self.resolve_inline(map),
            Value::Null | Value::Bool(_) | Value::Array(_) => None,
        }
    }

    /// Resolve an attachment id.
    #[must_use]
    pub fn resolve_id(&self, id: u64) -> Option<AssetDescriptor> {
        match self.source.asset(id) {
            Ok(Some(record)) => self.describe(&record),
            Ok(None) => {
                tracing::warn!(asset_id = id, "Media reference points to missing asset");
                None
            }
            Err(e) => {
                tracing::warn!(asset_id = id, error = %e, "Failed to look up asset");
                None
            }
        }
    }

    /// Turn a stored record into a descriptor with an absolute URL.
    #[must_use]
    pub fn describe(&self, record: &AssetRecord) -> Option<AssetDescriptor> {
        let url = self.absolutize(&record.url)?;
        Some(AssetDescriptor {
            id: Some(record.id),
            url,
            width: record.width,
            height: record.height,
            alt_text: record.alt_text.clone(),
        })
    }

    /// Make a stored URL absolute.
    ///
    /// - `https://host/x` is kept
    /// - `//host/x` becomes `https://host/x`
    /// - `/x` and `x` are joined to the base URL
    ///
    /// Returns `None` for empty URLs, bare numbers, and relative URLs when no
    /// base URL is configured.
    #[must_use]
    pub fn absolutize(&self, url: &str) -> Option<String> {
        let url = url.trim();
        if url.is_empty() || url.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if is_absolute_url(url) {
            return Some(url.to_owned());
        }
        if let Some(rest) = url.strip_prefix("//") {
            return (!rest.is_empty()).then(|| format!("https://{rest}"));
        }
        let Some(base) = self.base_url.as_deref() else {
            tracing::warn!(url = %url, "Relative media URL without a media base URL");
            return None;
        };
        Some(format!("{base}/{}", url.trim_start_matches('/')))
    }

    /// True if an object looks like an inline asset rather than a link or group.
    #[must_use]
    pub fn is_inline_asset(map: &Map<String, Value>) -> bool {
        matches!(map.get("url"), Some(Value::String(_)))
            && ASSET_COMPANION_KEYS.iter().any(|k| map.contains_key(*k))
    }

    fn resolve_inline(&self, map: &Map<String, Value>) -> Option<AssetDescriptor> {
        if let Some(id) = map.get("id").filter(|v| !v.is_null()) {
            return self.resolve_id(reference_id(id)?);
        }

        let url = self.absolutize(map.get("url")?.as_str()?)?;
        let alt_text = ["altText", "alt_text", "alt"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
            .unwrap_or_default()
            .to_owned();
        Some(AssetDescriptor {
            id: None,
            url,
            width: dimension(map.get("width")),
            height: dimension(map.get("height")),
            alt_text,
        })
    }
}

/// Extract a positive attachment id from a number or numeric string.
pub(crate) fn reference_id(value: &Value) -> Option<u64> {
    let id = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (id > 0).then_some(id)
}

fn dimension(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use bf_store::MockStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn resolver() -> AssetResolver {
        let store = MockStore::new()
            .with_asset_record(AssetRecord {
                id: 7,
                url: "/uploads/logo.png".to_owned(),
                width: Some(320),
                height: Some(80),
                alt_text: "Acme".to_owned(),
                title: "Site logo".to_owned(),
                filename: "logo.png".to_owned(),
            })
            .with_asset(8, "https://media.example.org/hero.jpg")
            .with_asset(9, "42");
        AssetResolver::new(Arc::new(store)).with_base_url("https://cdn.example.com/")
    }

    #[test]
    fn test_resolve_valid_id_gives_absolute_url() {
        let asset = resolver().resolve(&json!(7)).unwrap();

        assert_eq!(
            asset,
            AssetDescriptor {
                id: Some(7),
                url: "https://cdn.example.com/uploads/logo.png".to_owned(),
                width: Some(320),
                height: Some(80),
                alt_text: "Acme".to_owned(),
            }
        );
        assert!(is_absolute_url(&asset.url));
    }

    #[test]
    fn test_resolve_numeric_string() {
        let asset = resolver().resolve(&json!("8")).unwrap();

        assert_eq!(asset.url, "https://media.example.org/hero.jpg");
    }

    #[test]
    fn test_resolve_missing_id_is_none() {
        assert!(resolver().resolve(&json!(404)).is_none());
    }

    #[test]
    fn test_resolve_zero_and_empty_are_none() {
        let resolver = resolver();

        assert!(resolver.resolve(&json!(0)).is_none());
        assert!(resolver.resolve(&json!("")).is_none());
        assert!(resolver.resolve(&json!(false)).is_none());
        assert!(resolver.resolve(&Value::Null).is_none());
    }

    #[test]
    fn test_stored_bare_number_url_is_rejected() {
        assert!(resolver().resolve(&json!(9)).is_none());
    }

    #[test]
    fn test_inline_with_id_is_looked_up() {
        let asset = resolver()
            .resolve(&json!({"id": 7, "url": "https://stale.example.com/old.png"}))
            .unwrap();

        assert_eq!(asset.url, "https://cdn.example.com/uploads/logo.png");
    }

    #[test]
    fn test_inline_with_deleted_id_collapses() {
        assert!(
            resolver()
                .resolve(&json!({"id": 404, "url": "https://cdn.example.com/gone.png"}))
                .is_none()
        );
    }

    #[test]
    fn test_inline_without_id_is_taken_as_is() {
        let asset = resolver()
            .resolve(&json!({"url": "//img.example.com/a.png", "width": "640", "alt": "A"}))
            .unwrap();

        assert_eq!(
            asset,
            AssetDescriptor {
                id: None,
                url: "https://img.example.com/a.png".to_owned(),
                width: Some(640),
                height: None,
                alt_text: "A".to_owned(),
            }
        );
    }

    #[test]
    fn test_relative_url_without_base_fails() {
        let store = MockStore::new().with_asset(1, "/uploads/a.png");
        let resolver = AssetResolver::new(Arc::new(store));

        assert!(resolver.resolve(&json!(1)).is_none());
    }

    #[test]
    fn test_unavailable_source_is_none() {
        let store = Arc::new(MockStore::new().with_asset(1, "https://cdn.example.com/a.png"));
        store.set_unavailable(true);
        let resolver = AssetResolver::new(store);

        assert!(resolver.resolve(&json!(1)).is_none());
    }

    #[test]
    fn test_is_inline_asset() {
        let link = json!({"title": "Docs", "url": "/docs", "target": "_blank"});
        let image = json!({"url": "/a.png", "width": 10});

        assert!(!AssetResolver::is_inline_asset(link.as_object().unwrap()));
        assert!(AssetResolver::is_inline_asset(image.as_object().unwrap()));
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://cdn.example.com/a.png"));
        assert!(is_absolute_url("HTTP://example.com"));
        assert!(!is_absolute_url("https://"));
        assert!(!is_absolute_url("/uploads/a.png"));
        assert!(!is_absolute_url("ftp://example.com/a.png"));
    }
}
