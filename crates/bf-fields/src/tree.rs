//! Typed attribute values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Map of normalized attributes.
pub type AttributeMap = BTreeMap<String, AttributeTree>;

/// Fully resolved media reference.
///
/// `url` is always absolute. A reference that cannot be resolved never
/// produces a partially filled descriptor; the field becomes `null` instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDescriptor {
    /// Attachment id (`None` for inline descriptors without one).
    pub id: Option<u64>,
    /// Absolute, directly fetchable URL.
    pub url: String,
    /// Pixel width, if known.
    pub width: Option<u32>,
    /// Pixel height, if known.
    pub height: Option<u32>,
    /// Alternative text (empty if none).
    pub alt_text: String,
}

/// Recursively typed attribute value.
///
/// Serializes untagged, so the JSON form of a tree is exactly what the
/// frontend reads: assets as objects, lists as arrays, maps as objects.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeTree {
    /// Absent or unresolvable value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Number (integer or float).
    Number(Number),
    /// String.
    String(String),
    /// Resolved media reference.
    Asset(AssetDescriptor),
    /// Ordered list (repeater rows, galleries).
    List(Vec<AttributeTree>),
    /// Nested object (groups, repeater rows, block attributes).
    Map(AttributeMap),
}

impl AttributeTree {
    /// An empty map.
    #[must_use]
    pub fn empty_map() -> Self {
        Self::Map(AttributeMap::new())
    }

    /// True for [`AttributeTree::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow as a map, if this is one.
    #[must_use]
    pub fn as_map(&self) -> Option<&AttributeMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow as a list, if this is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&[AttributeTree]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as a string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow as an asset, if this is one.
    #[must_use]
    pub fn as_asset(&self) -> Option<&AssetDescriptor> {
        match self {
            Self::Asset(asset) => Some(asset),
            _ => None,
        }
    }

    /// Look up a key if this is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeTree> {
        self.as_map()?.get(key)
    }

    /// Convert to a JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Asset(asset) => asset_to_json(asset),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn asset_to_json(asset: &AssetDescriptor) -> Value {
    serde_json::json!({
        "id": asset.id,
        "url": asset.url,
        "width": asset.width,
        "height": asset.height,
        "altText": asset.alt_text,
    })
}

/// Verbatim conversion without any inference.
impl From<Value> for AttributeTree {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl From<AssetDescriptor> for AttributeTree {
    fn from(asset: AssetDescriptor) -> Self {
        Self::Asset(asset)
    }
}

impl From<Option<AssetDescriptor>> for AttributeTree {
    fn from(asset: Option<AssetDescriptor>) -> Self {
        asset.map_or(Self::Null, Self::Asset)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn logo() -> AssetDescriptor {
        AssetDescriptor {
            id: Some(7),
            url: "https://cdn.example.com/logo.png".to_owned(),
            width: Some(200),
            height: None,
            alt_text: "Logo".to_owned(),
        }
    }

    #[test]
    fn test_asset_serializes_camel_case_with_nulls() {
        let json = serde_json::to_value(logo()).unwrap();

        assert_eq!(
            json,
            json!({
                "id": 7,
                "url": "https://cdn.example.com/logo.png",
                "width": 200,
                "height": null,
                "altText": "Logo"
            })
        );
    }

    #[test]
    fn test_tree_serializes_untagged() {
        let mut map = AttributeMap::new();
        map.insert("logo".to_owned(), AttributeTree::Asset(logo()));
        map.insert("missing".to_owned(), AttributeTree::Null);
        map.insert(
            "items".to_owned(),
            AttributeTree::List(vec![AttributeTree::String("a".to_owned())]),
        );
        let tree = AttributeTree::Map(map);

        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(json["logo"]["altText"], "Logo");
        assert!(json["missing"].is_null());
        assert_eq!(json["items"], json!(["a"]));
    }

    #[test]
    fn test_to_json_matches_serde() {
        let tree = AttributeTree::from(json!({"a": [1, true, null], "b": {"c": "d"}}));
        let mut map = tree.as_map().unwrap().clone();
        map.insert("img".to_owned(), AttributeTree::Asset(logo()));
        let tree = AttributeTree::Map(map);

        assert_eq!(tree.to_json(), serde_json::to_value(&tree).unwrap());
    }

    #[test]
    fn test_from_value_is_verbatim() {
        let tree = AttributeTree::from(json!({"items_0_title": "Home", "_items": "hint"}));

        assert!(tree.get("items_0_title").is_some());
        assert!(tree.get("_items").is_some());
    }

    #[test]
    fn test_from_option_asset() {
        assert!(AttributeTree::from(None::<AssetDescriptor>).is_null());
        assert!(AttributeTree::from(Some(logo())).as_asset().is_some());
    }
}
