//! Flattened field storage to typed attribute trees.

use std::collections::BTreeMap;

use bf_store::FieldValues;
use serde_json::{Map, Number, Value};

use crate::asset::{AssetResolver, reference_id};
use crate::flatten::{collect_rows, expand_repeaters, is_shadow_key, row_count};
use crate::schema::{BlockSchemas, FieldSchema, FieldType};
use crate::tree::{AttributeMap, AttributeTree};

/// Key words that mark a scalar as an attachment id when no schema says so.
const MEDIA_HINTS: &[&str] = &[
    "image",
    "logo",
    "icon",
    "photo",
    "picture",
    "thumbnail",
    "video",
    "file",
    "media",
    "avatar",
    "background",
    "gallery",
    "attachment",
];

/// Normalizes stored field values into [`AttributeTree`]s.
///
/// With a [`FieldSchema`] declared fields are coerced to their type and
/// undeclared ones are inferred. Without one every key is inferred from its
/// shape: flattened families become lists, asset-shaped objects and ids under
/// media-named keys are resolved, everything else passes through.
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    assets: AssetResolver,
    schemas: BlockSchemas,
}

impl FieldNormalizer {
    /// Create a normalizer with no registered block schemas.
    #[must_use]
    pub fn new(assets: AssetResolver) -> Self {
        Self {
            assets,
            schemas: BlockSchemas::new(),
        }
    }

    /// Register block schemas used by [`FieldNormalizer::normalize_block`].
    #[must_use]
    pub fn with_schemas(mut self, schemas: BlockSchemas) -> Self {
        self.schemas = schemas;
        self
    }

    /// Registered block schemas.
    #[must_use]
    pub fn schemas(&self) -> &BlockSchemas {
        &self.schemas
    }

    /// Asset resolver used for media fields.
    #[must_use]
    pub fn assets(&self) -> &AssetResolver {
        &self.assets
    }

    /// Normalize against an explicit schema.
    #[must_use]
    pub fn normalize(&self, attrs: &FieldValues, schema: &FieldSchema) -> AttributeTree {
        AttributeTree::Map(self.apply_schema(attrs, schema))
    }

    /// Normalize by key-shape inference alone.
    #[must_use]
    pub fn normalize_inferred(&self, attrs: &FieldValues) -> AttributeTree {
        AttributeTree::Map(self.infer_map(attrs))
    }

    /// Normalize attributes of a named block.
    ///
    /// Uses the schema registered for `name`, falling back to inference.
    #[must_use]
    pub fn normalize_block(&self, name: &str, attrs: &FieldValues) -> AttributeTree {
        match self.schemas.get(name) {
            Some(schema) => self.normalize(attrs, schema),
            None => self.normalize_inferred(attrs),
        }
    }

    fn apply_schema(&self, raw: &Map<String, Value>, schema: &FieldSchema) -> AttributeMap {
        let mut remaining: Map<String, Value> = raw
            .iter()
            .filter(|(key, _)| !is_shadow_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let mut out = AttributeMap::new();

        for (name, field_type) in schema.claim_order() {
            let value = match field_type {
                FieldType::Repeater(row_schema) => take_repeater(&mut remaining, name).map(|rows| {
                    AttributeTree::List(
                        rows.into_iter()
                            .map(|row| match row {
                                Value::Object(row) => {
                                    AttributeTree::Map(self.apply_schema(&row, row_schema))
                                }
                                other => self.infer_value(name, other),
                            })
                            .collect(),
                    )
                }),
                FieldType::Group(group_schema) => take_group(&mut remaining, name)
                    .map(|group| AttributeTree::Map(self.apply_schema(&group, group_schema))),
                scalar => remaining
                    .remove(name)
                    .map(|value| self.coerce(scalar, value)),
            };
            if let Some(value) = value {
                out.insert(name.to_owned(), value);
            }
        }

        for (key, value) in self.infer_map(&remaining) {
            out.entry(key).or_insert(value);
        }
        out
    }

    fn coerce(&self, field_type: &FieldType, value: Value) -> AttributeTree {
        match (field_type, value) {
            (FieldType::Text, Value::Number(n)) => AttributeTree::String(n.to_string()),
            (FieldType::Number, Value::String(s)) => coerce_number(s),
            (FieldType::Boolean, value) => coerce_boolean(value),
            (FieldType::Media, Value::Array(items)) => AttributeTree::List(
                items
                    .into_iter()
                    .map(|item| self.coerce(&FieldType::Media, item))
                    .collect(),
            ),
            (FieldType::Media, value) => {
                if is_empty_media(&value) {
                    AttributeTree::Null
                } else {
                    self.assets.resolve(&value).into()
                }
            }
            (FieldType::Opaque, value) => opaque(value),
            (_, value) => value.into(),
        }
    }

    fn infer_map(&self, raw: &Map<String, Value>) -> AttributeMap {
        expand_repeaters(raw)
            .into_iter()
            .map(|(key, value)| {
                let tree = self.infer_value(&key, value);
                (key, tree)
            })
            .collect()
    }

    fn infer_value(&self, key: &str, value: Value) -> AttributeTree {
        let media_id = is_media_key(key) && reference_id(&value).is_some();
        match value {
            Value::Object(map) if AssetResolver::is_inline_asset(&map) => {
                self.assets.resolve(&Value::Object(map)).into()
            }
            Value::Object(map) => AttributeTree::Map(self.infer_map(&map)),
            Value::Array(items) => AttributeTree::List(
                items
                    .into_iter()
                    .map(|item| self.infer_value(key, item))
                    .collect(),
            ),
            value if media_id => self.assets.resolve(&value).into(),
            value => value.into(),
        }
    }
}

/// Opaque content is not coerced or resolved, but its shadow keys are still
/// dropped and its flattened families still become lists.
fn opaque(value: Value) -> AttributeTree {
    match value {
        Value::Object(map) => AttributeTree::Map(
            expand_repeaters(&map)
                .into_iter()
                .map(|(key, value)| (key, opaque(value)))
                .collect(),
        ),
        Value::Array(items) => AttributeTree::List(items.into_iter().map(opaque).collect()),
        value => value.into(),
    }
}

/// True if a key names a media field (`image`, `hero_image`, `heroImage`, `logo_id`).
fn is_media_key(key: &str) -> bool {
    let key = key
        .strip_suffix("_id")
        .or_else(|| key.strip_suffix("-id"))
        .or_else(|| key.strip_suffix("Id"))
        .unwrap_or(key);
    let word = last_word(key).to_ascii_lowercase();
    MEDIA_HINTS.contains(&word.as_str())
        || word
            .strip_suffix('s')
            .is_some_and(|singular| MEDIA_HINTS.contains(&singular))
}

/// Last `_`/`-` separated or camelCase word of a key.
fn last_word(key: &str) -> &str {
    let start = key.rfind(['_', '-']).map_or(0, |i| i + 1);
    let tail = &key[start..];
    match tail
        .char_indices()
        .rev()
        .find(|(i, c)| *i > 0 && c.is_ascii_uppercase())
    {
        Some((i, _)) => &tail[i..],
        None => tail,
    }
}

/// Remove `<name>_<i>_<sub>` keys and the `<name>` count key, returning rows.
///
/// An already nested list under `<name>` is returned as is.
fn take_repeater(remaining: &mut Map<String, Value>, name: &str) -> Option<Vec<Value>> {
    let prefix = format!("{name}_");
    let keys: Vec<String> = remaining
        .keys()
        .filter(|key| row_key(key, &prefix).is_some())
        .cloned()
        .collect();

    let mut rows: BTreeMap<usize, Map<String, Value>> = BTreeMap::new();
    for key in keys {
        let Some(value) = remaining.remove(&key) else {
            continue;
        };
        if let Some((index, sub)) = row_key(&key, &prefix) {
            rows.entry(index).or_default().insert(sub.to_owned(), value);
        }
    }

    match remaining.remove(name) {
        Some(Value::Array(items)) if rows.is_empty() => Some(items),
        None if rows.is_empty() => None,
        count => Some(collect_rows(name, count.as_ref(), rows)),
    }
}

/// Split `<prefix><digits>_<sub>` into `(index, sub)`.
fn row_key<'a>(key: &'a str, prefix: &str) -> Option<(usize, &'a str)> {
    let rest = key.strip_prefix(prefix)?;
    let (digits, sub) = rest.split_once('_')?;
    if digits.is_empty() || sub.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((digits.parse().ok()?, sub))
}

/// Remove `<name>_<sub>` keys (and a nested `<name>` object), returning the group.
fn take_group(remaining: &mut Map<String, Value>, name: &str) -> Option<Map<String, Value>> {
    let prefix = format!("{name}_");
    let mut found = false;
    let mut group = match remaining.remove(name) {
        Some(Value::Object(map)) => {
            found = true;
            map
        }
        Some(other) => {
            found = true;
            tracing::debug!(field = %name, value = %other, "Ignoring scalar under group name");
            Map::new()
        }
        None => Map::new(),
    };

    let keys: Vec<String> = remaining
        .keys()
        .filter(|key| key.len() > prefix.len() && key.starts_with(&prefix))
        .cloned()
        .collect();
    for key in keys {
        if let Some(value) = remaining.remove(&key) {
            found = true;
            group.insert(key[prefix.len()..].to_owned(), value);
        }
    }

    found.then_some(group)
}

fn coerce_number(s: String) -> AttributeTree {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return AttributeTree::Null;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return AttributeTree::Number(n.into());
    }
    match trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => AttributeTree::Number(n),
        None => AttributeTree::String(s),
    }
}

fn coerce_boolean(value: Value) -> AttributeTree {
    match &value {
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => AttributeTree::Bool(true),
            "0" | "false" | "" => AttributeTree::Bool(false),
            _ => value.into(),
        },
        Value::Number(n) => match n.as_u64() {
            Some(0) => AttributeTree::Bool(false),
            Some(1) => AttributeTree::Bool(true),
            _ => value.into(),
        },
        _ => value.into(),
    }
}

fn is_empty_media(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.trim().is_empty() || s.trim() == "0",
        Value::Number(n) => n.as_u64() == Some(0),
        _ => false,
    }
}
