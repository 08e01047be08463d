//! Field schemas.
//!
//! Schemas are optional. A block without one is normalized by inference
//! from key shapes alone. In configuration a schema is a TOML table:
//!
//! ```toml
//! [blocks."acme/hero".fields]
//! title = "text"
//! image = "media"
//! slides = { type = "repeater", fields = { image = "media", caption = "text" } }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

/// Declared type of a single field.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFieldType")]
pub enum FieldType {
    /// Free text; scalars are coerced to strings.
    Text,
    /// Numeric; numeric strings are parsed.
    Number,
    /// Boolean; `"1"`, `"0"`, `"true"`, `"false"`, `""` are understood.
    Boolean,
    /// Media reference resolved to an asset descriptor.
    Media,
    /// Passed through without coercion or asset resolution.
    Opaque,
    /// Ordered list of rows, stored flattened as `<name>_<i>_<sub>`.
    Repeater(FieldSchema),
    /// Single nested object, stored flattened as `<name>_<sub>`.
    Group(FieldSchema),
}

/// Field declarations for one block type (or one repeater row / group).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    fields: BTreeMap<String, FieldType>,
}

impl FieldSchema {
    /// Create an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(name.into(), field_type);
        self
    }

    /// Type of a declared field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.fields.get(name)
    }

    /// True if no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declared fields, longest name first.
    ///
    /// Groups claim every key under their prefix, so a sibling whose name
    /// extends the group name (`hero_title` next to group `hero`) has to
    /// claim its key first.
    pub(crate) fn claim_order(&self) -> Vec<(&str, &FieldType)> {
        let mut fields: Vec<_> = self
            .fields
            .iter()
            .map(|(name, ty)| (name.as_str(), ty))
            .collect();
        fields.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));
        fields
    }
}

/// Schemas keyed by block name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct BlockSchemas {
    blocks: BTreeMap<String, FieldSchema>,
}

impl BlockSchemas {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema for a block name.
    #[must_use]
    pub fn with_block(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.insert(name, schema);
        self
    }

    /// Register a schema for a block name, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, schema: FieldSchema) {
        self.blocks.insert(name.into(), schema);
    }

    /// Schema registered for a block name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.blocks.get(name)
    }

    /// Number of registered block schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True if no schema is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldType {
    Scalar(ScalarKind),
    Nested {
        #[serde(rename = "type")]
        kind: NestedKind,
        #[serde(default)]
        fields: FieldSchema,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum ScalarKind {
    Text,
    Number,
    Boolean,
    Media,
    Opaque,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum NestedKind {
    Repeater,
    Group,
}

impl From<RawFieldType> for FieldType {
    fn from(raw: RawFieldType) -> Self {
        match raw {
            RawFieldType::Scalar(ScalarKind::Text) => Self::Text,
            RawFieldType::Scalar(ScalarKind::Number) => Self::Number,
            RawFieldType::Scalar(ScalarKind::Boolean) => Self::Boolean,
            RawFieldType::Scalar(ScalarKind::Media) => Self::Media,
            RawFieldType::Scalar(ScalarKind::Opaque) => Self::Opaque,
            RawFieldType::Nested {
                kind: NestedKind::Repeater,
                fields,
            } => Self::Repeater(fields),
            RawFieldType::Nested {
                kind: NestedKind::Group,
                fields,
            } => Self::Group(fields),
        }
    }
}
