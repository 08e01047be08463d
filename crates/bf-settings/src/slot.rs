use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a slot's value refers to, which decides how validity is checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    /// Attachment id; valid if the asset exists.
    #[default]
    Asset,
    /// Navigation menu id; valid if the menu exists.
    Menu,
    /// Free value; valid if non-null and non-empty.
    Value,
}

/// A configured setting slot.
///
/// Deserializes from a `[settings.slots.<name>]` table. The name is the table
/// key and is filled in by the loader.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SlotDefinition {
    /// Slot name used in the settings document.
    #[serde(skip)]
    pub name: String,
    /// Value kind.
    #[serde(default)]
    pub kind: SlotKind,
    /// Key in the primary store.
    pub primary_key: String,
    /// Key in the secondary store.
    pub secondary_key: String,
    /// Naming convention used to recover a lost value (`"logo"`).
    #[serde(default, rename = "match")]
    pub match_hint: Option<String>,
}

impl SlotDefinition {
    /// Create a slot definition.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: SlotKind,
        primary_key: impl Into<String>,
        secondary_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            primary_key: primary_key.into(),
            secondary_key: secondary_key.into(),
            match_hint: None,
        }
    }

    /// Set the heuristic naming convention.
    #[must_use]
    pub fn with_match(mut self, hint: impl Into<String>) -> Self {
        self.match_hint = Some(hint.into());
        self
    }

    /// The site logo slot used when none are configured.
    #[must_use]
    pub fn default_logo() -> Self {
        Self::new("logo", SlotKind::Asset, "site_logo", "global_site_logo").with_match("logo")
    }
}

/// State of one setting across both stores.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSlot {
    /// Slot name.
    pub key: String,
    /// Value held by the primary store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_value: Option<Value>,
    /// Value held by the secondary store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_value: Option<Value>,
    /// Value in effect after reconciliation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<Value>,
}

impl ConfigSlot {
    /// Create an unresolved slot with nothing stored.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Set the primary store's value.
    #[must_use]
    pub fn with_primary(mut self, value: Value) -> Self {
        self.primary_value = Some(value);
        self
    }

    /// Set the secondary store's value.
    #[must_use]
    pub fn with_secondary(mut self, value: Value) -> Self {
        self.secondary_value = Some(value);
        self
    }
}

/// Validity of each stored value, checked against the system of record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlotValidity {
    pub primary_valid: bool,
    pub secondary_valid: bool,
}

impl SlotValidity {
    /// True if either store holds a valid value.
    #[must_use]
    pub fn any(self) -> bool {
        self.primary_valid || self.secondary_valid
    }
}
