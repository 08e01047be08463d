//! Collaborator traits.
//!
//! Lookups distinguish "absent" from "failed": a missing record is
//! `Ok(None)`, while an unreachable backend is an `Err` whose
//! [`StoreError::is_unavailable`] returns true.

use bf_navigation::{MegaMenuDefinition, NavigationEntry};
use serde_json::Value;

use crate::error::StoreError;
use crate::records::{AssetRecord, FieldValues, MenuRecord, PageRecord, StoreKind};

/// Source of pages, field values and navigation.
pub trait ContentStore: Send + Sync {
    /// Fetch a page with its raw block markup.
    ///
    /// Returns `Ok(None)` if no page has this id.
    fn page(&self, id: &str) -> Result<Option<PageRecord>, StoreError>;

    /// Fetch flattened field values stored for a page or block id.
    ///
    /// Returns `Ok(None)` if nothing is stored for `owner_id`.
    fn field_values(&self, owner_id: &str) -> Result<Option<FieldValues>, StoreError>;

    /// Fetch the navigation entries assigned to a menu location.
    ///
    /// Returns `Ok(None)` if the location is unknown.
    fn navigation_entries(&self, location: &str)
    -> Result<Option<Vec<NavigationEntry>>, StoreError>;

    /// List all mega-menu definitions in authoring order.
    fn mega_menus(&self) -> Result<Vec<MegaMenuDefinition>, StoreError>;

    /// List all navigation menus (system of record for menu-location slots).
    fn menus(&self) -> Result<Vec<MenuRecord>, StoreError>;
}

/// System of record for media.
pub trait AssetSource: Send + Sync {
    /// Look up an asset by id.
    ///
    /// Returns `Ok(None)` if the asset does not exist (e.g. was deleted).
    fn asset(&self, id: u64) -> Result<Option<AssetRecord>, StoreError>;

    /// List all assets. Used by best-effort heuristic lookups only.
    fn assets(&self) -> Result<Vec<AssetRecord>, StoreError>;
}

/// Key-value setting store with a primary and a secondary side.
pub trait ConfigStore: Send + Sync {
    /// Read a value. Returns `Ok(None)` if the key is unset.
    fn get(&self, store: StoreKind, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write a value, replacing any previous one.
    fn set(&self, store: StoreKind, key: &str, value: Value) -> Result<(), StoreError>;
}
