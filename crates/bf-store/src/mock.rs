//! Mock store implementation for testing.
//!
//! Provides [`MockStore`], an in-memory implementation of every store trait.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use bf_navigation::{MegaMenuDefinition, NavigationEntry};
use serde_json::Value;

use crate::error::StoreError;
use crate::records::{AssetRecord, FieldValues, MenuRecord, PageRecord, StoreKind};
use crate::store::{AssetSource, ConfigStore, ContentStore};

const BACKEND: &str = "Mock";

/// Mock store for testing.
///
/// Holds pages, field values, assets, menus and both setting stores in
/// memory. Use the builder methods to configure test data. Every successful
/// `set` is recorded and can be inspected with [`MockStore::writes`].
///
/// # Example
///
/// ```ignore
/// use bf_store::{MockStore, StoreKind, ConfigStore};
///
/// let store = MockStore::new()
///     .with_asset(7, "https://cdn.example.com/logo.png")
///     .with_option(StoreKind::Secondary, "site_logo", 7.into());
///
/// assert!(store.get(StoreKind::Primary, "site_logo").unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    pages: RwLock<HashMap<String, PageRecord>>,
    fields: RwLock<HashMap<String, FieldValues>>,
    assets: RwLock<Vec<AssetRecord>>,
    menus: RwLock<Vec<MenuRecord>>,
    navigation: RwLock<HashMap<String, Vec<NavigationEntry>>>,
    mega_menus: RwLock<Vec<MegaMenuDefinition>>,
    options: RwLock<HashMap<(StoreKind, String), Value>>,
    writes: RwLock<Vec<(StoreKind, String, Value)>>,
    unavailable: AtomicBool,
}

impl MockStore {
    /// Create a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(
        self,
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let id = id.into();
        self.pages.write().unwrap().insert(
            id.clone(),
            PageRecord {
                id,
                title: title.into(),
                content: content.into(),
            },
        );
        self
    }

    /// Add flattened field values for a page or block id.
    ///
    /// Non-object values are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_fields(self, owner_id: impl Into<String>, values: Value) -> Self {
        if let Value::Object(map) = values {
            self.fields.write().unwrap().insert(owner_id.into(), map);
        }
        self
    }

    /// Add an asset with just an id and URL.
    #[must_use]
    pub fn with_asset(self, id: u64, url: impl Into<String>) -> Self {
        self.with_asset_record(AssetRecord {
            id,
            url: url.into(),
            ..AssetRecord::default()
        })
    }

    /// Add a fully specified asset.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_asset_record(self, record: AssetRecord) -> Self {
        self.assets.write().unwrap().push(record);
        self
    }

    /// Add a navigation menu record.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_menu(self, id: u64, name: impl Into<String>) -> Self {
        self.menus.write().unwrap().push(MenuRecord {
            id,
            name: name.into(),
        });
        self
    }

    /// Assign navigation entries to a menu location.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_navigation(
        self,
        location: impl Into<String>,
        entries: Vec<NavigationEntry>,
    ) -> Self {
        self.navigation
            .write()
            .unwrap()
            .insert(location.into(), entries);
        self
    }

    /// Append a mega-menu definition.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_mega_menu(self, definition: MegaMenuDefinition) -> Self {
        self.mega_menus.write().unwrap().push(definition);
        self
    }

    /// Seed a setting without recording it as a write.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_option(self, store: StoreKind, key: impl Into<String>, value: Value) -> Self {
        self.options
            .write()
            .unwrap()
            .insert((store, key.into()), value);
        self
    }

    /// Make every operation fail with an unavailable error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delete an asset (simulates a media library deletion).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove_asset(&self, id: u64) {
        self.assets.write().unwrap().retain(|a| a.id != id);
    }

    /// Unset a setting (simulates an environment reset of one store).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn clear_option(&self, store: StoreKind, key: &str) {
        self.options
            .write()
            .unwrap()
            .remove(&(store, key.to_owned()));
    }

    /// All writes performed through [`ConfigStore::set`], in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn writes(&self) -> Vec<(StoreKind, String, Value)> {
        self.writes.read().unwrap().clone()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable().with_backend(BACKEND));
        }
        Ok(())
    }
}

impl ContentStore for MockStore {
    fn page(&self, id: &str) -> Result<Option<PageRecord>, StoreError> {
        self.check_available()?;
        Ok(self.pages.read().unwrap().get(id).cloned())
    }

    fn field_values(&self, owner_id: &str) -> Result<Option<FieldValues>, StoreError> {
        self.check_available()?;
        Ok(self.fields.read().unwrap().get(owner_id).cloned())
    }

    fn navigation_entries(
        &self,
        location: &str,
    ) -> Result<Option<Vec<NavigationEntry>>, StoreError> {
        self.check_available()?;
        Ok(self.navigation.read().unwrap().get(location).cloned())
    }

    fn mega_menus(&self) -> Result<Vec<MegaMenuDefinition>, StoreError> {
        self.check_available()?;
        Ok(self.mega_menus.read().unwrap().clone())
    }

    fn menus(&self) -> Result<Vec<MenuRecord>, StoreError> {
        self.check_available()?;
        Ok(self.menus.read().unwrap().clone())
    }
}

impl AssetSource for MockStore {
    fn asset(&self, id: u64) -> Result<Option<AssetRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .assets
            .read()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    fn assets(&self) -> Result<Vec<AssetRecord>, StoreError> {
        self.check_available()?;
        Ok(self.assets.read().unwrap().clone())
    }
}

impl ConfigStore for MockStore {
    fn get(&self, store: StoreKind, key: &str) -> Result<Option<Value>, StoreError> {
        self.check_available()?;
        Ok(self
            .options
            .read()
            .unwrap()
            .get(&(store, key.to_owned()))
            .cloned())
    }

    fn set(&self, store: StoreKind, key: &str, value: Value) -> Result<(), StoreError> {
        self.check_available()?;
        self.options
            .write()
            .unwrap()
            .insert((store, key.to_owned()), value.clone());
        self.writes
            .write()
            .unwrap()
            .push((store, key.to_owned(), value));
        Ok(())
    }
}
