//! JSON file store backend for Blockfront.
//!
//! Implements every `bf-store` trait over a data directory:
//!
//! ```text
//! data/
//! ├── content.json            # pages, fields, assets, menus, navigation, megaMenus
//! ├── options.primary.json    # flat {key: value} map
//! └── options.secondary.json  # flat {key: value} map
//! ```
//!
//! `content.json` is re-read on every call so edits show up without a
//! restart. A missing `content.json` reports the store as unavailable; a
//! missing options file is an empty store. Option writes replace the file
//! atomically (temp file + rename) and are serialized by a mutex.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use bf_store::ContentStore;
//! use bf_store_json::JsonStore;
//!
//! let store = JsonStore::new(PathBuf::from("data"));
//! let page = store.page("home")?;
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bf_navigation::{MegaMenuDefinition, NavigationEntry};
use bf_store::{
    AssetRecord, AssetSource, ConfigStore, ContentStore, FieldValues, MenuRecord, PageRecord,
    StoreError, StoreErrorKind, StoreKind,
};
use serde::Deserialize;
use serde_json::{Map, Value};

const BACKEND: &str = "Json";

/// Content document filename.
const CONTENT_FILENAME: &str = "content.json";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ContentFile {
    pages: BTreeMap<String, PageRecord>,
    fields: BTreeMap<String, FieldValues>,
    assets: BTreeMap<String, AssetRecord>,
    menus: Vec<MenuRecord>,
    navigation: BTreeMap<String, Vec<NavigationEntry>>,
    mega_menus: Vec<MegaMenuDefinition>,
}

/// Store backed by JSON files in a data directory.
#[derive(Debug)]
pub struct JsonStore {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Create a store over `data_dir`. Nothing is read until first use.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            write_lock: Mutex::new(()),
        }
    }

    /// Data directory this store reads from.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn content_path(&self) -> PathBuf {
        self.data_dir.join(CONTENT_FILENAME)
    }

    fn options_path(&self, store: StoreKind) -> PathBuf {
        self.data_dir.join(format!("options.{store}.json"))
    }

    fn load_content(&self) -> Result<ContentFile, StoreError> {
        let path = self.content_path();
        let text = std::fs::read_to_string(&path).map_err(|e| {
            let err = if e.kind() == ErrorKind::NotFound {
                StoreError::unavailable().with_source(e)
            } else {
                StoreError::io(e)
            };
            err.with_key(path.display().to_string())
                .with_backend(BACKEND)
        })?;
        serde_json::from_str(&text).map_err(|e| {
            StoreError::new(StoreErrorKind::InvalidData)
                .with_key(path.display().to_string())
                .with_backend(BACKEND)
                .with_source(e)
        })
    }

    fn load_options(&self, store: StoreKind) -> Result<Map<String, Value>, StoreError> {
        let path = self.options_path(store);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(StoreError::io(e)
                    .with_key(path.display().to_string())
                    .with_backend(BACKEND));
            }
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&text).map_err(|e| {
            StoreError::new(StoreErrorKind::InvalidData)
                .with_key(path.display().to_string())
                .with_backend(BACKEND)
                .with_source(e)
        })
    }

    fn save_options(
        &self,
        store: StoreKind,
        options: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let path = self.options_path(store);
        let tmp = path.with_extension("json.tmp");
        let io_err = |e: std::io::Error| {
            StoreError::io(e)
                .with_key(path.display().to_string())
                .with_backend(BACKEND)
        };

        let json = serde_json::to_vec_pretty(options).map_err(|e| {
            StoreError::new(StoreErrorKind::Other)
                .with_backend(BACKEND)
                .with_source(e)
        })?;
        std::fs::create_dir_all(&self.data_dir).map_err(io_err)?;
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)?;
        Ok(())
    }
}

impl ContentStore for JsonStore {
    fn page(&self, id: &str) -> Result<Option<PageRecord>, StoreError> {
        let content = self.load_content()?;
        Ok(content.pages.get(id).map(|page| PageRecord {
            id: id.to_owned(),
            ..page.clone()
        }))
    }

    fn field_values(&self, owner_id: &str) -> Result<Option<FieldValues>, StoreError> {
        let mut content = self.load_content()?;
        Ok(content.fields.remove(owner_id))
    }

    fn navigation_entries(
        &self,
        location: &str,
    ) -> Result<Option<Vec<NavigationEntry>>, StoreError> {
        let mut content = self.load_content()?;
        Ok(content.navigation.remove(location))
    }

    fn mega_menus(&self) -> Result<Vec<MegaMenuDefinition>, StoreError> {
        Ok(self.load_content()?.mega_menus)
    }

    fn menus(&self) -> Result<Vec<MenuRecord>, StoreError> {
        Ok(self.load_content()?.menus)
    }
}

impl AssetSource for JsonStore {
    fn asset(&self, id: u64) -> Result<Option<AssetRecord>, StoreError> {
        Ok(self.assets()?.into_iter().find(|asset| asset.id == id))
    }

    fn assets(&self) -> Result<Vec<AssetRecord>, StoreError> {
        let content = self.load_content()?;
        let assets = content
            .assets
            .into_iter()
            .filter_map(|(key, record)| match key.parse::<u64>() {
                Ok(id) => Some(AssetRecord { id, ..record }),
                Err(_) => {
                    tracing::warn!(key = %key, "Skipping asset with non-numeric id");
                    None
                }
            })
            .collect();
        Ok(assets)
    }
}

impl ConfigStore for JsonStore {
    fn get(&self, store: StoreKind, key: &str) -> Result<Option<Value>, StoreError> {
        let mut options = self.load_options(store)?;
        Ok(options.remove(key))
    }

    fn set(&self, store: StoreKind, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| {
            StoreError::new(StoreErrorKind::Other)
                .with_key(key)
                .with_backend(BACKEND)
        })?;
        let mut options = self.load_options(store)?;
        options.insert(key.to_owned(), value);
        self.save_options(store, &options)?;
        tracing::debug!(store = %store, key = %key, "Wrote option");
        Ok(())
    }
}
