//! Document assembly for Blockfront.
//!
//! [`Site`] wires the store collaborators to the parser, the field
//! normalizer, the settings resolver and the mega-menu matcher, and produces
//! the three documents the frontend reads:
//!
//! - [`PageDocument`]: page fields plus the normalized block tree
//! - settings: one value per configured slot
//! - [`NavigationDocument`]: a menu location annotated with mega menus
//!
//! Nothing is cached. Every call reads through to the stores.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bf_site::{Site, SiteConfig};
//! use bf_store_json::JsonStore;
//!
//! let store = Arc::new(JsonStore::new("data".into()));
//! let site = Site::new(store.clone(), store.clone(), store, SiteConfig::default());
//! let page = site.page("home")?;
//! ```

mod document;
mod error;
mod merge;
mod site;

pub use document::{NavigationDocument, PageDocument};
pub use error::SiteError;
pub use site::{Site, SiteConfig};
