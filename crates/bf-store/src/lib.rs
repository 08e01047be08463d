//! Store abstraction for the Blockfront normalization layer.
//!
//! Blockfront never owns content. It reads pages, field values, assets,
//! menus and settings from collaborators behind the traits in this crate:
//!
//! - [`ContentStore`]: pages, flattened field values, navigation and mega menus
//! - [`AssetSource`]: the system of record for media
//! - [`ConfigStore`]: the two setting stores ([`StoreKind::Primary`] and
//!   [`StoreKind::Secondary`]) reconciled by `bf-settings`
//!
//! All traits are synchronous and `Send + Sync` so implementations can be
//! shared across request handlers as `Arc<dyn Trait>`.
//!
//! # Example
//!
//! ```ignore
//! use bf_store::{ContentStore, MockStore};
//!
//! let store = MockStore::new().with_page("42", "Home", "<!-- wp:paragraph --><p>Hi</p><!-- /wp:paragraph -->");
//! let page = store.page("42")?.unwrap();
//! assert_eq!(page.title, "Home");
//! ```

mod error;
#[cfg(feature = "mock")]
mod mock;
mod records;
mod store;

pub use error::{StoreError, StoreErrorKind};
#[cfg(feature = "mock")]
pub use mock::MockStore;
pub use records::{AssetRecord, FieldValues, MenuRecord, PageRecord, StoreKind};
pub use store::{AssetSource, ConfigStore, ContentStore};
