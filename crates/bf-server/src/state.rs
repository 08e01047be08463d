//! Application state.

use std::sync::Arc;

use bf_site::Site;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Document builder over the stores.
    pub(crate) site: Arc<Site>,
    /// Application version, mixed into `ETag`s.
    pub(crate) version: String,
}
