use bf_store::StoreError;

/// Error returned when a document cannot be built.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// The requested page or navigation location does not exist.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource kind (`"page"`, `"navigation"`).
        resource: &'static str,
        /// Requested identifier.
        id: String,
    },
    /// An upstream store cannot be reached.
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),
    /// Any other store failure.
    #[error("Store error: {0}")]
    Store(#[source] StoreError),
}

impl SiteError {
    pub(crate) fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }
}

impl From<StoreError> for SiteError {
    fn from(e: StoreError) -> Self {
        if e.is_unavailable() {
            Self::Unavailable(e.to_string())
        } else {
            Self::Store(e)
        }
    }
}
