//! Store error type shared by all backends.
//!
//! Missing records are not errors: lookups return `Ok(None)` and callers
//! decide what absence means. A `StoreError` always means the collaborator
//! itself misbehaved.

/// What went wrong talking to a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Backend cannot be reached or is not set up.
    Unavailable,
    /// Backend did not answer in time.
    Timeout,
    /// Stored data could not be decoded.
    InvalidData,
    /// Any other backend failure.
    Other,
}

/// Collaborator failure with the key and backend it concerned.
#[derive(Debug)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    /// Page id, owner id or setting key the operation was about.
    pub key: Option<String>,
    /// Backend identifier (`"Json"`, `"Mock"`).
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            key: None,
            backend: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Backend could not be reached at all.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(StoreErrorKind::Unavailable)
    }

    /// True when the request should fail as "service unavailable" rather
    /// than as an internal error.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::Unavailable | StoreErrorKind::Timeout
        )
    }

    /// Wrap an I/O failure from a file-backed store.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::TimedOut => StoreErrorKind::Timeout,
            _ => StoreErrorKind::Other,
        };
        Self::new(kind).with_source(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // "[Backend] Kind: source (key: foo)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind = match self.kind {
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::Timeout => "Timeout",
            StoreErrorKind::InvalidData => "Invalid data",
            StoreErrorKind::Other => "Error",
        };
        write!(f, "{kind}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {key})")?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_unavailable_backend() {
        let err = StoreError::unavailable().with_backend("Json");

        assert!(err.is_unavailable());
        assert_eq!(err.to_string(), "[Json] Unavailable");
    }

    #[test]
    fn test_io_timeout_counts_as_unavailable() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = StoreError::io(io_err);

        assert_eq!(err.kind, StoreErrorKind::Timeout);
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_io_other_failure_is_not_unavailable() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = StoreError::io(io_err).with_key("settings.json");

        assert_eq!(err.kind, StoreErrorKind::Other);
        assert!(!err.is_unavailable());
        assert_eq!(err.to_string(), "Error: access denied (key: settings.json)");
    }

    #[test]
    fn test_display_with_all_context() {
        let err = StoreError::new(StoreErrorKind::InvalidData)
            .with_backend("Json")
            .with_key("42")
            .with_source(std::io::Error::other("expected object"));

        assert_eq!(
            err.to_string(),
            "[Json] Invalid data: expected object (key: 42)"
        );
    }

    #[test]
    fn test_store_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
    }
}
