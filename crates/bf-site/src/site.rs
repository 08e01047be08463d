//! The [`Site`] entry point.

use std::collections::BTreeMap;
use std::sync::Arc;

use bf_blocks::BlockParser;
use bf_fields::{AssetResolver, BlockSchemas, FieldNormalizer};
use bf_navigation::annotate;
use bf_settings::{ConfigResolver, SlotDefinition};
use bf_store::{AssetSource, ConfigStore, ContentStore};
use serde_json::Value;

use crate::document::{NavigationDocument, PageDocument};
use crate::error::SiteError;
use crate::merge::StoredFieldNormalizer;

/// Configuration for [`Site`].
#[derive(Clone, Debug, Default)]
pub struct SiteConfig {
    /// Base URL that relative media URLs are resolved against.
    ///
    /// If `None`, only already absolute URLs resolve.
    pub media_base_url: Option<String>,
    /// Per-block field schemas. Blocks without one are inferred.
    pub schemas: BlockSchemas,
    /// Setting slots exposed by [`Site::settings`].
    pub slots: Vec<SlotDefinition>,
}

/// Builds frontend documents from the store collaborators.
///
/// `Site` holds no mutable state and is shared across request handlers as
/// `Arc<Site>`.
pub struct Site {
    content: Arc<dyn ContentStore>,
    fields: FieldNormalizer,
    settings: ConfigResolver,
    slots: Vec<SlotDefinition>,
}

impl Site {
    /// Create a site over its three collaborators.
    #[must_use]
    pub fn new(
        content: Arc<dyn ContentStore>,
        assets: Arc<dyn AssetSource>,
        config_store: Arc<dyn ConfigStore>,
        config: SiteConfig,
    ) -> Self {
        let mut resolver = AssetResolver::new(assets);
        if let Some(base_url) = config.media_base_url {
            resolver = resolver.with_base_url(base_url);
        }
        let settings = ConfigResolver::new(config_store, Arc::clone(&content), resolver.clone());
        let fields = FieldNormalizer::new(resolver).with_schemas(config.schemas);

        Self {
            content,
            fields,
            settings,
            slots: config.slots,
        }
    }

    /// Configured setting slots.
    #[must_use]
    pub fn slots(&self) -> &[SlotDefinition] {
        &self.slots
    }

    /// Build the document for page `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] if the page does not exist and
    /// [`SiteError::Unavailable`] if the content store cannot be reached.
    pub fn page(&self, id: &str) -> Result<PageDocument, SiteError> {
        let page = self
            .content
            .page(id)?
            .ok_or_else(|| SiteError::not_found("page", id))?;
        let values = self.content.field_values(id)?.unwrap_or_default();

        let fields = self.fields.normalize_inferred(&values);
        let parser = BlockParser::new(StoredFieldNormalizer::new(
            &self.fields,
            self.content.as_ref(),
        ));
        let blocks = parser.parse(&page.content);
        tracing::debug!(page = %id, blocks = blocks.len(), "Built page document");

        Ok(PageDocument {
            id: id.to_owned(),
            title: page.title,
            fields,
            blocks,
        })
    }

    /// Resolve every configured slot into the settings document.
    ///
    /// Resolution may write reconciled values back to the config store.
    pub fn settings(&self) -> Result<BTreeMap<String, Value>, SiteError> {
        Ok(self.settings.resolve_all(&self.slots)?)
    }

    /// Build the document for navigation `location`.
    ///
    /// Top-level entries are annotated with the mega menu whose label matches.
    pub fn navigation(&self, location: &str) -> Result<NavigationDocument, SiteError> {
        let entries = self
            .content
            .navigation_entries(location)?
            .ok_or_else(|| SiteError::not_found("navigation", location))?;
        let definitions = self.content.mega_menus()?;

        Ok(NavigationDocument {
            location: location.to_owned(),
            items: annotate(&entries, &definitions),
        })
    }
}
