//! Store-backed slot resolution.

use std::collections::BTreeMap;
use std::sync::Arc;

use bf_fields::AssetResolver;
use bf_store::{ConfigStore, ContentStore, StoreError, StoreKind};
use serde_json::Value;

use crate::reconcile::reconcile;
use crate::slot::{ConfigSlot, SlotDefinition, SlotKind, SlotValidity};

/// Resolves setting slots against the config, content and asset stores.
///
/// Read failures propagate so callers can report the upstream as
/// unavailable. Write-back failures are logged and do not affect the
/// returned value.
#[derive(Clone)]
pub struct ConfigResolver {
    config: Arc<dyn ConfigStore>,
    content: Arc<dyn ContentStore>,
    assets: AssetResolver,
}

impl ConfigResolver {
    /// Create a resolver.
    ///
    /// `assets` is used both to validate asset ids and to render asset slots.
    #[must_use]
    pub fn new(
        config: Arc<dyn ConfigStore>,
        content: Arc<dyn ContentStore>,
        assets: AssetResolver,
    ) -> Self {
        Self {
            config,
            content,
            assets,
        }
    }

    /// Resolve one slot, writing back to whichever store is missing or stale.
    pub fn resolve(&self, definition: &SlotDefinition) -> Result<ConfigSlot, StoreError> {
        let primary = self
            .config
            .get(StoreKind::Primary, &definition.primary_key)?;
        let secondary = self
            .config
            .get(StoreKind::Secondary, &definition.secondary_key)?;

        let validity = SlotValidity {
            primary_valid: self.is_valid(definition.kind, primary.as_ref())?,
            secondary_valid: self.is_valid(definition.kind, secondary.as_ref())?,
        };
        let fallback = if validity.any() {
            None
        } else {
            self.heuristic(definition)?
        };

        let slot = ConfigSlot {
            key: definition.name.clone(),
            primary_value: primary,
            secondary_value: secondary,
            resolved: None,
        };
        let reconciliation = reconcile(slot, validity, fallback);

        for write in &reconciliation.writes {
            let key = match write.store {
                StoreKind::Primary => &definition.primary_key,
                StoreKind::Secondary => &definition.secondary_key,
            };
            match self.config.set(write.store, key, write.value.clone()) {
                Ok(()) => tracing::info!(
                    slot = %definition.name,
                    store = %write.store,
                    key = %key,
                    value = %write.value,
                    "Reconciled setting"
                ),
                Err(e) => tracing::warn!(
                    slot = %definition.name,
                    store = %write.store,
                    key = %key,
                    error = %e,
                    "Failed to write back setting"
                ),
            }
        }

        Ok(reconciliation.slot)
    }

    /// Resolve every slot and render the settings document.
    ///
    /// Asset slots render as asset descriptors, other kinds as their value.
    /// Unresolved slots are `null`.
    pub fn resolve_all(
        &self,
        definitions: &[SlotDefinition],
    ) -> Result<BTreeMap<String, Value>, StoreError> {
        let mut settings = BTreeMap::new();
        for definition in definitions {
            let slot = self.resolve(definition)?;
            settings.insert(definition.name.clone(), self.render(definition, &slot));
        }
        Ok(settings)
    }

    fn render(&self, definition: &SlotDefinition, slot: &ConfigSlot) -> Value {
        let Some(value) = &slot.resolved else {
            return Value::Null;
        };
        match definition.kind {
            SlotKind::Asset => self
                .assets
                .resolve(value)
                .and_then(|asset| serde_json::to_value(asset).ok())
                .unwrap_or(Value::Null),
            SlotKind::Menu | SlotKind::Value => value.clone(),
        }
    }

    fn is_valid(&self, kind: SlotKind, value: Option<&Value>) -> Result<bool, StoreError> {
        let Some(value) = value else {
            return Ok(false);
        };
        match kind {
            SlotKind::Asset => match slot_id(value) {
                Some(id) => Ok(self.assets.source().asset(id)?.is_some()),
                None => Ok(false),
            },
            SlotKind::Menu => match slot_id(value) {
                Some(id) => Ok(self.content.menus()?.iter().any(|menu| menu.id == id)),
                None => Ok(false),
            },
            SlotKind::Value => Ok(!is_empty(value)),
        }
    }

    /// Best-effort recovery by naming convention; newest matching id wins.
    fn heuristic(&self, definition: &SlotDefinition) -> Result<Option<Value>, StoreError> {
        let Some(hint) = definition.match_hint.as_deref().map(str::to_lowercase) else {
            return Ok(None);
        };
        if hint.is_empty() {
            return Ok(None);
        }

        let found = match definition.kind {
            SlotKind::Asset => self
                .assets
                .source()
                .assets()?
                .into_iter()
                .filter(|asset| {
                    asset.title.to_lowercase().contains(&hint)
                        || asset.filename.to_lowercase().contains(&hint)
                })
                .map(|asset| asset.id)
                .max(),
            SlotKind::Menu => self
                .content
                .menus()?
                .into_iter()
                .filter(|menu| menu.name.to_lowercase().contains(&hint))
                .map(|menu| menu.id)
                .max(),
            SlotKind::Value => None,
        };

        if let Some(id) = found {
            tracing::info!(slot = %definition.name, id, hint = %hint, "Recovered setting by name");
        }
        Ok(found.map(Value::from))
    }
}

fn slot_id(value: &Value) -> Option<u64> {
    let id = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (id > 0).then_some(id)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use bf_store::{AssetRecord, MockStore};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn logo(id: u64, title: &str) -> AssetRecord {
        AssetRecord {
            id,
            url: format!("/uploads/{id}.png"),
            title: title.to_owned(),
            filename: format!("{id}.png"),
            ..AssetRecord::default()
        }
    }

    fn resolver(store: &Arc<MockStore>) -> ConfigResolver {
        let assets =
            AssetResolver::new(Arc::clone(store) as _).with_base_url("https://cdn.example.com");
        ConfigResolver::new(Arc::clone(store) as _, Arc::clone(store) as _, assets)
    }

    fn logo_slot() -> SlotDefinition {
        SlotDefinition::default_logo()
    }

    #[test]
    fn test_primary_only_converges() {
        let store = Arc::new(
            MockStore::new()
                .with_asset_record(logo(7, "Logo"))
                .with_option(StoreKind::Primary, "site_logo", json!(7)),
        );

        let slot = resolver(&store).resolve(&logo_slot()).unwrap();

        assert_eq!(slot.resolved, Some(json!(7)));
        assert_eq!(
            store.get(StoreKind::Secondary, "global_site_logo").unwrap(),
            Some(json!(7))
        );
    }

    #[test]
    fn test_secondary_only_converges() {
        let store = Arc::new(
            MockStore::new()
                .with_asset_record(logo(9, "Logo"))
                .with_option(StoreKind::Secondary, "global_site_logo", json!("9")),
        );

        let slot = resolver(&store).resolve(&logo_slot()).unwrap();

        assert_eq!(slot.resolved, Some(json!("9")));
        assert_eq!(
            store.get(StoreKind::Primary, "site_logo").unwrap(),
            Some(json!("9"))
        );
    }

    #[test]
    fn test_nothing_stored_writes_nothing() {
        let store = Arc::new(MockStore::new().with_asset_record(logo(3, "Team photo")));

        let slot = resolver(&store).resolve(&logo_slot()).unwrap();

        assert_eq!(slot.resolved, None);
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_second_resolution_performs_no_writes() {
        let store = Arc::new(
            MockStore::new()
                .with_asset_record(logo(9, "Logo"))
                .with_option(StoreKind::Secondary, "global_site_logo", json!(9)),
        );
        let resolver = resolver(&store);

        resolver.resolve(&logo_slot()).unwrap();
        let writes_after_first = store.writes().len();
        let second = resolver.resolve(&logo_slot()).unwrap();

        assert_eq!(writes_after_first, 1);
        assert_eq!(store.writes().len(), writes_after_first);
        assert_eq!(second.resolved, Some(json!(9)));
    }

    #[test]
    fn test_stale_primary_counts_as_absent() {
        let store = Arc::new(
            MockStore::new()
                .with_asset_record(logo(9, "Logo"))
                .with_option(StoreKind::Primary, "site_logo", json!(404))
                .with_option(StoreKind::Secondary, "global_site_logo", json!(9)),
        );

        let slot = resolver(&store).resolve(&logo_slot()).unwrap();

        assert_eq!(slot.resolved, Some(json!(9)));
        assert_eq!(
            store.get(StoreKind::Primary, "site_logo").unwrap(),
            Some(json!(9))
        );
    }

    #[test]
    fn test_heuristic_picks_newest_match_and_writes_both() {
        let store = Arc::new(
            MockStore::new()
                .with_asset_record(logo(3, "Old Logo"))
                .with_asset_record(logo(11, "Site logo 2024"))
                .with_asset_record(logo(20, "Team photo")),
        );

        let slot = resolver(&store).resolve(&logo_slot()).unwrap();

        assert_eq!(slot.resolved, Some(json!(11)));
        assert_eq!(
            store.writes(),
            vec![
                (StoreKind::Primary, "site_logo".to_owned(), json!(11)),
                (StoreKind::Secondary, "global_site_logo".to_owned(), json!(11)),
            ]
        );
    }

    #[test]
    fn test_menu_slot_validity() {
        let store = Arc::new(
            MockStore::new()
                .with_menu(4, "Footer")
                .with_option(StoreKind::Primary, "nav_footer", json!(5))
                .with_option(StoreKind::Secondary, "global_nav_footer", json!(4)),
        );
        let definition =
            SlotDefinition::new("footer", SlotKind::Menu, "nav_footer", "global_nav_footer");

        let slot = resolver(&store).resolve(&definition).unwrap();

        assert_eq!(slot.resolved, Some(json!(4)));
    }

    #[test]
    fn test_value_slot_rejects_empty() {
        let store = Arc::new(
            MockStore::new()
                .with_option(StoreKind::Primary, "tagline", json!(""))
                .with_option(StoreKind::Secondary, "global_tagline", json!("Built to last")),
        );
        let definition =
            SlotDefinition::new("tagline", SlotKind::Value, "tagline", "global_tagline");

        let slot = resolver(&store).resolve(&definition).unwrap();

        assert_eq!(slot.resolved, Some(json!("Built to last")));
    }

    #[test]
    fn test_resolve_all_renders_assets() {
        let store = Arc::new(
            MockStore::new()
                .with_asset_record(logo(7, "Logo"))
                .with_option(StoreKind::Primary, "site_logo", json!(7)),
        );
        let definitions = vec![
            logo_slot(),
            SlotDefinition::new("tagline", SlotKind::Value, "tagline", "global_tagline"),
        ];

        let settings = resolver(&store).resolve_all(&definitions).unwrap();

        assert_eq!(settings["logo"]["url"], "https://cdn.example.com/uploads/7.png");
        assert!(settings["tagline"].is_null());
    }

    #[test]
    fn test_read_failure_propagates() {
        let store = Arc::new(MockStore::new());
        store.set_unavailable(true);

        let err = resolver(&store).resolve(&logo_slot()).unwrap_err();

        assert!(err.is_unavailable());
    }
}
