//! Block normalization with stored field values.
//!
//! Blocks that carry a string `id` attribute may keep the bulk of their
//! fields in the content store under that id. The stored values are merged
//! underneath the inline attributes before normalization, so an inline
//! value always wins over a stored one.

use bf_blocks::{BlockNode, BlockNormalizer};
use bf_fields::{AttributeTree, FieldNormalizer};
use bf_store::{ContentStore, FieldValues};
use serde_json::Value;

/// Attribute naming the store owner of a block's fields.
const BLOCK_ID_ATTR: &str = "id";

pub(crate) struct StoredFieldNormalizer<'a> {
    fields: &'a FieldNormalizer,
    content: &'a dyn ContentStore,
}

impl<'a> StoredFieldNormalizer<'a> {
    pub(crate) fn new(fields: &'a FieldNormalizer, content: &'a dyn ContentStore) -> Self {
        Self { fields, content }
    }

    fn stored_values(&self, name: &str, attrs: &FieldValues) -> Option<FieldValues> {
        let owner = match attrs.get(BLOCK_ID_ATTR) {
            Some(Value::String(owner)) if !owner.trim().is_empty() => owner,
            _ => return None,
        };
        match self.content.field_values(owner) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(
                    block = %name,
                    owner = %owner,
                    error = %e,
                    "Failed to load block fields"
                );
                None
            }
        }
    }
}

impl BlockNormalizer for StoredFieldNormalizer<'_> {
    fn normalize(
        &self,
        name: &str,
        attrs: &FieldValues,
        _children: &[BlockNode],
    ) -> AttributeTree {
        match self.stored_values(name, attrs) {
            Some(stored) => self.fields.normalize_block(name, &merge(stored, attrs)),
            None => self.fields.normalize_block(name, attrs),
        }
    }
}

/// Overlay `inline` on top of `stored`.
///
/// An inline list or object replaces the whole stored field, including its
/// flattened rows (`<key>_<index>_...`) and its `_<key>` type hint.
fn merge(mut stored: FieldValues, inline: &FieldValues) -> FieldValues {
    for (key, value) in inline {
        if matches!(value, Value::Array(_) | Value::Object(_)) {
            stored.retain(|stored_key, _| !belongs_to(stored_key, key));
        }
        stored.insert(key.clone(), value.clone());
    }
    stored
}

/// True when `stored_key` is a flattened row or type hint of field `key`.
fn belongs_to(stored_key: &str, key: &str) -> bool {
    if stored_key.strip_prefix('_') == Some(key) {
        return true;
    }
    let Some(rest) = stored_key
        .strip_prefix(key)
        .and_then(|rest| rest.strip_prefix('_'))
    else {
        return false;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && rest[digits..].starts_with('_')
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bf_fields::AssetResolver;
    use bf_store::MockStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn attrs(value: Value) -> FieldValues {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn normalizer(store: &Arc<MockStore>) -> FieldNormalizer {
        FieldNormalizer::new(AssetResolver::new(Arc::clone(store) as _))
    }

    #[test]
    fn test_inline_attributes_win_over_stored() {
        let store = Arc::new(MockStore::new().with_fields(
            "block_1",
            json!({"title": "Stored", "subtitle": "Kept"}),
        ));
        let fields = normalizer(&store);
        let merged = StoredFieldNormalizer::new(&fields, store.as_ref());

        let tree = merged.normalize(
            "acme/hero",
            &attrs(json!({"id": "block_1", "title": "Inline"})),
            &[],
        );

        assert_eq!(
            tree.to_json(),
            json!({"id": "block_1", "title": "Inline", "subtitle": "Kept"})
        );
    }

    #[test]
    fn test_stored_repeater_is_expanded() {
        let store = Arc::new(MockStore::new().with_fields(
            "block_2",
            json!({"items": 1, "items_0_label": "One", "_items": "field_1"}),
        ));
        let fields = normalizer(&store);
        let merged = StoredFieldNormalizer::new(&fields, store.as_ref());

        let tree = merged.normalize("acme/list", &attrs(json!({"id": "block_2"})), &[]);

        assert_eq!(
            tree.to_json(),
            json!({"id": "block_2", "items": [{"label": "One"}]})
        );
    }

    #[test]
    fn test_inline_list_replaces_stored_rows() {
        let store = Arc::new(MockStore::new().with_fields(
            "block_3",
            json!({
                "items": 1,
                "_items": "field_1",
                "items_0_title": "Stored",
                "items_extra": "Kept"
            }),
        ));
        let fields = normalizer(&store);
        let merged = StoredFieldNormalizer::new(&fields, store.as_ref());

        let tree = merged.normalize(
            "acme/list",
            &attrs(json!({"id": "block_3", "items": [{"title": "Inline"}]})),
            &[],
        );

        assert_eq!(
            tree.to_json(),
            json!({"id": "block_3", "items": [{"title": "Inline"}], "items_extra": "Kept"})
        );
    }

    #[test]
    fn test_inline_count_keeps_stored_rows() {
        let store = Arc::new(MockStore::new().with_fields(
            "block_4",
            json!({"items": 2, "items_0_title": "A", "items_1_title": "B"}),
        ));
        let fields = normalizer(&store);
        let merged = StoredFieldNormalizer::new(&fields, store.as_ref());

        let tree = merged.normalize(
            "acme/list",
            &attrs(json!({"id": "block_4", "items": 1})),
            &[],
        );

        assert_eq!(
            tree.to_json(),
            json!({"id": "block_4", "items": [{"title": "A"}]})
        );
    }

    #[test]
    fn test_numeric_id_is_not_a_store_owner() {
        let store = Arc::new(MockStore::new().with_fields("7", json!({"title": "Stored"})));
        let fields = normalizer(&store);
        let merged = StoredFieldNormalizer::new(&fields, store.as_ref());

        let tree = merged.normalize("acme/hero", &attrs(json!({"id": 7})), &[]);

        assert_eq!(tree.to_json(), json!({"id": 7}));
    }

    #[test]
    fn test_store_failure_keeps_inline_attributes() {
        let store = Arc::new(MockStore::new());
        store.set_unavailable(true);
        let fields = normalizer(&store);
        let merged = StoredFieldNormalizer::new(&fields, store.as_ref());

        let tree = merged.normalize(
            "acme/hero",
            &attrs(json!({"id": "block_1", "title": "Inline"})),
            &[],
        );

        assert_eq!(tree.to_json(), json!({"id": "block_1", "title": "Inline"}));
    }
}
