//! Settings API endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde_json::Value;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /settings.
///
/// Each configured slot is resolved and reconciled on every request.
pub(crate) async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Value>>, ServerError> {
    Ok(Json(state.site.settings()?))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use bf_store::{ConfigStore, MockStore, StoreKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::handlers::testing::{get, router};

    #[tokio::test]
    async fn test_get_settings_restores_primary() {
        let store = Arc::new(
            MockStore::new()
                .with_asset(7, "/uploads/logo.png")
                .with_option(StoreKind::Secondary, "global_site_logo", json!(7)),
        );

        let (status, _, body) = get(router(&store), "/settings").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["logo"],
            json!({
                "id": 7,
                "url": "https://cdn.example.com/uploads/logo.png",
                "width": null,
                "height": null,
                "altText": ""
            })
        );
        assert_eq!(
            store.get(StoreKind::Primary, "site_logo").unwrap(),
            Some(json!(7))
        );
    }

    #[tokio::test]
    async fn test_unresolved_slot_is_null() {
        let store = Arc::new(MockStore::new());

        let (status, _, body) = get(router(&store), "/settings").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"logo": null}));
        assert!(store.writes().is_empty());
    }
}
