//! HTTP request handlers.

pub(crate) mod content;
pub(crate) mod navigation;
pub(crate) mod settings;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{HeaderMap, Request, StatusCode};
    use bf_settings::SlotDefinition;
    use bf_site::{Site, SiteConfig};
    use bf_store::MockStore;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::app::create_router;
    use crate::state::AppState;

    pub(crate) fn router(store: &Arc<MockStore>) -> Router {
        let config = SiteConfig {
            media_base_url: Some("https://cdn.example.com".to_owned()),
            slots: vec![SlotDefinition::default_logo()],
            ..SiteConfig::default()
        };
        let site = Site::new(
            Arc::clone(store) as _,
            Arc::clone(store) as _,
            Arc::clone(store) as _,
            config,
        );
        create_router(Arc::new(AppState {
            site: Arc::new(site),
            version: "1.0.0".to_owned(),
        }))
    }

    pub(crate) async fn send(
        router: Router,
        request: Request<Body>,
    ) -> (StatusCode, HeaderMap, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }

    pub(crate) async fn get(router: Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        send(router, request).await
    }
}
