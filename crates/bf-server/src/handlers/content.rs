//! Content API endpoint.
//!
//! Returns the page document: page fields plus the normalized block tree.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use md5::{Digest, Md5};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /content/{id}.
pub(crate) async fn get_content(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    let document = state.site.page(&id)?;
    let body =
        serde_json::to_string(&document).map_err(|e| ServerError::Internal(e.to_string()))?;

    let etag = compute_etag(&state.version, &body);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_owned()),
            (header::ETAG, etag),
        ],
        body,
    )
        .into_response())
}

/// Compute `ETag` from version and body.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, body: &str) -> String {
    let hash = Md5::digest(format!("{version}:{body}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
