//! Navigation API endpoint.
//!
//! Returns the entries of a menu location, each top-level entry annotated
//! with its mega menu.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use bf_navigation::AnnotatedEntry;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /navigation/{location}.
pub(crate) async fn get_navigation(
    Path(location): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AnnotatedEntry>>, ServerError> {
    Ok(Json(state.site.navigation(&location)?.items))
}
