//! HTTP server for the Blockfront normalization layer.
//!
//! Serves the JSON documents built by [`bf_site::Site`]:
//!
//! - `GET /content/{id}`: page fields and block tree, with `ETag` support
//! - `GET /settings`: reconciled site settings
//! - `GET /navigation/{location}`: menu entries annotated with mega menus
//!
//! # Quick Start
//!
//! ```ignore
//! use bf_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         port: 8080,
//!         media_base_url: Some("https://cdn.example.com".to_owned()),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Frontend ──HTTP──► axum router (bf-server)
//!                        │
//!                        └─► Site ──► bf-blocks / bf-fields / bf-settings / bf-navigation
//!                              │
//!                              └─► JsonStore (content.json, options.*.json)
//! ```

mod app;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use bf_fields::BlockSchemas;
use bf_settings::SlotDefinition;
use bf_site::{Site, SiteConfig};
use bf_store_json::JsonStore;
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Data directory of the JSON store.
    pub data_dir: PathBuf,
    /// Base URL for relative media URLs.
    pub media_base_url: Option<String>,
    /// Per-block field schemas.
    pub schemas: BlockSchemas,
    /// Setting slots served by `/settings`.
    pub slots: Vec<SlotDefinition>,
    /// Enable verbose output.
    pub verbose: bool,
    /// Application version (mixed into `ETag`s).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
            data_dir: PathBuf::from("data"),
            media_base_url: None,
            schemas: BlockSchemas::default(),
            slots: vec![SlotDefinition::default_logo()],
            verbose: false,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener cannot bind.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(JsonStore::new(config.data_dir.clone()));
    if !store.data_dir().join("content.json").exists() {
        tracing::warn!(
            data_dir = %store.data_dir().display(),
            "content.json not found, requests will report the store as unavailable"
        );
    }

    let site_config = SiteConfig {
        media_base_url: config.media_base_url.clone(),
        schemas: config.schemas.clone(),
        slots: config.slots.clone(),
    };
    let site = Site::new(
        Arc::clone(&store) as _,
        Arc::clone(&store) as _,
        store,
        site_config,
    );
    tracing::debug!(
        blocks = config.schemas.len(),
        slots = config.slots.len(),
        "Site configured"
    );

    let state = Arc::new(AppState {
        site: Arc::new(site),
        version: config.version.clone(),
    });
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from a loaded `blockfront.toml`.
#[must_use]
pub fn server_config_from_config(
    config: &bf_config::Config,
    version: String,
    verbose: bool,
) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        data_dir: config.store_resolved.data_dir.clone(),
        media_base_url: config.media.base_url.clone(),
        schemas: config.block_schemas(),
        slots: config.slot_definitions(),
        verbose,
        version,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_server_config_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blockfront.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9000

[media]
base_url = "https://cdn.example.com"

[blocks."acme/hero".fields]
title = "text"
"#,
        )
        .unwrap();
        let config = bf_config::Config::load(Some(&path), None).unwrap();

        let server = server_config_from_config(&config, "1.2.3".to_owned(), true);

        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 9000);
        assert_eq!(server.data_dir, dir.path().join("data"));
        assert_eq!(server.media_base_url.as_deref(), Some("https://cdn.example.com"));
        assert!(server.schemas.get("acme/hero").is_some());
        assert_eq!(server.slots, vec![SlotDefinition::default_logo()]);
        assert_eq!(server.version, "1.2.3");
        assert!(server.verbose);
    }
}
