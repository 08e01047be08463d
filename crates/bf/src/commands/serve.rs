//! `bf serve` command implementation.

use std::path::PathBuf;

use bf_config::{CliSettings, Config};
use bf_server::{run_server, server_config_from_config};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover blockfront.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory of the JSON store (overrides config).
    #[arg(short, long, env = "BLOCKFRONT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Base URL for relative media URLs (overrides config).
    #[arg(long, env = "BLOCKFRONT_MEDIA_BASE_URL")]
    media_base_url: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            data_dir: self.data_dir,
            media_base_url: self.media_base_url,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Data directory: {}",
            config.store_resolved.data_dir.display()
        ));
        match &config.media.base_url {
            Some(base_url) => output.info(&format!("Media base URL: {base_url}")),
            None => output.info("Media base URL: not set (relative media URLs resolve to null)"),
        }
        output.info(&format!(
            "Block schemas: {}, setting slots: {}",
            config.blocks.len(),
            config.slot_definitions().len()
        ));

        let server_config = server_config_from_config(&config, version.to_owned(), self.verbose);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
