//! `bf parse` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use bf_blocks::{BlockNode, BlockParser};
use bf_config::Config;
use bf_fields::{AssetResolver, BlockSchemas, FieldNormalizer};
use bf_store_json::JsonStore;
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the parse command.
#[derive(Args)]
pub(crate) struct ParseArgs {
    /// Markup file to parse.
    file: PathBuf,

    /// Path to configuration file (default: auto-discover blockfront.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ignore configured block schemas and infer every field.
    #[arg(long)]
    infer: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ParseArgs {
    /// Execute the parse command.
    ///
    /// Media ids are resolved against the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or the file cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let markup = std::fs::read_to_string(&self.file)?;

        let store = Arc::new(JsonStore::new(config.store_resolved.data_dir.clone()));
        let mut assets = AssetResolver::new(store);
        if let Some(base_url) = &config.media.base_url {
            assets = assets.with_base_url(base_url.clone());
        }
        let schemas = if self.infer {
            BlockSchemas::new()
        } else {
            config.block_schemas()
        };
        tracing::debug!(
            file = %self.file.display(),
            schemas = schemas.len(),
            infer = self.infer,
            "Parsing markup"
        );
        let normalizer = FieldNormalizer::new(assets).with_schemas(schemas);

        let nodes = parse_file(&markup, normalizer);
        output.data(&serde_json::to_string_pretty(&nodes)?)?;
        output.success(&format!(
            "Parsed {} top-level nodes from {}",
            nodes.len(),
            self.file.display()
        ));

        Ok(())
    }
}

fn parse_file(markup: &str, normalizer: FieldNormalizer) -> Vec<BlockNode> {
    BlockParser::new(normalizer).parse(markup)
}
