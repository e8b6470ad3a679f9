use crate::commands::common::CommandContext;
use crate::watch::{FileWatcher, WatchSession};
use crate::OutputOptions;
use anyhow::{Context, Result};
use gql_typegen_plugin::GqlPlugin;
use std::path::PathBuf;

/// Run a development session until interrupted.
#[tracing::instrument(skip_all, fields(patterns = ?globs))]
pub async fn run(
    config_path: Option<PathBuf>,
    globs: Vec<String>,
    schema_file: Option<PathBuf>,
    output_opts: OutputOptions,
) -> Result<()> {
    let ctx = CommandContext::load(config_path)?;
    let mut config = ctx.config.clone();
    config.out_file = Some(ctx.require_out_file(None)?);
    config.automatically_generate_types = true;

    let fetcher = ctx.fetcher(schema_file);
    let mut plugin = GqlPlugin::with_fetcher(config, fetcher, false)?;
    plugin.build_start();

    let base_dir = std::env::current_dir().context("Failed to read the working directory")?;
    let session = WatchSession::new(plugin, globs, &base_dir)?;
    let mut watcher = FileWatcher::new(session)?;
    watcher.start()?;
    watcher.run(output_opts).await
}
