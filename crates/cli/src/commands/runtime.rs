use crate::commands::common::CommandContext;
use anyhow::Result;
use gql_typegen_plugin::runtime_module;
use std::path::PathBuf;

/// Print the module a bundler serves for the configured `moduleId`.
pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    let ctx = CommandContext::load(config_path)?;
    print!("{}", runtime_module(&ctx.config.url, &ctx.config.headers));
    Ok(())
}
