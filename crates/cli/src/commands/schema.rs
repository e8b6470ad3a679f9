//! Schema-related CLI commands.

use crate::commands::common::CommandContext;
use crate::progress::maybe_spinner;
use crate::OutputOptions;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use gql_typegen_config::{PluginConfig, ValueSource};
use gql_typegen_introspect::download_sdl;
use std::io::Write;
use std::path::PathBuf;

/// Schema subcommands.
#[derive(Subcommand)]
pub enum SchemaCommands {
    /// Introspect the configured endpoint and print the schema as SDL
    Download {
        /// Output file path (writes to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// HTTP headers to include in the request (can be specified multiple times)
        /// Format: "Header-Name: Header-Value"
        /// These are merged with headers from the config file (CLI takes precedence)
        #[arg(long = "header", short = 'H', value_name = "HEADER")]
        headers: Vec<String>,

        /// Request timeout in seconds (overrides config file)
        #[arg(long)]
        timeout: Option<u64>,
    },
}

/// Run a schema subcommand.
pub async fn run(
    config_path: Option<PathBuf>,
    command: SchemaCommands,
    output_opts: OutputOptions,
) -> Result<()> {
    match command {
        SchemaCommands::Download {
            output,
            headers,
            timeout,
        } => run_download(config_path, output, &headers, timeout, output_opts).await,
    }
}

/// Parses a header string in "Name: Value" format.
fn parse_header(header: &str) -> Result<(String, String)> {
    let Some((name, value)) = header.split_once(':') else {
        anyhow::bail!("Invalid header format: '{header}'. Expected 'Header-Name: Header-Value'");
    };
    let name = name.trim().to_string();
    if name.is_empty() {
        anyhow::bail!("Header name cannot be empty");
    }
    Ok((name, value.trim().to_string()))
}

/// Layer command line headers and timeout over the config.
///
/// A header given on the command line replaces any configured header of the
/// same name, compared case-insensitively, including the polling headers of
/// `watchSchema`.
fn apply_overrides(
    config: &mut PluginConfig,
    cli_headers: &[String],
    cli_timeout: Option<u64>,
) -> Result<()> {
    for header in cli_headers {
        let (name, value) = parse_header(header).context("Failed to parse headers")?;

        config
            .headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        if let Some(watch) = &mut config.watch_schema {
            watch
                .headers
                .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
            watch
                .headers
                .insert(name.clone(), ValueSource::Literal(value.clone()));
        }
        config.headers.insert(name, value);
    }

    if cli_timeout == Some(0) {
        anyhow::bail!("--timeout must be positive");
    }
    if cli_timeout.is_some() {
        config.schema_options.timeout = cli_timeout;
    }
    Ok(())
}

#[tracing::instrument(skip(config_path, cli_headers, output_opts))]
async fn run_download(
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    cli_headers: &[String],
    cli_timeout: Option<u64>,
    output_opts: OutputOptions,
) -> Result<()> {
    let start_time = std::time::Instant::now();

    let mut ctx = CommandContext::load(config_path)?;
    apply_overrides(&mut ctx.config, cli_headers, cli_timeout)?;

    // stdout may be the schema itself
    let spinner = maybe_spinner(
        output.is_some() && output_opts.show_progress,
        &format!("Fetching schema from {}...", ctx.config.url),
    );
    let sdl = download_sdl(&ctx.config).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let sdl = sdl.with_context(|| format!("Failed to fetch schema from {}", ctx.config.url))?;

    if let Some(path) = output {
        std::fs::write(&path, &sdl)
            .with_context(|| format!("Failed to write to {}", path.display()))?;

        if output_opts.show_info {
            println!(
                "{} Schema downloaded to {}",
                "✓".green(),
                path.display().to_string().cyan(),
            );
            println!("  {} {:.2}s", "⏱".dimmed(), start_time.elapsed().as_secs_f64());
        }
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(sdl.as_bytes())
            .context("Failed to write to stdout")?;
        if !sdl.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gql_typegen_config::WatchSchemaConfig;
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_header_valid() {
        let (name, value) = parse_header("Authorization: Bearer token").unwrap();
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer token");
    }

    #[test]
    fn test_parse_header_with_colons_in_value() {
        let (name, value) = parse_header("X-Custom: value:with:colons").unwrap();
        assert_eq!(name, "X-Custom");
        assert_eq!(value, "value:with:colons");
    }

    #[test]
    fn test_parse_header_with_whitespace() {
        let (name, value) = parse_header("  Content-Type  :  application/json  ").unwrap();
        assert_eq!(name, "Content-Type");
        assert_eq!(value, "application/json");
    }

    #[test]
    fn test_parse_header_invalid() {
        assert!(parse_header("InvalidHeader").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_cli_headers_replace_config_headers() {
        let mut config = PluginConfig::new("https://swapi.example/graphql").normalized();
        apply_overrides(
            &mut config,
            &["content-type: application/graphql+json".to_string()],
            Some(60),
        )
        .unwrap();

        assert_eq!(
            config.headers,
            BTreeMap::from([(
                "content-type".to_string(),
                "application/graphql+json".to_string()
            )])
        );
        assert_eq!(config.schema_options.timeout, Some(60));
    }

    #[test]
    fn test_cli_headers_win_over_watch_headers() {
        let mut config = PluginConfig::new("https://swapi.example/graphql");
        config.watch_schema = Some(WatchSchemaConfig {
            url: ValueSource::Literal("https://swapi.example/poll".to_string()),
            interval: Some(1000),
            timeout: None,
            headers: BTreeMap::from([(
                "Authorization".to_string(),
                ValueSource::Literal("Bearer old".to_string()),
            )]),
        });

        apply_overrides(&mut config, &["authorization: Bearer new".to_string()], None).unwrap();

        let endpoint = config.schema_endpoint().resolve().unwrap();
        assert_eq!(endpoint.url, "https://swapi.example/poll");
        assert_eq!(
            endpoint.headers.get("authorization").map(String::as_str),
            Some("Bearer new")
        );
        assert!(!endpoint.headers.contains_key("Authorization"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = PluginConfig::new("https://swapi.example/graphql");
        assert!(apply_overrides(&mut config, &[], Some(0)).is_err());
    }
}
