//! Config loading shared by the commands.

use anyhow::{Context, Result};
use gql_typegen_config::{find_config, load_config, ConfigError, PluginConfig};
use gql_typegen_introspect::{AnyFetcher, IntrospectionFetcher, SdlFileFetcher};
use std::path::{Path, PathBuf};

/// A loaded config and the directory its relative paths resolve against.
#[derive(Debug)]
pub struct CommandContext {
    pub config: PluginConfig,
    pub config_path: PathBuf,
    pub base_dir: PathBuf,
}

impl CommandContext {
    /// Load the config at `config_path`, or the nearest one above the
    /// working directory.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => {
                let current_dir =
                    std::env::current_dir().context("Failed to read the working directory")?;
                find_config(&current_dir)
                    .context("Failed to search for config")?
                    .ok_or(ConfigError::NotFound(current_dir))?
            }
        };
        Self::from_path(&config_path)
    }

    pub fn from_path(config_path: &Path) -> Result<Self> {
        let config = load_config(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?;
        let base_dir = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
            base_dir,
        })
    }

    /// The declaration file: `out_file` when given, else the configured
    /// `outFile` resolved against the config directory.
    pub fn out_file(&self, out_file: Option<PathBuf>) -> Option<PathBuf> {
        out_file.or_else(|| {
            self.config
                .out_file
                .as_ref()
                .map(|path| self.base_dir.join(path))
        })
    }

    pub fn require_out_file(&self, out_file: Option<PathBuf>) -> Result<PathBuf> {
        self.out_file(out_file).ok_or_else(|| {
            ConfigError::Invalid {
                path: self.config_path.clone(),
                message: "outFile is required (or pass --out-file)".to_string(),
            }
            .into()
        })
    }

    /// Schema source: an SDL file when one is given, else the endpoint.
    pub fn fetcher(&self, schema_file: Option<PathBuf>) -> AnyFetcher {
        match schema_file {
            Some(path) => AnyFetcher::SdlFile(SdlFileFetcher::new(path)),
            None => AnyFetcher::Introspection(IntrospectionFetcher::from_config(&self.config)),
        }
    }
}
