//! Configuration for gql-typegen.
//!
//! The configuration lives in `gql-typegen.{yml,yaml,json,toml}`, found by
//! walking up from the working directory.

mod config;
mod error;
mod loader;

pub use config::{
    EndpointConfig, NullabilityPolicy, PluginConfig, ResolvedEndpoint, SchemaOptions,
    ValueSource, WatchSchemaConfig, DEFAULT_MODULE_ID, DEFAULT_TIMEOUT_SECS,
};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILES};
