use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::{ConfigError, Result};

/// Default import specifier of the query function.
pub const DEFAULT_MODULE_ID: &str = "$gql";

/// Default request timeout for schema introspection, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration of the typegen plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// The import specifier the query function is imported from
    #[serde(default = "default_module_id")]
    pub module_id: String,

    /// The GraphQL endpoint, used for introspection and by the runtime module
    pub url: String,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Options for the schema loader
    #[serde(default)]
    pub schema_options: SchemaOptions,

    /// GraphQL scalar name to TypeScript type, merged over the builtin table
    #[serde(default)]
    pub custom_scalars: BTreeMap<String, String>,

    /// The declaration file to write (e.g. `src/gql.d.ts`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_file: Option<PathBuf>,

    /// Regenerate the declaration file whenever a transformed file changes
    #[serde(default = "default_true")]
    pub automatically_generate_types: bool,

    /// How nullable positions are rendered
    #[serde(default)]
    pub nullability: NullabilityPolicy,

    /// Poll the endpoint for schema changes during development
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_schema: Option<WatchSchemaConfig>,
}

fn default_module_id() -> String {
    DEFAULT_MODULE_ID.to_string()
}

const fn default_true() -> bool {
    true
}

impl PluginConfig {
    /// A configuration with every option at its default, pointing at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            module_id: default_module_id(),
            url: url.into(),
            headers: BTreeMap::new(),
            schema_options: SchemaOptions::default(),
            custom_scalars: BTreeMap::new(),
            out_file: None,
            automatically_generate_types: true,
            nullability: NullabilityPolicy::default(),
            watch_schema: None,
        }
    }

    /// Fill in derived defaults. Adds `Content-Type: application/json` when no
    /// content type header was configured.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let has_content_type = self
            .headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("content-type"));
        if !has_content_type {
            self.headers
                .insert("Content-Type".to_string(), "application/json".to_string());
        }
        self
    }

    /// Check the invariants the rest of the pipeline relies on.
    ///
    /// `requires_out_file` is set by callers that will write declarations
    /// (development sessions with automatic generation enabled).
    pub fn validate(&self, requires_out_file: bool) -> std::result::Result<(), String> {
        if self.module_id.is_empty() {
            return Err("'moduleId' must not be empty".to_string());
        }
        if self.module_id.contains('\'') {
            return Err(format!("Invalid moduleId: {}", self.module_id));
        }
        if self.url.trim().is_empty() {
            return Err("'url' must not be empty".to_string());
        }
        if requires_out_file && self.automatically_generate_types && self.out_file.is_none() {
            return Err(
                "'outFile' is required when 'automaticallyGenerateTypes' is enabled".to_string(),
            );
        }
        for (scalar, typescript) in &self.custom_scalars {
            if typescript.trim().is_empty() {
                return Err(format!("Custom scalar '{scalar}' maps to an empty type"));
            }
        }
        if self.schema_options.timeout == Some(0) {
            return Err("'schemaOptions.timeout' must be positive".to_string());
        }
        if let Some(watch) = &self.watch_schema {
            if watch.interval == Some(0) {
                return Err("'watchSchema.interval' must be positive".to_string());
            }
            if watch.timeout == Some(0) {
                return Err("'watchSchema.timeout' must be positive".to_string());
            }
        }
        Ok(())
    }

    /// The endpoint used to fetch the schema.
    ///
    /// When `watchSchema` is configured its url is used and its headers are
    /// layered over the static `headers`.
    #[must_use]
    pub fn schema_endpoint(&self) -> EndpointConfig {
        let mut headers: BTreeMap<String, ValueSource> = self
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), ValueSource::Literal(value.clone())))
            .collect();

        let url = match &self.watch_schema {
            Some(watch) => {
                headers.extend(watch.headers.clone());
                watch.url.clone()
            }
            None => ValueSource::Literal(self.url.clone()),
        };

        EndpointConfig { url, headers }
    }
}

/// Options for the introspection request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaOptions {
    /// Request timeout in seconds (default: 30)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Connection timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u64>,
}

impl SchemaOptions {
    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

/// Schema polling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchSchemaConfig {
    /// The endpoint to poll
    pub url: ValueSource,

    /// Milliseconds between polls; without it the schema is fetched once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,

    /// Milliseconds before a single poll is abandoned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Headers sent with each poll
    #[serde(default)]
    pub headers: BTreeMap<String, ValueSource>,
}

/// A configuration value given literally or read from the environment.
///
/// ```yaml
/// url: https://api.example.com/graphql
/// headers:
///   Authorization:
///     env: API_TOKEN
///     default: ""
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueSource {
    Literal(String),
    Env {
        env: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
}

impl ValueSource {
    /// Resolve against the process environment.
    pub fn resolve(&self) -> Result<String> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` for environment variables.
    pub fn resolve_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Env { env, default } => lookup(env)
                .or_else(|| default.clone())
                .ok_or_else(|| ConfigError::MissingEnv(env.clone())),
        }
    }
}

/// Endpoint url and headers, unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub url: ValueSource,
    pub headers: BTreeMap<String, ValueSource>,
}

impl EndpointConfig {
    /// Resolve url and headers against the current environment.
    pub fn resolve(&self) -> Result<ResolvedEndpoint> {
        let url = self.url.resolve()?;
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| Ok((name.clone(), value.resolve()?)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(ResolvedEndpoint { url, headers })
    }
}

/// Endpoint with every value resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

/// How nullable GraphQL positions are rendered in TypeScript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NullabilityPolicy {
    /// `T | null` in every nullable position
    #[default]
    NullUnion,
    /// Nullable properties become optional (`"key"?: T`); other nullable
    /// positions stay `T | null`
    Optional,
}
