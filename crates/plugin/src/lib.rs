//! Build pipeline hooks for typed GraphQL query calls.
//!
//! [`GqlPlugin`] mirrors the hook lifecycle of a bundler plugin:
//!
//! - [`GqlPlugin::build_start`] starts loading the schema, and in development
//!   sessions the declaration aggregator and schema polling
//! - [`GqlPlugin::resolve_id`] and [`GqlPlugin::load`] serve the virtual query
//!   module
//! - [`GqlPlugin::transform`] rewrites the query calls of one file
//!
//! # Example
//!
//! ```no_run
//! use gql_typegen_config::PluginConfig;
//! use gql_typegen_plugin::GqlPlugin;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = PluginConfig::new("https://swapi-graphql.netlify.app/graphql");
//! config.out_file = Some("src/gql.d.ts".into());
//!
//! let mut plugin = GqlPlugin::new(config, false)?;
//! plugin.build_start();
//! if let Some(output) = plugin.transform("import gql from '$gql';", "src/main.ts").await? {
//!     println!("{}", output.code);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod runtime;

pub use error::{PluginError, Result};
pub use runtime::{runtime_module, RUNTIME_TEMPLATE};

use gql_typegen_codegen::ProjectionOptions;
use gql_typegen_config::PluginConfig;
use gql_typegen_dts::{Aggregator, AggregatorConfig, AggregatorHandle, FileRecord};
use gql_typegen_extract::{find_import, walk, ErrorMode, ParsedSource, WalkContext, WalkOutput};
use gql_typegen_introspect::{FetchSchema, IntrospectionFetcher, SchemaStore, SchemaWatcher};
use gql_typegen_types::{Diagnostic, FileId, Language, OffsetMapping};
use std::path::Path;
use std::sync::Arc;

/// Result of transforming one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    /// Maps offsets of `code` back to the original source
    pub mapping: OffsetMapping,
    /// Non-fatal projection failures
    pub warnings: Vec<Diagnostic>,
}

pub struct GqlPlugin<F = IntrospectionFetcher> {
    config: PluginConfig,
    options: ProjectionOptions,
    store: Arc<SchemaStore<F>>,
    is_build: bool,
    aggregator: Option<AggregatorHandle>,
    watcher: Option<SchemaWatcher>,
}

impl GqlPlugin<IntrospectionFetcher> {
    /// A plugin introspecting the configured endpoint.
    ///
    /// `is_build` selects production behaviour: projection failures fail the
    /// transform and no declaration file is maintained.
    pub fn new(config: PluginConfig, is_build: bool) -> Result<Self> {
        let config = config.normalized();
        let fetcher = IntrospectionFetcher::from_config(&config);
        Self::with_fetcher(config, fetcher, is_build)
    }
}

impl<F: FetchSchema> GqlPlugin<F> {
    pub fn with_fetcher(config: PluginConfig, fetcher: F, is_build: bool) -> Result<Self> {
        Self::with_store(config, SchemaStore::new(fetcher), is_build)
    }

    pub fn with_store(
        config: PluginConfig,
        store: Arc<SchemaStore<F>>,
        is_build: bool,
    ) -> Result<Self> {
        config.validate(!is_build).map_err(PluginError::Config)?;
        let config = config.normalized();
        Ok(Self {
            options: ProjectionOptions::from_config(&config),
            config,
            store,
            is_build,
            aggregator: None,
            watcher: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<SchemaStore<F>> {
        &self.store
    }

    fn error_mode(&self) -> ErrorMode {
        if self.is_build {
            ErrorMode::Fatal
        } else {
            ErrorMode::Deferred
        }
    }

    /// Start loading the schema. In a development session with automatic
    /// generation this also starts the declaration aggregator, and schema
    /// polling when `watchSchema.interval` is set.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build_start(&mut self) {
        if !self.is_build {
            self.start_aggregator();
            if self.watcher.is_none() {
                self.watcher = self
                    .config
                    .watch_schema
                    .as_ref()
                    .and_then(|watch| SchemaWatcher::from_config(Arc::clone(&self.store), watch));
            }
        }

        // the watcher performs the initial load itself
        if self.watcher.is_none() {
            let store = Arc::clone(&self.store);
            tokio::spawn(async move {
                if let Err(error) = store.get().await {
                    tracing::warn!(%error, "Schema load failed");
                }
            });
        }
    }

    fn start_aggregator(&mut self) {
        if self.aggregator.is_some() || !self.config.automatically_generate_types {
            return;
        }
        let Some(out_file) = self.config.out_file.clone() else {
            return;
        };
        let (handle, _task) = Aggregator::spawn(
            AggregatorConfig {
                module_id: self.config.module_id.clone(),
                out_file,
                options: self.options.clone(),
            },
            self.store.subscribe(),
        );
        self.aggregator = Some(handle);
    }

    /// Resolve the query module specifier to its virtual id.
    #[must_use]
    pub fn resolve_id(&self, id: &str) -> Option<String> {
        (id == self.config.module_id).then(|| format!("\0{}", self.config.module_id))
    }

    /// Source of the virtual query module.
    #[must_use]
    pub fn load(&self, id: &str) -> Option<String> {
        (id.strip_prefix('\0') == Some(self.config.module_id.as_str()))
            .then(|| runtime_module(&self.config.url, &self.config.headers))
    }

    /// Rewrite the query calls of one file.
    ///
    /// Returns `Ok(None)` for files that are not JavaScript or TypeScript,
    /// do not parse, or do not import the query module. A file that no
    /// longer imports it loses its overloads. Waits for the schema only when
    /// the file does import it.
    #[tracing::instrument(skip(self, code), fields(len = code.len()))]
    pub async fn transform(&self, code: &str, id: &str) -> Result<Option<TransformOutput>> {
        let path = id.split_once('?').map_or(id, |(path, _)| path);
        let Some(language) = Language::from_path(Path::new(path)) else {
            return Ok(None);
        };
        let Some(parsed) = ParsedSource::parse(code, language) else {
            return Ok(None);
        };
        let Some(alias) = find_import(&parsed, &self.config.module_id) else {
            self.remove_file(path).await?;
            return Ok(None);
        };

        let schema = self.store.get().await?;
        let context = WalkContext {
            schema: &schema,
            options: &self.options,
            mode: self.error_mode(),
        };
        let WalkOutput {
            queries,
            warnings,
            edited,
        } = walk(&parsed, &alias, &context, true).map_err(|source| PluginError::Transform {
            id: id.to_string(),
            source,
        })?;

        for warning in &warnings {
            tracing::warn!(file = id, offset = ?warning.offset, "{}", warning.message);
        }
        if let Some(aggregator) = &self.aggregator {
            aggregator
                .update_file(FileId::new(path), FileRecord::new(queries, schema.clone()))
                .await?;
        }

        Ok(edited.map(|edited| TransformOutput {
            code: edited.code,
            mapping: edited.mapping,
            warnings,
        }))
    }

    /// Drop the queries of a deleted file from the declaration file.
    pub async fn remove_file(&self, id: &str) -> Result<()> {
        let path = id.split_once('?').map_or(id, |(path, _)| path);
        if let Some(aggregator) = &self.aggregator {
            aggregator.remove_file(FileId::new(path)).await?;
        }
        Ok(())
    }

    /// Wait for pending declaration updates to be written. Returns whether
    /// the file changed; `false` when no declaration file is maintained.
    pub async fn flush_declarations(&self) -> Result<bool> {
        match &self.aggregator {
            Some(aggregator) => Ok(aggregator.flush().await?),
            None => Ok(false),
        }
    }
}
