//! The task owning the registry and the declaration file.

use crate::{render_declarations, write_if_changed, DtsError, FileRecord, Registry, Result};
use gql_typegen_codegen::ProjectionOptions;
use gql_typegen_introspect::SchemaRef;
use gql_typegen_types::FileId;
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub module_id: String,
    pub out_file: PathBuf,
    pub options: ProjectionOptions,
}

enum Command {
    Update { file: FileId, record: FileRecord },
    Remove { file: FileId },
    Flush { done: oneshot::Sender<Result<bool>> },
}

/// Sends file records to the aggregator task.
///
/// Cloning is cheap; the task stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct AggregatorHandle {
    commands: mpsc::Sender<Command>,
}

impl AggregatorHandle {
    /// Replace the record of `file` and rewrite the declaration.
    pub async fn update_file(&self, file: FileId, record: FileRecord) -> Result<()> {
        self.send(Command::Update { file, record }).await
    }

    pub async fn remove_file(&self, file: FileId) -> Result<()> {
        self.send(Command::Remove { file }).await
    }

    /// Wait until every command sent before has been processed and write the
    /// declaration. Returns whether the file changed since the previous
    /// flush.
    pub async fn flush(&self) -> Result<bool> {
        let (done, wait) = oneshot::channel();
        self.send(Command::Flush { done }).await?;
        wait.await.map_err(|_| DtsError::Stopped)?
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| DtsError::Stopped)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Update { file, record } => f
                .debug_struct("Update")
                .field("file", file)
                .field("queries", &record.queries.len())
                .finish(),
            Self::Remove { file } => f.debug_struct("Remove").field("file", file).finish(),
            Self::Flush { .. } => f.write_str("Flush"),
        }
    }
}

/// Merges per-file records into one declaration module.
///
/// Records projected against a schema other than the current one are
/// re-projected before insertion. When the schema changes, the whole registry
/// is re-projected into a fresh registry that replaces the old one before the
/// declaration is written, so the file never mixes projections of two
/// schemas.
pub struct Aggregator {
    config: AggregatorConfig,
    registry: Registry,
    schema: Option<SchemaRef>,
    schema_updates: watch::Receiver<Option<SchemaRef>>,
    commands: mpsc::Receiver<Command>,
    changed_since_flush: bool,
}

impl Aggregator {
    /// Start the aggregator task following `schema_updates`.
    pub fn spawn(
        config: AggregatorConfig,
        mut schema_updates: watch::Receiver<Option<SchemaRef>>,
    ) -> (AggregatorHandle, JoinHandle<()>) {
        let (sender, commands) = mpsc::channel(CHANNEL_CAPACITY);
        let schema = schema_updates.borrow_and_update().clone();
        let aggregator = Self {
            config,
            registry: Registry::new(),
            schema,
            schema_updates,
            commands,
            changed_since_flush: false,
        };
        let task = tokio::spawn(aggregator.run());
        (AggregatorHandle { commands: sender }, task)
    }

    async fn run(mut self) {
        let mut following_schema = true;

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    self.handle(command).await;
                }
                changed = self.schema_updates.changed(), if following_schema => {
                    if changed.is_err() {
                        following_schema = false;
                        continue;
                    }
                    let schema = self.schema_updates.borrow_and_update().clone();
                    if let Some(schema) = schema {
                        self.replace_schema(schema);
                        self.write_logged().await;
                    }
                }
            }
        }

        tracing::debug!("Declaration aggregator stopped");
    }

    async fn handle(&mut self, command: Command) {
        tracing::trace!(?command, "Aggregator command");
        match command {
            Command::Update { file, record } => {
                let record = match &self.schema {
                    Some(schema) if !record.is_projected_against(schema) => {
                        tracing::debug!(%file, "Re-projecting record from an older schema");
                        record.reproject(schema, &self.config.options)
                    }
                    _ => record,
                };
                self.registry.insert(file, record);
                self.write_logged().await;
            }
            Command::Remove { file } => {
                if self.registry.remove(&file).is_some() {
                    self.write_logged().await;
                }
            }
            Command::Flush { done } => {
                let pending = std::mem::take(&mut self.changed_since_flush);
                let _ = done.send(self.write().await.map(|changed| changed || pending));
            }
        }
    }

    fn replace_schema(&mut self, schema: SchemaRef) {
        tracing::info!(
            files = self.registry.len(),
            "Schema changed, re-projecting all queries"
        );
        self.registry = self.registry.reproject(&schema, &self.config.options);
        self.schema = Some(schema);
    }

    async fn write(&self) -> Result<bool> {
        let rendered = render_declarations(&self.config.module_id, &self.registry);
        write_if_changed(&self.config.out_file, &rendered).await
    }

    async fn write_logged(&mut self) {
        match self.write().await {
            Ok(changed) => self.changed_since_flush |= changed,
            Err(error) => tracing::warn!(%error, "Failed to write declaration file"),
        }
    }
}
