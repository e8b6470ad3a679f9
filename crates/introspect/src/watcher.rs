//! Periodic schema polling.

use crate::{FetchSchema, SchemaStore};
use gql_typegen_config::WatchSchemaConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Background task that re-fetches the schema on a fixed interval.
///
/// The task stops when the watcher is dropped.
#[derive(Debug)]
pub struct SchemaWatcher {
    handle: JoinHandle<()>,
}

impl SchemaWatcher {
    /// Start polling. The first tick performs the initial load; each later
    /// tick refreshes, abandoning a fetch after `timeout`.
    #[must_use]
    pub fn spawn<F: FetchSchema>(
        store: Arc<SchemaStore<F>>,
        interval: Duration,
        timeout: Option<Duration>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            let initial = match timeout {
                Some(limit) => tokio::time::timeout(limit, store.get()).await.ok(),
                None => Some(store.get().await),
            };
            match initial {
                Some(Ok(_)) => tracing::info!("Initial schema loaded"),
                Some(Err(error)) => tracing::warn!(%error, "Initial schema load failed"),
                None => tracing::warn!("Initial schema load timed out"),
            }

            loop {
                ticker.tick().await;
                match store.refresh(timeout).await {
                    Ok(true) => tracing::info!("Schema changed"),
                    Ok(false) => tracing::debug!("Schema unchanged"),
                    Err(error) => {
                        tracing::warn!(%error, "Schema refresh failed, keeping previous schema");
                    }
                }
            }
        });

        Self { handle }
    }

    /// Start polling as configured by `watchSchema`. Returns `None` when no
    /// interval is set.
    #[must_use]
    pub fn from_config<F: FetchSchema>(
        store: Arc<SchemaStore<F>>,
        config: &WatchSchemaConfig,
    ) -> Option<Self> {
        let interval = Duration::from_millis(config.interval?);
        let timeout = config.timeout.map(Duration::from_millis);
        tracing::info!(?interval, ?timeout, "Watching schema");
        Some(Self::spawn(store, interval, timeout))
    }

    /// Stop polling.
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for SchemaWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
