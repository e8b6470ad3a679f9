//! The current-schema slot.

use crate::{FetchSchema, IntrospectionError, Result, SchemaRef};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, OnceCell};

/// Owns the current schema and the fetcher that produces it.
///
/// The first [`SchemaStore::get`] triggers a single fetch that every
/// concurrent caller awaits; when it fails, the next call fetches again.
/// Later refreshes replace the slot atomically and wake every
/// [`SchemaStore::subscribe`] receiver. A failed refresh leaves the previous
/// schema in place.
#[derive(Debug)]
pub struct SchemaStore<F> {
    fetcher: F,
    slot: watch::Sender<Option<SchemaRef>>,
    first_load: OnceCell<SchemaRef>,
}

impl<F: FetchSchema> SchemaStore<F> {
    #[must_use]
    pub fn new(fetcher: F) -> Arc<Self> {
        let (slot, _) = watch::channel(None);
        Arc::new(Self {
            fetcher,
            slot,
            first_load: OnceCell::new(),
        })
    }

    /// A store that already holds `schema`. The fetcher is only used by
    /// [`SchemaStore::refresh`].
    #[must_use]
    pub fn with_schema(fetcher: F, schema: SchemaRef) -> Arc<Self> {
        let (slot, _) = watch::channel(Some(schema.clone()));
        Arc::new(Self {
            fetcher,
            slot,
            first_load: OnceCell::new_with(Some(schema)),
        })
    }

    /// The newest schema, loading it first if nothing has been fetched yet.
    ///
    /// Concurrent callers share one fetch. A failed load is not kept: the
    /// error goes to the callers that awaited it and the next call retries.
    pub async fn get(&self) -> Result<SchemaRef> {
        if let Some(schema) = self.current() {
            return Ok(schema);
        }

        let first = self
            .first_load
            .get_or_try_init(|| async {
                let schema = self.fetcher.fetch().await.inspect_err(|error| {
                    tracing::warn!(%error, "Initial schema load failed");
                })?;
                self.publish(schema.clone());
                Ok::<_, IntrospectionError>(schema)
            })
            .await?;

        // a refresh may have replaced the first load
        Ok(self.current().unwrap_or_else(|| first.clone()))
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The schema currently in the slot, if any.
    #[must_use]
    pub fn current(&self) -> Option<SchemaRef> {
        self.slot.borrow().clone()
    }

    /// Receiver that observes every schema replacement.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<SchemaRef>> {
        self.slot.subscribe()
    }

    /// Fetch once, bounded by `timeout`, and publish the result.
    ///
    /// Returns whether the slot changed. On failure the previous schema is
    /// kept.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self, timeout: Option<Duration>) -> Result<bool> {
        let fetch = self.fetcher.fetch();
        let schema = match timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| IntrospectionError::Timeout(limit))??,
            None => fetch.await?,
        };
        Ok(self.publish(schema))
    }

    /// Replace the slot when `schema` differs from the current one.
    /// Returns whether subscribers were notified.
    pub fn publish(&self, schema: SchemaRef) -> bool {
        self.slot.send_if_modified(|slot| {
            let changed = slot.as_ref().is_none_or(|current| {
                current.serialize().to_string() != schema.serialize().to_string()
            });
            if changed {
                *slot = Some(schema);
            }
            changed
        })
    }
}
