//! TypeScript declarations for projected queries.
//!
//! Every processed file contributes a [`FileRecord`] to a [`Registry`]; the
//! registry renders to one `declare module` block with an overload per query
//! literal. In a long running session the [`Aggregator`] task owns the
//! registry and keeps the declaration file in step with file updates and
//! schema changes.

mod aggregator;
mod error;
mod registry;
mod render;
mod write;

pub use aggregator::{Aggregator, AggregatorConfig, AggregatorHandle};
pub use error::{DtsError, Result};
pub use registry::{FileRecord, Registry};
pub use render::render_declarations;
pub use write::write_if_changed;

use std::path::Path;

/// Render `registry` and write it to `out_file` if the text changed.
pub async fn write_dts_file(module_id: &str, registry: &Registry, out_file: &Path) -> Result<bool> {
    write_if_changed(out_file, &render_declarations(module_id, registry)).await
}
