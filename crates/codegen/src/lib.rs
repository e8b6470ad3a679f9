//! TypeScript type generation for GraphQL operations.
//!
//! [`project_query`] turns one operation into the TypeScript types of its
//! variables and its response, following the schema it runs against.
//! [`minify`] and [`wire_payload`] produce the compact query text that
//! replaces the literal at a call site.

mod error;
mod minify;
mod project;
mod projection;
mod render;
mod scalars;
mod type_info;

pub use error::{ProjectionError, ProjectionErrorKind, Result};
pub use minify::{minify, wire_payload};
pub use project::{project_query, ProjectionOptions, QueryTypes};
pub use projection::Projection;
pub use render::quote;
pub use scalars::ScalarMap;
pub use type_info::TypeInfo;
