//! # gql-typegen test utilities
//!
//! Shared fixtures for the workspace crates.
//!
//! ```ignore
//! use gql_typegen_test_utils::{swapi_schema, fixtures::ALL_FILMS_QUERY};
//!
//! let schema = swapi_schema();
//! let types = project_query(ALL_FILMS_QUERY, &schema, &ProjectionOptions::default())?;
//! ```

// Test utilities are less strict than production code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]

pub mod assertions;
pub mod fixtures;

use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use std::sync::Arc;

pub use assertions::{format_diagnostic_messages, format_diagnostics};

/// Parse and validate an SDL string, panicking on errors.
pub fn schema(sdl: &str) -> Arc<Valid<Schema>> {
    match Schema::parse_and_validate(sdl, "schema.graphql") {
        Ok(schema) => Arc::new(schema),
        Err(with_errors) => panic!("invalid test schema:\n{}", with_errors.errors),
    }
}

/// The validated [`fixtures::SWAPI_SCHEMA`].
pub fn swapi_schema() -> Arc<Valid<Schema>> {
    schema(fixtures::SWAPI_SCHEMA)
}
