//! Foundation types for gql-typegen.
//!
//! This crate provides shared types used across the transform pipeline.
//! It has zero external dependencies, making it suitable as a foundation layer.
//!
//! # Type Categories
//!
//! - **File types**: [`FileId`], [`Language`]
//! - **Position types**: [`OffsetRange`], [`LineColumn`], [`LineIndex`]
//! - **Diagnostic types**: [`Diagnostic`], [`DiagnosticSeverity`]
//! - **Edit types**: [`TextEdit`], [`EditBuffer`], [`EditedSource`], [`OffsetMapping`]

mod edits;
mod file;
mod position;
mod severity;

pub use edits::{EditBuffer, EditedSource, OffsetMapping, OverlappingEdit, Segment, TextEdit};
pub use file::{FileId, Language};
pub use position::{LineColumn, LineIndex, OffsetRange};
pub use severity::{Diagnostic, DiagnosticSeverity};
