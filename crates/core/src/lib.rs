//! Core domain types for the Granary tabular file service.
//!
//! This crate provides the pieces shared across the workspace:
//! - Configuration types for the server, storage, metadata, and staging layers
//! - The `FileFormat` tag and filename extension parsing
//! - The typed `Table` structure and its record-oriented JSON form
//! - CSV/XLSX decode and encode
//! - Inner-join semantics used by the merge pipeline

pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod join;
pub mod table;

pub use error::{Error, Result};
pub use format::FileFormat;
pub use table::{Table, Value};
