//! HTTP request handlers.

pub mod common;
pub mod files;
pub mod merge;

pub use common::*;
pub use files::*;
pub use merge::*;
