//! Core types for slugstore
//!
//! This crate defines the foundational types shared across the store:
//! - BlogRecord: one blog-post entry, keyed by slug
//! - StoreError: error type hierarchy
//! - Result: shared result alias

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{Result, StoreError};
pub use types::BlogRecord;
