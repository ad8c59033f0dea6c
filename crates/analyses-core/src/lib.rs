//! analyses-core - Core traits and types for the analyses service
//!
//! This crate provides the record model and the `AnalysisStore` abstraction
//! that lets the HTTP layer run against the managed REST backend or the
//! in-process `MemoryStore`.

pub mod error;
pub mod memory;
pub mod models;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::*;
pub use store::AnalysisStore;
