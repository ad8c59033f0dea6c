//! analyses-store - PostgREST-backed analysis store
//!
//! Implements `AnalysisStore` over the REST interface of a managed
//! PostgreSQL backend (PostgREST, as exposed by Supabase). The client is
//! built once with the service credentials and shared by every request.
//!
//! # Example
//!
//! ```rust,no_run
//! use analyses_core::{AnalysisStatus, AnalysisStore};
//! use analyses_store::{RestStore, RestStoreConfig};
//!
//! # async fn run() -> Result<(), analyses_core::StoreError> {
//! let store = RestStore::new(RestStoreConfig::new(
//!     "https://project.supabase.co",
//!     "service-role-key",
//! ))?;
//! let active = store.list_by_status(&AnalysisStatus::Active).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod rest;

pub use config::RestStoreConfig;
pub use rest::{RestStore, NO_SINGLE_ROW_CODE};
