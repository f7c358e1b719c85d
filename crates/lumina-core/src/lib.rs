//! Lumina Core Library
//!
//! Domain models, error types, and configuration shared across the Lumina
//! catalog components. No database code lives here; repositories are in
//! `lumina-db`.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::CatalogConfig;
pub use error::{CatalogError, ErrorMetadata, LogLevel};
