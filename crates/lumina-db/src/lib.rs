//! Lumina catalog repositories
//!
//! Postgres-backed implementations of every catalog operation: asset record
//! store, EXIF/smart-info side tables, derived-artifact discovery, timeline
//! bucketing, dedup/live-photo resolution, and trash lifecycle. Invariants
//! (checksum uniqueness, device-asset identity) are enforced by the store's
//! unique indexes, never by application-level pre-checks.

pub mod db;
pub mod setup;

pub use db::catalog::{AlbumRepository, AssetRepository, ExifRepository, TimelineRepository};
pub use db::transaction::TransactionGuard;
pub use setup::connect;
