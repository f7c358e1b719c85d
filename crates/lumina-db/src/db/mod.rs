//! Database repositories for the catalog data-access layer
//!
//! Each repository owns one slice of the catalog: `catalog::asset` is the
//! record store plus lifecycle/dedup, `catalog::exif` the side-table merges,
//! `catalog::timeline` the bucketing queries, `catalog::album` the minimal
//! album structure. Transaction helpers live in `transaction`.

pub mod catalog;
pub mod transaction;
