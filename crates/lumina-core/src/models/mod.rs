//! Data models for the catalog
//!
//! Organized by domain area; everything is re-exported flat for convenient
//! imports.

mod album;
mod asset;
mod exif;
mod pagination;
mod search;
mod timeline;

pub use album::*;
pub use asset::*;
pub use exif::*;
pub use pagination::*;
pub use search::*;
pub use timeline::*;
