//! Shared constants for the catalog subsystem.

/// Default page size for paginated listings when the caller does not set one.
pub const DEFAULT_PAGE_SIZE: i64 = 250;

/// Hard cap on a single page; larger requests are clamped.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Server-side cap on map markers returned by a single query. Marker queries
/// are unpaginated, so the cap bounds the payload for heavily GPS-tagged
/// collections.
pub const MAX_MAP_MARKERS: i64 = 50_000;
