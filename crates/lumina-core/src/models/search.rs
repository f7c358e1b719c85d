use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::AssetType;

/// Sort order for listings over the creation-order keyset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Filters for `get_all` / `get_by_user_id`.
#[derive(Debug, Clone, Default)]
pub struct AssetSearchOptions {
    pub is_visible: Option<bool>,
    /// Only assets trashed strictly before this instant; implies trashed-only.
    /// Used by the trash-emptying job to find expired items.
    pub trashed_before: Option<DateTime<Utc>>,
    pub asset_type: Option<AssetType>,
    pub order: SortOrder,
    /// Include trashed assets alongside active ones.
    pub with_deleted: bool,
}

/// Filters for per-type asset counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetStatsOptions {
    pub is_favorite: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_trashed: Option<bool>,
}

/// Count of assets per type matching a stats filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetStats {
    pub images: i64,
    pub videos: i64,
}

impl AssetStats {
    pub fn total(&self) -> i64 {
        self.images + self.videos
    }
}

/// Lookup for the opposite half of a live-photo pair. `asset_type` is the
/// type of the *wanted* sibling; `other_asset_id` excludes the asset that
/// triggered the search.
#[derive(Debug, Clone)]
pub struct LivePhotoSearchOptions {
    pub owner_id: Uuid,
    pub live_photo_cid: String,
    pub other_asset_id: Uuid,
    pub asset_type: AssetType,
}

/// Filters for map marker queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapMarkerSearchOptions {
    pub is_archived: Option<bool>,
    pub is_favorite: Option<bool>,
    pub file_created_before: Option<DateTime<Utc>>,
    pub file_created_after: Option<DateTime<Utc>>,
}

/// Projection of a GPS-tagged asset onto the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MapMarker {
    pub id: Uuid,
    pub lat: f64,
    pub lon: f64,
}

/// Derived artifacts whose absence makes an asset eligible for background
/// processing. Each variant maps to one indexed predicate in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WithoutProperty {
    Thumbnail,
    EncodedVideo,
    Exif,
    ClipEmbedding,
    ObjectTags,
    Faces,
    Sidecar,
}

/// Properties whose *presence* is queried by cleanup/reconciliation jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WithProperty {
    Sidecar,
    IsOffline,
}
