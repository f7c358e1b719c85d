use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::exif::{Exif, SmartInfo};

/// Asset media type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "asset_type", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Image,
    Video,
}

/// Canonical asset record. Side-table data (EXIF, smart info, faces) is not
/// duplicated here; it is merged at query time via [`AssetDetail`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Asset {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub library_id: Option<Uuid>,
    pub device_id: String,
    pub device_asset_id: String,
    pub asset_type: AssetType,
    pub original_path: String,
    pub original_file_name: String,
    /// Binary digest of the original file bytes; dedup key per owner.
    pub checksum: Vec<u8>,
    pub file_created_at: DateTime<Utc>,
    pub file_modified_at: DateTime<Utc>,
    /// Device-local wall-clock capture time. Timezone-naive on purpose: the
    /// timeline groups by the device's calendar day, not the server's.
    pub local_date_time: NaiveDateTime,
    pub is_favorite: bool,
    pub is_archived: bool,
    pub is_visible: bool,
    pub is_offline: bool,
    pub sidecar_path: Option<String>,
    pub preview_path: Option<String>,
    pub encoded_video_path: Option<String>,
    /// Set when this asset is a non-primary member of a duplicate stack.
    pub stack_parent_id: Option<Uuid>,
    pub duration_seconds: Option<f64>,
    /// Trash timestamp. `None` = active; `Some` = trashed and excluded from
    /// default listings until restored or purged.
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Fields required to commit a new asset record. Everything not listed here
/// starts at its column default.
#[derive(Debug, Clone)]
pub struct AssetCreate {
    pub owner_id: Uuid,
    pub library_id: Option<Uuid>,
    pub device_id: String,
    pub device_asset_id: String,
    pub asset_type: AssetType,
    pub original_path: String,
    pub original_file_name: String,
    pub checksum: Vec<u8>,
    pub file_created_at: DateTime<Utc>,
    pub file_modified_at: DateTime<Utc>,
    pub local_date_time: NaiveDateTime,
    pub is_favorite: bool,
    pub is_visible: bool,
    pub sidecar_path: Option<String>,
    pub duration_seconds: Option<f64>,
}

/// Field patch for a single asset: `None` = leave unchanged. Nullable columns
/// use a second `Option` layer so "set NULL" (`Some(None)`) stays distinct
/// from "leave unchanged" (`None`).
#[derive(Debug, Clone, Default)]
pub struct AssetUpdate {
    pub id: Uuid,
    pub original_path: Option<String>,
    pub original_file_name: Option<String>,
    pub file_created_at: Option<DateTime<Utc>>,
    pub file_modified_at: Option<DateTime<Utc>>,
    pub local_date_time: Option<NaiveDateTime>,
    pub is_favorite: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_visible: Option<bool>,
    pub is_offline: Option<bool>,
    pub duration_seconds: Option<Option<f64>>,
    pub sidecar_path: Option<Option<String>>,
    pub preview_path: Option<Option<String>>,
    pub encoded_video_path: Option<Option<String>>,
    pub stack_parent_id: Option<Option<Uuid>>,
}

impl AssetUpdate {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// True when no field is set; saving such a patch only bumps `updated_at`.
    pub fn is_empty(&self) -> bool {
        self.original_path.is_none()
            && self.original_file_name.is_none()
            && self.file_created_at.is_none()
            && self.file_modified_at.is_none()
            && self.local_date_time.is_none()
            && self.is_favorite.is_none()
            && self.is_archived.is_none()
            && self.is_visible.is_none()
            && self.is_offline.is_none()
            && self.duration_seconds.is_none()
            && self.sidecar_path.is_none()
            && self.preview_path.is_none()
            && self.encoded_video_path.is_none()
            && self.stack_parent_id.is_none()
    }
}

/// Field set for bulk updates (`update_all`). Applied per id with no
/// per-element failure reporting; callers re-query to verify.
#[derive(Debug, Clone, Default)]
pub struct AssetBulkUpdate {
    pub is_favorite: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_visible: Option<bool>,
    pub is_offline: Option<bool>,
    pub stack_parent_id: Option<Option<Uuid>>,
}

/// Named relations to eager-load in batch reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetRelations {
    pub exif: bool,
    pub smart_info: bool,
    pub faces: bool,
}

/// A detected face region on an asset; presence drives the face-recognition
/// backlog, `person_id` drives person-scoped timeline queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AssetFace {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub person_id: Option<Uuid>,
}

/// An asset with its requested relations merged in.
#[derive(Debug, Clone)]
pub struct AssetDetail {
    pub asset: Asset,
    pub exif: Option<Exif>,
    pub smart_info: Option<SmartInfo>,
    pub faces: Vec<AssetFace>,
}
