use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// EXIF side-record: optional 1:1 extension of an asset. Absence is legal;
/// metadata extraction completes asynchronously and may run repeatedly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Exif {
    pub asset_id: Uuid,
    pub captured_at: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub lens_model: Option<String>,
    pub iso: Option<i32>,
    pub f_number: Option<f64>,
    pub exposure_time: Option<String>,
    pub focal_length: Option<f64>,
    pub description: Option<String>,
    pub time_zone: Option<String>,
    /// Capture identifier shared by the still and motion halves of a live
    /// photo; the pairing key for sibling lookup.
    pub live_photo_cid: Option<String>,
}

/// Merge payload for EXIF upsert. `None` fields never erase stored values;
/// re-extraction only adds or overwrites what it actually produced.
#[derive(Debug, Clone, Default)]
pub struct ExifUpsert {
    pub asset_id: Uuid,
    pub captured_at: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub lens_model: Option<String>,
    pub iso: Option<i32>,
    pub f_number: Option<f64>,
    pub exposure_time: Option<String>,
    pub focal_length: Option<f64>,
    pub description: Option<String>,
    pub time_zone: Option<String>,
    pub live_photo_cid: Option<String>,
}

impl ExifUpsert {
    pub fn new(asset_id: Uuid) -> Self {
        Self {
            asset_id,
            ..Default::default()
        }
    }
}

/// Machine-derived descriptors: object tags and the CLIP embedding. Tracked
/// for presence by the backlog queries; similarity search lives elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SmartInfo {
    pub asset_id: Uuid,
    pub tags: Option<Vec<String>>,
    pub objects: Option<Vec<String>>,
    pub clip_embedding: Option<Vec<f32>>,
}

/// Merge payload for smart-info upsert, same semantics as [`ExifUpsert`].
#[derive(Debug, Clone, Default)]
pub struct SmartInfoUpsert {
    pub asset_id: Uuid,
    pub tags: Option<Vec<String>>,
    pub objects: Option<Vec<String>>,
    pub clip_embedding: Option<Vec<f32>>,
}

impl SmartInfoUpsert {
    pub fn new(asset_id: Uuid) -> Self {
        Self {
            asset_id,
            ..Default::default()
        }
    }
}
