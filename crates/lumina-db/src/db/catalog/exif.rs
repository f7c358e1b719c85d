//! EXIF and smart-info side tables.
//!
//! Both tables are keyed 1:1 by asset id and written with merge semantics:
//! a `None` field in the payload never erases a stored value, so repeated
//! extraction passes only ever add or overwrite what they actually produced.

use lumina_core::models::{Exif, ExifUpsert, SmartInfo, SmartInfoUpsert};
use lumina_core::CatalogError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Foreign-key violations on the side tables mean the parent asset is gone.
fn map_missing_asset(err: sqlx::Error, asset_id: Uuid) -> CatalogError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23503") {
            return CatalogError::NotFound(format!("Asset {} not found", asset_id));
        }
    }
    err.into()
}

#[derive(Clone)]
pub struct ExifRepository {
    pool: PgPool,
}

impl ExifRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Merge-upsert the EXIF record for an asset. Whole-record atomic: a
    /// concurrent reader sees either the previous record or the merged one.
    #[tracing::instrument(skip(self, dto), fields(db.table = "exif", db.operation = "upsert", db.record_id = %dto.asset_id))]
    pub async fn upsert(&self, dto: ExifUpsert) -> Result<Exif, CatalogError> {
        let exif = sqlx::query_as::<Postgres, Exif>(
            r#"
            INSERT INTO exif (
                asset_id, captured_at, latitude, longitude, camera_make,
                camera_model, lens_model, iso, f_number, exposure_time,
                focal_length, description, time_zone, live_photo_cid
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (asset_id) DO UPDATE SET
                captured_at = COALESCE(EXCLUDED.captured_at, exif.captured_at),
                latitude = COALESCE(EXCLUDED.latitude, exif.latitude),
                longitude = COALESCE(EXCLUDED.longitude, exif.longitude),
                camera_make = COALESCE(EXCLUDED.camera_make, exif.camera_make),
                camera_model = COALESCE(EXCLUDED.camera_model, exif.camera_model),
                lens_model = COALESCE(EXCLUDED.lens_model, exif.lens_model),
                iso = COALESCE(EXCLUDED.iso, exif.iso),
                f_number = COALESCE(EXCLUDED.f_number, exif.f_number),
                exposure_time = COALESCE(EXCLUDED.exposure_time, exif.exposure_time),
                focal_length = COALESCE(EXCLUDED.focal_length, exif.focal_length),
                description = COALESCE(EXCLUDED.description, exif.description),
                time_zone = COALESCE(EXCLUDED.time_zone, exif.time_zone),
                live_photo_cid = COALESCE(EXCLUDED.live_photo_cid, exif.live_photo_cid)
            RETURNING *
            "#,
        )
        .bind(dto.asset_id)
        .bind(dto.captured_at)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .bind(&dto.camera_make)
        .bind(&dto.camera_model)
        .bind(&dto.lens_model)
        .bind(dto.iso)
        .bind(dto.f_number)
        .bind(&dto.exposure_time)
        .bind(dto.focal_length)
        .bind(&dto.description)
        .bind(&dto.time_zone)
        .bind(&dto.live_photo_cid)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_missing_asset(e, dto.asset_id))?;

        Ok(exif)
    }

    /// Merge-upsert the machine-derived descriptors for an asset.
    #[tracing::instrument(skip(self, dto), fields(db.table = "smart_info", db.operation = "upsert", db.record_id = %dto.asset_id))]
    pub async fn upsert_smart_info(&self, dto: SmartInfoUpsert) -> Result<SmartInfo, CatalogError> {
        let info = sqlx::query_as::<Postgres, SmartInfo>(
            r#"
            INSERT INTO smart_info (asset_id, tags, objects, clip_embedding)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (asset_id) DO UPDATE SET
                tags = COALESCE(EXCLUDED.tags, smart_info.tags),
                objects = COALESCE(EXCLUDED.objects, smart_info.objects),
                clip_embedding = COALESCE(EXCLUDED.clip_embedding, smart_info.clip_embedding)
            RETURNING *
            "#,
        )
        .bind(dto.asset_id)
        .bind(&dto.tags)
        .bind(&dto.objects)
        .bind(&dto.clip_embedding)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_missing_asset(e, dto.asset_id))?;

        Ok(info)
    }

    #[tracing::instrument(skip(self), fields(db.table = "exif", db.operation = "select", db.record_id = %asset_id))]
    pub async fn get_by_asset_id(&self, asset_id: Uuid) -> Result<Option<Exif>, CatalogError> {
        let exif = sqlx::query_as::<Postgres, Exif>("SELECT * FROM exif WHERE asset_id = $1")
            .bind(asset_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(exif)
    }

    #[tracing::instrument(skip(self), fields(db.table = "smart_info", db.operation = "select", db.record_id = %asset_id))]
    pub async fn get_smart_info(&self, asset_id: Uuid) -> Result<Option<SmartInfo>, CatalogError> {
        let info =
            sqlx::query_as::<Postgres, SmartInfo>("SELECT * FROM smart_info WHERE asset_id = $1")
                .bind(asset_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(info)
    }
}
