//! Minimal album structure: membership management plus the two asset probes
//! the album views need (cover candidate and freshness marker).

use lumina_core::models::{Album, Asset};
use lumina_core::CatalogError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::db::transaction::TransactionGuard;

#[derive(Clone)]
pub struct AlbumRepository {
    pool: PgPool,
}

impl AlbumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, name), fields(db.table = "albums", db.operation = "insert"))]
    pub async fn create(&self, owner_id: Uuid, name: &str) -> Result<Album, CatalogError> {
        let album = sqlx::query_as::<Postgres, Album>(
            "INSERT INTO albums (id, owner_id, name) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(album)
    }

    #[tracing::instrument(skip(self), fields(db.table = "albums", db.operation = "select", db.record_id = %id))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Album>, CatalogError> {
        let album = sqlx::query_as::<Postgres, Album>("SELECT * FROM albums WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(album)
    }

    /// Add a batch of assets to an album. Already-present pairs are skipped;
    /// the membership change and the album's last-modified bump land in one
    /// transaction.
    #[tracing::instrument(skip(self, asset_ids), fields(db.table = "album_assets", db.operation = "insert", db.record_id = %album_id))]
    pub async fn add_assets(
        &self,
        album_id: Uuid,
        asset_ids: &[Uuid],
    ) -> Result<(), CatalogError> {
        if asset_ids.is_empty() {
            return Ok(());
        }

        let mut tx = TransactionGuard::begin(&self.pool).await?;

        sqlx::query(
            r#"
            INSERT INTO album_assets (album_id, asset_id)
            SELECT $1::uuid, unnest($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(album_id)
        .bind(asset_ids)
        .execute(&mut **tx)
        .await?;

        let rows_affected = sqlx::query("UPDATE albums SET updated_at = NOW() WHERE id = $1")
            .bind(album_id)
            .execute(&mut **tx)
            .await?
            .rows_affected();
        if rows_affected == 0 {
            tx.rollback().await?;
            return Err(CatalogError::NotFound(format!(
                "Album {} not found",
                album_id
            )));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Remove a batch of assets from an album; absent pairs are ignored.
    #[tracing::instrument(skip(self, asset_ids), fields(db.table = "album_assets", db.operation = "delete", db.record_id = %album_id))]
    pub async fn remove_assets(
        &self,
        album_id: Uuid,
        asset_ids: &[Uuid],
    ) -> Result<(), CatalogError> {
        if asset_ids.is_empty() {
            return Ok(());
        }

        let mut tx = TransactionGuard::begin(&self.pool).await?;

        sqlx::query("DELETE FROM album_assets WHERE album_id = $1 AND asset_id = ANY($2)")
            .bind(album_id)
            .bind(asset_ids)
            .execute(&mut **tx)
            .await?;

        let rows_affected = sqlx::query("UPDATE albums SET updated_at = NOW() WHERE id = $1")
            .bind(album_id)
            .execute(&mut **tx)
            .await?
            .rows_affected();
        if rows_affected == 0 {
            tx.rollback().await?;
            return Err(CatalogError::NotFound(format!(
                "Album {} not found",
                album_id
            )));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Cover candidate: the chronologically first non-trashed asset.
    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "select", db.record_id = %album_id))]
    pub async fn get_first_asset(&self, album_id: Uuid) -> Result<Option<Asset>, CatalogError> {
        let asset = sqlx::query_as::<Postgres, Asset>(
            r#"
            SELECT a.* FROM assets a
            JOIN album_assets aa ON aa.asset_id = a.id
            WHERE aa.album_id = $1 AND a.deleted_at IS NULL
            ORDER BY a.local_date_time ASC, a.id ASC
            LIMIT 1
            "#,
        )
        .bind(album_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(asset)
    }

    /// Freshness marker: the most recently modified non-trashed member.
    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "select", db.record_id = %album_id))]
    pub async fn get_last_updated_asset(
        &self,
        album_id: Uuid,
    ) -> Result<Option<Asset>, CatalogError> {
        let asset = sqlx::query_as::<Postgres, Asset>(
            r#"
            SELECT a.* FROM assets a
            JOIN album_assets aa ON aa.asset_id = a.id
            WHERE aa.album_id = $1 AND a.deleted_at IS NULL
            ORDER BY a.updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(album_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(asset)
    }
}
