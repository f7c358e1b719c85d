//! Asset record store: creation, reads, partial updates, trash lifecycle,
//! keyset pagination, dedup lookups, live-photo pairing, derived-artifact
//! discovery, statistics, and map markers.

use std::collections::HashMap;

use lumina_core::constants::MAX_MAP_MARKERS;
use lumina_core::models::{
    Asset, AssetBulkUpdate, AssetCreate, AssetCursor, AssetDetail, AssetFace, AssetRelations,
    AssetSearchOptions, AssetStats, AssetStatsOptions, AssetType, AssetUpdate, Exif,
    LivePhotoSearchOptions, MapMarker, MapMarkerSearchOptions, Paginated, PaginationOptions,
    SmartInfo, SortOrder, WithProperty, WithoutProperty,
};
use lumina_core::CatalogError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for the canonical asset table.
#[derive(Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

/// Cut a `take + 1` overfetch down to one page and derive the continuation
/// token from the last returned row.
fn paginate(mut items: Vec<Asset>, take: i64) -> Paginated<Asset> {
    let next = if items.len() as i64 > take {
        items.truncate(take as usize);
        items.last().map(|a| AssetCursor {
            created_at: a.created_at,
            id: a.id,
        })
    } else {
        None
    };
    Paginated { items, next }
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Commit a new asset record. Uniqueness of `(owner_id, checksum)` among
    /// non-trashed assets and of `(device_id, device_asset_id, owner_id)` is
    /// enforced by the store's unique indexes; a violation surfaces as
    /// `Conflict` and the caller recovers the winner via `get_by_checksum`.
    #[tracing::instrument(skip(self, dto), fields(db.table = "assets", db.operation = "insert"))]
    pub async fn create(&self, dto: AssetCreate) -> Result<Asset, CatalogError> {
        let id = Uuid::new_v4();
        let asset = sqlx::query_as::<Postgres, Asset>(
            r#"
            INSERT INTO assets (
                id, owner_id, library_id, device_id, device_asset_id, asset_type,
                original_path, original_file_name, checksum,
                file_created_at, file_modified_at, local_date_time,
                is_favorite, is_visible, sidecar_path, duration_seconds
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.owner_id)
        .bind(dto.library_id)
        .bind(&dto.device_id)
        .bind(&dto.device_asset_id)
        .bind(dto.asset_type)
        .bind(&dto.original_path)
        .bind(&dto.original_file_name)
        .bind(&dto.checksum)
        .bind(dto.file_created_at)
        .bind(dto.file_modified_at)
        .bind(dto.local_date_time)
        .bind(dto.is_favorite)
        .bind(dto.is_visible)
        .bind(&dto.sidecar_path)
        .bind(dto.duration_seconds)
        .fetch_one(&self.pool)
        .await?;

        Ok(asset)
    }

    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "select", db.record_id = %id))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Asset>, CatalogError> {
        let asset = sqlx::query_as::<Postgres, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(asset)
    }

    /// Batch read with optional eager-loading of side tables. Side tables are
    /// fetched in one query each, never per asset. Order of results is not
    /// specified.
    #[tracing::instrument(skip(self, ids), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_by_ids(
        &self,
        ids: &[Uuid],
        relations: AssetRelations,
    ) -> Result<Vec<AssetDetail>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let assets = sqlx::query_as::<Postgres, Asset>("SELECT * FROM assets WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        let mut exif_map: HashMap<Uuid, Exif> = HashMap::new();
        if relations.exif {
            let rows = sqlx::query_as::<Postgres, Exif>("SELECT * FROM exif WHERE asset_id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
            exif_map = rows.into_iter().map(|e| (e.asset_id, e)).collect();
        }

        let mut smart_map: HashMap<Uuid, SmartInfo> = HashMap::new();
        if relations.smart_info {
            let rows = sqlx::query_as::<Postgres, SmartInfo>(
                "SELECT * FROM smart_info WHERE asset_id = ANY($1)",
            )
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
            smart_map = rows.into_iter().map(|s| (s.asset_id, s)).collect();
        }

        let mut faces_map: HashMap<Uuid, Vec<AssetFace>> = HashMap::new();
        if relations.faces {
            let rows = sqlx::query_as::<Postgres, AssetFace>(
                "SELECT * FROM asset_faces WHERE asset_id = ANY($1)",
            )
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
            for face in rows {
                faces_map.entry(face.asset_id).or_default().push(face);
            }
        }

        Ok(assets
            .into_iter()
            .map(|asset| {
                let id = asset.id;
                AssetDetail {
                    exif: exif_map.remove(&id),
                    smart_info: smart_map.remove(&id),
                    faces: faces_map.remove(&id).unwrap_or_default(),
                    asset,
                }
            })
            .collect())
    }

    /// Dedup primitive: exact-content lookup among the owner's non-trashed
    /// assets. Read-miss returns `None`, never an error.
    #[tracing::instrument(skip(self, checksum), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_by_checksum(
        &self,
        owner_id: Uuid,
        checksum: &[u8],
    ) -> Result<Option<Asset>, CatalogError> {
        let asset = sqlx::query_as::<Postgres, Asset>(
            "SELECT * FROM assets WHERE owner_id = $1 AND checksum = $2 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .bind(checksum)
        .fetch_optional(&self.pool)
        .await?;

        Ok(asset)
    }

    /// Re-scan matching: find the record a library file maps to.
    #[tracing::instrument(skip(self, original_path), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_by_library_id_and_original_path(
        &self,
        library_id: Uuid,
        original_path: &str,
    ) -> Result<Option<Asset>, CatalogError> {
        let asset = sqlx::query_as::<Postgres, Asset>(
            "SELECT * FROM assets WHERE library_id = $1 AND original_path = $2",
        )
        .bind(library_id)
        .bind(original_path)
        .fetch_optional(&self.pool)
        .await?;

        Ok(asset)
    }

    #[tracing::instrument(skip(self, library_ids), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_by_library_ids(&self, library_ids: &[Uuid]) -> Result<Vec<Asset>, CatalogError> {
        let assets = sqlx::query_as::<Postgres, Asset>(
            "SELECT * FROM assets WHERE library_id = ANY($1) ORDER BY created_at, id",
        )
        .bind(library_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(assets)
    }

    /// Random sample of the owner's visible, non-trashed assets.
    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_random(&self, owner_id: Uuid, count: i64) -> Result<Vec<Asset>, CatalogError> {
        let assets = sqlx::query_as::<Postgres, Asset>(
            r#"
            SELECT * FROM assets
            WHERE owner_id = $1 AND deleted_at IS NULL AND is_visible
            ORDER BY random()
            LIMIT $2
            "#,
        )
        .bind(owner_id)
        .bind(count)
        .fetch_all(&self.pool)
        .await?;

        Ok(assets)
    }

    /// Partial update by id. Absent patch fields are left unchanged; nullable
    /// fields are cleared only by an explicit `Some(None)`. The UPDATE is one
    /// statement, so concurrent savers interleave at row granularity only.
    #[tracing::instrument(skip(self, dto), fields(db.table = "assets", db.operation = "update", db.record_id = %dto.id))]
    pub async fn save(&self, dto: AssetUpdate) -> Result<Asset, CatalogError> {
        let mut query = String::from("UPDATE assets SET updated_at = NOW()");
        let mut idx = 1;

        macro_rules! set_clause {
            ($field:expr, $column:literal) => {
                if $field.is_some() {
                    query.push_str(&format!(", {} = ${}", $column, idx));
                    idx += 1;
                }
            };
        }

        set_clause!(dto.original_path, "original_path");
        set_clause!(dto.original_file_name, "original_file_name");
        set_clause!(dto.file_created_at, "file_created_at");
        set_clause!(dto.file_modified_at, "file_modified_at");
        set_clause!(dto.local_date_time, "local_date_time");
        set_clause!(dto.is_favorite, "is_favorite");
        set_clause!(dto.is_archived, "is_archived");
        set_clause!(dto.is_visible, "is_visible");
        set_clause!(dto.is_offline, "is_offline");
        set_clause!(dto.duration_seconds, "duration_seconds");
        set_clause!(dto.sidecar_path, "sidecar_path");
        set_clause!(dto.preview_path, "preview_path");
        set_clause!(dto.encoded_video_path, "encoded_video_path");
        set_clause!(dto.stack_parent_id, "stack_parent_id");

        query.push_str(&format!(" WHERE id = ${} RETURNING *", idx));

        let mut q = sqlx::query_as::<Postgres, Asset>(&query);
        if let Some(v) = dto.original_path {
            q = q.bind(v);
        }
        if let Some(v) = dto.original_file_name {
            q = q.bind(v);
        }
        if let Some(v) = dto.file_created_at {
            q = q.bind(v);
        }
        if let Some(v) = dto.file_modified_at {
            q = q.bind(v);
        }
        if let Some(v) = dto.local_date_time {
            q = q.bind(v);
        }
        if let Some(v) = dto.is_favorite {
            q = q.bind(v);
        }
        if let Some(v) = dto.is_archived {
            q = q.bind(v);
        }
        if let Some(v) = dto.is_visible {
            q = q.bind(v);
        }
        if let Some(v) = dto.is_offline {
            q = q.bind(v);
        }
        if let Some(v) = dto.duration_seconds {
            q = q.bind(v);
        }
        if let Some(v) = dto.sidecar_path {
            q = q.bind(v);
        }
        if let Some(v) = dto.preview_path {
            q = q.bind(v);
        }
        if let Some(v) = dto.encoded_video_path {
            q = q.bind(v);
        }
        if let Some(v) = dto.stack_parent_id {
            q = q.bind(v);
        }
        q = q.bind(dto.id);

        q.fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("Asset {} not found", dto.id)))
    }

    /// Bulk field set over an id batch. One statement, no per-element failure
    /// reporting; callers re-query to verify which rows changed.
    #[tracing::instrument(skip(self, ids, fields), fields(db.table = "assets", db.operation = "update"))]
    pub async fn update_all(
        &self,
        ids: &[Uuid],
        fields: AssetBulkUpdate,
    ) -> Result<(), CatalogError> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut query = String::from("UPDATE assets SET updated_at = NOW()");
        let mut idx = 1;

        if fields.is_favorite.is_some() {
            query.push_str(&format!(", is_favorite = ${}", idx));
            idx += 1;
        }
        if fields.is_archived.is_some() {
            query.push_str(&format!(", is_archived = ${}", idx));
            idx += 1;
        }
        if fields.is_visible.is_some() {
            query.push_str(&format!(", is_visible = ${}", idx));
            idx += 1;
        }
        if fields.is_offline.is_some() {
            query.push_str(&format!(", is_offline = ${}", idx));
            idx += 1;
        }
        if fields.stack_parent_id.is_some() {
            query.push_str(&format!(", stack_parent_id = ${}", idx));
            idx += 1;
        }

        query.push_str(&format!(" WHERE id = ANY(${})", idx));

        let mut q = sqlx::query(&query);
        if let Some(v) = fields.is_favorite {
            q = q.bind(v);
        }
        if let Some(v) = fields.is_archived {
            q = q.bind(v);
        }
        if let Some(v) = fields.is_visible {
            q = q.bind(v);
        }
        if let Some(v) = fields.is_offline {
            q = q.bind(v);
        }
        if let Some(v) = fields.stack_parent_id {
            q = q.bind(v);
        }
        q.bind(ids).execute(&self.pool).await?;

        Ok(())
    }

    /// Hard delete, irreversible. Side-table rows cascade.
    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "delete", db.record_id = %id))]
    pub async fn remove(&self, id: Uuid) -> Result<(), CatalogError> {
        let rows_affected = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(CatalogError::NotFound(format!("Asset {} not found", id)));
        }
        Ok(())
    }

    /// Full account teardown: hard delete every asset owned by a user.
    /// Atomic per row, not one global transaction.
    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "delete"))]
    pub async fn delete_all(&self, owner_id: Uuid) -> Result<u64, CatalogError> {
        let rows_affected = sqlx::query("DELETE FROM assets WHERE owner_id = $1")
            .bind(owner_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(owner_id = %owner_id, deleted = rows_affected, "Deleted all assets for owner");
        Ok(rows_affected)
    }

    /// Move a batch to the trash. Idempotent: already-trashed ids are left
    /// untouched so their original trash timestamp survives.
    #[tracing::instrument(skip(self, ids), fields(db.table = "assets", db.operation = "update"))]
    pub async fn soft_delete_all(&self, ids: &[Uuid]) -> Result<(), CatalogError> {
        if ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "UPDATE assets SET deleted_at = NOW(), updated_at = NOW() WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Restore a batch from the trash. Idempotent for active ids.
    #[tracing::instrument(skip(self, ids), fields(db.table = "assets", db.operation = "update"))]
    pub async fn restore_all(&self, ids: &[Uuid]) -> Result<(), CatalogError> {
        if ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "UPDATE assets SET deleted_at = NULL, updated_at = NOW() WHERE id = ANY($1) AND deleted_at IS NOT NULL",
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All assets, filtered. Service-internal; callers scope by owner where
    /// tenancy matters.
    #[tracing::instrument(skip(self, pagination, options), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_all(
        &self,
        pagination: PaginationOptions,
        options: &AssetSearchOptions,
    ) -> Result<Paginated<Asset>, CatalogError> {
        self.search(pagination, None, options).await
    }

    /// One owner's assets, filtered.
    #[tracing::instrument(skip(self, pagination, options), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_by_user_id(
        &self,
        pagination: PaginationOptions,
        owner_id: Uuid,
        options: &AssetSearchOptions,
    ) -> Result<Paginated<Asset>, CatalogError> {
        self.search(pagination, Some(owner_id), options).await
    }

    async fn search(
        &self,
        pagination: PaginationOptions,
        owner_id: Option<Uuid>,
        options: &AssetSearchOptions,
    ) -> Result<Paginated<Asset>, CatalogError> {
        let take = pagination.clamped_take();
        let mut where_parts: Vec<String> = Vec::new();
        let mut idx = 1;

        if owner_id.is_some() {
            where_parts.push(format!("owner_id = ${}", idx));
            idx += 1;
        }

        // Trash visibility: an explicit cutoff targets trashed rows only
        // (trash-emptying); otherwise trashed rows are excluded unless the
        // caller opts in.
        if options.trashed_before.is_some() {
            where_parts.push(format!("deleted_at IS NOT NULL AND deleted_at < ${}", idx));
            idx += 1;
        } else if !options.with_deleted {
            where_parts.push("deleted_at IS NULL".to_string());
        }

        if options.is_visible.is_some() {
            where_parts.push(format!("is_visible = ${}", idx));
            idx += 1;
        }
        if options.asset_type.is_some() {
            where_parts.push(format!("asset_type = ${}", idx));
            idx += 1;
        }

        let cursor_cmp = match options.order {
            SortOrder::Asc => ">",
            SortOrder::Desc => "<",
        };
        if pagination.cursor.is_some() {
            where_parts.push(format!(
                "(created_at, id) {} (${}, ${})",
                cursor_cmp,
                idx,
                idx + 1
            ));
            idx += 2;
        }

        let order_dir = match options.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        let where_sql = if where_parts.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", where_parts.join(" AND "))
        };
        let query = format!(
            "SELECT * FROM assets {} ORDER BY created_at {dir}, id {dir} LIMIT ${}",
            where_sql,
            idx,
            dir = order_dir
        );

        let mut q = sqlx::query_as::<Postgres, Asset>(&query);
        if let Some(owner) = owner_id {
            q = q.bind(owner);
        }
        if let Some(cutoff) = options.trashed_before {
            q = q.bind(cutoff);
        }
        if let Some(v) = options.is_visible {
            q = q.bind(v);
        }
        if let Some(v) = options.asset_type {
            q = q.bind(v);
        }
        if let Some(cursor) = pagination.cursor {
            q = q.bind(cursor.created_at).bind(cursor.id);
        }
        let rows = q.bind(take + 1).fetch_all(&self.pool).await?;

        Ok(paginate(rows, take))
    }

    /// Non-trashed assets belonging to one album, in creation order.
    #[tracing::instrument(skip(self, pagination), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_by_album_id(
        &self,
        pagination: PaginationOptions,
        album_id: Uuid,
    ) -> Result<Paginated<Asset>, CatalogError> {
        let take = pagination.clamped_take();
        let mut query = String::from(
            r#"
            SELECT a.* FROM assets a
            JOIN album_assets aa ON aa.asset_id = a.id
            WHERE aa.album_id = $1 AND a.deleted_at IS NULL
            "#,
        );
        if pagination.cursor.is_some() {
            query.push_str(" AND (a.created_at, a.id) > ($2, $3)");
        }
        query.push_str(&format!(
            " ORDER BY a.created_at, a.id LIMIT ${}",
            if pagination.cursor.is_some() { 4 } else { 2 }
        ));

        let mut q = sqlx::query_as::<Postgres, Asset>(&query).bind(album_id);
        if let Some(cursor) = pagination.cursor {
            q = q.bind(cursor.created_at).bind(cursor.id);
        }
        let rows = q.bind(take + 1).fetch_all(&self.pool).await?;

        Ok(paginate(rows, take))
    }

    /// Backlog discovery: one page of assets missing the named derived
    /// artifact, oldest first so the backlog drains in FIFO order. Trashed
    /// and invisible assets never surface here.
    #[tracing::instrument(skip(self, pagination), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_without(
        &self,
        pagination: PaginationOptions,
        property: WithoutProperty,
    ) -> Result<Paginated<Asset>, CatalogError> {
        let predicate = match property {
            WithoutProperty::Thumbnail => "a.preview_path IS NULL",
            WithoutProperty::EncodedVideo => {
                "(a.asset_type = 'video' AND a.encoded_video_path IS NULL)"
            }
            WithoutProperty::Exif => "NOT EXISTS (SELECT 1 FROM exif e WHERE e.asset_id = a.id)",
            WithoutProperty::ClipEmbedding => {
                "NOT EXISTS (SELECT 1 FROM smart_info s WHERE s.asset_id = a.id AND s.clip_embedding IS NOT NULL)"
            }
            WithoutProperty::ObjectTags => {
                "NOT EXISTS (SELECT 1 FROM smart_info s WHERE s.asset_id = a.id AND s.tags IS NOT NULL)"
            }
            // Face detection runs on the decoded preview, so an asset without
            // one is not yet eligible.
            WithoutProperty::Faces => {
                "(a.preview_path IS NOT NULL AND NOT EXISTS (SELECT 1 FROM asset_faces f WHERE f.asset_id = a.id))"
            }
            WithoutProperty::Sidecar => "a.sidecar_path IS NULL",
        };

        self.page_by_predicate(pagination, predicate, None).await
    }

    /// Inverse discovery for cleanup/reconciliation jobs: assets that
    /// currently *have* the named property, optionally scoped to a library.
    #[tracing::instrument(skip(self, pagination), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_with(
        &self,
        pagination: PaginationOptions,
        property: WithProperty,
        library_id: Option<Uuid>,
    ) -> Result<Paginated<Asset>, CatalogError> {
        let predicate = match property {
            WithProperty::Sidecar => "a.sidecar_path IS NOT NULL",
            WithProperty::IsOffline => "a.is_offline",
        };

        self.page_by_predicate(pagination, predicate, library_id).await
    }

    async fn page_by_predicate(
        &self,
        pagination: PaginationOptions,
        predicate: &str,
        library_id: Option<Uuid>,
    ) -> Result<Paginated<Asset>, CatalogError> {
        let take = pagination.clamped_take();
        let mut query = format!(
            "SELECT a.* FROM assets a WHERE a.deleted_at IS NULL AND a.is_visible AND {}",
            predicate
        );
        let mut idx = 1;

        if library_id.is_some() {
            query.push_str(&format!(" AND a.library_id = ${}", idx));
            idx += 1;
        }
        if pagination.cursor.is_some() {
            query.push_str(&format!(" AND (a.created_at, a.id) > (${}, ${})", idx, idx + 1));
            idx += 2;
        }
        query.push_str(&format!(" ORDER BY a.created_at, a.id LIMIT ${}", idx));

        let mut q = sqlx::query_as::<Postgres, Asset>(&query);
        if let Some(lid) = library_id {
            q = q.bind(lid);
        }
        if let Some(cursor) = pagination.cursor {
            q = q.bind(cursor.created_at).bind(cursor.id);
        }
        let rows = q.bind(take + 1).fetch_all(&self.pool).await?;

        Ok(paginate(rows, take))
    }

    /// Find the opposite half of a live-photo pair by shared capture id.
    /// Best-effort: `None` is a normal outcome, both halves are valid
    /// standalone assets.
    #[tracing::instrument(skip(self, options), fields(db.table = "assets", db.operation = "select"))]
    pub async fn find_live_photo_match(
        &self,
        options: &LivePhotoSearchOptions,
    ) -> Result<Option<Asset>, CatalogError> {
        let asset = sqlx::query_as::<Postgres, Asset>(
            r#"
            SELECT a.* FROM assets a
            JOIN exif e ON e.asset_id = a.id
            WHERE a.owner_id = $1
              AND e.live_photo_cid = $2
              AND a.id != $3
              AND a.asset_type = $4
              AND a.deleted_at IS NULL
            LIMIT 1
            "#,
        )
        .bind(options.owner_id)
        .bind(&options.live_photo_cid)
        .bind(options.other_asset_id)
        .bind(options.asset_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(asset)
    }

    /// Per-type counts for dashboard summaries. Read-committed freshness.
    #[tracing::instrument(skip(self, options), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_statistics(
        &self,
        owner_id: Uuid,
        options: AssetStatsOptions,
    ) -> Result<AssetStats, CatalogError> {
        let mut query = String::from(
            "SELECT asset_type, COUNT(*) FROM assets WHERE owner_id = $1 AND is_visible",
        );

        if let Some(fav) = options.is_favorite {
            query.push_str(if fav {
                " AND is_favorite"
            } else {
                " AND NOT is_favorite"
            });
        }
        if let Some(archived) = options.is_archived {
            query.push_str(if archived {
                " AND is_archived"
            } else {
                " AND NOT is_archived"
            });
        }
        query.push_str(match options.is_trashed {
            Some(true) => " AND deleted_at IS NOT NULL",
            _ => " AND deleted_at IS NULL",
        });
        query.push_str(" GROUP BY asset_type");

        let rows: Vec<(AssetType, i64)> = sqlx::query_as(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        let mut stats = AssetStats::default();
        for (asset_type, count) in rows {
            match asset_type {
                AssetType::Image => stats.images = count,
                AssetType::Video => stats.videos = count,
            }
        }
        Ok(stats)
    }

    /// One marker per GPS-tagged asset. Unpaginated but capped server-side.
    #[tracing::instrument(skip(self, options), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_map_markers(
        &self,
        owner_id: Uuid,
        options: MapMarkerSearchOptions,
    ) -> Result<Vec<MapMarker>, CatalogError> {
        let mut query = String::from(
            r#"
            SELECT a.id, e.latitude AS lat, e.longitude AS lon
            FROM assets a
            JOIN exif e ON e.asset_id = a.id
            WHERE a.owner_id = $1
              AND a.deleted_at IS NULL
              AND a.is_visible
              AND e.latitude IS NOT NULL
              AND e.longitude IS NOT NULL
            "#,
        );
        let mut idx = 2;

        if let Some(archived) = options.is_archived {
            query.push_str(if archived {
                " AND a.is_archived"
            } else {
                " AND NOT a.is_archived"
            });
        }
        if let Some(fav) = options.is_favorite {
            query.push_str(if fav {
                " AND a.is_favorite"
            } else {
                " AND NOT a.is_favorite"
            });
        }
        if options.file_created_before.is_some() {
            query.push_str(&format!(" AND a.file_created_at <= ${}", idx));
            idx += 1;
        }
        if options.file_created_after.is_some() {
            query.push_str(&format!(" AND a.file_created_at >= ${}", idx));
            idx += 1;
        }
        query.push_str(&format!(
            " ORDER BY a.file_created_at DESC LIMIT ${}",
            idx
        ));

        let mut q = sqlx::query_as::<Postgres, MapMarker>(&query).bind(owner_id);
        if let Some(before) = options.file_created_before {
            q = q.bind(before);
        }
        if let Some(after) = options.file_created_after {
            q = q.bind(after);
        }
        let markers = q.bind(MAX_MAP_MARKERS).fetch_all(&self.pool).await?;

        Ok(markers)
    }
}
