//! Time-bucket aggregation and calendar recall.
//!
//! Buckets are keyed by the asset's wall-clock capture time (the stored
//! timezone-naive `local_date_time`), so a photo taken at 23:30 in Tokyo
//! lands in the Tokyo calendar day regardless of the server timezone.

use chrono::{Duration, NaiveDate};
use lumina_core::models::{Asset, MonthDay, TimeBucketItem, TimeBucketOptions};
use lumina_core::CatalogError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct TimelineRepository {
    pool: PgPool,
}

/// Assemble the shared scope predicates for bucket queries. Boolean filters
/// are inlined; only uuid parameters are returned for binding, numbered from
/// `first_idx`.
fn scope_clauses(options: &TimeBucketOptions, first_idx: usize) -> (Vec<String>, Vec<Uuid>) {
    let mut clauses = vec!["a.is_visible".to_string()];
    let mut binds: Vec<Uuid> = Vec::new();
    let mut idx = first_idx;

    clauses.push(match options.is_trashed {
        Some(true) => "a.deleted_at IS NOT NULL".to_string(),
        _ => "a.deleted_at IS NULL".to_string(),
    });
    if let Some(archived) = options.is_archived {
        clauses.push(if archived {
            "a.is_archived".to_string()
        } else {
            "NOT a.is_archived".to_string()
        });
    }
    if let Some(fav) = options.is_favorite {
        clauses.push(if fav {
            "a.is_favorite".to_string()
        } else {
            "NOT a.is_favorite".to_string()
        });
    }
    if !options.with_stacked {
        clauses.push("a.stack_parent_id IS NULL".to_string());
    }

    if let Some(user_id) = options.user_id {
        clauses.push(format!("a.owner_id = ${}", idx));
        binds.push(user_id);
        idx += 1;
    }
    if let Some(album_id) = options.album_id {
        clauses.push(format!(
            "EXISTS (SELECT 1 FROM album_assets aa WHERE aa.album_id = ${} AND aa.asset_id = a.id)",
            idx
        ));
        binds.push(album_id);
        idx += 1;
    }
    if let Some(person_id) = options.person_id {
        clauses.push(format!(
            "EXISTS (SELECT 1 FROM asset_faces f WHERE f.person_id = ${} AND f.asset_id = a.id)",
            idx
        ));
        binds.push(person_id);
    }

    (clauses, binds)
}

impl TimelineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every non-empty bucket in scope, newest first, with exact counts.
    /// Buckets with zero matching assets do not appear.
    #[tracing::instrument(skip(self, options), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_time_buckets(
        &self,
        options: &TimeBucketOptions,
    ) -> Result<Vec<TimeBucketItem>, CatalogError> {
        let size = options
            .size
            .ok_or_else(|| CatalogError::InvalidInput("time bucket size is required".to_string()))?;

        let (clauses, binds) = scope_clauses(options, 2);
        let query = format!(
            r#"
            SELECT to_char(a.local_date_time, $1) AS time_bucket, COUNT(*) AS count
            FROM assets a
            WHERE {}
            GROUP BY 1
            ORDER BY 1 DESC
            "#,
            clauses.join(" AND ")
        );

        let mut q = sqlx::query_as::<Postgres, TimeBucketItem>(&query).bind(size.key_format());
        for id in binds {
            q = q.bind(id);
        }
        let buckets = q.fetch_all(&self.pool).await?;

        Ok(buckets)
    }

    /// The assets inside one bucket, newest first. An asset appears in the
    /// contents of bucket `b` exactly when `b` is its key at the requested
    /// granularity, so bucket counts always match their contents.
    #[tracing::instrument(skip(self, options), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_time_bucket(
        &self,
        time_bucket: &str,
        options: &TimeBucketOptions,
    ) -> Result<Vec<Asset>, CatalogError> {
        let size = options
            .size
            .ok_or_else(|| CatalogError::InvalidInput("time bucket size is required".to_string()))?;

        let (mut clauses, binds) = scope_clauses(options, 3);
        clauses.push("to_char(a.local_date_time, $1) = $2".to_string());
        let query = format!(
            "SELECT a.* FROM assets a WHERE {} ORDER BY a.local_date_time DESC, a.id DESC",
            clauses.join(" AND ")
        );

        let mut q = sqlx::query_as::<Postgres, Asset>(&query)
            .bind(size.key_format())
            .bind(time_bucket);
        for id in binds {
            q = q.bind(id);
        }
        let assets = q.fetch_all(&self.pool).await?;

        Ok(assets)
    }

    /// All of an owner's visible, non-trashed assets captured on one calendar
    /// day, newest first.
    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_by_date(
        &self,
        owner_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Asset>, CatalogError> {
        let start = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| CatalogError::InvalidInput(format!("invalid date: {}", date)))?;
        let end = start + Duration::days(1);

        let assets = sqlx::query_as::<Postgres, Asset>(
            r#"
            SELECT * FROM assets
            WHERE owner_id = $1
              AND deleted_at IS NULL
              AND is_visible
              AND local_date_time >= $2
              AND local_date_time < $3
            ORDER BY local_date_time DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(assets)
    }

    /// "On this day" recall across years: assets captured on the given
    /// month/day in any year. Feb 29 matches only in years that contain it.
    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "select"))]
    pub async fn get_by_day_of_year(
        &self,
        owner_id: Uuid,
        day: MonthDay,
    ) -> Result<Vec<Asset>, CatalogError> {
        let assets = sqlx::query_as::<Postgres, Asset>(
            r#"
            SELECT * FROM assets
            WHERE owner_id = $1
              AND deleted_at IS NULL
              AND is_visible
              AND date_part('month', local_date_time)::int = $2
              AND date_part('day', local_date_time)::int = $3
            ORDER BY local_date_time DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .bind(day.month as i32)
        .bind(day.day as i32)
        .fetch_all(&self.pool)
        .await?;

        Ok(assets)
    }
}
