use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CatalogError;

/// Granularity of a timeline bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeBucketSize {
    Day,
    Month,
}

impl TimeBucketSize {
    /// Postgres `to_char` pattern producing the bucket key for this size.
    pub fn key_format(&self) -> &'static str {
        match self {
            TimeBucketSize::Day => "YYYY-MM-DD",
            TimeBucketSize::Month => "YYYY-MM",
        }
    }
}

/// Filter scope shared by bucket listing and bucket contents. Exactly one of
/// `user_id` / `album_id` / `person_id` is normally set; combining them
/// intersects the scopes.
#[derive(Debug, Clone, Default)]
pub struct TimeBucketOptions {
    pub size: Option<TimeBucketSize>,
    pub user_id: Option<Uuid>,
    pub album_id: Option<Uuid>,
    pub person_id: Option<Uuid>,
    pub is_archived: Option<bool>,
    pub is_favorite: Option<bool>,
    pub is_trashed: Option<bool>,
    /// When false, only one representative per duplicate stack (the stack
    /// primary) is counted and returned.
    pub with_stacked: bool,
}

impl TimeBucketOptions {
    pub fn day() -> Self {
        Self {
            size: Some(TimeBucketSize::Day),
            ..Default::default()
        }
    }

    pub fn month() -> Self {
        Self {
            size: Some(TimeBucketSize::Month),
            ..Default::default()
        }
    }
}

/// One non-empty bucket: calendar key plus the count of matching assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TimeBucketItem {
    pub time_bucket: String,
    pub count: i64,
}

/// Calendar day independent of year, for "on this day" recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    /// Validate the pair as a calendar day. Feb 29 is accepted; the lookup
    /// matches it only in years that actually contain it.
    pub fn new(month: u32, day: u32) -> Result<Self, CatalogError> {
        let max_day = match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 => 29,
            _ => {
                return Err(CatalogError::InvalidInput(format!(
                    "invalid month: {}",
                    month
                )))
            }
        };
        if day == 0 || day > max_day {
            return Err(CatalogError::InvalidInput(format!(
                "invalid day {} for month {}",
                day, month
            )));
        }
        Ok(Self { month, day })
    }
}
