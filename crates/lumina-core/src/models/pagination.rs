use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Keyset continuation token: position of the last row already returned in
/// `(created_at, id)` order. Not a snapshot — rows inserted after the sweep
/// began may or may not appear, but pre-existing rows are never skipped or
/// duplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCursor {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

/// Page request for all list operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationOptions {
    /// Requested page size; clamped to [1, MAX_PAGE_SIZE], 0 = default.
    pub take: i64,
    /// Resume after this position; `None` starts from the beginning.
    pub cursor: Option<AssetCursor>,
}

impl PaginationOptions {
    pub fn first(take: i64) -> Self {
        Self { take, cursor: None }
    }

    pub fn after(take: i64, cursor: AssetCursor) -> Self {
        Self {
            take,
            cursor: Some(cursor),
        }
    }

    pub fn clamped_take(&self) -> i64 {
        if self.take <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.take.min(MAX_PAGE_SIZE)
        }
    }
}

/// One page of results plus the continuation token. `next` is `None` when the
/// sweep is exhausted.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub next: Option<AssetCursor>,
}

impl<T> Paginated<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next: None,
        }
    }
}
