use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Like relation - one row per (post, user) pair, toggle lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(post_id: Uuid, user_id: Uuid) -> Self {
        Self {
            post_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Bookmark relation - same key shape as [`Like`], independent relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(post_id: Uuid, user_id: Uuid) -> Self {
        Self {
            post_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Review status of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "PENDING",
            ReportStatus::Reviewed => "REVIEWED",
            ReportStatus::Resolved => "RESOLVED",
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ReportStatus::Pending),
            "REVIEWED" => Ok(ReportStatus::Reviewed),
            "RESOLVED" => Ok(ReportStatus::Resolved),
            other => Err(format!("unknown report status: {other}")),
        }
    }
}

/// Report - append-only; at most one per (post, user), a second attempt
/// is rejected rather than toggled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub reason: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(post_id: Uuid, user_id: Uuid, reason: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            reason,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// A like resolved to the liking user's username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeEntry {
    pub user_id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Result of a like toggle: the new state plus the recomputed counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LikeOutcome {
    pub liked: bool,
    pub likes_count: u64,
}

/// Per-post engagement snapshot. The four counts are read independently,
/// not in one transaction - the stats endpoint is informational.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PostStats {
    pub post_id: Uuid,
    pub likes_count: u64,
    pub bookmarks_count: u64,
    pub reports_count: u64,
    pub comments_count: u64,
}
