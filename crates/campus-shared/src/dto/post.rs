use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post as the API renders it; the `is_*` flags reflect the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDto {
    pub id: Uuid,
    pub community_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub likes_count: i32,
    pub comments_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_liked: bool,
    pub is_bookmarked: bool,
    pub is_owner: bool,
}

/// Request to create a post inside a community.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

/// Request to update a post. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

/// Request to report a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPostRequest {
    pub reason: String,
}

/// Result of a like toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeToggleResponse {
    pub liked: bool,
    pub likes_count: u64,
}

/// Result of a bookmark toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleBookmarkResponse {
    pub bookmarked: bool,
}

/// One user's like on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostLikeDto {
    pub user_id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Engagement snapshot for a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostStatsDto {
    pub post_id: Uuid,
    pub likes_count: u64,
    pub bookmarks_count: u64,
    pub reports_count: u64,
    pub comments_count: u64,
}

/// Comment as the API renders it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDto {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Request to add a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}
