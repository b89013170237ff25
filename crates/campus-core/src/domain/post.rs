use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - belongs to exactly one community.
///
/// `likes_count` is derived state, recomputed from the like relation by
/// the engagement ledger after every toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub community_id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub likes_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(
        community_id: Uuid,
        author_id: Uuid,
        title: String,
        content: String,
        image_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            community_id,
            author_id,
            title,
            content,
            image_url,
            likes_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
