use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Community entity.
///
/// `member_count` is derived state: it always equals the number of
/// membership rows referencing this community, recomputed by the
/// membership ledger after every join/leave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub member_count: i64,
}

impl Community {
    /// Create a new community with zero members.
    pub fn new(name: String, description: Option<String>, image_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            image_url,
            member_count: 0,
        }
    }
}
