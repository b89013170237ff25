use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Community;

/// Membership relation - one row per (user, community) pair.
///
/// Keyed by the natural tuple; there is no surrogate id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: Uuid,
    pub community_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub const DEFAULT_ROLE: &'static str = "Member";

    /// New membership with the default role and the current timestamp.
    pub fn new(user_id: Uuid, community_id: Uuid) -> Self {
        Self {
            user_id,
            community_id,
            role: Self::DEFAULT_ROLE.to_string(),
            joined_at: Utc::now(),
        }
    }
}

/// A community member resolved to the owning user's public fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberProfile {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
    pub name: Option<String>,
    pub university: Option<String>,
    pub profile_pic_url: Option<String>,
}

/// A community annotated with the caller's membership attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinedCommunity {
    pub community: Community,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}
