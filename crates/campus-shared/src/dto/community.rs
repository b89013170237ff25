use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Community as the API renders it; `is_joined` reflects the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub member_count: i64,
    pub is_joined: bool,
}

/// Request to create a community.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommunityRequest {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// A community annotated with the caller's membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinedCommunityDto {
    #[serde(flatten)]
    pub community: CommunityDto,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

/// A member of a community, resolved to public profile fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityMemberDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
    pub name: Option<String>,
    pub university: Option<String>,
    pub profile_pic_url: Option<String>,
}

/// Result of a join or leave: the recomputed member count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipChangeResponse {
    pub community_id: Uuid,
    pub member_count: u64,
}
