use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public profile merged with the owning user's account fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub location: Option<String>,
    pub profile_pic_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
}

/// Request to update the caller's profile. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub location: Option<String>,
    pub profile_pic_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
}
