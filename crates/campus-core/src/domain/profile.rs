use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public profile attached 1:1 to a user. All fields optional - a fresh
/// account starts with an empty profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub location: Option<String>,
    pub profile_pic_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
}

impl Profile {
    /// Empty profile for a user.
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }
}
