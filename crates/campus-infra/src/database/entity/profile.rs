//! Profile entity for SeaORM - one row per user.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub location: Option<String>,
    pub profile_pic_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for campus_core::domain::Profile {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            name: model.name,
            bio: model.bio,
            university: model.university,
            major: model.major,
            location: model.location,
            profile_pic_url: model.profile_pic_url,
            github_url: model.github_url,
            linkedin_url: model.linkedin_url,
        }
    }
}

impl From<campus_core::domain::Profile> for ActiveModel {
    fn from(profile: campus_core::domain::Profile) -> Self {
        Self {
            user_id: Set(profile.user_id),
            name: Set(profile.name),
            bio: Set(profile.bio),
            university: Set(profile.university),
            major: Set(profile.major),
            location: Set(profile.location),
            profile_pic_url: Set(profile.profile_pic_url),
            github_url: Set(profile.github_url),
            linkedin_url: Set(profile.linkedin_url),
        }
    }
}
