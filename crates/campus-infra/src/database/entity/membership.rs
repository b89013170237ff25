//! Membership entity for SeaORM - composite key on (user_id, community_id).

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "memberships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub community_id: Uuid,
    pub role: String,
    pub joined_at: DateTimeWithTimeZone,
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
    #[sea_orm(
        belongs_to = "super::community::Entity",
        from = "Column::CommunityId",
        to = "super::community::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Community,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::community::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Community.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for campus_core::domain::Membership {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            community_id: model.community_id,
            role: model.role,
            joined_at: model.joined_at.into(),
        }
    }
}

impl From<campus_core::domain::Membership> for ActiveModel {
    fn from(membership: campus_core::domain::Membership) -> Self {
        Self {
            user_id: Set(membership.user_id),
            community_id: Set(membership.community_id),
            role: Set(membership.role),
            joined_at: Set(membership.joined_at.into()),
        }
    }
}
