//! Bookmark entity for SeaORM - composite key on (post_id, user_id).

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post_bookmarks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub post_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for campus_core::domain::Bookmark {
    fn from(model: Model) -> Self {
        Self {
            post_id: model.post_id,
            user_id: model.user_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<campus_core::domain::Bookmark> for ActiveModel {
    fn from(bookmark: campus_core::domain::Bookmark) -> Self {
        Self {
            post_id: Set(bookmark.post_id),
            user_id: Set(bookmark.user_id),
            created_at: Set(bookmark.created_at.into()),
        }
    }
}
