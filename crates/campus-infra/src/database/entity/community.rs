//! Community entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "communities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub member_count: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for campus_core::domain::Community {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            image_url: model.image_url,
            member_count: model.member_count,
        }
    }
}

impl From<campus_core::domain::Community> for ActiveModel {
    fn from(community: campus_core::domain::Community) -> Self {
        Self {
            id: Set(community.id),
            name: Set(community.name),
            description: Set(community.description),
            image_url: Set(community.image_url),
            member_count: Set(community.member_count),
        }
    }
}
