//! Report entity for SeaORM.
//!
//! Reports keep a surrogate id (append-only audit rows) with a separate
//! unique index on (post_id, user_id), created by the migration.

use campus_core::domain::ReportStatus;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub reason: String,
    pub status: String,
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
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for campus_core::domain::Report {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            user_id: model.user_id,
            reason: model.reason,
            status: model.status.parse().unwrap_or(ReportStatus::Pending),
            created_at: model.created_at.into(),
        }
    }
}

impl From<campus_core::domain::Report> for ActiveModel {
    fn from(report: campus_core::domain::Report) -> Self {
        Self {
            id: Set(report.id),
            post_id: Set(report.post_id),
            user_id: Set(report.user_id),
            reason: Set(report.reason),
            status: Set(report.status.as_str().to_string()),
            created_at: Set(report.created_at.into()),
        }
    }
}
