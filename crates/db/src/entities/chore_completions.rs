//! `SeaORM` Entity for chore_completions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "chore_completions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub chore_id: Uuid,
    pub member_id: Uuid,
    pub completed_at: DateTimeWithTimeZone,
    pub was_missed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chores::Entity",
        from = "Column::ChoreId",
        to = "super::chores::Column::Id"
    )]
    Chores,
}

impl Related<super::chores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
