//! `SeaORM` Entity for chores table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "chores")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub household_id: Uuid,
    pub name: String,
    /// `daily`, `weekly` or `monthly`.
    pub frequency: String,
    pub assigned_to: Option<Uuid>,
    pub rotation_index: i32,
    pub due_date: DateTimeWithTimeZone,
    pub is_overdue: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::households::Entity",
        from = "Column::HouseholdId",
        to = "super::households::Column::Id"
    )]
    Households,
    #[sea_orm(has_many = "super::chore_completions::Entity")]
    ChoreCompletions,
}

impl Related<super::households::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Households.def()
    }
}

impl Related<super::chore_completions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChoreCompletions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
