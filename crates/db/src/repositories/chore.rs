//! Chore repository for database operations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use hearth_core::chore::{Chore, ChoreCompletion, ChoreError, ChoreScheduler, Frequency};
use hearth_shared::types::{ChoreId, HouseholdId, MemberId};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::household::load_household;
use super::to_position;
use crate::entities::{chore_completions, chores};

/// Error types for chore completion.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Chore not found.
    #[error("Chore {0} not found")]
    NotFound(ChoreId),

    /// The chore's household no longer exists.
    #[error("Household {0} not found")]
    HouseholdNotFound(HouseholdId),

    /// The completion breaks a chore rule.
    #[error(transparent)]
    Rejected(#[from] ChoreError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Chore repository for chores and their completion history.
#[derive(Debug, Clone)]
pub struct ChoreRepository {
    db: DatabaseConnection,
}

impl ChoreRepository {
    /// Creates a new chore repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a new chore.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, chore: &Chore) -> Result<(), DbErr> {
        let now = Utc::now().into();

        chores::Entity::insert(chores::ActiveModel {
            id: Set(chore.id.into_inner()),
            household_id: Set(chore.household_id.into_inner()),
            name: Set(chore.name.clone()),
            frequency: Set(chore.frequency.as_str().to_string()),
            assigned_to: Set(chore.assigned_to.map(MemberId::into_inner)),
            rotation_index: Set(to_position(chore.rotation_index)?),
            due_date: Set(chore.due_date.into()),
            is_overdue: Set(chore.is_overdue),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .exec_without_returning(&self.db)
        .await?;

        tracing::debug!(chore_id = %chore.id, household_id = %chore.household_id, "Chore stored");
        Ok(())
    }

    /// Finds a chore with its completion history.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row cannot be decoded.
    pub async fn find_by_id(&self, id: ChoreId) -> Result<Option<Chore>, DbErr> {
        load_chore(&self.db, id, false).await
    }

    /// Lists a household's chores in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row cannot be decoded.
    pub async fn list_by_household(&self, household_id: HouseholdId) -> Result<Vec<Chore>, DbErr> {
        let models = chores::Entity::find()
            .filter(chores::Column::HouseholdId.eq(household_id.into_inner()))
            .order_by_asc(chores::Column::CreatedAt)
            .order_by_asc(chores::Column::Id)
            .all(&self.db)
            .await?;

        if models.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let rows = chore_completions::Entity::find()
            .filter(chore_completions::Column::ChoreId.is_in(ids))
            .order_by_asc(chore_completions::Column::CompletedAt)
            .order_by_asc(chore_completions::Column::Id)
            .all(&self.db)
            .await?;

        let mut by_chore: HashMap<Uuid, Vec<chore_completions::Model>> = HashMap::new();
        for row in rows {
            by_chore.entry(row.chore_id).or_default().push(row);
        }

        models
            .into_iter()
            .map(|model| {
                let history = by_chore.remove(&model.id).unwrap_or_default();
                chore_from_rows(model, history)
            })
            .collect()
    }

    /// Writes the schedule fields of a chore (assignee, rotation, due date, overdue flag).
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_schedule(&self, chore: &Chore) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;
        write_schedule(&txn, chore).await?;
        txn.commit().await
    }

    /// Marks a chore done by `completed_by` and hands it to the next member.
    ///
    /// The chore row stays locked from the read until the completion and the
    /// new schedule are written, so concurrent completions rotate the chore
    /// one step each.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::NotFound` for an unknown chore,
    /// `CompletionError::Rejected` when `ChoreScheduler::complete` refuses the
    /// completer, or a database error.
    pub async fn complete(
        &self,
        id: ChoreId,
        completed_by: MemberId,
        now: DateTime<Utc>,
    ) -> Result<Chore, CompletionError> {
        let txn = self.db.begin().await?;

        let mut chore = load_chore(&txn, id, true)
            .await?
            .ok_or(CompletionError::NotFound(id))?;
        let household = load_household(&txn, chore.household_id)
            .await?
            .ok_or(CompletionError::HouseholdNotFound(chore.household_id))?;

        ChoreScheduler::complete(&mut chore, &household, completed_by, now)?;
        let completion = chore
            .history
            .last()
            .ok_or_else(|| DbErr::Custom(format!("chore {id} has no completion to store")))?;

        chore_completions::Entity::insert(chore_completions::ActiveModel {
            id: Set(Uuid::now_v7()),
            chore_id: Set(chore.id.into_inner()),
            member_id: Set(completion.member.into_inner()),
            completed_at: Set(completion.completed_at.into()),
            was_missed: Set(completion.was_missed),
        })
        .exec_without_returning(&txn)
        .await?;

        write_schedule(&txn, &chore).await?;
        txn.commit().await?;

        tracing::debug!(
            chore_id = %chore.id,
            member_id = %completed_by,
            was_missed = completion.was_missed,
            "Chore completion stored"
        );
        Ok(chore)
    }
}

/// Loads a chore with its history, optionally locking the chore row.
async fn load_chore<C: ConnectionTrait>(
    db: &C,
    id: ChoreId,
    for_update: bool,
) -> Result<Option<Chore>, DbErr> {
    let mut query = chores::Entity::find_by_id(id.into_inner());
    if for_update {
        query = query.lock_exclusive();
    }
    let Some(model) = query.one(db).await? else {
        return Ok(None);
    };

    let history = chore_completions::Entity::find()
        .filter(chore_completions::Column::ChoreId.eq(model.id))
        .order_by_asc(chore_completions::Column::CompletedAt)
        .order_by_asc(chore_completions::Column::Id)
        .all(db)
        .await?;

    chore_from_rows(model, history).map(Some)
}

async fn write_schedule(txn: &DatabaseTransaction, chore: &Chore) -> Result<(), DbErr> {
    chores::Entity::update_many()
        .set(chores::ActiveModel {
            assigned_to: Set(chore.assigned_to.map(MemberId::into_inner)),
            rotation_index: Set(to_position(chore.rotation_index)?),
            due_date: Set(chore.due_date.into()),
            is_overdue: Set(chore.is_overdue),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .filter(chores::Column::Id.eq(chore.id.into_inner()))
        .exec(txn)
        .await?;
    Ok(())
}

/// Builds a chore from its row and completion rows (already oldest first).
fn chore_from_rows(
    model: chores::Model,
    history: Vec<chore_completions::Model>,
) -> Result<Chore, DbErr> {
    let frequency: Frequency = model
        .frequency
        .parse()
        .map_err(|e| DbErr::Custom(format!("chore {}: {e}", model.id)))?;
    let rotation_index = usize::try_from(model.rotation_index).map_err(|_| {
        DbErr::Custom(format!(
            "chore {}: negative rotation index {}",
            model.id, model.rotation_index
        ))
    })?;

    Ok(Chore {
        id: ChoreId::from_uuid(model.id),
        household_id: HouseholdId::from_uuid(model.household_id),
        name: model.name,
        frequency,
        assigned_to: model.assigned_to.map(MemberId::from_uuid),
        rotation_index,
        due_date: model.due_date.with_timezone(&Utc),
        is_overdue: model.is_overdue,
        history: history
            .into_iter()
            .map(|c| ChoreCompletion {
                member: MemberId::from_uuid(c.member_id),
                completed_at: c.completed_at.with_timezone(&Utc),
                was_missed: c.was_missed,
            })
            .collect(),
    })
}
