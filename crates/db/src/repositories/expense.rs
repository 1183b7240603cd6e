//! Expense repository for database operations.

use std::collections::HashMap;

use chrono::Utc;
use hearth_core::expense::{Expense, ExpenseError, ExpenseService, Participant};
use hearth_shared::types::{ExpenseId, HouseholdId, MemberId};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::to_position;
use crate::entities::{expense_participants, expenses};

/// Error types for share payments.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Expense not found.
    #[error("Expense {0} not found")]
    NotFound(ExpenseId),

    /// The payment breaks an expense rule.
    #[error(transparent)]
    Rejected(#[from] ExpenseError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Expense repository for shared expenses and their participants.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a new expense and its participants in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, expense: &Expense) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        expenses::Entity::insert(expenses::ActiveModel {
            id: Set(expense.id.into_inner()),
            household_id: Set(expense.household_id.into_inner()),
            name: Set(expense.name.clone()),
            payer_id: Set(expense.payer.into_inner()),
            amount: Set(expense.amount),
            date: Set(expense.date.into()),
            is_completely_paid: Set(expense.is_completely_paid),
            created_at: Set(Utc::now().into()),
        })
        .exec_without_returning(&txn)
        .await?;

        let participants = expense
            .participants
            .iter()
            .enumerate()
            .map(|(index, p)| {
                Ok::<_, DbErr>(expense_participants::ActiveModel {
                    expense_id: Set(expense.id.into_inner()),
                    member_id: Set(p.member.into_inner()),
                    position: Set(to_position(index)?),
                    share: Set(p.share),
                    amount_paid: Set(p.amount_paid),
                    is_paid: Set(p.is_paid),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !participants.is_empty() {
            expense_participants::Entity::insert_many(participants)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        tracing::debug!(
            expense_id = %expense.id,
            household_id = %expense.household_id,
            amount = %expense.amount,
            "Expense stored"
        );
        Ok(())
    }

    /// Finds an expense with its participants.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, DbErr> {
        load_expense(&self.db, id, false).await
    }

    /// Lists a household's expenses in the order they were recorded.
    ///
    /// Participants keep their stored order, so balances computed from the
    /// result list members the same way on every call.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_household(&self, household_id: HouseholdId) -> Result<Vec<Expense>, DbErr> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::HouseholdId.eq(household_id.into_inner()))
            .order_by_asc(expenses::Column::CreatedAt)
            .order_by_asc(expenses::Column::Id)
            .all(&self.db)
            .await?;

        if models.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let rows = expense_participants::Entity::find()
            .filter(expense_participants::Column::ExpenseId.is_in(ids))
            .order_by_asc(expense_participants::Column::ExpenseId)
            .order_by_asc(expense_participants::Column::Position)
            .all(&self.db)
            .await?;

        let mut by_expense: HashMap<Uuid, Vec<expense_participants::Model>> = HashMap::new();
        for row in rows {
            by_expense.entry(row.expense_id).or_default().push(row);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let participants = by_expense.remove(&model.id).unwrap_or_default();
                expense_from_rows(model, participants)
            })
            .collect())
    }

    /// Records a payment from `member` towards their share of an expense.
    ///
    /// The expense row stays locked from the read until the new paid amount
    /// is written, so concurrent payments on one expense apply one after the
    /// other.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::NotFound` for an unknown expense,
    /// `PaymentError::Rejected` when `ExpenseService::record_payment` refuses
    /// the payment, or a database error.
    pub async fn pay_share(
        &self,
        id: ExpenseId,
        member: MemberId,
        amount: Decimal,
    ) -> Result<Expense, PaymentError> {
        let txn = self.db.begin().await?;

        let mut expense = load_expense(&txn, id, true)
            .await?
            .ok_or(PaymentError::NotFound(id))?;

        ExpenseService::record_payment(&mut expense, member, amount)?;
        write_payment(&txn, &expense, member).await?;

        txn.commit().await?;

        tracing::debug!(
            expense_id = %expense.id,
            member_id = %member,
            amount = %amount,
            is_completely_paid = expense.is_completely_paid,
            "Share payment stored"
        );
        Ok(expense)
    }
}

/// Loads an expense with its participants, optionally locking the expense row.
async fn load_expense<C: ConnectionTrait>(
    db: &C,
    id: ExpenseId,
    for_update: bool,
) -> Result<Option<Expense>, DbErr> {
    let mut query = expenses::Entity::find_by_id(id.into_inner());
    if for_update {
        query = query.lock_exclusive();
    }
    let Some(model) = query.one(db).await? else {
        return Ok(None);
    };

    let participants = expense_participants::Entity::find()
        .filter(expense_participants::Column::ExpenseId.eq(model.id))
        .order_by_asc(expense_participants::Column::Position)
        .all(db)
        .await?;

    Ok(Some(expense_from_rows(model, participants)))
}

/// Writes the paid amount and flag of `member` and the expense's completely-paid flag.
async fn write_payment(
    txn: &DatabaseTransaction,
    expense: &Expense,
    member: MemberId,
) -> Result<(), DbErr> {
    let participant = expense.participant(member).ok_or_else(|| {
        DbErr::RecordNotFound(format!("participant {member} of expense {}", expense.id))
    })?;

    expense_participants::Entity::update_many()
        .set(expense_participants::ActiveModel {
            amount_paid: Set(participant.amount_paid),
            is_paid: Set(participant.is_paid),
            ..Default::default()
        })
        .filter(expense_participants::Column::ExpenseId.eq(expense.id.into_inner()))
        .filter(expense_participants::Column::MemberId.eq(member.into_inner()))
        .exec(txn)
        .await?;

    expenses::Entity::update_many()
        .set(expenses::ActiveModel {
            is_completely_paid: Set(expense.is_completely_paid),
            ..Default::default()
        })
        .filter(expenses::Column::Id.eq(expense.id.into_inner()))
        .exec(txn)
        .await?;

    Ok(())
}

/// Builds an expense from its row and participant rows (already in position order).
fn expense_from_rows(
    model: expenses::Model,
    participants: Vec<expense_participants::Model>,
) -> Expense {
    Expense {
        id: ExpenseId::from_uuid(model.id),
        household_id: HouseholdId::from_uuid(model.household_id),
        name: model.name,
        payer: MemberId::from_uuid(model.payer_id),
        amount: model.amount,
        date: model.date.with_timezone(&Utc),
        participants: participants
            .into_iter()
            .map(|p| Participant {
                member: MemberId::from_uuid(p.member_id),
                share: p.share,
                amount_paid: p.amount_paid,
                is_paid: p.is_paid,
            })
            .collect(),
        is_completely_paid: model.is_completely_paid,
    }
}
