//! Household repository for database operations.

use hearth_core::household::Household;
use hearth_shared::types::{HouseholdId, MemberId};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use super::to_position;
use crate::entities::{household_members, households};

/// Household repository for membership storage.
#[derive(Debug, Clone)]
pub struct HouseholdRepository {
    db: DatabaseConnection,
}

impl HouseholdRepository {
    /// Creates a new household repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a new household with its initial members.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, household: &Household) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().into();

        households::Entity::insert(households::ActiveModel {
            id: Set(household.id.into_inner()),
            name: Set(household.name.clone()),
            owner_id: Set(household.owner.into_inner()),
            created_at: Set(now),
        })
        .exec_without_returning(&txn)
        .await?;

        if !household.members.is_empty() {
            let members = household
                .members
                .iter()
                .enumerate()
                .map(|(index, member)| {
                    Ok::<_, DbErr>(household_members::ActiveModel {
                        household_id: Set(household.id.into_inner()),
                        member_id: Set(member.into_inner()),
                        position: Set(to_position(index)?),
                        joined_at: Set(now),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            household_members::Entity::insert_many(members)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        tracing::debug!(household_id = %household.id, members = household.members.len(), "Household stored");
        Ok(())
    }

    /// Finds a household with its members in join order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: HouseholdId) -> Result<Option<Household>, DbErr> {
        load_household(&self.db, id).await
    }

    /// Appends a member at the end of the join order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails, including when the
    /// member already belongs to the household.
    pub async fn add_member(&self, household: &Household, member: MemberId) -> Result<(), DbErr> {
        let model = household_members::ActiveModel {
            household_id: Set(household.id.into_inner()),
            member_id: Set(member.into_inner()),
            position: Set(to_position(household.members.len())?),
            joined_at: Set(chrono::Utc::now().into()),
        };

        household_members::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await?;

        tracing::debug!(household_id = %household.id, member_id = %member, "Member added");
        Ok(())
    }
}

/// Loads a household on any connection, including an open transaction.
pub(crate) async fn load_household<C: ConnectionTrait>(
    db: &C,
    id: HouseholdId,
) -> Result<Option<Household>, DbErr> {
    let Some(model) = households::Entity::find_by_id(id.into_inner())
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let members = household_members::Entity::find()
        .filter(household_members::Column::HouseholdId.eq(model.id))
        .order_by_asc(household_members::Column::Position)
        .all(db)
        .await?;

    Ok(Some(household_from_rows(model, &members)))
}

/// Builds a household from its row and member rows (already in join order).
fn household_from_rows(model: households::Model, members: &[household_members::Model]) -> Household {
    Household {
        id: HouseholdId::from_uuid(model.id),
        name: model.name,
        owner: MemberId::from_uuid(model.owner_id),
        members: members
            .iter()
            .map(|m| MemberId::from_uuid(m.member_id))
            .collect(),
    }
}
