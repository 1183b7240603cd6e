//! Expense domain types.

use chrono::{DateTime, Utc};
use hearth_shared::types::{ExpenseId, HouseholdId, MemberId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One member's part of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// The participating member.
    pub member: MemberId,
    /// Fraction of the expense owed by this member, in (0, 1].
    pub share: Decimal,
    /// Amount already paid back to the payer for this expense.
    pub amount_paid: Decimal,
    /// Whether this member's share is considered paid.
    pub is_paid: bool,
}

impl Participant {
    /// Creates an unpaid participant with the given share.
    #[must_use]
    pub const fn new(member: MemberId, share: Decimal) -> Self {
        Self {
            member,
            share,
            amount_paid: Decimal::ZERO,
            is_paid: false,
        }
    }
}

/// A recorded cost, fronted by one payer and divided among participants by share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Household the expense belongs to.
    pub household_id: HouseholdId,
    /// Short description, e.g. "Groceries".
    pub name: String,
    /// Member who fronted the money.
    pub payer: MemberId,
    /// Total cost.
    pub amount: Decimal,
    /// When the expense happened.
    pub date: DateTime<Utc>,
    /// Participants in the order they were recorded.
    pub participants: Vec<Participant>,
    /// True once every participant's share is paid.
    pub is_completely_paid: bool,
}

impl Expense {
    /// Returns the participant entry for a member, if any.
    #[must_use]
    pub fn participant(&self, member: MemberId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.member == member)
    }

    /// Returns the amount a member owes for this expense (`amount × share`).
    #[must_use]
    pub fn share_amount(&self, member: MemberId) -> Option<Decimal> {
        self.participant(member).map(|p| self.amount * p.share)
    }
}

/// A participant and its share, as supplied on expense creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantShare {
    /// The participating member.
    pub member: MemberId,
    /// Fraction of the expense owed.
    pub share: Decimal,
}

/// Input for recording a new expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    /// Short description.
    pub name: String,
    /// Member who fronted the money.
    pub payer: MemberId,
    /// Total cost.
    pub amount: Decimal,
    /// When the expense happened.
    pub date: DateTime<Utc>,
    /// Participants and their shares.
    pub participants: Vec<ParticipantShare>,
}
