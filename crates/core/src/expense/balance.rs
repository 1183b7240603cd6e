//! Net balance calculation across household members.
//!
//! Positive balance = the member is owed money (net creditor).
//! Negative balance = the member owes money (net debtor).

use hearth_shared::types::MemberId;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::Expense;

/// Signed net balance per member.
///
/// Keyed by every member encountered, in first-encounter order. Members whose
/// balance nets to zero keep their entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSheet(IndexMap<MemberId, Decimal>);

impl BalanceSheet {
    /// Creates an empty balance sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to a member's balance, creating the entry at zero if missing.
    pub fn credit(&mut self, member: MemberId, amount: Decimal) {
        *self.0.entry(member).or_insert(Decimal::ZERO) += amount;
    }

    /// Subtracts `amount` from a member's balance, creating the entry at zero if missing.
    pub fn debit(&mut self, member: MemberId, amount: Decimal) {
        *self.0.entry(member).or_insert(Decimal::ZERO) -= amount;
    }

    /// Returns a member's balance, if the member appears in the sheet.
    #[must_use]
    pub fn get(&self, member: MemberId) -> Option<Decimal> {
        self.0.get(&member).copied()
    }

    /// Iterates members and balances in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (MemberId, Decimal)> + '_ {
        self.0.iter().map(|(member, balance)| (*member, *balance))
    }

    /// Number of members in the sheet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no member appears in the sheet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all balances. Zero (up to rounding residue) when shares sum to 1.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.0.values().copied().sum()
    }
}

impl FromIterator<(MemberId, Decimal)> for BalanceSheet {
    fn from_iter<I: IntoIterator<Item = (MemberId, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reduces expenses into a [`BalanceSheet`].
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Computes net balances for a household's expenses.
    ///
    /// For each expense, in order:
    /// - the payer is credited the full amount;
    /// - every participant (the payer included, if listed) is debited `amount × share`;
    /// - a participant with `amount_paid > 0` is credited that payment and the
    ///   payer is debited the same amount.
    ///
    /// Shares are not normalized and input is not validated. Intermediate
    /// balances are not rounded.
    #[must_use]
    pub fn calculate(expenses: &[Expense]) -> BalanceSheet {
        let mut balances = BalanceSheet::new();

        for expense in expenses {
            balances.credit(expense.payer, expense.amount);

            for participant in &expense.participants {
                balances.debit(participant.member, expense.amount * participant.share);

                if participant.amount_paid > Decimal::ZERO {
                    balances.credit(participant.member, participant.amount_paid);
                    balances.debit(expense.payer, participant.amount_paid);
                }
            }
        }

        balances
    }
}
