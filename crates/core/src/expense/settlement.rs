//! Settle-up suggestions: reduce net balances to pairwise transfers.
//!
//! Greedy largest-magnitude matching. The most indebted member pays the most
//! owed member until one of them is settled, then the next pair is matched.
//! Not a minimum-transaction solver, but deterministic: ties keep the order of
//! the balance sheet.

use hearth_shared::types::MemberId;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::balance::BalanceSheet;

/// Currency tolerance below which a balance counts as settled (0.01).
pub const SETTLEMENT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// A suggested payment from a debtor to a creditor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTransaction {
    /// Member who pays.
    pub from: MemberId,
    /// Member who receives.
    pub to: MemberId,
    /// Amount, rounded to 2 decimal places.
    pub amount: Decimal,
}

/// A member still carrying an open balance during planning.
#[derive(Debug, Clone, Copy)]
struct OpenBalance {
    member: MemberId,
    balance: Decimal,
}

/// Plans settlement transfers from a [`BalanceSheet`].
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Returns true if a balance is within [`SETTLEMENT_EPSILON`] of zero.
    #[must_use]
    pub fn is_settled(balance: Decimal) -> bool {
        balance.abs() < SETTLEMENT_EPSILON
    }

    /// Rounds a transfer amount to cents, half away from zero.
    #[must_use]
    pub fn round_amount(amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Produces the transfers that bring every balance to (within ε of) zero.
    ///
    /// Output is in emission order. Empty or fully settled sheets yield no
    /// transfers. At most `debtors + creditors - 1` transfers are emitted.
    #[must_use]
    pub fn plan(balances: &BalanceSheet) -> Vec<SettlementTransaction> {
        let (mut debtors, mut creditors): (Vec<OpenBalance>, Vec<OpenBalance>) = balances
            .iter()
            .filter(|(_, balance)| !Self::is_settled(*balance))
            .map(|(member, balance)| OpenBalance { member, balance })
            .partition(|open| open.balance.is_sign_negative());

        // Stable sorts: equal balances keep sheet order.
        debtors.sort_by(|a, b| a.balance.cmp(&b.balance));
        creditors.sort_by(|a, b| b.balance.cmp(&a.balance));

        let mut transactions = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));
        let mut next_debtor = 0;
        let mut next_creditor = 0;

        while next_debtor < debtors.len() && next_creditor < creditors.len() {
            let debtor = &mut debtors[next_debtor];
            let creditor = &mut creditors[next_creditor];

            let amount = (-debtor.balance).min(creditor.balance);

            transactions.push(SettlementTransaction {
                from: debtor.member,
                to: creditor.member,
                amount: Self::round_amount(amount),
            });

            debtor.balance += amount;
            creditor.balance -= amount;

            if Self::is_settled(debtor.balance) {
                next_debtor += 1;
            }
            if Self::is_settled(creditor.balance) {
                next_creditor += 1;
            }
        }

        transactions
    }
}
