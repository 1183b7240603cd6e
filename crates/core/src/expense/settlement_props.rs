//! Property-based tests for the settlement engine.
//!
//! - Balances of fully shared expenses sum to zero
//! - Transfers zero out cent-valued balance sheets
//! - Transfer count and amount guarantees
//! - Settled sheets produce no transfers

use hearth_shared::types::{ExpenseId, HouseholdId, MemberId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::{BalanceCalculator, BalanceSheet};
use super::settlement::{SETTLEMENT_EPSILON, SettlementPlanner};
use super::types::{Expense, Participant};

/// Generated expense: payer index, amount in cents, share weights per member
/// (0 = not participating), and how much of each share was paid back, in percent.
type GeneratedExpense = (usize, i64, Vec<u32>, Vec<u32>);

/// Strategy to generate a positive amount in cents (0.01 to 10,000.00).
fn amount_cents() -> impl Strategy<Value = i64> {
    1i64..1_000_000i64
}

fn generated_expense(members: usize) -> impl Strategy<Value = GeneratedExpense> {
    (
        0..members,
        amount_cents(),
        prop::collection::vec(0u32..5, members),
        prop::collection::vec(0u32..=100, members),
    )
}

fn household_expenses() -> impl Strategy<Value = (usize, Vec<GeneratedExpense>)> {
    (1usize..=6).prop_flat_map(|members| {
        (
            Just(members),
            prop::collection::vec(generated_expense(members), 0..20),
        )
    })
}

/// Builds expenses whose shares sum to 1 (weights normalized; the payer
/// carries the whole cost if every weight is zero).
fn build_expenses(members: &[MemberId], generated: &[GeneratedExpense]) -> Vec<Expense> {
    generated
        .iter()
        .map(|(payer_idx, cents, weights, paid_percent)| {
            let payer = members[*payer_idx];
            let amount = Decimal::new(*cents, 2);
            let weight_sum: u32 = weights.iter().sum();

            let participants = if weight_sum == 0 {
                vec![Participant::new(payer, Decimal::ONE)]
            } else {
                members
                    .iter()
                    .zip(weights.iter().zip(paid_percent))
                    .filter(|(_, (weight, _))| **weight > 0)
                    .map(|(&member, (&weight, &percent))| {
                        let share = Decimal::from(weight) / Decimal::from(weight_sum);
                        let amount_paid = if member == payer {
                            Decimal::ZERO
                        } else {
                            (amount * share * Decimal::from(percent) / Decimal::ONE_HUNDRED).round_dp(2)
                        };
                        Participant {
                            amount_paid,
                            ..Participant::new(member, share)
                        }
                    })
                    .collect()
            };

            Expense {
                id: ExpenseId::new(),
                household_id: HouseholdId::new(),
                name: "Generated".to_string(),
                payer,
                amount,
                date: chrono::Utc::now(),
                participants,
                is_completely_paid: false,
            }
        })
        .collect()
}

/// Strategy for a zero-sum sheet of whole-cent balances (2 to 8 members).
fn cent_balances() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1_000_000i64..1_000_000i64, 1..8).prop_map(|mut cents| {
        let total: i64 = cents.iter().sum();
        cents.push(-total);
        cents
    })
}

fn sheet_from_cents(cents: &[i64]) -> BalanceSheet {
    cents
        .iter()
        .map(|c| (MemberId::new(), Decimal::new(*c, 2)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* expenses whose shares sum to 1, balances sum to zero (within 1e-6).
    #[test]
    fn prop_balances_sum_to_zero((member_count, generated) in household_expenses()) {
        let members: Vec<MemberId> = (0..member_count).map(|_| MemberId::new()).collect();
        let expenses = build_expenses(&members, &generated);

        let balances = BalanceCalculator::calculate(&expenses);

        prop_assert!(
            balances.total().abs() < Decimal::new(1, 6),
            "balances sum to {}",
            balances.total()
        );
    }

    /// *For any* expenses, every member appearing in an expense has an entry.
    #[test]
    fn prop_every_member_seen_has_entry((member_count, generated) in household_expenses()) {
        let members: Vec<MemberId> = (0..member_count).map(|_| MemberId::new()).collect();
        let expenses = build_expenses(&members, &generated);

        let balances = BalanceCalculator::calculate(&expenses);

        for expense in &expenses {
            prop_assert!(balances.get(expense.payer).is_some());
            for participant in &expense.participants {
                prop_assert!(balances.get(participant.member).is_some());
            }
        }
    }

    /// *For any* zero-sum sheet in whole cents, applying the plan in order
    /// (debtor += amount, creditor -= amount) leaves every balance settled.
    #[test]
    fn prop_plan_settles_cent_balances(cents in cent_balances()) {
        let balances = sheet_from_cents(&cents);
        let plan = SettlementPlanner::plan(&balances);

        let mut after = balances.clone();
        for tx in &plan {
            after.credit(tx.from, tx.amount);
            after.debit(tx.to, tx.amount);
        }

        for (member, balance) in after.iter() {
            prop_assert!(
                balance.abs() < SETTLEMENT_EPSILON,
                "member {} left with {}",
                member,
                balance
            );
        }
    }

    /// *For any* household, transfers are positive, cent-rounded, flow from
    /// debtors to creditors, and number at most `debtors + creditors - 1`.
    #[test]
    fn prop_plan_shape((member_count, generated) in household_expenses()) {
        let members: Vec<MemberId> = (0..member_count).map(|_| MemberId::new()).collect();
        let balances = BalanceCalculator::calculate(&build_expenses(&members, &generated));

        let plan = SettlementPlanner::plan(&balances);

        let open = balances
            .iter()
            .filter(|(_, b)| !SettlementPlanner::is_settled(*b))
            .count();
        prop_assert!(plan.len() <= open.saturating_sub(1));

        for tx in &plan {
            prop_assert!(tx.amount > Decimal::ZERO);
            prop_assert_eq!(tx.amount, tx.amount.round_dp(2));
            prop_assert!(tx.from != tx.to);
            prop_assert!(balances.get(tx.from).unwrap_or_default() < Decimal::ZERO);
            prop_assert!(balances.get(tx.to).unwrap_or_default() > Decimal::ZERO);
        }
    }

    /// *For any* sheet where every balance is within ε of zero, the plan is empty.
    #[test]
    fn prop_settled_sheet_has_empty_plan(
        tenths_of_cents in prop::collection::vec(-9i64..=9i64, 0..10),
    ) {
        let balances: BalanceSheet = tenths_of_cents
            .iter()
            .map(|t| (MemberId::new(), Decimal::new(*t, 3)))
            .collect();

        prop_assert!(SettlementPlanner::plan(&balances).is_empty());
    }

    /// *For any* sheet, planning twice gives the same transfers.
    #[test]
    fn prop_plan_is_deterministic(cents in cent_balances()) {
        let balances = sheet_from_cents(&cents);
        prop_assert_eq!(SettlementPlanner::plan(&balances), SettlementPlanner::plan(&balances));
    }
}
