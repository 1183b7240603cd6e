//! End-to-end settlement scenarios: expenses → balances → transfers.

use chrono::Utc;
use hearth_shared::types::{ExpenseId, HouseholdId, MemberId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::balance::{BalanceCalculator, BalanceSheet};
use super::settlement::{SETTLEMENT_EPSILON, SettlementPlanner, SettlementTransaction};
use super::types::{Expense, Participant};

fn expense(payer: MemberId, amount: Decimal, participants: Vec<Participant>) -> Expense {
    Expense {
        id: ExpenseId::new(),
        household_id: HouseholdId::new(),
        name: "Shared".to_string(),
        payer,
        amount,
        date: Utc::now(),
        participants,
        is_completely_paid: false,
    }
}

/// Applies transfers to balances: the debtor's balance rises, the creditor's falls.
fn apply(balances: &BalanceSheet, plan: &[SettlementTransaction]) -> BalanceSheet {
    let mut after = balances.clone();
    for tx in plan {
        after.credit(tx.from, tx.amount);
        after.debit(tx.to, tx.amount);
    }
    after
}

fn assert_all_settled(balances: &BalanceSheet) {
    for (member, balance) in balances.iter() {
        assert!(
            balance.abs() < SETTLEMENT_EPSILON,
            "member {member} left with {balance}"
        );
    }
}

#[test]
fn test_three_way_grocery_split() {
    let (a, b, c) = (MemberId::new(), MemberId::new(), MemberId::new());
    let third = Decimal::ONE / Decimal::from(3);
    let expenses = vec![expense(
        a,
        dec!(90),
        vec![
            Participant::new(a, third),
            Participant::new(b, third),
            Participant::new(c, third),
        ],
    )];

    let balances = BalanceCalculator::calculate(&expenses);
    assert_eq!(balances.get(a).unwrap().round_dp(2), dec!(60));
    assert_eq!(balances.get(b).unwrap().round_dp(2), dec!(-30));
    assert_eq!(balances.get(c).unwrap().round_dp(2), dec!(-30));

    let plan = SettlementPlanner::plan(&balances);
    assert_eq!(plan.len(), 2);
    assert!(plan.iter().all(|tx| tx.to == a && tx.amount == dec!(30)));
    let payers: Vec<MemberId> = plan.iter().map(|tx| tx.from).collect();
    assert!(payers.contains(&b) && payers.contains(&c));
    assert_eq!(plan.iter().map(|tx| tx.amount).sum::<Decimal>(), dec!(60));

    assert_all_settled(&apply(&balances, &plan));
}

#[test]
fn test_two_expenses_paid_by_different_members() {
    let (a, b) = (MemberId::new(), MemberId::new());
    let halves = |x, y| vec![Participant::new(x, dec!(0.5)), Participant::new(y, dec!(0.5))];
    let expenses = vec![expense(a, dec!(100), halves(a, b)), expense(b, dec!(60), halves(a, b))];

    let balances = BalanceCalculator::calculate(&expenses);
    assert_eq!(balances.get(a), Some(dec!(20)));
    assert_eq!(balances.get(b), Some(dec!(-20)));

    let plan = SettlementPlanner::plan(&balances);
    assert_eq!(
        plan,
        vec![SettlementTransaction {
            from: b,
            to: a,
            amount: dec!(20),
        }]
    );

    assert_all_settled(&apply(&balances, &plan));
}

#[test]
fn test_partial_payment_settles_everything() {
    let (a, b) = (MemberId::new(), MemberId::new());
    let expenses = vec![expense(
        a,
        dec!(100),
        vec![
            Participant::new(a, dec!(0.5)),
            Participant {
                amount_paid: dec!(50),
                ..Participant::new(b, dec!(0.5))
            },
        ],
    )];

    let balances = BalanceCalculator::calculate(&expenses);
    assert_eq!(balances.get(a), Some(dec!(0)));
    assert_eq!(balances.get(b), Some(dec!(0)));

    assert!(SettlementPlanner::plan(&balances).is_empty());
}

#[test]
fn test_empty_household_is_all_settled() {
    let balances = BalanceCalculator::calculate(&[]);
    assert!(balances.is_empty());
    assert!(SettlementPlanner::plan(&balances).is_empty());
}

#[test]
fn test_month_of_household_expenses() {
    let (a, b, c, d) = (MemberId::new(), MemberId::new(), MemberId::new(), MemberId::new());
    let quarter = |members: [MemberId; 4]| {
        members
            .iter()
            .map(|&m| Participant::new(m, dec!(0.25)))
            .collect::<Vec<_>>()
    };
    let everyone = [a, b, c, d];
    let expenses = vec![
        expense(a, dec!(1200), quarter(everyone)),
        expense(b, dec!(84.60), quarter(everyone)),
        expense(c, dec!(45.00), vec![Participant::new(c, dec!(0.5)), Participant::new(d, dec!(0.5))]),
        expense(d, dec!(19.99), vec![Participant::new(a, dec!(1))]),
    ];

    let balances = BalanceCalculator::calculate(&expenses);
    assert_eq!(balances.total(), Decimal::ZERO);

    let plan = SettlementPlanner::plan(&balances);
    assert!(plan.len() <= 3);
    assert!(plan.iter().all(|tx| tx.amount > Decimal::ZERO));

    assert_all_settled(&apply(&balances, &plan));
}
