//! Expense service: creation rules and share payments.

use std::collections::HashSet;

use hearth_shared::types::{ExpenseId, MemberId};
use rust_decimal::Decimal;

use super::error::{ExpenseError, MAX_AMOUNT_SCALE};
use super::settlement::SETTLEMENT_EPSILON;
use super::types::{Expense, NewExpense, Participant, ParticipantShare};
use crate::household::Household;

/// Expense service for business logic.
pub struct ExpenseService;

impl ExpenseService {
    /// Splits an expense equally: each member gets a share of `1 / n`.
    #[must_use]
    pub fn equal_shares(members: &[MemberId]) -> Vec<ParticipantShare> {
        if members.is_empty() {
            return vec![];
        }
        let share = Decimal::ONE / Decimal::from(members.len());
        members
            .iter()
            .map(|&member| ParticipantShare { member, share })
            .collect()
    }

    /// Resolves requested participants into shares.
    ///
    /// Either every participant carries an explicit share, or none does and
    /// the expense is split equally.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::MissingShare` when only some shares are given.
    pub fn resolve_shares(
        requested: &[(MemberId, Option<Decimal>)],
    ) -> Result<Vec<ParticipantShare>, ExpenseError> {
        if requested.iter().all(|(_, share)| share.is_none()) {
            let members: Vec<MemberId> = requested.iter().map(|(member, _)| *member).collect();
            return Ok(Self::equal_shares(&members));
        }

        requested
            .iter()
            .map(|&(member, share)| {
                share
                    .map(|share| ParticipantShare { member, share })
                    .ok_or(ExpenseError::MissingShare(member))
            })
            .collect()
    }

    /// Validates a new expense against the household it is recorded in.
    ///
    /// Shares are not required to sum to 1.
    ///
    /// # Errors
    ///
    /// Returns the first rule violated: blank name, non-positive amount, an
    /// amount with more than four decimal places, no participants, a share outside (0, 1], a duplicated participant, or a
    /// payer/participant outside the household.
    pub fn validate_new_expense(
        input: &NewExpense,
        household: &Household,
    ) -> Result<(), ExpenseError> {
        if input.name.trim().is_empty() {
            return Err(ExpenseError::EmptyName);
        }

        if input.amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount);
        }
        check_scale(input.amount)?;

        if input.participants.is_empty() {
            return Err(ExpenseError::NoParticipants);
        }

        if !household.includes(input.payer) {
            return Err(ExpenseError::NotHouseholdMember(input.payer));
        }

        let mut seen = HashSet::with_capacity(input.participants.len());
        for participant in &input.participants {
            if participant.share <= Decimal::ZERO || participant.share > Decimal::ONE {
                return Err(ExpenseError::InvalidShare {
                    member: participant.member,
                    share: participant.share,
                });
            }

            if !seen.insert(participant.member) {
                return Err(ExpenseError::DuplicateParticipant(participant.member));
            }

            if !household.includes(participant.member) {
                return Err(ExpenseError::NotHouseholdMember(participant.member));
            }
        }

        Ok(())
    }

    /// Builds a validated expense ready to be stored.
    ///
    /// The payer's own share, if listed, starts out paid.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Self::validate_new_expense`] rejects the input.
    pub fn create(
        id: ExpenseId,
        household: &Household,
        input: NewExpense,
    ) -> Result<Expense, ExpenseError> {
        Self::validate_new_expense(&input, household)?;

        let participants = input
            .participants
            .iter()
            .map(|p| Participant {
                is_paid: p.member == input.payer,
                ..Participant::new(p.member, p.share)
            })
            .collect();

        let mut expense = Expense {
            id,
            household_id: household.id,
            name: input.name.trim().to_string(),
            payer: input.payer,
            amount: input.amount,
            date: input.date,
            participants,
            is_completely_paid: false,
        };
        expense.is_completely_paid = Self::is_completely_paid(&expense);

        Ok(expense)
    }

    /// Returns true when every participant's share is paid.
    #[must_use]
    pub fn is_completely_paid(expense: &Expense) -> bool {
        expense.participants.iter().all(|p| p.is_paid)
    }

    /// Records a payment from a participant towards their share.
    ///
    /// The share counts as paid once the accumulated payment reaches the share
    /// amount (within one cent). A payment may not exceed the unpaid part of
    /// the share by more than that cent.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive or too precise, the
    /// member does not take part, the member is the payer, the share is
    /// already paid, or the payment exceeds what is still owed.
    pub fn record_payment(
        expense: &mut Expense,
        member: MemberId,
        amount: Decimal,
    ) -> Result<(), ExpenseError> {
        if amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount);
        }
        check_scale(amount)?;

        if member == expense.payer {
            return Err(ExpenseError::PayerCannotPayOwnShare);
        }

        let total = expense.amount;
        let participant = expense
            .participants
            .iter_mut()
            .find(|p| p.member == member)
            .ok_or(ExpenseError::NotParticipant(member))?;

        if participant.is_paid {
            return Err(ExpenseError::AlreadyPaid(member));
        }

        let remaining = total * participant.share - participant.amount_paid;
        if amount > remaining + SETTLEMENT_EPSILON {
            return Err(ExpenseError::Overpayment { member, remaining });
        }

        participant.amount_paid += amount;
        participant.is_paid = participant.amount_paid >= total * participant.share - SETTLEMENT_EPSILON;

        expense.is_completely_paid = Self::is_completely_paid(expense);

        Ok(())
    }
}

fn check_scale(amount: Decimal) -> Result<(), ExpenseError> {
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(ExpenseError::AmountPrecision(amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::BalanceCalculator;
    use chrono::Utc;
    use hearth_shared::types::HouseholdId;
    use rust_decimal_macros::dec;

    struct Fixture {
        household: Household,
        a: MemberId,
        b: MemberId,
        c: MemberId,
    }

    fn fixture() -> Fixture {
        let (a, b, c) = (MemberId::new(), MemberId::new(), MemberId::new());
        Fixture {
            household: Household {
                id: HouseholdId::new(),
                name: "Flat 4B".to_string(),
                owner: a,
                members: vec![b, c],
            },
            a,
            b,
            c,
        }
    }

    fn new_expense(payer: MemberId, amount: Decimal, participants: Vec<ParticipantShare>) -> NewExpense {
        NewExpense {
            name: "Internet".to_string(),
            payer,
            amount,
            date: Utc::now(),
            participants,
        }
    }

    fn share(member: MemberId, share: Decimal) -> ParticipantShare {
        ParticipantShare { member, share }
    }

    #[test]
    fn test_equal_shares() {
        let f = fixture();
        let shares = ExpenseService::equal_shares(&[f.a, f.b]);
        assert_eq!(shares, vec![share(f.a, dec!(0.5)), share(f.b, dec!(0.5))]);
        assert!(ExpenseService::equal_shares(&[]).is_empty());
    }

    #[test]
    fn test_resolve_shares_all_missing_splits_equally() {
        let f = fixture();
        let shares = ExpenseService::resolve_shares(&[(f.a, None), (f.b, None), (f.c, None)]).unwrap();
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0].share, Decimal::ONE / Decimal::from(3));
    }

    #[test]
    fn test_resolve_shares_explicit() {
        let f = fixture();
        let shares =
            ExpenseService::resolve_shares(&[(f.a, Some(dec!(0.7))), (f.b, Some(dec!(0.3)))]).unwrap();
        assert_eq!(shares, vec![share(f.a, dec!(0.7)), share(f.b, dec!(0.3))]);
    }

    #[test]
    fn test_resolve_shares_mixed_is_rejected() {
        let f = fixture();
        let result = ExpenseService::resolve_shares(&[(f.a, Some(dec!(0.7))), (f.b, None)]);
        assert_eq!(result, Err(ExpenseError::MissingShare(f.b)));
    }

    #[test]
    fn test_validate_accepts_valid_expense() {
        let f = fixture();
        let input = new_expense(f.a, dec!(90), ExpenseService::equal_shares(&[f.a, f.b, f.c]));
        assert!(ExpenseService::validate_new_expense(&input, &f.household).is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let f = fixture();
        let mut input = new_expense(f.a, dec!(10), vec![share(f.b, dec!(1))]);
        input.name = "   ".to_string();
        assert_eq!(
            ExpenseService::validate_new_expense(&input, &f.household),
            Err(ExpenseError::EmptyName)
        );
    }

    #[test]
    fn test_validate_rejects_non_positive_amount() {
        let f = fixture();
        for amount in [dec!(0), dec!(-5)] {
            let input = new_expense(f.a, amount, vec![share(f.b, dec!(1))]);
            assert_eq!(
                ExpenseService::validate_new_expense(&input, &f.household),
                Err(ExpenseError::NonPositiveAmount)
            );
        }
    }

    #[test]
    fn test_validate_rejects_no_participants() {
        let f = fixture();
        let input = new_expense(f.a, dec!(10), vec![]);
        assert_eq!(
            ExpenseService::validate_new_expense(&input, &f.household),
            Err(ExpenseError::NoParticipants)
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_share() {
        let f = fixture();
        for bad in [dec!(0), dec!(-0.2), dec!(1.01)] {
            let input = new_expense(f.a, dec!(10), vec![share(f.b, bad)]);
            assert_eq!(
                ExpenseService::validate_new_expense(&input, &f.household),
                Err(ExpenseError::InvalidShare { member: f.b, share: bad })
            );
        }
    }

    #[test]
    fn test_validate_rejects_duplicate_participant() {
        let f = fixture();
        let input = new_expense(f.a, dec!(10), vec![share(f.b, dec!(0.5)), share(f.b, dec!(0.5))]);
        assert_eq!(
            ExpenseService::validate_new_expense(&input, &f.household),
            Err(ExpenseError::DuplicateParticipant(f.b))
        );
    }

    #[test]
    fn test_validate_rejects_outsiders() {
        let f = fixture();
        let outsider = MemberId::new();

        let input = new_expense(outsider, dec!(10), vec![share(f.b, dec!(1))]);
        assert_eq!(
            ExpenseService::validate_new_expense(&input, &f.household),
            Err(ExpenseError::NotHouseholdMember(outsider))
        );

        let input = new_expense(f.a, dec!(10), vec![share(outsider, dec!(1))]);
        assert_eq!(
            ExpenseService::validate_new_expense(&input, &f.household),
            Err(ExpenseError::NotHouseholdMember(outsider))
        );
    }

    #[test]
    fn test_shares_need_not_sum_to_one() {
        let f = fixture();
        let input = new_expense(f.a, dec!(10), vec![share(f.b, dec!(0.2)), share(f.c, dec!(0.2))]);
        assert!(ExpenseService::validate_new_expense(&input, &f.household).is_ok());
    }

    #[test]
    fn test_create_marks_payer_share_paid() {
        let f = fixture();
        let input = new_expense(f.a, dec!(100), vec![share(f.a, dec!(0.5)), share(f.b, dec!(0.5))]);

        let expense = ExpenseService::create(ExpenseId::new(), &f.household, input).unwrap();

        assert_eq!(expense.household_id, f.household.id);
        assert!(expense.participant(f.a).unwrap().is_paid);
        assert!(!expense.participant(f.b).unwrap().is_paid);
        assert!(!expense.is_completely_paid);
        assert_eq!(expense.share_amount(f.b), Some(dec!(50)));
    }

    #[test]
    fn test_create_payer_only_is_completely_paid() {
        let f = fixture();
        let input = new_expense(f.a, dec!(12), vec![share(f.a, dec!(1))]);
        let expense = ExpenseService::create(ExpenseId::new(), &f.household, input).unwrap();
        assert!(expense.is_completely_paid);
    }

    #[test]
    fn test_record_full_payment() {
        let f = fixture();
        let input = new_expense(f.a, dec!(100), vec![share(f.a, dec!(0.5)), share(f.b, dec!(0.5))]);
        let mut expense = ExpenseService::create(ExpenseId::new(), &f.household, input).unwrap();

        ExpenseService::record_payment(&mut expense, f.b, dec!(50)).unwrap();

        let b = expense.participant(f.b).unwrap();
        assert_eq!(b.amount_paid, dec!(50));
        assert!(b.is_paid);
        assert!(expense.is_completely_paid);
    }

    #[test]
    fn test_record_partial_payments_accumulate() {
        let f = fixture();
        let input = new_expense(f.a, dec!(90), ExpenseService::equal_shares(&[f.a, f.b, f.c]));
        let mut expense = ExpenseService::create(ExpenseId::new(), &f.household, input).unwrap();

        ExpenseService::record_payment(&mut expense, f.b, dec!(10)).unwrap();
        assert!(!expense.participant(f.b).unwrap().is_paid);

        ExpenseService::record_payment(&mut expense, f.b, dec!(20)).unwrap();
        assert!(expense.participant(f.b).unwrap().is_paid);
        assert!(!expense.is_completely_paid);

        assert_eq!(
            ExpenseService::record_payment(&mut expense, f.b, dec!(1)),
            Err(ExpenseError::AlreadyPaid(f.b))
        );
    }

    #[test]
    fn test_record_payment_rejections() {
        let f = fixture();
        let input = new_expense(f.a, dec!(100), vec![share(f.a, dec!(0.5)), share(f.b, dec!(0.5))]);
        let mut expense = ExpenseService::create(ExpenseId::new(), &f.household, input).unwrap();

        assert_eq!(
            ExpenseService::record_payment(&mut expense, f.b, dec!(0)),
            Err(ExpenseError::NonPositiveAmount)
        );
        assert_eq!(
            ExpenseService::record_payment(&mut expense, f.a, dec!(50)),
            Err(ExpenseError::PayerCannotPayOwnShare)
        );
        assert_eq!(
            ExpenseService::record_payment(&mut expense, f.c, dec!(50)),
            Err(ExpenseError::NotParticipant(f.c))
        );
    }

    #[test]
    fn test_record_payment_rejects_overpayment() {
        let f = fixture();
        let input = new_expense(f.a, dec!(100), vec![share(f.a, dec!(0.5)), share(f.b, dec!(0.5))]);
        let mut expense = ExpenseService::create(ExpenseId::new(), &f.household, input).unwrap();

        assert_eq!(
            ExpenseService::record_payment(&mut expense, f.b, dec!(1000)),
            Err(ExpenseError::Overpayment {
                member: f.b,
                remaining: dec!(50),
            })
        );
        assert_eq!(expense.participant(f.b).unwrap().amount_paid, dec!(0));

        ExpenseService::record_payment(&mut expense, f.b, dec!(30)).unwrap();
        assert_eq!(
            ExpenseService::record_payment(&mut expense, f.b, dec!(25)),
            Err(ExpenseError::Overpayment {
                member: f.b,
                remaining: dec!(20),
            })
        );

        let balances = BalanceCalculator::calculate(std::slice::from_ref(&expense));
        assert_eq!(balances.get(f.a), Some(dec!(20)));
        assert_eq!(balances.get(f.b), Some(dec!(-20)));
    }

    #[test]
    fn test_record_payment_tolerates_rounding_cent() {
        let f = fixture();
        let input = new_expense(f.a, dec!(100), ExpenseService::equal_shares(&[f.a, f.b, f.c]));
        let mut expense = ExpenseService::create(ExpenseId::new(), &f.household, input).unwrap();

        ExpenseService::record_payment(&mut expense, f.c, dec!(33.34)).unwrap();

        assert!(expense.participant(f.c).unwrap().is_paid);
    }

    #[test]
    fn test_amounts_limited_to_four_decimal_places() {
        let f = fixture();
        let input = new_expense(f.a, dec!(10.00005), vec![share(f.b, dec!(1))]);
        assert_eq!(
            ExpenseService::validate_new_expense(&input, &f.household),
            Err(ExpenseError::AmountPrecision(dec!(10.00005)))
        );

        let input = new_expense(f.a, dec!(10.250000), vec![share(f.b, dec!(1))]);
        let mut expense = ExpenseService::create(ExpenseId::new(), &f.household, input).unwrap();
        assert_eq!(
            ExpenseService::record_payment(&mut expense, f.b, dec!(0.00001)),
            Err(ExpenseError::AmountPrecision(dec!(0.00001)))
        );
    }
}
