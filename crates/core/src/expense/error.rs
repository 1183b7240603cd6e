//! Expense error types.

use hearth_shared::types::MemberId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Decimal places kept for stored money amounts.
pub const MAX_AMOUNT_SCALE: u32 = 4;

/// Errors raised while recording expenses or share payments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpenseError {
    // ========== Creation Errors ==========
    /// Expense name is blank.
    #[error("Expense name cannot be empty")]
    EmptyName,

    /// Amount is zero or negative.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Amount carries more decimal places than money is stored with.
    #[error("Amount {0} has more than {max} decimal places", max = MAX_AMOUNT_SCALE)]
    AmountPrecision(Decimal),

    /// Expense has no participants.
    #[error("Expense must have at least one participant")]
    NoParticipants,

    /// Share outside (0, 1].
    #[error("Share {share} for member {member} must be greater than 0 and at most 1")]
    InvalidShare {
        /// The participant.
        member: MemberId,
        /// The rejected share.
        share: Decimal,
    },

    /// Some participants were given a share and others were not.
    #[error("Share missing for member {0}; give every participant a share or none")]
    MissingShare(MemberId),

    /// Same member listed twice.
    #[error("Member {0} is listed more than once")]
    DuplicateParticipant(MemberId),

    /// Payer or participant outside the household.
    #[error("Member {0} does not belong to this household")]
    NotHouseholdMember(MemberId),

    // ========== Payment Errors ==========
    /// Member does not take part in the expense.
    #[error("Member {0} is not a participant of this expense")]
    NotParticipant(MemberId),

    /// The payer tried to pay a share to themselves.
    #[error("The payer cannot pay their own share")]
    PayerCannotPayOwnShare,

    /// Share already settled.
    #[error("Share of member {0} is already paid")]
    AlreadyPaid(MemberId),

    /// Payment larger than the unpaid part of the share.
    #[error("Member {member} owes only {remaining} on this expense")]
    Overpayment {
        /// The paying participant.
        member: MemberId,
        /// Unpaid part of the share.
        remaining: Decimal,
    },
}

impl ExpenseError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "EMPTY_NAME",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::AmountPrecision(_) => "AMOUNT_PRECISION",
            Self::NoParticipants => "NO_PARTICIPANTS",
            Self::InvalidShare { .. } => "INVALID_SHARE",
            Self::MissingShare(_) => "MISSING_SHARE",
            Self::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
            Self::NotHouseholdMember(_) => "NOT_HOUSEHOLD_MEMBER",
            Self::NotParticipant(_) => "NOT_PARTICIPANT",
            Self::PayerCannotPayOwnShare => "PAYER_CANNOT_PAY_OWN_SHARE",
            Self::AlreadyPaid(_) => "ALREADY_PAID",
            Self::Overpayment { .. } => "OVERPAYMENT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed input
            Self::EmptyName
            | Self::NonPositiveAmount
            | Self::AmountPrecision(_)
            | Self::NoParticipants
            | Self::InvalidShare { .. }
            | Self::MissingShare(_)
            | Self::DuplicateParticipant(_)
            | Self::NotHouseholdMember(_) => 400,

            // 409 Conflict - state does not allow the payment
            Self::AlreadyPaid(_) => 409,

            // 422 Unprocessable - business rule
            Self::NotParticipant(_) | Self::PayerCannotPayOwnShare | Self::Overpayment { .. } => {
                422
            }
        }
    }
}
