//! Shared expenses and the settlement engine.
//!
//! This module implements:
//! - Expense and participant types
//! - Net balance calculation (`BalanceCalculator`)
//! - Settle-up suggestions (`SettlementPlanner`)
//! - Creation rules and share payments (`ExpenseService`)

pub mod balance;
pub mod error;
pub mod service;
pub mod settlement;
pub mod types;

#[cfg(test)]
mod scenarios;
#[cfg(test)]
mod settlement_props;

pub use balance::{BalanceCalculator, BalanceSheet};
pub use error::{ExpenseError, MAX_AMOUNT_SCALE};
pub use service::ExpenseService;
pub use settlement::{SETTLEMENT_EPSILON, SettlementPlanner, SettlementTransaction};
pub use types::{Expense, NewExpense, Participant, ParticipantShare};
