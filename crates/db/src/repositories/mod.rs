//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! They read and write the domain types of `hearth-core`.

pub mod chore;
pub mod expense;
pub mod household;

pub use chore::{ChoreRepository, CompletionError};
pub use expense::{ExpenseRepository, PaymentError};
pub use household::HouseholdRepository;

use sea_orm::DbErr;

/// Converts a list index into a stored `position` column.
fn to_position(index: usize) -> Result<i32, DbErr> {
    i32::try_from(index).map_err(|_| DbErr::Custom(format!("position {index} out of range")))
}
