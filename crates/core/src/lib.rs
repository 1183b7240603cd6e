//! Core business logic for Hearth.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `household` - Household membership and chore rotation order
//! - `expense` - Shared expenses, net balances and settle-up transfers
//! - `chore` - Recurring chores with rotating assignees

pub mod chore;
pub mod expense;
pub mod household;

pub use household::Household;
