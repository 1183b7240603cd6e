//! Recurring household chores.
//!
//! This module implements:
//! - Chore, frequency and completion types
//! - Due dates, overdue tracking and assignee rotation (`ChoreScheduler`)

pub mod error;
pub mod scheduler;
pub mod types;

pub use error::ChoreError;
pub use scheduler::ChoreScheduler;
pub use types::{Chore, ChoreCompletion, Frequency, NewChore};
