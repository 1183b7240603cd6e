//! `SeaORM` entities for the Hearth schema.

pub mod chore_completions;
pub mod chores;
pub mod expense_participants;
pub mod expenses;
pub mod household_members;
pub mod households;
