//! Chore scheduling: due dates, overdue tracking and assignee rotation.
//!
//! Every function takes `now` explicitly so callers (and tests) control time.

use chrono::{DateTime, Utc};
use hearth_shared::types::{ChoreId, MemberId};

use super::error::ChoreError;
use super::types::{Chore, ChoreCompletion, Frequency, NewChore};
use crate::household::Household;

/// Chore scheduler for business logic.
pub struct ChoreScheduler;

impl ChoreScheduler {
    /// First due date of a new chore: the explicit date if given, else one period from now.
    #[must_use]
    pub fn initial_due_date(
        frequency: Frequency,
        now: DateTime<Utc>,
        explicit: Option<DateTime<Utc>>,
    ) -> DateTime<Utc> {
        explicit.unwrap_or_else(|| frequency.advance(now))
    }

    /// Checks that an assignee belongs to the household.
    ///
    /// # Errors
    ///
    /// Returns `ChoreError::AssigneeNotInHousehold` otherwise.
    pub fn validate_assignee(household: &Household, assignee: MemberId) -> Result<(), ChoreError> {
        if household.includes(assignee) {
            Ok(())
        } else {
            Err(ChoreError::AssigneeNotInHousehold(assignee))
        }
    }

    /// Creates a chore.
    ///
    /// The first assignee is the requested one, else the first member, else
    /// the owner. Rotation continues from the assignee's place in
    /// [`Household::rotation_members`].
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the assignee is outside the household.
    pub fn new_chore(
        id: ChoreId,
        household: &Household,
        input: NewChore,
        now: DateTime<Utc>,
    ) -> Result<Chore, ChoreError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ChoreError::EmptyName);
        }

        if let Some(assignee) = input.assigned_to {
            Self::validate_assignee(household, assignee)?;
        }

        let assigned_to = input
            .assigned_to
            .or_else(|| household.members.first().copied())
            .unwrap_or(household.owner);
        let rotation_index = household
            .rotation_members()
            .iter()
            .position(|m| *m == assigned_to)
            .unwrap_or(0);

        Ok(Chore {
            id,
            household_id: household.id,
            name: name.to_string(),
            frequency: input.frequency,
            assigned_to: Some(assigned_to),
            rotation_index,
            due_date: Self::initial_due_date(input.frequency, now, input.due_date),
            is_overdue: false,
            history: Vec::new(),
        })
    }

    /// Brings a chore up to date when it is listed.
    ///
    /// Marks it overdue once the due date has passed. A chore without an
    /// assignee picks `members[rotation_index]` when that index is in range.
    /// Returns true if the chore changed.
    pub fn refresh(chore: &mut Chore, members: &[MemberId], now: DateTime<Utc>) -> bool {
        let mut changed = false;

        let overdue = chore.due_date < now;
        if chore.is_overdue != overdue {
            chore.is_overdue = overdue;
            changed = true;
        }

        if chore.assigned_to.is_none() {
            if let Some(&member) = members.get(chore.rotation_index) {
                chore.assigned_to = Some(member);
                changed = true;
            }
        }

        changed
    }

    /// Marks a chore done and hands it to the next member in the rotation.
    ///
    /// 1. Logs the completion, flagged as missed if the due date had passed.
    /// 2. Moves the due date one period on, counted from now if missed.
    /// 3. Clears the overdue flag.
    /// 4. With a single (or no) rotation member the completer keeps the chore;
    ///    otherwise the next member in `rotation` takes it.
    ///
    /// # Errors
    ///
    /// Returns `ChoreError::CompleterNotInHousehold` if `completed_by` is outside the household.
    pub fn complete(
        chore: &mut Chore,
        household: &Household,
        completed_by: MemberId,
        now: DateTime<Utc>,
    ) -> Result<(), ChoreError> {
        if !household.includes(completed_by) {
            return Err(ChoreError::CompleterNotInHousehold(completed_by));
        }

        let was_missed = chore.due_date < now;
        chore.history.push(ChoreCompletion {
            member: completed_by,
            completed_at: now,
            was_missed,
        });

        let from = if was_missed { now } else { chore.due_date };
        chore.due_date = chore.frequency.advance(from);
        chore.is_overdue = false;

        let rotation = household.rotation_members();
        if rotation.len() <= 1 {
            chore.assigned_to = Some(completed_by);
            chore.rotation_index = 0;
        } else {
            let next = (chore.rotation_index + 1) % rotation.len();
            chore.assigned_to = Some(rotation[next]);
            chore.rotation_index = next;
        }

        Ok(())
    }
}
