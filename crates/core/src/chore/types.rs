//! Chore domain types.

use chrono::{DateTime, Duration, Months, Utc};
use hearth_shared::types::{ChoreId, HouseholdId, MemberId};
use serde::{Deserialize, Serialize};

use super::error::ChoreError;

/// How often a chore recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day.
    Daily,
    /// Every seven days.
    Weekly,
    /// Every calendar month.
    Monthly,
}

impl Frequency {
    /// Returns the moment one period after `from`.
    ///
    /// Monthly steps clamp to the end of shorter months (Jan 31 → Feb 28/29).
    #[must_use]
    pub fn advance(self, from: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Daily => from + Duration::days(1),
            Self::Weekly => from + Duration::days(7),
            Self::Monthly => from
                .checked_add_months(Months::new(1))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Returns the lowercase name used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Frequency {
    type Err = ChoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ChoreError::UnknownFrequency(s.to_string())),
        }
    }
}

/// A single completion of a chore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoreCompletion {
    /// Member who did the chore.
    pub member: MemberId,
    /// When it was marked done.
    pub completed_at: DateTime<Utc>,
    /// True if it was done after the due date.
    pub was_missed: bool,
}

/// A recurring household chore with a rotating assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chore {
    /// Chore ID.
    pub id: ChoreId,
    /// Household the chore belongs to.
    pub household_id: HouseholdId,
    /// Chore name, e.g. "Take out the bins".
    pub name: String,
    /// Recurrence.
    pub frequency: Frequency,
    /// Member currently responsible, if any.
    pub assigned_to: Option<MemberId>,
    /// Position of the assignee in the household rotation.
    pub rotation_index: usize,
    /// When the chore is next due.
    pub due_date: DateTime<Utc>,
    /// True once the due date has passed without completion.
    pub is_overdue: bool,
    /// Completions, oldest first.
    pub history: Vec<ChoreCompletion>,
}

/// Input for creating a chore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChore {
    /// Chore name.
    pub name: String,
    /// Recurrence.
    pub frequency: Frequency,
    /// First assignee. Defaults to the first household member.
    pub assigned_to: Option<MemberId>,
    /// First due date. Defaults to one period from now.
    pub due_date: Option<DateTime<Utc>>,
}
