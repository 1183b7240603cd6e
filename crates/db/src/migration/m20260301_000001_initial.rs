//! Initial database migration.
//!
//! Creates the household, expense and chore tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(HOUSEHOLDS_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;
        db.execute_unprepared(CHORES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const HOUSEHOLDS_SQL: &str = r"
CREATE TABLE households (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    owner_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_household_name_not_blank CHECK (length(trim(name)) > 0)
);

CREATE INDEX idx_households_owner ON households(owner_id);

CREATE TABLE household_members (
    household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    member_id UUID NOT NULL,
    position INTEGER NOT NULL,
    joined_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (household_id, member_id),
    CONSTRAINT uq_household_member_position UNIQUE (household_id, position),
    CONSTRAINT chk_member_position CHECK (position >= 0)
);

CREATE INDEX idx_household_members_member ON household_members(member_id);
";

const EXPENSES_SQL: &str = r"
-- Money and shares are NUMERIC, never floating point
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    payer_id UUID NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    date TIMESTAMPTZ NOT NULL,
    is_completely_paid BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_expense_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_expenses_household ON expenses(household_id, created_at, id);

CREATE TABLE expense_participants (
    expense_id UUID NOT NULL REFERENCES expenses(id) ON DELETE CASCADE,
    member_id UUID NOT NULL,
    position INTEGER NOT NULL,
    share NUMERIC NOT NULL,
    amount_paid NUMERIC(19, 4) NOT NULL DEFAULT 0,
    is_paid BOOLEAN NOT NULL DEFAULT false,
    PRIMARY KEY (expense_id, member_id),
    CONSTRAINT chk_participant_share CHECK (share > 0 AND share <= 1),
    CONSTRAINT chk_participant_paid CHECK (amount_paid >= 0)
);
";

const CHORES_SQL: &str = r"
CREATE TABLE chores (
    id UUID PRIMARY KEY,
    household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    frequency VARCHAR(16) NOT NULL,
    assigned_to UUID,
    rotation_index INTEGER NOT NULL DEFAULT 0,
    due_date TIMESTAMPTZ NOT NULL,
    is_overdue BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_chore_frequency CHECK (frequency IN ('daily', 'weekly', 'monthly')),
    CONSTRAINT chk_rotation_index CHECK (rotation_index >= 0)
);

CREATE INDEX idx_chores_household ON chores(household_id, created_at, id);

CREATE TABLE chore_completions (
    id UUID PRIMARY KEY,
    chore_id UUID NOT NULL REFERENCES chores(id) ON DELETE CASCADE,
    member_id UUID NOT NULL,
    completed_at TIMESTAMPTZ NOT NULL,
    was_missed BOOLEAN NOT NULL
);

CREATE INDEX idx_chore_completions_chore ON chore_completions(chore_id, completed_at, id);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS chore_completions CASCADE;
DROP TABLE IF EXISTS chores CASCADE;
DROP TABLE IF EXISTS expense_participants CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS household_members CASCADE;
DROP TABLE IF EXISTS households CASCADE;
";
