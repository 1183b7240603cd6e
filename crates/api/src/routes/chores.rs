//! Chore routes: listing, creating and completing chores.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use hearth_core::chore::{ChoreScheduler, Frequency, NewChore};
use hearth_db::ChoreRepository;
use hearth_shared::types::{ChoreId, HouseholdId, MemberId};
use serde::Deserialize;
use tracing::info;

use super::load_household;
use crate::{AppState, error::ApiError};

/// Creates the chore routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/households/{household_id}/chores",
            get(list_chores).post(create_chore),
        )
        .route("/chores/{chore_id}/complete", post(complete_chore))
}

/// Request body for creating a chore.
#[derive(Debug, Deserialize)]
pub struct CreateChoreRequest {
    /// Chore name.
    pub name: String,
    /// `daily`, `weekly` or `monthly`.
    pub frequency: String,
    /// First assignee. Defaults to the first household member.
    #[serde(default)]
    pub assigned_to: Option<MemberId>,
    /// First due date. Defaults to one period from now.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Request body for completing a chore.
#[derive(Debug, Deserialize)]
pub struct CompleteChoreRequest {
    /// Member who did the chore.
    pub member_id: MemberId,
}

/// GET `/households/{household_id}/chores` - List chores, refreshing overdue flags and assignees.
async fn list_chores(
    State(state): State<AppState>,
    Path(household_id): Path<HouseholdId>,
) -> Result<impl IntoResponse, ApiError> {
    let household = load_household(&state, household_id).await?;
    let repo = ChoreRepository::new((*state.db).clone());

    let mut chores = repo.list_by_household(household.id).await?;
    let now = Utc::now();

    for chore in &mut chores {
        if ChoreScheduler::refresh(chore, &household.members, now) {
            repo.update_schedule(chore).await?;
        }
    }

    Ok(Json(chores))
}

/// POST `/households/{household_id}/chores` - Create a chore.
async fn create_chore(
    State(state): State<AppState>,
    Path(household_id): Path<HouseholdId>,
    Json(payload): Json<CreateChoreRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let household = load_household(&state, household_id).await?;

    let frequency: Frequency = payload.frequency.parse()?;
    let input = NewChore {
        name: payload.name,
        frequency,
        assigned_to: payload.assigned_to,
        due_date: payload.due_date,
    };
    let chore = ChoreScheduler::new_chore(ChoreId::new(), &household, input, Utc::now())?;

    ChoreRepository::new((*state.db).clone())
        .create(&chore)
        .await?;

    info!(
        household_id = %household.id,
        chore_id = %chore.id,
        frequency = %chore.frequency,
        "Chore created"
    );

    Ok((StatusCode::CREATED, Json(chore)))
}

/// POST `/chores/{chore_id}/complete` - Mark a chore done and rotate it.
async fn complete_chore(
    State(state): State<AppState>,
    Path(chore_id): Path<ChoreId>,
    Json(payload): Json<CompleteChoreRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let chore = ChoreRepository::new((*state.db).clone())
        .complete(chore_id, payload.member_id, Utc::now())
        .await?;

    info!(
        chore_id = %chore.id,
        member_id = %payload.member_id,
        next_assignee = ?chore.assigned_to,
        due_date = %chore.due_date,
        "Chore completed"
    );

    Ok(Json(chore))
}
