//! Household routes.

use std::collections::HashSet;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use hearth_core::household::Household;
use hearth_db::HouseholdRepository;
use hearth_shared::{
    AppError,
    types::{HouseholdId, MemberId},
};
use serde::Deserialize;
use tracing::info;

use super::load_household;
use crate::{AppState, error::ApiError};

/// Creates the household routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/households", post(create_household))
        .route("/households/{household_id}", get(get_household))
        .route("/households/{household_id}/members", post(add_member))
}

/// Request body for creating a household.
#[derive(Debug, Deserialize)]
pub struct CreateHouseholdRequest {
    /// Household name.
    pub name: String,
    /// Creating member.
    pub owner_id: MemberId,
    /// Initial members in join order.
    #[serde(default)]
    pub member_ids: Vec<MemberId>,
}

/// Request body for adding a member.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// Member joining the household.
    pub member_id: MemberId,
}

/// POST `/households` - Create a household.
async fn create_household(
    State(state): State<AppState>,
    Json(payload): Json<CreateHouseholdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Household name cannot be empty".to_string()).into());
    }

    let mut seen = HashSet::with_capacity(payload.member_ids.len());
    if let Some(duplicate) = payload.member_ids.iter().find(|m| !seen.insert(**m)) {
        return Err(AppError::Validation(format!("Member {duplicate} is listed more than once")).into());
    }

    let household = Household {
        id: HouseholdId::new(),
        name: name.to_string(),
        owner: payload.owner_id,
        members: payload.member_ids,
    };

    HouseholdRepository::new((*state.db).clone())
        .create(&household)
        .await?;

    info!(household_id = %household.id, owner_id = %household.owner, "Household created");

    Ok((StatusCode::CREATED, Json(household)))
}

/// GET `/households/{household_id}` - Fetch a household.
async fn get_household(
    State(state): State<AppState>,
    Path(household_id): Path<HouseholdId>,
) -> Result<impl IntoResponse, ApiError> {
    let household = load_household(&state, household_id).await?;
    Ok(Json(household))
}

/// POST `/households/{household_id}/members` - Add a member.
async fn add_member(
    State(state): State<AppState>,
    Path(household_id): Path<HouseholdId>,
    Json(payload): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut household = load_household(&state, household_id).await?;

    if household.members.contains(&payload.member_id) {
        return Err(AppError::Conflict(format!(
            "Member {} already belongs to this household",
            payload.member_id
        ))
        .into());
    }

    HouseholdRepository::new((*state.db).clone())
        .add_member(&household, payload.member_id)
        .await?;
    household.members.push(payload.member_id);

    info!(household_id = %household.id, member_id = %payload.member_id, "Member added");

    Ok((StatusCode::CREATED, Json(household)))
}
