//! API route definitions.

use axum::Router;
use hearth_core::household::Household;
use hearth_db::HouseholdRepository;
use hearth_shared::{AppError, types::HouseholdId};

use crate::{AppState, error::ApiError};

pub mod chores;
pub mod expenses;
pub mod health;
pub mod households;
pub mod settlement;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(households::routes())
        .merge(expenses::routes())
        .merge(settlement::routes())
        .merge(chores::routes())
}

/// Loads a household or fails with `NOT_FOUND`.
async fn load_household(state: &AppState, id: HouseholdId) -> Result<Household, ApiError> {
    HouseholdRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Household {id} not found")).into())
}
