//! Balance and settle-up routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use hearth_core::expense::{BalanceCalculator, BalanceSheet, SettlementPlanner, SettlementTransaction};
use hearth_db::ExpenseRepository;
use hearth_shared::types::HouseholdId;
use serde::Serialize;
use tracing::debug;

use super::load_household;
use crate::{AppState, error::ApiError};

/// Creates the settlement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/households/{household_id}/balances", get(get_balances))
        .route("/households/{household_id}/settle-up", get(get_settle_up))
        .route("/households/{household_id}/settlement", get(get_settlement))
}

/// Balances together with the transfers that settle them.
#[derive(Debug, Serialize)]
pub struct SettlementResponse {
    /// Net balance per member. Positive means owed money.
    pub balances: BalanceSheet,
    /// Suggested transfers, in execution order.
    pub transactions: Vec<SettlementTransaction>,
}

async fn household_balances(state: &AppState, household_id: HouseholdId) -> Result<BalanceSheet, ApiError> {
    let household = load_household(state, household_id).await?;

    let expenses = ExpenseRepository::new((*state.db).clone())
        .list_by_household(household.id)
        .await?;

    Ok(BalanceCalculator::calculate(&expenses))
}

/// GET `/households/{household_id}/balances` - Net balance per member.
async fn get_balances(
    State(state): State<AppState>,
    Path(household_id): Path<HouseholdId>,
) -> Result<impl IntoResponse, ApiError> {
    let balances = household_balances(&state, household_id).await?;
    Ok(Json(balances))
}

/// GET `/households/{household_id}/settle-up` - Transfers that settle all balances.
async fn get_settle_up(
    State(state): State<AppState>,
    Path(household_id): Path<HouseholdId>,
) -> Result<impl IntoResponse, ApiError> {
    let balances = household_balances(&state, household_id).await?;
    let transactions = SettlementPlanner::plan(&balances);

    debug!(household_id = %household_id, transfers = transactions.len(), "Settle-up planned");

    Ok(Json(transactions))
}

/// GET `/households/{household_id}/settlement` - Balances and transfers together.
async fn get_settlement(
    State(state): State<AppState>,
    Path(household_id): Path<HouseholdId>,
) -> Result<impl IntoResponse, ApiError> {
    let balances = household_balances(&state, household_id).await?;
    let transactions = SettlementPlanner::plan(&balances);

    debug!(household_id = %household_id, transfers = transactions.len(), "Settle-up planned");

    Ok(Json(SettlementResponse {
        balances,
        transactions,
    }))
}
