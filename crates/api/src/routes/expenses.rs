//! Expense routes: recording expenses and paying shares.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use hearth_core::expense::{ExpenseService, NewExpense};
use hearth_db::ExpenseRepository;
use hearth_shared::types::{ExpenseId, HouseholdId, MemberId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use super::load_household;
use crate::{AppState, error::ApiError};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/households/{household_id}/expenses",
            get(list_expenses).post(create_expense),
        )
        .route("/expenses/{expense_id}/pay", post(pay_share))
}

/// A participant in a create-expense request.
#[derive(Debug, Deserialize)]
pub struct ParticipantRequest {
    /// Participating member.
    pub member_id: MemberId,
    /// Share in (0, 1]. Omit on every participant for an equal split.
    #[serde(default)]
    pub share: Option<Decimal>,
}

/// Request body for creating an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Short description.
    pub name: String,
    /// Member who fronted the money.
    pub payer_id: MemberId,
    /// Total cost.
    pub amount: Decimal,
    /// When it happened. Defaults to now.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Participants and optional shares.
    pub participants: Vec<ParticipantRequest>,
}

/// Request body for paying towards a share.
#[derive(Debug, Deserialize)]
pub struct PayShareRequest {
    /// Member paying their share.
    pub member_id: MemberId,
    /// Amount paid.
    pub amount: Decimal,
}

/// GET `/households/{household_id}/expenses` - List expenses in recording order.
async fn list_expenses(
    State(state): State<AppState>,
    Path(household_id): Path<HouseholdId>,
) -> Result<impl IntoResponse, ApiError> {
    let household = load_household(&state, household_id).await?;

    let expenses = ExpenseRepository::new((*state.db).clone())
        .list_by_household(household.id)
        .await?;

    Ok(Json(expenses))
}

/// POST `/households/{household_id}/expenses` - Record an expense.
async fn create_expense(
    State(state): State<AppState>,
    Path(household_id): Path<HouseholdId>,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let household = load_household(&state, household_id).await?;

    let requested: Vec<(MemberId, Option<Decimal>)> = payload
        .participants
        .iter()
        .map(|p| (p.member_id, p.share))
        .collect();
    let participants = ExpenseService::resolve_shares(&requested)?;

    let input = NewExpense {
        name: payload.name,
        payer: payload.payer_id,
        amount: payload.amount,
        date: payload.date.unwrap_or_else(Utc::now),
        participants,
    };
    let expense = ExpenseService::create(ExpenseId::new(), &household, input)?;

    ExpenseRepository::new((*state.db).clone())
        .create(&expense)
        .await?;

    info!(
        household_id = %household.id,
        expense_id = %expense.id,
        amount = %expense.amount,
        participants = expense.participants.len(),
        "Expense recorded"
    );

    Ok((StatusCode::CREATED, Json(expense)))
}

/// POST `/expenses/{expense_id}/pay` - Pay towards a participant's share.
async fn pay_share(
    State(state): State<AppState>,
    Path(expense_id): Path<ExpenseId>,
    Json(payload): Json<PayShareRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = ExpenseRepository::new((*state.db).clone())
        .pay_share(expense_id, payload.member_id, payload.amount)
        .await?;

    info!(
        expense_id = %expense.id,
        member_id = %payload.member_id,
        amount = %payload.amount,
        is_completely_paid = expense.is_completely_paid,
        "Share payment recorded"
    );

    Ok(Json(expense))
}
