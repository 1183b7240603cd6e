//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": "<CODE>", "message": "<text>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hearth_core::chore::ChoreError;
use hearth_core::expense::ExpenseError;
use hearth_db::{CompletionError, PaymentError};
use hearth_shared::AppError;
use sea_orm::DbErr;
use serde_json::json;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    fn new(status: u16, code: &'static str, message: String) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        if err.is_internal() {
            tracing::error!(error = %err, "Request failed");
            return Self::new(err.status_code(), err.error_code(), "An error occurred".to_string());
        }
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }
}

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        Self::new(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<ChoreError> for ApiError {
    fn from(err: ChoreError) -> Self {
        Self::new(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::NotFound(_) => AppError::NotFound(err.to_string()).into(),
            PaymentError::Rejected(rule) => rule.into(),
            PaymentError::Database(db) => db.into(),
        }
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::NotFound(_) | CompletionError::HouseholdNotFound(_) => {
                AppError::NotFound(err.to_string()).into()
            }
            CompletionError::Rejected(rule) => rule.into(),
            CompletionError::Database(db) => db.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message,
            })),
        )
            .into_response()
    }
}
