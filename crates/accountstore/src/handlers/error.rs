use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use accountstore_core::account::{account_error_to_status_code, AccountError};

pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, kind) = if let Some(account_error) = self.0.downcast_ref::<AccountError>()
        {
            let code = account_error_to_status_code(account_error);
            (
                StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                account_error.kind(),
            )
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        };

        if status_code.is_server_error() {
            tracing::error!(error = %self.0, status = %status_code, "Request failed");
        }

        let body = Json(json!({
            "error": kind,
            "message": self.0.to_string(),
        }));
        (status_code, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Reports an undecodable request body as invalid input.
pub fn invalid_body(rejection: JsonRejection) -> AccountError {
    AccountError::InvalidInput(rejection.body_text())
}

/// Reports undecodable query parameters as invalid input.
pub fn invalid_query(rejection: QueryRejection) -> AccountError {
    AccountError::InvalidInput(rejection.body_text())
}
