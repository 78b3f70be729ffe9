use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use clubhouse_auth::AuthError;
use clubhouse_core::DomainError;
use clubhouse_infra::StoreError;

/// Map the auth taxonomy onto HTTP.
///
/// Credential and token failures carry a fixed message so the response never
/// reveals which check failed.
pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::InvalidCredentials => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid username or password",
        ),
        AuthError::Unauthenticated => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        ),
        AuthError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
        AuthError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        AuthError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        AuthError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        AuthError::Internal(msg) => {
            tracing::error!(error = %msg, "request failed");
            internal_error()
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        // The caller's account vanished between authentication and the write.
        StoreError::OwnerNotFound => auth_error_to_response(AuthError::Unauthenticated),
        StoreError::Backend(msg) => {
            tracing::error!(error = %msg, "store failure");
            internal_error()
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    auth_error_to_response(AuthError::from(err))
}

fn internal_error() -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal error",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
