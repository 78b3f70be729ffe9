//! Account endpoints.
//!
//! `POST /api/user` is public (registration); `GET`/`PUT`/`DELETE` on the same
//! path act on the caller and sit behind the auth middleware as a route layer.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use clubhouse_auth::Handle;

use crate::app::routes::common::ApiJson;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;
use crate::middleware::{self, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    let require_auth = axum::middleware::from_fn_with_state(auth_state, middleware::auth_middleware);

    Router::new()
        .route(
            "/api/user",
            post(register).merge(
                get(current_user)
                    .put(update_user)
                    .delete(delete_user)
                    .route_layer(require_auth),
            ),
        )
        .route("/api/user/login", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::CredentialsRequest>,
) -> axum::response::Response {
    let handle = match Handle::parse(body.username) {
        Ok(h) => h,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.auth.register(handle, &body.password).await {
        Ok(principal) => (StatusCode::CREATED, Json(dto::user_to_json(&principal))).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::CredentialsRequest>,
) -> axum::response::Response {
    match services.auth.login(&body.username, &body.password).await {
        Ok(issued) => Json(issued).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn current_user(Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    Json(dto::user_to_json(principal.principal()))
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::UpdateUserRequest>,
) -> axum::response::Response {
    let handle = match Handle::parse(body.username) {
        Ok(h) => h,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.auth.change_handle(principal.principal(), handle).await {
        Ok(updated) => Json(dto::user_to_json(&updated)).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.delete_account(principal.principal()).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}
