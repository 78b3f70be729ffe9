use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use clubhouse_clubs::{Team, TeamDraft};
use clubhouse_core::TeamId;
use clubhouse_infra::StoreError;

use crate::app::routes::common::{ApiJson, load_owned, parse_id};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_team).get(list_teams))
        .route("/:id", get(get_team).put(update_team).delete(delete_team))
}

pub async fn create_team(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::TeamRequest>,
) -> axum::response::Response {
    let draft = match TeamDraft::new(&body.name) {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.teams.insert(principal.user_id(), draft).await {
        Ok(team) => {
            tracing::info!(team_id = %team.id, owner_id = %team.owner_id, "team created");
            (StatusCode::CREATED, Json(dto::team_to_json(&team))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_teams(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.teams.list_by_owner(principal.user_id()).await {
        Ok(teams) => {
            let items: Vec<_> = teams.iter().map(dto::team_to_json).collect();
            Json(serde_json::json!({ "items": items })).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_team(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TeamId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match load_owned::<Team>(services.teams.as_ref(), &principal, id).await {
        Ok(team) => Json(dto::team_to_json(&team)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn update_team(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::TeamRequest>,
) -> axum::response::Response {
    let id: TeamId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut team = match load_owned::<Team>(services.teams.as_ref(), &principal, id).await {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    match TeamDraft::new(&body.name) {
        Ok(draft) => team.apply(draft),
        Err(e) => return errors::domain_error_to_response(e),
    }

    match services.teams.update(team).await {
        Ok(team) => Json(dto::team_to_json(&team)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_team(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TeamId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if let Err(resp) = load_owned::<Team>(services.teams.as_ref(), &principal, id).await {
        return resp;
    }

    match services.teams.delete(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => errors::store_error_to_response(StoreError::NotFound),
        Err(e) => errors::store_error_to_response(e),
    }
}
