use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use clubhouse_clubs::{Club, ClubDraft};
use clubhouse_core::ClubId;

use crate::app::routes::common::{ApiJson, load_owned, parse_id};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_club).get(list_clubs))
        .route("/:id", get(get_club).put(update_club).delete(delete_club))
}

pub async fn create_club(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::ClubRequest>,
) -> axum::response::Response {
    let draft = match ClubDraft::new(&body.name, body.http_link.as_deref()) {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let club = match services.clubs.insert(principal.user_id(), draft).await {
        Ok(c) => c,
        Err(e) => return errors::store_error_to_response(e),
    };

    tracing::info!(club_id = %club.id, owner_id = %club.owner_id, "club created");
    (StatusCode::CREATED, Json(dto::club_to_json(&club))).into_response()
}

pub async fn list_clubs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.clubs.list_by_owner(principal.user_id()).await {
        Ok(clubs) => {
            let items: Vec<_> = clubs.iter().map(dto::club_to_json).collect();
            Json(serde_json::json!({ "items": items })).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_club(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ClubId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match load_owned::<Club>(services.clubs.as_ref(), &principal, id).await {
        Ok(club) => Json(dto::club_to_json(&club)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn update_club(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::ClubRequest>,
) -> axum::response::Response {
    let id: ClubId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut club = match load_owned::<Club>(services.clubs.as_ref(), &principal, id).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let draft = match ClubDraft::new(&body.name, body.http_link.as_deref()) {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };
    club.apply(draft);

    match services.clubs.update(club).await {
        Ok(club) => Json(dto::club_to_json(&club)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_club(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ClubId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if let Err(resp) = load_owned::<Club>(services.clubs.as_ref(), &principal, id).await {
        return resp;
    }

    match services.clubs.delete(id).await {
        Ok(true) => {
            tracing::info!(club_id = %id, "club deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        // Removed concurrently between the ownership check and the delete.
        Ok(false) => errors::store_error_to_response(clubhouse_infra::StoreError::NotFound),
        Err(e) => errors::store_error_to_response(e),
    }
}
