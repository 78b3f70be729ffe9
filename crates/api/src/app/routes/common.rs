use std::str::FromStr;

use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;

use clubhouse_auth::authorize_owned;
use clubhouse_core::DomainError;
use clubhouse_infra::{ResourceStore, StoredResource};

use crate::app::errors;
use crate::context::PrincipalContext;

/// `Json` body extractor whose rejections use the API's error envelope.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "request body rejected");
                Err(errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    rejection.body_text(),
                ))
            }
        }
    }
}

pub fn parse_id<I>(raw: &str) -> Result<I, axum::response::Response>
where
    I: FromStr<Err = DomainError>,
{
    raw.parse().map_err(errors::domain_error_to_response)
}

/// Load a resource for the caller: missing is 404, someone else's is 403.
pub async fn load_owned<R>(
    store: &dyn ResourceStore<R>,
    principal: &PrincipalContext,
    id: R::Id,
) -> Result<R, axum::response::Response>
where
    R: StoredResource,
{
    let found = store
        .get(id)
        .await
        .map_err(errors::store_error_to_response)?;

    authorize_owned(principal.principal(), found).map_err(errors::auth_error_to_response)
}
