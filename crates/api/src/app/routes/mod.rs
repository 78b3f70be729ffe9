use axum::{Router, routing::get};

pub mod clubs;
pub mod common;
pub mod system;
pub mod teams;
pub mod users;

/// Router for all authenticated endpoints except the `/api/user` ones, which
/// share their path with public registration (see [`users::router`]).
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/api/club", clubs::router())
        .nest("/api/team", teams::router())
}
