use serde::Deserialize;

use clubhouse_auth::Principal;
use clubhouse_clubs::{Club, Team};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ClubRequest {
    pub name: String,
    #[serde(default)]
    pub http_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TeamRequest {
    pub name: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

/// Public view of a principal; the secret hash never leaves the service.
pub fn user_to_json(principal: &Principal) -> serde_json::Value {
    serde_json::json!({
        "id": principal.id,
        "username": principal.handle.as_str(),
    })
}

pub fn club_to_json(club: &Club) -> serde_json::Value {
    serde_json::json!({
        "id": club.id,
        "name": club.name,
        "http_link": club.http_link,
        "owner_id": club.owner_id,
    })
}

pub fn team_to_json(team: &Team) -> serde_json::Value {
    serde_json::json!({
        "id": team.id,
        "name": team.name,
        "owner_id": team.owner_id,
    })
}
