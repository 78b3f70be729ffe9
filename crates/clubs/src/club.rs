use serde::{Deserialize, Serialize};

use clubhouse_core::{ClubId, DomainError, DomainResult, Entity, OwnedResource, UserId};

use crate::name::validate_name;

pub const CLUB_NAME_MIN: usize = 4;
pub const CLUB_NAME_MAX: usize = 50;
pub const HTTP_LINK_MAX: usize = 2083;

/// A club, owned by the user that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub http_link: Option<String>,
    pub owner_id: UserId,
}

impl Club {
    pub fn from_draft(id: ClubId, owner_id: UserId, draft: ClubDraft) -> Self {
        Self {
            id,
            name: draft.name,
            http_link: draft.http_link,
            owner_id,
        }
    }

    /// Replace mutable fields; id and owner never change.
    pub fn apply(&mut self, draft: ClubDraft) {
        self.name = draft.name;
        self.http_link = draft.http_link;
    }
}

impl Entity for Club {
    type Id = ClubId;

    fn id(&self) -> ClubId {
        self.id
    }
}

impl OwnedResource for Club {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// Validated club fields supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubDraft {
    name: String,
    http_link: Option<String>,
}

impl ClubDraft {
    pub fn new(name: &str, http_link: Option<&str>) -> DomainResult<Self> {
        let name = validate_name("club name", name, CLUB_NAME_MIN, CLUB_NAME_MAX)?;
        let http_link = match http_link.map(str::trim).filter(|l| !l.is_empty()) {
            Some(link) => Some(validate_http_link(link)?),
            None => None,
        };
        Ok(Self { name, http_link })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn http_link(&self) -> Option<&str> {
        self.http_link.as_deref()
    }
}

/// `http(s)://` followed by a dotted host made of word characters or dashes,
/// with an optional path/query tail.
fn validate_http_link(link: &str) -> DomainResult<String> {
    let invalid = || DomainError::validation("invalid HTTP link format");

    if link.chars().count() > HTTP_LINK_MAX {
        return Err(DomainError::validation(format!(
            "HTTP link must be under {HTTP_LINK_MAX} characters"
        )));
    }

    let rest = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"))
        .ok_or_else(invalid)?;

    let host_end = rest.find(['/', '?', '#', ':']).unwrap_or(rest.len());
    let (host, tail) = rest.split_at(host_end);

    let labels: Vec<&str> = host.split('.').collect();
    let label_ok = |l: &&str| {
        !l.is_empty() && l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    };
    if labels.len() < 2 || !labels.iter().all(label_ok) {
        return Err(invalid());
    }
    if tail.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    Ok(link.to_string())
}
