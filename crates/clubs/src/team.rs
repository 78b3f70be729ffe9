use serde::{Deserialize, Serialize};

use clubhouse_core::{DomainResult, Entity, OwnedResource, TeamId, UserId};

use crate::name::validate_name;

pub const TEAM_NAME_MIN: usize = 4;
pub const TEAM_NAME_MAX: usize = 30;

/// A team, owned by the user that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub owner_id: UserId,
}

impl Team {
    pub fn from_draft(id: TeamId, owner_id: UserId, draft: TeamDraft) -> Self {
        Self {
            id,
            name: draft.name,
            owner_id,
        }
    }

    pub fn apply(&mut self, draft: TeamDraft) {
        self.name = draft.name;
    }
}

impl Entity for Team {
    type Id = TeamId;

    fn id(&self) -> TeamId {
        self.id
    }
}

impl OwnedResource for Team {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDraft {
    name: String,
}

impl TeamDraft {
    pub fn new(name: &str) -> DomainResult<Self> {
        let name = validate_name("team name", name, TEAM_NAME_MIN, TEAM_NAME_MAX)?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clubhouse_core::DomainError;

    #[test]
    fn accepts_valid_team_name() {
        assert_eq!(TeamDraft::new("Red Lions").unwrap().name(), "Red Lions");
    }

    #[test]
    fn rejects_out_of_range_and_symbols() {
        for name in ["Red", "x".repeat(31).as_str(), "Red_Lions"] {
            match TeamDraft::new(name) {
                Err(DomainError::Validation(_)) => {}
                other => panic!("expected validation error for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn apply_keeps_owner() {
        let mut team = Team::from_draft(TeamId::new(1), UserId::new(2), TeamDraft::new("Red Lions").unwrap());
        team.apply(TeamDraft::new("Blue Lions").unwrap());
        assert_eq!(team.owner_id(), UserId::new(2));
        assert_eq!(team.name, "Blue Lions");
    }
}
