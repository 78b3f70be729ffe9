use clubhouse_auth::{Handle, Principal};
use clubhouse_core::UserId;

/// Principal context for a request (the authenticated caller).
///
/// Inserted by the auth middleware; present on every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn user_id(&self) -> UserId {
        self.principal.id
    }

    pub fn handle(&self) -> &Handle {
        &self.principal.handle
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
