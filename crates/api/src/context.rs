use coursebook_auth::Principal;

/// The authenticated user for a request.
///
/// Inserted into request extensions by the auth middleware; only present on
/// protected routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    principal: Principal,
}

impl CurrentUser {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
