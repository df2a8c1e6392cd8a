use coursebook_core::{EmailAddress, UserId};

use crate::user::User;

/// An authenticated user, as handed to request handlers.
///
/// Carries no password material; it is built only by the verifier after a
/// successful check (or from a freshly stored `User`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}
