use async_trait::async_trait;

use coursebook_core::StoreError;

use crate::user::User;

/// Read-only user lookup used by the credential verifier.
///
/// Implementations must return the stored password hash with the user; it
/// is the one read path where the hash is allowed out of storage.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Exact, case-sensitive match on the email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}
