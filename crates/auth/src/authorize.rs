//! Ownership guard for mutating owned resources.

use thiserror::Error;

use coursebook_core::EmailAddress;

use crate::principal::Principal;

/// A record that may be owned by a user.
///
/// The guard only needs the owner's email, so implementors expose just that.
pub trait OwnedResource {
    /// Email of the owning user, or `None` when the record has no owner.
    fn owner_email(&self) -> Option<&EmailAddress>;
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: principal does not own this resource")]
    Forbidden,

    #[error("resource not found")]
    NotFound,
}

/// Allow the change only if `principal` owns `resource`.
///
/// - No IO
/// - No panics
/// - No role or admin override: ownership is the only pass condition
///
/// Ownership is decided by comparing email addresses exactly. An ownerless
/// resource is forbidden to everyone.
pub fn authorize<R>(principal: &Principal, resource: &R) -> Result<(), AuthzError>
where
    R: OwnedResource + ?Sized,
{
    match resource.owner_email() {
        Some(owner) if owner == &principal.email => Ok(()),
        _ => Err(AuthzError::Forbidden),
    }
}

/// [`authorize`] for a lookup result: a missing resource is `NotFound`.
pub fn authorize_found<R>(principal: &Principal, resource: Option<&R>) -> Result<(), AuthzError>
where
    R: OwnedResource,
{
    let resource = resource.ok_or(AuthzError::NotFound)?;
    authorize(principal, resource)
}
