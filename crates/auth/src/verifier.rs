//! Credential verifier: Basic header → authenticated [`Principal`].

use thiserror::Error;
use zeroize::Zeroizing;

use coursebook_core::StoreError;

use crate::credentials::BasicCredentials;
use crate::directory::UserDirectory;
use crate::password::{self, PasswordHash};
use crate::principal::Principal;

/// Why a request could not be authenticated.
///
/// The first four variants are expected rejections and all surface to
/// clients as the same 401. `Store` is a fault in the directory and must not
/// be reported as a credential problem.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no basic credentials supplied")]
    Missing,

    #[error("basic credentials are malformed")]
    Malformed,

    #[error("no user with that email address")]
    NotFound,

    #[error("secret does not match")]
    BadSecret,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Stable, secret-free label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Malformed => "malformed",
            Self::NotFound => "not_found",
            Self::BadSecret => "bad_secret",
            Self::Store(_) => "store",
        }
    }

    /// True for credential rejections (as opposed to directory faults).
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

/// Authenticate a raw `Authorization` header value against `directory`.
///
/// Header problems are detected before any lookup. Password verification
/// runs on tokio's blocking pool, and an unknown email still pays for one
/// hash check so the two rejection paths cost the same.
pub async fn authenticate<D>(directory: &D, header: Option<&str>) -> Result<Principal, AuthError>
where
    D: UserDirectory + ?Sized,
{
    let credentials = BasicCredentials::from_header(header)?;
    let user = directory.find_by_email(credentials.identifier()).await?;

    let stored = user.as_ref().map(|u| u.password_hash.clone());
    let matched = verify_blocking(stored, credentials.into_secret()).await;

    match user {
        None => Err(AuthError::NotFound),
        Some(_) if !matched => Err(AuthError::BadSecret),
        Some(user) => Ok(Principal::from(&user)),
    }
}

async fn verify_blocking(stored: Option<PasswordHash>, secret: Zeroizing<String>) -> bool {
    let outcome = tokio::task::spawn_blocking(move || match stored {
        Some(hash) => hash.verify(&secret),
        None => {
            password::verify_against_dummy(&secret);
            false
        }
    })
    .await;

    match outcome {
        Ok(matched) => matched,
        Err(e) => {
            tracing::error!(error = %e, "password verification task failed");
            false
        }
    }
}
