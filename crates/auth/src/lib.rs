//! `coursebook-auth`: authentication and ownership checks.
//!
//! This crate is decoupled from HTTP and storage: the verifier reads users
//! through the [`UserDirectory`] port, and the ownership guard is a pure
//! function over values the caller already fetched.

pub mod authorize;
pub mod credentials;
pub mod directory;
pub mod password;
pub mod principal;
pub mod user;
pub mod verifier;

pub use authorize::{authorize, authorize_found, AuthzError, OwnedResource};
pub use credentials::BasicCredentials;
pub use directory::UserDirectory;
pub use password::{PasswordError, PasswordHash};
pub use principal::Principal;
pub use user::{RegisterUser, RegistrationError, User};
pub use verifier::{authenticate, AuthError};
