//! Registered user record and the registration step that creates it.

use chrono::{DateTime, Utc};
use thiserror::Error;
use zeroize::Zeroizing;

use coursebook_core::{DomainError, EmailAddress, Entity, UserId, Violations};

use crate::password::{PasswordError, PasswordHash};

/// A registered user as held by the store (hash included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Registration input. Every field is optional so that all missing fields
/// are reported together rather than one per attempt.
#[derive(Default)]
pub struct RegisterUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<Zeroizing<String>>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl User {
    /// Validate registration input and build a user with the password hash
    /// already computed. The plaintext is wiped when `input` is dropped.
    ///
    /// Hashing is CPU-bound; async callers should run this on a blocking
    /// thread.
    pub fn register(input: RegisterUser, now: DateTime<Utc>) -> Result<User, RegistrationError> {
        let mut violations = Violations::new();

        let first_name = required(&mut violations, input.first_name.as_deref(), "firstName");
        let last_name = required(&mut violations, input.last_name.as_deref(), "lastName");

        let email = match required(&mut violations, input.email_address.as_deref(), "emailAddress") {
            Some(raw) => match EmailAddress::parse(&raw) {
                Ok(email) => Some(email),
                Err(_) => {
                    violations.push("Please provide a valid email address for \"emailAddress\"");
                    None
                }
            },
            None => None,
        };

        let password = input.password.filter(|p| !p.trim().is_empty());
        if password.is_none() {
            violations.push("Please provide a value for \"password\"");
        }

        violations.finish()?;

        // `finish` succeeded, so every field above is present.
        let (Some(first_name), Some(last_name), Some(email), Some(password)) =
            (first_name, last_name, email, password)
        else {
            return Err(DomainError::validation("incomplete registration").into());
        };

        let password_hash = PasswordHash::generate(&password)?;

        Ok(User {
            id: UserId::new(),
            first_name,
            last_name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        })
    }
}

fn required(violations: &mut Violations, value: Option<&str>, field: &str) -> Option<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => {
            violations.push(format!("Please provide a value for \"{field}\""));
            None
        }
    }
}
