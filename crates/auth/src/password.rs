//! Salted password hashing (argon2, PHC string format).

use std::sync::OnceLock;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::SaltString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("failed to generate salt: {0}")]
    Salt(String),

    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// An argon2 PHC string (`$argon2id$v=19$...`).
///
/// Not `Serialize`; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext secret with a fresh random salt.
    ///
    /// CPU-bound; async callers should run this on a blocking thread.
    pub fn generate(plaintext: &str) -> Result<Self, PasswordError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;
        let phc = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?
            .to_string();
        Ok(Self(phc))
    }

    /// Wrap a PHC string loaded from storage.
    pub fn from_phc(phc: String) -> Self {
        Self(phc)
    }

    pub fn as_phc(&self) -> &str {
        &self.0
    }

    /// Check `candidate` against this hash.
    ///
    /// The comparison is done by argon2's verifier (constant time over the
    /// derived key). An unparseable stored hash never matches.
    pub fn verify(&self, candidate: &str) -> bool {
        match password_hash::PasswordHash::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::error!(error = %e, "stored password hash is unreadable");
                false
            }
        }
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Burn the same amount of work as a real check when there is no user to
/// check against, so unknown emails and wrong passwords cost the same.
pub(crate) fn verify_against_dummy(candidate: &str) {
    static DUMMY: OnceLock<Option<PasswordHash>> = OnceLock::new();
    let dummy = DUMMY.get_or_init(|| PasswordHash::generate("coursebook-dummy-secret").ok());
    if let Some(hash) = dummy {
        let _ = hash.verify(candidate);
    }
}
