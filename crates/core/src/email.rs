//! Email address value object.

use crate::error::{DomainError, DomainResult};

/// A syntactically plausible email address.
///
/// Comparison is exact and case-sensitive: the address is the login key and
/// is matched byte-for-byte, never normalised.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse user input. Surrounding whitespace is trimmed.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if looks_like_email(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(DomainError::validation(format!("invalid email address: {trimmed:?}")))
        }
    }

    /// Wrap a value that was validated before it was stored.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

// local@domain.tld, no whitespace, exactly one '@'.
fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
