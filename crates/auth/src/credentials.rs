//! HTTP Basic credential decoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use zeroize::Zeroizing;

use crate::verifier::AuthError;

/// `identifier:secret` pair decoded from an `Authorization: Basic ...` value.
///
/// The secret is wiped from memory on drop and never printed by `Debug`.
pub struct BasicCredentials {
    identifier: String,
    secret: Zeroizing<String>,
}

impl BasicCredentials {
    /// Decode the raw `Authorization` header value.
    ///
    /// - absent header or non-Basic scheme → [`AuthError::Missing`]
    /// - empty token, bad base64, non UTF-8, or no `:` → [`AuthError::Malformed`]
    ///
    /// The payload is split on the first `:` only, so secrets may contain
    /// colons but identifiers may not.
    pub fn from_header(header: Option<&str>) -> Result<Self, AuthError> {
        let header = header.ok_or(AuthError::Missing)?.trim();

        let (scheme, token) = match header.split_once(|c: char| c.is_ascii_whitespace()) {
            Some((scheme, token)) => (scheme, token.trim()),
            None => (header, ""),
        };
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(AuthError::Missing);
        }
        if token.is_empty() {
            return Err(AuthError::Malformed);
        }

        let decoded = Zeroizing::new(STANDARD.decode(token).map_err(|_| AuthError::Malformed)?);
        let text = core::str::from_utf8(&decoded).map_err(|_| AuthError::Malformed)?;
        let (identifier, secret) = text.split_once(':').ok_or(AuthError::Malformed)?;

        Ok(Self {
            identifier: identifier.to_string(),
            secret: Zeroizing::new(secret.to_string()),
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn into_secret(self) -> Zeroizing<String> {
        self.secret
    }
}

impl core::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}
