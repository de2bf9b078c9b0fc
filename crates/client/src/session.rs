//! Admin bearer token.

use secrecy::{ExposeSecret, SecretString};

/// Opaque credential proving admin authorization.
///
/// The token is never validated client-side and never expires here; the
/// backend decides what it is worth.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Wrap a raw token, trimming surrounding whitespace.
    ///
    /// Returns `None` for an empty token.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(SecretString::from(trimmed.to_owned())))
        }
    }

    /// The raw token, for the `Authorization` header and the session file.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}
