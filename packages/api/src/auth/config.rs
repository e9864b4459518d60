//! Signing configuration for session tokens.

use chrono::Duration;

/// Tokens stay valid for this long after issuance.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Process-wide token settings, built once at startup and handed to
/// [`super::TokenService::new`]. Changing the secret invalidates every
/// outstanding token.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    pub ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, String> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err("token signing secret must not be empty".to_string());
        }
        Ok(Self {
            secret: secret.to_vec(),
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        })
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}
