//! Credential verification.
//!
//! Each call walks the same steps and keeps no state between calls:
//! prefix → structural parse → signature → expiry.

use std::sync::Arc;

use crate::security::error::AuthError;
use crate::security::token::{Claims, TokenCodec};

/// Scheme prefix required on the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Checks presented credentials against the codec's secret and clock.
#[derive(Clone)]
pub struct CredentialVerifier {
    codec: Arc<TokenCodec>,
}

impl CredentialVerifier {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Verify a raw header value such as `Bearer <token>`.
    pub fn verify(&self, presented: &str) -> Result<Claims, AuthError> {
        let token = presented
            .strip_prefix(BEARER_PREFIX)
            .filter(|rest| !rest.is_empty())
            .ok_or(AuthError::MissingCredential)?;

        let parsed = TokenCodec::parse(token)?;
        self.codec.verify_signature(&parsed)?;

        let claims = parsed.into_claims();
        if self.codec.now() >= claims.expires_at {
            return Err(AuthError::ExpiredCredential);
        }

        Ok(claims)
    }
}
