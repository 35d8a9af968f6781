//! Authentication error taxonomy.

use thiserror::Error;

/// Reasons a credential could not be issued or accepted.
///
/// Every variant is recovered at the interceptor boundary and rendered as a
/// 401; none of them is a process-level fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("token has an incorrect format: {0}")]
    MalformedToken(String),

    #[error("token is wrong/missing")]
    MissingCredential,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token expired")]
    ExpiredCredential,
}

impl AuthError {
    /// Stable machine-readable reason, used in response bodies and metric labels.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Signing(_) => "signing_failed",
            AuthError::MalformedToken(_) => "malformed_token",
            AuthError::MissingCredential => "missing_credential",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::ExpiredCredential => "expired_credential",
        }
    }
}
