//! Compact signed credential codec.
//!
//! Tokens use the JWS compact layout:
//!
//! ```text
//! base64url(header) "." base64url(claims) "." base64url(HMAC-SHA256(header "." claims))
//! ```
//!
//! The header must name `HS256`. Claims carry the subject, an informational
//! role and the absolute expiry in Unix seconds.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::security::clock::{Clock, SystemClock};
use crate::security::error::AuthError;
use crate::security::secret::SigningSecret;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

/// Decoded fields of a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub subject: String,
    pub role: String,
    #[serde(rename = "exp")]
    pub expires_at: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// A token split into its parts. The signature has not been checked yet.
#[derive(Debug, Clone)]
pub struct ParsedToken {
    claims: Claims,
    signing_input: String,
    signature: Vec<u8>,
}

impl ParsedToken {
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

/// Issues and parses credentials under one signing secret.
pub struct TokenCodec {
    secret: SigningSecret,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(secret: SigningSecret, clock: Arc<dyn Clock>) -> Self {
        Self { secret, clock }
    }

    pub fn with_system_clock(secret: SigningSecret) -> Self {
        Self::new(secret, Arc::new(SystemClock))
    }

    /// Current time as seen by this codec.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Issue a token for `subject` that expires `ttl` from now.
    pub fn issue(&self, subject: &str, role: &str, ttl: Duration) -> Result<String, AuthError> {
        if subject.is_empty() || role.is_empty() {
            return Err(AuthError::Signing(
                "subject and role must not be empty".to_string(),
            ));
        }
        // Expiry has seconds resolution; anything shorter would be dead on arrival.
        if ttl.as_secs() == 0 {
            return Err(AuthError::Signing("ttl must be at least one second".to_string()));
        }

        let claims = Claims {
            subject: subject.to_string(),
            role: role.to_string(),
            expires_at: self.now().saturating_add(ttl.as_secs()),
        };

        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: Some("JWT".to_string()),
        };

        let header = encode_segment(&header)?;
        let payload = encode_segment(&claims)?;
        let signing_input = format!("{}.{}", header, payload);

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", signing_input, signature))
    }

    /// Split and decode a token without checking its signature.
    pub fn parse(token: &str) -> Result<ParsedToken, AuthError> {
        let mut parts = token.split('.');
        let (header, payload, signature) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(p), Some(s), None) if !h.is_empty() && !p.is_empty() && !s.is_empty() => {
                (h, p, s)
            }
            _ => {
                return Err(AuthError::MalformedToken(
                    "expected three non-empty segments".to_string(),
                ))
            }
        };

        let decoded: Header = decode_segment(header, "header")?;
        if decoded.alg != ALGORITHM {
            return Err(AuthError::MalformedToken(format!(
                "unsupported algorithm {}",
                decoded.alg
            )));
        }

        let claims: Claims = decode_segment(payload, "claims")?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|e| AuthError::MalformedToken(format!("signature: {}", e)))?;

        Ok(ParsedToken {
            claims,
            signing_input: format!("{}.{}", header, payload),
            signature,
        })
    }

    /// Recompute the signature over the parsed token and compare in constant time.
    pub fn verify_signature(&self, token: &ParsedToken) -> Result<(), AuthError> {
        let mut mac = self.mac()?;
        mac.update(token.signing_input.as_bytes());
        mac.verify_slice(&token.signature)
            .map_err(|_| AuthError::InvalidSignature)
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::Signing("signing secret is not set".to_string()));
        }
        HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, AuthError> {
    let json = serde_json::to_vec(value).map_err(|e| AuthError::Signing(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str, what: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthError::MalformedToken(format!("{}: {}", what, e)))?;
    serde_json::from_slice(&bytes).map_err(|e| AuthError::MalformedToken(format!("{}: {}", what, e)))
}
