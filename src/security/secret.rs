//! Process-wide signing secret.

use std::fmt;
use std::sync::Arc;

use rand::RngCore;

const GENERATED_LEN: usize = 32;

/// Key used to sign and verify credentials.
///
/// Built once before the listener starts and shared read-only afterwards.
/// Replacing it invalidates every credential issued under the old value.
#[derive(Clone)]
pub struct SigningSecret {
    bytes: Arc<[u8]>,
}

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::from(bytes.into()),
        }
    }

    /// Fresh random secret. Tokens signed with it do not survive a restart.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; GENERATED_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::new(bytes)
    }

    /// Read the secret from `var`, falling back to a generated one when the
    /// variable is absent or empty.
    pub fn from_env_or_generate(var: &str) -> Self {
        match std::env::var(var) {
            Ok(value) if !value.is_empty() => {
                tracing::info!(env = var, "Using signing secret from environment");
                Self::new(value.into_bytes())
            }
            _ => {
                tracing::info!(env = var, "No signing secret supplied, generating one");
                Self::generate()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret")
            .field("len", &self.bytes.len())
            .finish()
    }
}
