//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Login:
//!     → token.rs (issue signed credential for subject + role)
//!
//! Protected request:
//!     → verifier.rs (strip "Bearer ", parse, check signature, check expiry)
//!     → token.rs (parse compact form, recompute signature)
//!     → claims attached to the request context
//! ```
//!
//! # Design Decisions
//! - The signing secret is built once and injected; nothing reads a global
//! - Signatures are compared in constant time
//! - A token is dead at its expiry instant (`now >= exp`)
//! - Fail closed: any verification failure rejects the request

pub mod clock;
pub mod error;
pub mod secret;
pub mod token;
pub mod verifier;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AuthError;
pub use secret::SigningSecret;
pub use token::{Claims, ParsedToken, TokenCodec};
pub use verifier::{CredentialVerifier, BEARER_PREFIX};
