//! Request interceptors.
//!
//! # Data Flow
//! ```text
//! route handler
//!     → chain.rs (run stages in order, then the business handler)
//!     → auth.rs (Authorization: Bearer <token> → claims)
//!     → payload.rs (JSON body → validated Product)
//! ```
//!
//! # Design Decisions
//! - Authentication always runs before payload decoding
//! - Each stage forwards a typed context, never an untyped bag
//! - Stages hold no per-request state; they are shared across requests

pub mod auth;
pub mod chain;
pub mod payload;

pub use auth::AuthInterceptor;
pub use chain::{reject, Chain, Handler, Interceptor, Next, RequestContext};
pub use payload::{PayloadError, PayloadInterceptor};
