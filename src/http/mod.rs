//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, tower layers: request id, trace, timeout, body limit)
//!     → middleware/chain.rs (interceptor chain for the matched route)
//!         → middleware/auth.rs (verify credential, attach claims)
//!         → middleware/payload.rs (decode + validate body, attach record)
//!     → crate::handlers (business handler)
//!     → response.rs (error shaping)
//! ```

pub mod middleware;
pub mod response;
pub mod server;

pub use response::{ApiError, ErrorBody};
pub use server::{build_router, AppState};
