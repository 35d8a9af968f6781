//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, path from --config / APP_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ApiConfig (validated, immutable)
//!     → handed to the lifecycle controller at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ApiConfig, AuthConfig, LifecycleConfig, ListenerConfig, ObservabilityConfig, SecurityConfig,
    StoreConfig, TimeoutConfig, UserSeed,
};
