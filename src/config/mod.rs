//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overlay: MONGODB_URI, APP_ENV, PORT)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the process is ephemeral, so there is
//!   no reload path
//! - All fields have defaults so a bare environment still boots
//! - The environment flag gates raw error detail exposure, nothing else

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    Environment, GatewayConfig, LimitsConfig, ListenerConfig, ObservabilityConfig,
    PollutionConfig, StoreConfig,
};
