//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layered security pipeline)
//!     → request_id.rs (attach x-request-id)
//!     → [routing table dispatches to a resource route group]
//!     → error.rs (normalize any failure into the uniform envelope)
//!     → Send to client
//! ```

pub mod error;
pub mod health;
pub mod request_id;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, GatewayServer};
