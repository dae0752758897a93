//! Security subsystem: the fixed request-transform pipeline.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (origin reflection, preflight short-circuit)
//!     → headers.rs (hardening response headers)
//!     → body cap (axum DefaultBodyLimit, wired in http/server.rs)
//!     → sanitize.rs (strip store-operator keys, neutralize scripts)
//!     → pollution.rs (duplicate query parameters collapse to last)
//!     → compression (tower-http, wired in http/server.rs)
//!     → connection_gate.rs (live store session or uniform 500)
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - The order is an explicit layer list in `http/server.rs`, never implied
//!   by call-chain side effects; each stage may short-circuit terminally
//! - Fail closed: a request that cannot be sanitized cleanly is rejected
//!   rather than passed through raw

pub mod connection_gate;
pub mod cors;
pub mod headers;
pub mod pollution;
pub mod sanitize;
