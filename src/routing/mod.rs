//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Table Assembly (at startup):
//!     (prefix, route group)[]
//!     → table.rs (uniqueness + prefix shape checks)
//!     → Freeze as the /api router: inline health, nested groups,
//!       uniform 404 fallback
//!
//! Incoming request:
//!     /api/health          → inline handler (gate bypassed)
//!     /api/<prefix>/...    → delegated route group (gated)
//!     /api/<anything else> → 404 envelope echoing the path (gated)
//! ```
//!
//! # Design Decisions
//! - The table is immutable after process start; duplicates are a startup
//!   error, not a runtime precedence rule
//! - Route groups are external collaborators: self-contained routers whose
//!   internals the gateway never inspects

pub mod resources;
pub mod table;

pub use resources::RESOURCE_PREFIXES;
pub use table::{RouteGroup, RouteTable, RouteTableError};
