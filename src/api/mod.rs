//! Read-only HTTP API over the analytics engine.
//!
//! Routes are nested under `/api/` and wrapped by an access-log
//! middleware. `analytics_router()` returns a `Router` that can be
//! mounted on any axum server; `server` runs it on a TCP listener.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::analytics_router;
pub use server::{start_api_server, ApiServer, ApiSession};
pub use types::ApiContext;
