//! API Module
//!
//! HTTP handlers and routing that expose cache groups to peers and clients.
//!
//! # Endpoints
//! - `GET /_ringcache/:group/*key` - Cached bytes for a key
//! - `GET /_ringcache/:group/` - Empty key, rejected with 400
//! - `GET /stats/:group` - Cache statistics of a group
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
