//! API Module
//!
//! HTTP handlers and routing for the REST API.
//!
//! # Endpoints
//! - `POST /split` - Split a string into odd/even characters
//! - `POST /join` - Join odd/even characters back into a string
//! - `GET /lastResponse` - Caller's most recent split/join response
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
