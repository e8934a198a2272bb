//! Request and Response models for the API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{parse_body, JoinRequest, SignatureQuery, SplitRequest};
pub use responses::{HealthResponse, JoinResponse, SplitResponse};
