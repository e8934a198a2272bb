//! Request DTOs for the API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.
//! Bodies are parsed from the raw bytes so the same bytes can be checked
//! against the request signature.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ApiError, Result};

/// Query string accepted by every authenticated endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignatureQuery {
    /// Hex SHA-1 of the raw request body
    #[serde(default)]
    pub signature: Option<String>,
}

/// Request body for POST /split
#[derive(Debug, Clone, Deserialize)]
pub struct SplitRequest {
    /// The string to split
    #[serde(default)]
    pub string: Option<String>,
}

impl SplitRequest {
    /// Returns the input string, or a validation error when absent.
    pub fn into_input(self) -> Result<String> {
        self.string
            .ok_or_else(|| ApiError::Validation("Missing required field: string".to_string()))
    }
}

/// Request body for POST /join
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRequest {
    /// Characters from odd positions
    #[serde(default)]
    pub odd: Option<Vec<String>>,
    /// Characters from even positions
    #[serde(default)]
    pub even: Option<Vec<String>>,
}

impl JoinRequest {
    /// Returns `(odd, even)`, or a validation error naming what is missing.
    pub fn into_parts(self) -> Result<(Vec<String>, Vec<String>)> {
        match (self.odd, self.even) {
            (Some(odd), Some(even)) => Ok((odd, even)),
            (None, Some(_)) => Err(missing("odd")),
            (Some(_), None) => Err(missing("even")),
            (None, None) => Err(missing("odd, even")),
        }
    }
}

fn missing(fields: &str) -> ApiError {
    ApiError::Validation(format!("Missing required field: {}", fields))
}

/// Parses a JSON request body.
///
/// An empty body is treated as `{}` so absent fields surface as
/// validation errors rather than syntax errors.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };

    serde_json::from_slice(body)
        .map_err(|err| ApiError::Validation(format!("Invalid request body: {}", err)))
}
