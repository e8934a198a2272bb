//! Authentication Module
//!
//! Credential parsing, identity verification and body signatures, plus the
//! gate that combines them for each request.

mod credentials;
mod identity;
mod signature;

pub use credentials::Credentials;
pub use identity::{HttpIdentityVerifier, IdentityVerifier, StaticIdentityVerifier};
pub use signature::{digest, is_valid_signature};

use axum::http::HeaderMap;
use tracing::info;

use crate::error::{ApiError, Result};

/// Authenticates a request and returns the verified username.
///
/// Credentials are checked first (401), then the body signature (403).
pub async fn authorize(
    verifier: &dyn IdentityVerifier,
    headers: &HeaderMap,
    body: &[u8],
    signature: Option<&str>,
    signature_required: bool,
) -> Result<String> {
    let Some(credentials) = Credentials::from_headers(headers) else {
        info!("Rejected request without usable basic credentials");
        return Err(ApiError::Unauthorized);
    };

    if !verifier
        .is_valid_user(&credentials.username, &credentials.password)
        .await
    {
        info!(username = %credentials.username, "Rejected invalid credentials");
        return Err(ApiError::Unauthorized);
    }

    if !is_valid_signature(body, signature, signature_required) {
        info!(username = %credentials.username, "Rejected invalid or missing signature");
        return Err(ApiError::InvalidSignature);
    }

    Ok(credentials.username)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, HeaderValue};

    fn headers_for(username: &str, password: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = Credentials::new(username, password).to_header_value();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
        headers
    }

    fn verifier() -> StaticIdentityVerifier {
        StaticIdentityVerifier::new().with_user("alice", "secret")
    }

    #[tokio::test]
    async fn test_authorize_success() {
        let body = b"payload";
        let sig = digest(body);
        let user = authorize(&verifier(), &headers_for("alice", "secret"), body, Some(&sig), true)
            .await
            .unwrap();
        assert_eq!(user, "alice");
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let result = authorize(&verifier(), &HeaderMap::new(), b"", None, false).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_bad_password() {
        let result =
            authorize(&verifier(), &headers_for("alice", "nope"), b"", None, false).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_credentials_checked_before_signature() {
        let result = authorize(&verifier(), &headers_for("alice", "nope"), b"x", None, true).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_missing_required_signature() {
        let result =
            authorize(&verifier(), &headers_for("alice", "secret"), b"x", None, true).await;
        assert!(matches!(result, Err(ApiError::InvalidSignature)));
    }

    #[tokio::test]
    async fn test_optional_signature() {
        let result =
            authorize(&verifier(), &headers_for("alice", "secret"), b"", None, false).await;
        assert_eq!(result.unwrap(), "alice");
    }
}
