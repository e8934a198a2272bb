//! HTTP Basic credentials
//!
//! Parses `Authorization: Basic <base64(username:password)>` headers.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Username/password pair taken from a Basic auth header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Extracts credentials from request headers.
    ///
    /// Returns `None` when the header is absent, uses another scheme,
    /// is not valid base64/UTF-8, or lacks the `:` separator.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        // password may itself contain ':'
        let (username, password) = decoded.split_once(':')?;

        Some(Self::new(username, password))
    }

    /// Encodes these credentials as an `Authorization` header value.
    pub fn to_header_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_parse_basic_header() {
        // "alice:secret"
        let headers = headers_with("Basic YWxpY2U6c2VjcmV0");
        let creds = Credentials::from_headers(&headers).unwrap();
        assert_eq!(creds, Credentials::new("alice", "secret"));
    }

    #[test]
    fn test_password_with_colon() {
        let creds = Credentials::new("bob", "pa:ss:word");
        let headers = headers_with(&creds.to_header_value());
        assert_eq!(Credentials::from_headers(&headers), Some(creds));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let headers = headers_with("basic YWxpY2U6c2VjcmV0");
        assert!(Credentials::from_headers(&headers).is_some());
    }

    #[test]
    fn test_rejects_missing_or_malformed() {
        assert!(Credentials::from_headers(&HeaderMap::new()).is_none());
        assert!(Credentials::from_headers(&headers_with("Bearer abc")).is_none());
        assert!(Credentials::from_headers(&headers_with("Basic !!!")).is_none());
        // "nocolon"
        assert!(Credentials::from_headers(&headers_with("Basic bm9jb2xvbg==")).is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("alice", "secret"));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("secret"));
    }
}
