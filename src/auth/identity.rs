//! Identity verification
//!
//! Checks a username/password pair against the remote identity service.
//! Every failure mode (unreachable service, timeout, bad JSON, missing
//! `user_id`) collapses to "not a valid user".

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Maps credentials to a yes/no validity answer.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn is_valid_user(&self, username: &str, password: &str) -> bool;
}

/// Body returned by the identity endpoint.
#[derive(Debug, Deserialize)]
struct IdentityResponse {
    #[serde(default)]
    user_id: Value,
}

impl IdentityResponse {
    fn has_user_id(&self) -> bool {
        match &self.user_id {
            Value::String(id) => !id.is_empty(),
            Value::Number(id) => id.as_f64().is_some_and(|n| n != 0.0),
            _ => false,
        }
    }
}

// == HTTP Verifier ==
/// Calls `GET <url>?username=..&password=..` on the identity service.
#[derive(Debug, Clone)]
pub struct HttpIdentityVerifier {
    client: reqwest::Client,
    url: String,
}

impl HttpIdentityVerifier {
    /// Builds a verifier whose requests give up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn lookup(&self, username: &str, password: &str) -> reqwest::Result<IdentityResponse> {
        self.client
            .get(&self.url)
            .query(&[("username", username), ("password", password)])
            .send()
            .await?
            .json::<IdentityResponse>()
            .await
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn is_valid_user(&self, username: &str, password: &str) -> bool {
        match self.lookup(username, password).await {
            Ok(response) => {
                let valid = response.has_user_id();
                debug!(username, valid, "identity service answered");
                valid
            }
            Err(err) => {
                warn!(username, "identity check failed: {}", err);
                false
            }
        }
    }
}

// == Static Verifier ==
/// Fixed username/password table, for local runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityVerifier {
    users: HashMap<String, String>,
}

impl StaticIdentityVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(username.into(), password.into());
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn is_valid_user(&self, username: &str, password: &str) -> bool {
        self.users.get(username).is_some_and(|p| p == password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn verifier_for(server: &MockServer) -> HttpIdentityVerifier {
        HttpIdentityVerifier::new(format!("{}/auth", server.uri()), Duration::from_secs(2))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth"))
            .and(query_param("username", "alice"))
            .and(query_param("password", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user_id": "42" })))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server).await;
        assert!(verifier.is_valid_user("alice", "secret").await);
    }

    #[tokio::test]
    async fn test_numeric_user_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user_id": 7 })))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server).await;
        assert!(verifier.is_valid_user("bob", "pw").await);
    }

    #[tokio::test]
    async fn test_missing_or_empty_user_id() {
        for body in [json!({}), json!({ "user_id": "" }), json!({ "user_id": null }), json!({ "user_id": 0 })] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
                .mount(&server)
                .await;

            let verifier = verifier_for(&server).await;
            assert!(!verifier.is_valid_user("alice", "wrong").await, "body {body} accepted");
        }
    }

    #[tokio::test]
    async fn test_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server).await;
        assert!(!verifier.is_valid_user("alice", "secret").await);
    }

    #[tokio::test]
    async fn test_timeout_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "user_id": "42" }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let verifier =
            HttpIdentityVerifier::new(server.uri(), Duration::from_millis(100)).unwrap();
        assert!(!verifier.is_valid_user("alice", "secret").await);
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let verifier =
            HttpIdentityVerifier::new("http://127.0.0.1:9/auth", Duration::from_millis(500))
                .unwrap();
        assert!(!verifier.is_valid_user("alice", "secret").await);
    }

    #[tokio::test]
    async fn test_static_verifier() {
        let verifier = StaticIdentityVerifier::new().with_user("alice", "secret");
        assert!(verifier.is_valid_user("alice", "secret").await);
        assert!(!verifier.is_valid_user("alice", "wrong").await);
        assert!(!verifier.is_valid_user("mallory", "secret").await);
    }
}
