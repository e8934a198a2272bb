//! API Handlers
//!
//! HTTP request handlers for each endpoint. Every authenticated handler is
//! one linear pipeline: validate params, authenticate, transform, touch the
//! cache, respond.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::auth::{self, HttpIdentityVerifier, IdentityVerifier};
use crate::cache::{self, ResponseCache};
use crate::error::Result;
use crate::models::{
    parse_body, HealthResponse, JoinRequest, JoinResponse, SignatureQuery, SplitRequest,
    SplitResponse,
};
use crate::transform;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Per-user last-response store
    pub cache: Arc<dyn ResponseCache>,
    /// Credential checker
    pub identity: Arc<dyn IdentityVerifier>,
}

impl AppState {
    /// Creates a new AppState from its collaborators.
    pub fn new(cache: Arc<dyn ResponseCache>, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self { cache, identity }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Uses memcached when a pool is configured and the HTTP identity
    /// service at `identity_url`.
    pub fn from_config(config: &crate::config::Config) -> anyhow::Result<Self> {
        let cache = cache::from_config(config)?;
        let identity =
            HttpIdentityVerifier::new(config.identity_url.clone(), config.identity_timeout())?;
        Ok(Self::new(cache, Arc::new(identity)))
    }

    async fn authorize(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        signature: Option<&str>,
        signature_required: bool,
    ) -> Result<String> {
        auth::authorize(
            self.identity.as_ref(),
            headers,
            body,
            signature,
            signature_required,
        )
        .await
    }
}

/// Signature from the query string.
///
/// A query string that does not parse counts as carrying no signature.
fn supplied_signature(query: &Option<Query<SignatureQuery>>) -> Option<&str> {
    query
        .as_ref()
        .and_then(|Query(query)| query.signature.as_deref())
}

/// Handler for POST /split
///
/// Splits `string` into odd- and even-position characters and remembers
/// the result as the caller's last response.
pub async fn split_handler(
    State(state): State<AppState>,
    query: Option<Query<SignatureQuery>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SplitResponse>> {
    let input = parse_body::<SplitRequest>(&body)?.into_input()?;
    let username = state
        .authorize(&headers, &body, supplied_signature(&query), true)
        .await?;

    let (odd, even) = transform::split(&input);
    let response = SplitResponse::new(odd, even);

    cache::store_json(state.cache.as_ref(), &username, &response).await?;
    debug!(username = %username, "split stored as last response");

    Ok(Json(response))
}

/// Handler for POST /join
///
/// Interleaves `odd` and `even` back into one string and remembers the
/// result as the caller's last response.
pub async fn join_handler(
    State(state): State<AppState>,
    query: Option<Query<SignatureQuery>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<JoinResponse>> {
    let (odd, even) = parse_body::<JoinRequest>(&body)?.into_parts()?;
    let username = state
        .authorize(&headers, &body, supplied_signature(&query), true)
        .await?;

    let response = JoinResponse::new(transform::join(&odd, &even));

    cache::store_json(state.cache.as_ref(), &username, &response).await?;
    debug!(username = %username, "join stored as last response");

    Ok(Json(response))
}

/// Handler for GET /lastResponse
///
/// Returns the caller's most recent split/join response, or `null` when
/// there is none. A signature is accepted but not required.
pub async fn last_response_handler(
    State(state): State<AppState>,
    query: Option<Query<SignatureQuery>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let username = state
        .authorize(&headers, &body, supplied_signature(&query), false)
        .await?;

    let last = cache::load_json(state.cache.as_ref(), &username).await?;
    Ok(Json(last))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
