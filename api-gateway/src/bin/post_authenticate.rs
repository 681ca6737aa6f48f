//! Authenticate Lambda - Handles /api/authenticate.
//!
//! Signs the browser in with an authorization code (`code` + `state` query
//! parameters) or, failing that, with the `refresh_token` cookie set by a
//! previous sign-in.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::http::with_cors;
use shared::negotiator::sign_in_response;
use shared::{
    resolve_client_secret, ClientCredentials, CognitoTokenEndpoint, Negotiator, OAuthConfig,
    SignInRequest,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state shared across requests.
struct AppState {
    negotiator: Negotiator<CognitoTokenEndpoint>,
    cors_allow_origin: Option<String>,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = OAuthConfig::from_env()?;
        let client_secret = resolve_client_secret(&config.client_secret).await?;

        let endpoint = CognitoTokenEndpoint::new(reqwest::Client::new(), config.token_url.clone());
        let credentials = ClientCredentials::from_config(&config, client_secret);

        Ok(Self {
            negotiator: Negotiator::new(endpoint, credentials),
            cors_allow_origin: config.cors_allow_origin,
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    let request = SignInRequest::from_request(&event);
    let outcome = state.negotiator.negotiate(&request).await;

    info!(signed_in = outcome.is_ok(), "Sign-in negotiated");

    let response = sign_in_response(&outcome)?;
    Ok(with_cors(response, state.cors_allow_origin.as_deref()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
