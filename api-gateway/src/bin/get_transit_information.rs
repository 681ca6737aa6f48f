//! Transit Information Lambda - Handles GET /api/transit_information.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::http::{error_response, json_response, with_cors};
use shared::{pricing, user_from_request, Config, TimelineStore, TransitInformation};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Application state shared across requests.
struct AppState {
    store: TimelineStore,
    config: Config,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env()?;
        let store = TimelineStore::new(shared::store::from_config(&config.storage).await);

        Ok(Self { store, config })
    }
}

async fn read_pricing(state: &AppState, event: &Request) -> shared::Result<TransitInformation> {
    let user = user_from_request(event)?;
    pricing::transit_information(&state.store, &user.username).await
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    let response = match read_pricing(&state, &event).await {
        Ok(info) => json_response(200, &info)?,
        Err(e) => error_response(&e)?,
    };

    Ok(with_cors(response, state.config.cors_allow_origin.as_deref()))
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
