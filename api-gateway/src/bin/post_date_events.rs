//! Date Events Lambda - Handles POST /api/date_events.
//!
//! The body is the full visible window for `currentMonth`. It replaces
//! everything stored from that window's first Monday onwards; older days
//! are kept untouched.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::http::{error_response, json_response, parse_json_body, query_param, with_cors};
use shared::{date_events, user_from_request, Config, DateEvent, StatusResponse, TimelineStore};
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

async fn write_window(state: &AppState, event: &Request) -> shared::Result<()> {
    let user = user_from_request(event)?;
    let current_month = query_param(event, "currentMonth")
        .ok_or_else(|| shared::Error::InvalidInput("Missing currentMonth".to_string()))?;
    let incoming: Vec<DateEvent> = parse_json_body(event.body())?;

    date_events::replace_window(&state.store, &user.username, &current_month, incoming).await?;
    Ok(())
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    let response = match write_window(&state, &event).await {
        Ok(()) => json_response(200, &StatusResponse::ok())?,
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
