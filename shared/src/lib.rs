//! Shared library for andv Lambda functions.
//!
//! This crate provides the calendar window logic, document storage, sign-in
//! negotiation and the helpers used across all Lambda functions.

pub mod auth;
pub mod config;
pub mod date_events;
pub mod error;
pub mod http;
pub mod models;
pub mod month;
pub mod negotiator;
pub mod pricing;
pub mod secrets;
pub mod store;
pub mod timeline;

pub use auth::{extract_user_from_context, user_from_request, AuthenticatedUser, CognitoClaims};
pub use config::{Config, OAuthConfig, StorageConfig};
pub use error::{Error, Result};
pub use models::{DateEvent, Event, StatusResponse, Timeline, TransitInformation};
pub use month::{month_boundary, parse_year_month, YearMonth};
pub use negotiator::{
    AuthenticationResult, ClientCredentials, CognitoTokenEndpoint, Negotiator, SignInRequest,
    TokenEndpoint,
};
pub use secrets::{get_secret, resolve_client_secret};
pub use store::{BlobStore, TimelineStore};
