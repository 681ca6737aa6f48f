//! Sign-in negotiation against the Cognito token endpoint.
//!
//! A request is resolved in two steps:
//! 1. exchange `code` + `state` query parameters (authorization code grant),
//! 2. failing that, exchange the `refresh_token` cookie (refresh token grant).
//!
//! Nothing is kept server-side. The refresh token travels back to the
//! browser in an `HttpOnly` cookie and the access token in the body.

use async_trait::async_trait;
use lambda_http::http::header::{CONTENT_TYPE, SET_COOKIE};
use lambda_http::{Body, Request, Response};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::OAuthConfig;
use crate::http::{header, query_param};
use crate::models::StatusResponse;
use crate::{Error, Result};

/// Inputs of a sign-in request.
#[derive(Debug, Clone, Default)]
pub struct SignInRequest {
    pub code: Option<String>,
    pub state: Option<String>,
    pub cookie: Option<String>,
}

impl SignInRequest {
    pub fn from_request(event: &Request) -> Self {
        Self {
            code: query_param(event, "code"),
            state: query_param(event, "state"),
            cookie: header(event, "cookie"),
        }
    }
}

/// Token pair handed back to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    pub access_token: String,
    pub refresh_token: String,
}

/// Raw answer of the token endpoint.
#[derive(Debug, Clone)]
pub struct TokenExchangeResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// An OAuth2 token endpoint accepting form-encoded grants.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    async fn exchange(&self, form: &[(&str, &str)]) -> Result<TokenExchangeResponse>;
}

/// Cognito hosted-UI token endpoint.
pub struct CognitoTokenEndpoint {
    http_client: reqwest::Client,
    token_url: String,
}

impl CognitoTokenEndpoint {
    pub fn new(http_client: reqwest::Client, token_url: String) -> Self {
        Self {
            http_client,
            token_url,
        }
    }
}

#[async_trait]
impl TokenEndpoint for CognitoTokenEndpoint {
    async fn exchange(&self, form: &[(&str, &str)]) -> Result<TokenExchangeResponse> {
        let response = self
            .http_client
            .post(&self.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| Error::UpstreamFailure(format!("Token exchange request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::UpstreamFailure(format!("Failed to read token response: {}", e)))?;

        Ok(TokenExchangeResponse { status, body })
    }
}

/// Fixed client registration used for every grant.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
}

impl ClientCredentials {
    pub fn from_config(config: &OAuthConfig, client_secret: String) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret,
            redirect_uri: config.redirect_uri.clone(),
            scope: config.scope.clone(),
        }
    }
}

/// Resolves sign-in requests into token pairs.
pub struct Negotiator<E> {
    endpoint: E,
    credentials: ClientCredentials,
}

impl<E: TokenEndpoint> Negotiator<E> {
    pub fn new(endpoint: E, credentials: ClientCredentials) -> Self {
        Self {
            endpoint,
            credentials,
        }
    }

    /// Try the authorization code, then the refresh token cookie.
    pub async fn negotiate(&self, request: &SignInRequest) -> Result<AuthenticationResult> {
        match self.login(request).await {
            Ok(result) => return Ok(result),
            Err(e) => info!(reason = %e, "Authorization code sign-in unavailable, trying refresh token"),
        }

        self.refresh(request).await.map_err(|e| {
            warn!(reason = %e, "Refresh token sign-in failed");
            Error::AuthExhausted
        })
    }

    async fn login(&self, request: &SignInRequest) -> Result<AuthenticationResult> {
        let (Some(code), Some(state)) = (
            request.code.as_deref().filter(|c| !c.is_empty()),
            request.state.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return Err(Error::InvalidInput("code / state is empty".to_string()));
        };

        info!(code = %mask_secret(code), "Exchanging authorization code");

        let creds = &self.credentials;
        let form = [
            ("state", state),
            ("grant_type", "authorization_code"),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", creds.redirect_uri.as_str()),
            ("scope", creds.scope.as_str()),
        ];

        let tokens = decode_token_response(self.endpoint.exchange(&form).await?)?;
        match (tokens.access_token, tokens.refresh_token) {
            (Some(access_token), Some(refresh_token)) => Ok(AuthenticationResult {
                access_token,
                refresh_token,
            }),
            _ => Err(Error::UpstreamFailure(
                "Token response is missing access_token or refresh_token".to_string(),
            )),
        }
    }

    async fn refresh(&self, request: &SignInRequest) -> Result<AuthenticationResult> {
        let refresh_token = request
            .cookie
            .as_deref()
            .and_then(refresh_token_from_cookie)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::InvalidInput("refresh_token cookie is empty".to_string()))?;

        info!(refresh_token = %mask_secret(refresh_token), "Exchanging refresh token");

        let creds = &self.credentials;
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("scope", creds.scope.as_str()),
        ];

        let tokens = decode_token_response(self.endpoint.exchange(&form).await?)?;
        let access_token = tokens.access_token.ok_or_else(|| {
            Error::UpstreamFailure("Token response is missing access_token".to_string())
        })?;

        // The provider does not rotate refresh tokens here; keep the cookie's.
        Ok(AuthenticationResult {
            access_token,
            refresh_token: refresh_token.to_string(),
        })
    }
}

fn decode_token_response(response: TokenExchangeResponse) -> Result<TokenResponse> {
    if response.status != 200 {
        warn!(status = response.status, body = %response.body, "Token endpoint rejected the grant");
        return Err(Error::UpstreamFailure(format!(
            "Token endpoint returned {}",
            response.status
        )));
    }

    serde_json::from_str(&response.body)
        .map_err(|e| Error::UpstreamFailure(format!("Failed to parse token response: {}", e)))
}

/// Value of the first `;`-separated cookie part whose text contains `refresh_token`.
///
/// The match is on a substring of the whole part, so `my_refresh_token_x=1`
/// also matches. The value is the text between the first and second `=`.
pub fn refresh_token_from_cookie(cookie: &str) -> Option<&str> {
    cookie
        .split(';')
        .find(|part| part.contains("refresh_token"))
        .map(|part| part.split('=').nth(1).unwrap_or(""))
}

/// `abcdefgh` -> `ab****gh`. Anything shorter than four characters is fully masked.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() < 4 {
        return "****".to_string();
    }

    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 4), tail)
}

/// Build the sign-in response for a negotiation outcome.
pub fn sign_in_response(outcome: &Result<AuthenticationResult>) -> Result<Response<Body>> {
    let (status, body, cookie) = match outcome {
        Ok(result) => (
            200,
            StatusResponse {
                status: "ok",
                access_token: Some(result.access_token.as_str()),
            },
            format!("refresh_token={}; HttpOnly; Secure", result.refresh_token),
        ),
        Err(_) => (
            400,
            StatusResponse::error(),
            "refresh_token=; HttpOnly; Secure".to_string(),
        ),
    };

    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .header(SET_COOKIE, cookie)
        .body(Body::from(serde_json::to_string(&body)?))?)
}
