//! Configuration management for Lambda functions.

use std::env;
use std::path::PathBuf;

use crate::{Error, Result};

const DEFAULT_COGNITO_DOMAIN: &str = "https://andv.auth.ap-northeast-1.amazoncognito.com";
const DEFAULT_CLIENT_ID: &str = "2ugimh4tmganbnn94kk1u6r4p3";
const DEFAULT_REDIRECT_URI: &str = "https://andv.tomtsutom.com/login";
const DEFAULT_SCOPE: &str = "email openid phone profile";

/// Where user documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// S3 bucket holding `date-events/` and `transit-informations/`
    S3 { bucket: String },
    /// Local directory with the same layout, for running outside AWS
    Local { root: PathBuf },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Document storage backend
    pub storage: StorageConfig,
    /// Value for `Access-Control-Allow-Origin`, if responses should carry one
    pub cors_allow_origin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "s3".to_string());

        let storage = match backend.as_str() {
            "s3" => StorageConfig::S3 {
                bucket: lookup("AWS_S3_BUCKET_NAME")
                    .filter(|b| !b.is_empty())
                    .ok_or_else(|| Error::Config("AWS_S3_BUCKET_NAME not set".to_string()))?,
            },
            "local" => StorageConfig::Local {
                root: lookup("LOCAL_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("data")),
            },
            other => {
                return Err(Error::Config(format!("Unknown STORAGE_BACKEND: {}", other)));
            }
        };

        Ok(Self {
            storage,
            cors_allow_origin: cors_allow_origin(&lookup)?,
        })
    }
}

/// How the OAuth client secret is supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientSecretSource {
    /// Secret given directly in the environment
    Value(String),
    /// ARN of a Secrets Manager secret holding it
    SecretArn(String),
}

/// Identity provider settings for the sign-in Lambda.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Token endpoint, `<domain>/oauth2/token`
    pub token_url: String,
    pub client_id: String,
    pub client_secret: ClientSecretSource,
    pub redirect_uri: String,
    /// Space separated scopes
    pub scope: String,
    pub cors_allow_origin: Option<String>,
}

impl OAuthConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let domain = lookup("COGNITO_DOMAIN").unwrap_or_else(|| DEFAULT_COGNITO_DOMAIN.to_string());

        let client_secret = match (
            lookup("COGNITO_CLIENT_SECRET").filter(|s| !s.is_empty()),
            lookup("COGNITO_CLIENT_SECRET_ARN").filter(|s| !s.is_empty()),
        ) {
            (Some(secret), _) => ClientSecretSource::Value(secret),
            (None, Some(arn)) => ClientSecretSource::SecretArn(arn),
            (None, None) => {
                return Err(Error::Config(
                    "COGNITO_CLIENT_SECRET or COGNITO_CLIENT_SECRET_ARN must be set".to_string(),
                ));
            }
        };

        Ok(Self {
            token_url: format!("{}/oauth2/token", domain.trim_end_matches('/')),
            client_id: lookup("COGNITO_CLIENT_ID").unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string()),
            client_secret,
            redirect_uri: lookup("OAUTH_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            scope: lookup("OAUTH_SCOPES").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            cors_allow_origin: cors_allow_origin(&lookup)?,
        })
    }
}

fn cors_allow_origin(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<String>> {
    match lookup("CORS_ALLOW_ORIGIN").filter(|o| !o.is_empty()) {
        Some(origin) => {
            lambda_http::http::HeaderValue::from_str(&origin)
                .map_err(|e| Error::Config(format!("Invalid CORS_ALLOW_ORIGIN: {}", e)))?;
            Ok(Some(origin))
        }
        None => Ok(None),
    }
}
