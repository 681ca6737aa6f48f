//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::config::ClientSecretSource;
use crate::{Error, Result};

/// Cached secrets with lazy initialization.
static SECRETS_CACHE: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn get_cache() -> &'static RwLock<HashMap<String, String>> {
    SECRETS_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// OAuth client secret stored as JSON in Secrets Manager.
#[derive(Debug, Deserialize)]
struct OAuthClientSecret {
    client_secret: String,
}

/// Get a secret value from Secrets Manager with caching.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    // Check cache first
    {
        let cache = get_cache().read().await;
        if let Some(value) = cache.get(secret_arn) {
            return Ok(value.clone());
        }
    }

    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::UpstreamFailure(format!("Failed to get secret: {}", e)))?;

    let secret_string = response
        .secret_string()
        .ok_or_else(|| Error::UpstreamFailure("Secret has no string value".to_string()))?
        .to_string();

    {
        let mut cache = get_cache().write().await;
        cache.insert(secret_arn.to_string(), secret_string.clone());
    }

    Ok(secret_string)
}

/// Resolve the OAuth client secret, fetching it from Secrets Manager when configured by ARN.
pub async fn resolve_client_secret(source: &ClientSecretSource) -> Result<String> {
    match source {
        ClientSecretSource::Value(secret) => Ok(secret.clone()),
        ClientSecretSource::SecretArn(arn) => {
            let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let client = SecretsClient::new(&config);
            let secret_string = get_secret(&client, arn).await?;
            Ok(parse_client_secret(&secret_string))
        }
    }
}

/// Secrets may hold either the bare secret or `{"client_secret": "..."}`.
fn parse_client_secret(secret_string: &str) -> String {
    serde_json::from_str::<OAuthClientSecret>(secret_string)
        .map(|s| s.client_secret)
        .unwrap_or_else(|_| secret_string.trim().to_string())
}
