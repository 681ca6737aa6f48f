//! Caller identity from the API Gateway Cognito authorizer.

use lambda_http::{Request, RequestExt};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Claims forwarded by the Cognito authorizer in `requestContext.authorizer.claims`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CognitoClaims {
    /// Subject (user id)
    pub sub: Option<String>,
    /// Email
    pub email: Option<String>,
    /// Cognito username, which keys the user's documents
    #[serde(rename = "cognito:username")]
    pub cognito_username: Option<String>,
}

/// Decoded user information from the authorizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub sub: Option<String>,
    pub email: Option<String>,
}

impl TryFrom<CognitoClaims> for AuthenticatedUser {
    type Error = Error;

    fn try_from(claims: CognitoClaims) -> Result<Self> {
        let username = claims
            .cognito_username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::Unauthorized("Missing cognito:username claim".to_string()))?;

        Ok(Self {
            username,
            sub: claims.sub,
            email: claims.email,
        })
    }
}

/// Extract user from the authorizer claims object.
pub fn extract_user_from_context(claims: &serde_json::Value) -> Result<AuthenticatedUser> {
    let claims: CognitoClaims = serde_json::from_value(claims.clone())
        .map_err(|e| Error::Unauthorized(format!("Malformed authorizer claims: {}", e)))?;

    AuthenticatedUser::try_from(claims)
}

/// Extract user from an API Gateway request.
pub fn user_from_request(event: &Request) -> Result<AuthenticatedUser> {
    let claims = event
        .request_context_ref()
        .and_then(|ctx| ctx.authorizer())
        .and_then(|authorizer| authorizer.fields.get("claims"))
        .ok_or_else(|| Error::Unauthorized("Authentication required".to_string()))?;

    extract_user_from_context(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_username() {
        let claims = json!({
            "sub": "8d1c3b0e-1111-2222-3333-444455556666",
            "cognito:username": "alice",
            "email": "alice@example.com",
            "token_use": "id",
            "email_verified": "true"
        });

        let user = extract_user_from_context(&claims).unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn test_missing_username_is_unauthorized() {
        let claims = json!({ "sub": "8d1c3b0e", "email": "alice@example.com" });
        let err = extract_user_from_context(&claims).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));

        let claims = json!({ "cognito:username": "" });
        assert!(extract_user_from_context(&claims).is_err());
    }

    #[test]
    fn test_non_object_claims_are_unauthorized() {
        let err = extract_user_from_context(&json!("alice")).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[test]
    fn test_request_without_authorizer_is_unauthorized() {
        let event = Request::default();
        let err = user_from_request(&event).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }
}
