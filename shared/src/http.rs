//! HTTP helpers for Lambda functions.

use lambda_http::http::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use lambda_http::{Body, Request, RequestExt, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

use crate::{Error, Result};

/// Standard API error wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Result<Response<Body>> {
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(data)?))?)
}

/// Log an error and turn it into a JSON error response.
pub fn error_response(err: &Error) -> Result<Response<Body>> {
    let status = err.status_code();
    if status >= 500 {
        error!(error = %err, status, "request failed");
    } else {
        warn!(error = %err, status, "request rejected");
    }
    json_response(status, &ApiResponse::error(err.client_message()))
}

/// Add `Access-Control-Allow-Origin` when an origin is configured.
pub fn with_cors(mut response: Response<Body>, origin: Option<&str>) -> Response<Body> {
    if let Some(value) = origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        response.headers_mut().insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    response
}

/// First value of a query string parameter.
pub fn query_param(event: &Request, name: &str) -> Option<String> {
    event
        .query_string_parameters_ref()
        .and_then(|params| params.first(name))
        .map(str::to_string)
}

/// A header as text, if present and valid UTF-8.
pub fn header(event: &Request, name: &str) -> Option<String> {
    event
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Parse request body as JSON.
pub fn parse_json_body<T: DeserializeOwned>(body: &Body) -> Result<T> {
    let bytes: &[u8] = body.as_ref();
    if bytes.is_empty() {
        return Err(Error::InvalidInput("Missing request body".to_string()));
    }
    serde_json::from_slice(bytes)
        .map_err(|e| Error::InvalidInput(format!("Invalid request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn body_text(response: &Response<Body>) -> String {
        let bytes: &[u8] = response.body().as_ref();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_error_response_shape() {
        let response = error_response(&Error::InvalidInput("bad month".to_string())).unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(
            body_text(&response),
            r#"{"success":false,"error":"Invalid input: bad month"}"#
        );
    }

    #[test]
    fn test_cors_header_is_optional() {
        let response = json_response(200, &Vec::<u8>::new()).unwrap();
        assert!(with_cors(response, None)
            .headers()
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());

        let response = json_response(200, &Vec::<u8>::new()).unwrap();
        let response = with_cors(response, Some("*"));
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn test_query_param_and_header() {
        let event = Request::default()
            .with_query_string_parameters(HashMap::from([(
                "currentMonth".to_string(),
                "2022-7".to_string(),
            )]));
        assert_eq!(query_param(&event, "currentMonth").as_deref(), Some("2022-7"));
        assert_eq!(query_param(&event, "code"), None);

        let event = lambda_http::http::Request::builder()
            .header("Cookie", "refresh_token=abc")
            .body(Body::Empty)
            .unwrap();
        assert_eq!(header(&event, "cookie").as_deref(), Some("refresh_token=abc"));
    }

    #[test]
    fn test_parse_json_body() {
        let parsed: Vec<i64> = parse_json_body(&Body::from("[1,2]")).unwrap();
        assert_eq!(parsed, vec![1, 2]);

        assert!(matches!(
            parse_json_body::<Vec<i64>>(&Body::Empty).unwrap_err(),
            Error::InvalidInput(_)
        ));
        assert!(matches!(
            parse_json_body::<Vec<i64>>(&Body::from("{")).unwrap_err(),
            Error::InvalidInput(_)
        ));
    }
}
