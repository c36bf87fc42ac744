//! HTTP client construction and auth-failure detection
//!
//! Every Google API response passes through [`is_invalid_token_response`]. An
//! expired token fails every subsequent request the same way, so it has to stop
//! the crawl rather than be recorded against a single file.

use crate::config::HttpConfig;
use reqwest::header::{HeaderMap, WWW_AUTHENTICATE};
use reqwest::{Client, Proxy, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Message prefix Google uses for rejected OAuth credentials
const INVALID_CREDENTIALS_MESSAGE: &str = "Request had invalid authentication credentials.";

/// Builds the HTTP client used for all API requests
///
/// # Arguments
///
/// * `config` - The HTTP section of the configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Invalid proxy or TLS backend failure
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(Proxy::all(proxy.as_str())?);
    }

    builder.build()
}

/// Checks whether a response means the access token is no longer usable
///
/// Matches a 401 that either carries `invalid_token` in its `WWW-Authenticate`
/// header, or a JSON error body such as:
///
/// ```text
/// {"error": {"code": 401, "status": "UNAUTHENTICATED",
///            "message": "Request had invalid authentication credentials. ..."}}
/// ```
pub fn is_invalid_token_response(status: StatusCode, headers: &HeaderMap, body: &str) -> bool {
    if status != StatusCode::UNAUTHORIZED {
        return false;
    }

    let header_says_invalid = headers
        .get_all(WWW_AUTHENTICATE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("invalid_token"));
    if header_says_invalid {
        return true;
    }

    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return false;
    };
    let Some(error) = parsed.get("error").filter(|e| e.is_object()) else {
        return false;
    };

    if error.get("status").and_then(Value::as_str) == Some("UNAUTHENTICATED") {
        return true;
    }

    error
        .get("message")
        .and_then(Value::as_str)
        .is_some_and(|message| message.starts_with(INVALID_CREDENTIALS_MESSAGE))
}
