//! Shared HTTP client and status mapping.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::error::AppError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// JSON content-type headers; auth headers are layered on by the caller.
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Map a non-success HTTP status and body to an error.
pub fn status_to_error(status: u16, body: &str) -> AppError {
    let message = error_message(body).unwrap_or_else(|| body.to_string());
    match status {
        401 | 403 => AppError::Authentication(message),
        429 => AppError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => AppError::api(status, message),
    }
}

/// Parse a `retry-after` header value given in whole seconds.
pub fn retry_after_header_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs * 1000)
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_to_error_extracts_json_message() {
        let body = r#"{"error":{"code":"DeploymentNotFound","message":"The API deployment for this resource does not exist."}}"#;
        let err = status_to_error(404, body);
        assert!(matches!(
            err,
            AppError::Api { status: 404, message } if message.starts_with("The API deployment")
        ));
    }

    #[test]
    fn status_to_error_maps_auth_and_rate_limit() {
        assert!(matches!(
            status_to_error(401, "denied"),
            AppError::Authentication(m) if m == "denied"
        ));
        assert!(matches!(
            status_to_error(429, r#"{"error":{"retry_after":1.5}}"#),
            AppError::RateLimited { retry_after_ms: Some(1500) }
        ));
    }

    #[test]
    fn retry_after_header_is_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(retry_after_header_ms(&headers), Some(7000));
        assert_eq!(retry_after_header_ms(&HeaderMap::new()), None);
    }
}
