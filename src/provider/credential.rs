//! Azure OpenAI credentials: static API key or Azure CLI developer sign-in.

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::AppError;

/// Resource audience for Azure OpenAI / Cognitive Services tokens.
pub const COGNITIVE_SERVICES_RESOURCE: &str = "https://cognitiveservices.azure.com";

/// Tokens are refreshed this long before they expire.
const REFRESH_MARGIN_MINUTES: i64 = 5;

/// How requests to Azure OpenAI are authenticated.
pub enum AzureCredential {
    /// `api-key` header.
    ApiKey(String),
    /// Bearer token obtained from `az account get-access-token`.
    AzureCli(AzureCliCredential),
}

impl AzureCredential {
    /// API key when given, otherwise the signed-in Azure CLI account.
    pub fn from_api_key(api_key: Option<String>) -> Self {
        match api_key {
            Some(key) => Self::ApiKey(key),
            None => Self::AzureCli(AzureCliCredential::new()),
        }
    }

    /// Build auth headers for one request.
    pub async fn auth_headers(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        match self {
            Self::ApiKey(key) => {
                let value = HeaderValue::from_str(key).map_err(|_| {
                    AppError::Configuration("API key contains invalid header characters".into())
                })?;
                headers.insert("api-key", value);
            }
            Self::AzureCli(cli) => {
                let token = cli.token().await?;
                let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                    AppError::Authentication("Azure CLI returned a malformed token".into())
                })?;
                headers.insert(AUTHORIZATION, value);
            }
        }
        Ok(headers)
    }
}

impl std::fmt::Debug for AzureCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("AzureCredential::ApiKey(..)"),
            Self::AzureCli(_) => f.write_str("AzureCredential::AzureCli"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct AccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::minutes(REFRESH_MARGIN_MINUTES) > now
    }
}

/// Azure CLI credential with an in-memory token cache.
pub struct AzureCliCredential {
    resource: String,
    cached: Mutex<Option<AccessToken>>,
}

impl Default for AzureCliCredential {
    fn default() -> Self {
        Self::new()
    }
}

impl AzureCliCredential {
    pub fn new() -> Self {
        Self {
            resource: COGNITIVE_SERVICES_RESOURCE.to_string(),
            cached: Mutex::new(None),
        }
    }

    /// Return a cached token or fetch a new one from the CLI.
    pub async fn token(&self) -> Result<String, AppError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.token.clone());
            }
        }

        debug!(resource = %self.resource, "requesting token from Azure CLI");
        let output = Command::new("az")
            .args([
                "account",
                "get-access-token",
                "--resource",
                &self.resource,
                "--output",
                "json",
            ])
            .output()
            .await
            .map_err(|e| {
                AppError::Authentication(format!(
                    "Azure CLI is not available ({e}); install it and run `az login`, or set AZURE_OPENAI_API_KEY"
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Authentication(format!(
                "az account get-access-token failed: {}",
                stderr.trim()
            )));
        }

        let token = parse_cli_token(&output.stdout, Utc::now())?;
        let value = token.token.clone();
        *cached = Some(token);
        Ok(value)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliTokenResponse {
    access_token: String,
    /// Local wall-clock time, e.g. `2025-01-01 12:00:00.000000`.
    expires_on: Option<String>,
    /// Unix seconds (newer CLI versions).
    #[serde(rename = "expires_on")]
    expires_on_unix: Option<i64>,
}

fn parse_cli_token(stdout: &[u8], now: DateTime<Utc>) -> Result<AccessToken, AppError> {
    let response: CliTokenResponse = serde_json::from_slice(stdout)?;

    let expires_at = response
        .expires_on_unix
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .or_else(|| {
            response.expires_on.as_deref().and_then(|raw| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
                    .ok()
                    .and_then(|naive| Local.from_local_datetime(&naive).single())
                    .map(|local| local.with_timezone(&Utc))
            })
        })
        .unwrap_or_else(|| now + Duration::minutes(REFRESH_MARGIN_MINUTES * 2));

    Ok(AccessToken {
        token: response.access_token,
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_prefers_unix_expiry() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let token = parse_cli_token(
            br#"{"accessToken":"eyJ0","expiresOn":"2023-11-14 22:00:00.000000","expires_on":1700003600,"tokenType":"Bearer"}"#,
            now,
        )
        .unwrap();
        assert_eq!(token.token, "eyJ0");
        assert_eq!(token.expires_at.timestamp(), 1_700_003_600);
        assert!(token.is_fresh(now));
    }

    #[test]
    fn parse_falls_back_to_short_lifetime() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let token = parse_cli_token(br#"{"accessToken":"abc"}"#, now).unwrap();
        assert_eq!(token.expires_at, now + Duration::minutes(10));
    }

    #[test]
    fn token_inside_refresh_margin_is_stale() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let token = AccessToken {
            token: "abc".into(),
            expires_at: now + Duration::minutes(4),
        };
        assert!(!token.is_fresh(now));
    }

    #[test]
    fn parse_rejects_non_json_output() {
        let err = parse_cli_token(b"ERROR: Please run 'az login'", Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
    }

    #[tokio::test]
    async fn api_key_credential_sets_api_key_header() {
        let credential = AzureCredential::from_api_key(Some("secret-key".into()));
        let headers = credential.auth_headers().await.unwrap();
        assert_eq!(headers.get("api-key").unwrap(), "secret-key");
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(format!("{credential:?}"), "AzureCredential::ApiKey(..)");
    }
}
