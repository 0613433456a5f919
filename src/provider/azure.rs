//! Azure OpenAI provider.

use async_trait::async_trait;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::util::retry::RetryPolicy;

use super::credential::AzureCredential;
use super::http::{json_headers, retry_after_header_ms, shared_client, status_to_error};
use super::openai::{build_request_body, into_provider_response, ChatResponse};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

/// Azure OpenAI Service provider addressing a single chat deployment.
pub struct AzureOpenAiProvider {
    deployment: String,
    url: String,
    credential: AzureCredential,
    retry: RetryPolicy,
}

impl AzureOpenAiProvider {
    /// `endpoint`: e.g. "https://myresource.openai.azure.com"
    /// `deployment`: e.g. "gpt-4o"
    /// `api_version`: e.g. "2024-10-21"
    pub fn new(
        endpoint: &str,
        deployment: impl Into<String>,
        api_version: &str,
        credential: AzureCredential,
    ) -> Self {
        let deployment = deployment.into();
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            deployment,
            api_version
        );
        Self {
            deployment,
            url,
            credential,
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.azure_endpoint,
            config.deployment.clone(),
            &config.api_version,
            AzureCredential::from_api_key(config.api_key.clone()),
        )
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send_once(&self, body: &serde_json::Value) -> Result<ProviderResponse, AppError> {
        let mut headers = json_headers();
        headers.extend(self.credential.auth_headers().await?);

        let resp = shared_client()
            .post(&self.url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let retry_after = retry_after_header_ms(resp.headers());
            let body_text = resp.text().await.unwrap_or_default();
            let mut error = status_to_error(status, &body_text);
            if let AppError::RateLimited { retry_after_ms } = &mut error {
                if retry_after_ms.is_none() {
                    *retry_after_ms = retry_after;
                }
            }
            return Err(error);
        }

        let data: ChatResponse = resp.json().await?;
        into_provider_response(data)
    }
}

#[async_trait]
impl ModelProvider for AzureOpenAiProvider {
    fn provider_name(&self) -> &str {
        "azure-openai"
    }

    fn model_id(&self) -> &str {
        &self.deployment
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, AppError> {
        let body = build_request_body(None, request);

        debug!(
            deployment = %self.deployment,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, |t| t.len()),
            "Azure OpenAI generate_text"
        );

        self.retry.execute(|| self.send_once(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_targets_deployment_and_api_version() {
        let provider = AzureOpenAiProvider::new(
            "https://contoso.openai.azure.com/",
            "gpt-4o",
            "2024-10-21",
            AzureCredential::ApiKey("k".into()),
        );
        assert_eq!(
            provider.url(),
            "https://contoso.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-10-21"
        );
        assert_eq!(provider.model_id(), "gpt-4o");
        assert_eq!(provider.provider_name(), "azure-openai");
    }
}
