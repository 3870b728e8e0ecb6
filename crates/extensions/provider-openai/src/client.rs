//! Chat completions HTTP client.

use tracing::debug;

use formpilot_protocols::ProviderError;

use crate::api::{ApiMessage, ApiRequest, ApiResponse};

/// Client for one OpenAI-compatible endpoint.
///
/// Constructed per call by the resolver so settings changes take effect
/// immediately. Timeouts are left to the transport.
pub struct ChatClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// One system message, one user message, one choice back.
    pub async fn complete(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, ProviderError> {
        let request = ApiRequest {
            model: model.to_string(),
            messages: vec![ApiMessage::system(system), ApiMessage::user(user)],
            temperature: None,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("completion request to {} (model {})", url, model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError { status, message });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("no choices".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}
