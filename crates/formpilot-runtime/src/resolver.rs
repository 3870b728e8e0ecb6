//! Turns a field label into an answer via local context and a model.

use std::sync::Arc;

use formpilot_config::{keys, ConfigError, LocalStore, Settings};
use formpilot_context_store::ContextStore;
use formpilot_protocols::{Answer, EncryptedSecret};
use formpilot_provider_openai::ChatClient;
use formpilot_vault::CredentialVault;
use tracing::debug;

use crate::error::ResolveError;

/// Instruction pinning the model to bare values.
pub const SYSTEM_PROMPT: &str = "You fill in web form fields. Given context about a person and \
the label of a form field, reply with only the exact value to enter in that field, with no \
explanation or punctuation around it. If the context does not contain the answer, reply with \
exactly null.";

/// How many context fragments accompany a question.
const CONTEXT_LIMIT: usize = 10;

/// Answers field-label questions.
///
/// Settings are loaded from the store on every call, so a provider or
/// model change takes effect on the next question without a restart.
pub struct AnswerResolver {
    store: Arc<LocalStore>,
    vault: Arc<CredentialVault>,
    context: Arc<ContextStore>,
}

impl AnswerResolver {
    pub fn new(
        store: Arc<LocalStore>,
        vault: Arc<CredentialVault>,
        context: Arc<ContextStore>,
    ) -> Self {
        Self { store, vault, context }
    }

    /// Resolves the value to enter in a field named `label`.
    pub async fn answer(&self, label: &str) -> Result<Answer, ResolveError> {
        let settings = Settings::load(&self.store)?;
        let api_key = self.api_key(&settings)?;

        let fragments = self.context.search(label, CONTEXT_LIMIT).await?;
        debug!(label, fragments = fragments.len(), "resolving answer");

        let context_block = fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let question = format!("Context:\n{context_block}\n\nField label: {label}");

        let client = ChatClient::new(api_key, settings.endpoint());
        let raw = client.complete(&settings.model, SYSTEM_PROMPT, &question).await?;
        Ok(Answer::from_response(&raw))
    }

    /// The bearer token for the configured provider. Ollama takes any
    /// token, so a placeholder is sent when no key is stored.
    fn api_key(&self, settings: &Settings) -> Result<String, ResolveError> {
        if !settings.provider.needs_api_key() {
            return Ok("ollama".to_string());
        }
        let encrypted: EncryptedSecret = self
            .store
            .get(keys::API_KEY)
            .ok_or_else(|| ConfigError::MissingField(keys::API_KEY.to_string()))?;
        Ok(self.vault.decrypt(&encrypted)?)
    }
}
