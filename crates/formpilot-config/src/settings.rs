//! Provider settings, resolved from the store on every call.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::store::{keys, LocalStore};

/// Default endpoint for a local Ollama install.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/v1";

const OPENAI_URL: &str = "https://api.openai.com/v1";
const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Remote completion provider identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "OpenAI")]
    OpenAi,
    Gemini,
    Ollama,
}

impl Provider {
    /// Self-hosted providers authenticate by reachability, not credential.
    pub fn needs_api_key(&self) -> bool {
        !matches!(self, Provider::Ollama)
    }
}

/// Settings needed for one remote call.
///
/// Loaded fresh per call so a mid-session settings change is honored
/// immediately - nothing here is cached.
#[derive(Debug, Clone)]
pub struct Settings {
    pub provider: Provider,
    pub model: String,
    pub url: Option<String>,
}

impl Settings {
    pub fn load(store: &LocalStore) -> Result<Self, ConfigError> {
        let provider: Provider = store
            .get(keys::PROVIDER)
            .ok_or_else(|| ConfigError::MissingField(keys::PROVIDER.to_string()))?;
        let model: String = store
            .get(keys::MODEL)
            .ok_or_else(|| ConfigError::MissingField(keys::MODEL.to_string()))?;
        let url: Option<String> = store.get(keys::URL);
        Ok(Self {
            provider,
            model,
            url,
        })
    }

    /// Base URL of the OpenAI-compatible chat-completions interface.
    pub fn endpoint(&self) -> String {
        match self.provider {
            Provider::OpenAi => OPENAI_URL.to_string(),
            Provider::Gemini => GEMINI_URL.to_string(),
            Provider::Ollama => self
                .url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
        }
    }
}
