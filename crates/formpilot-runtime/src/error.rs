use formpilot_config::ConfigError;
use formpilot_protocols::{ContextError, ProviderError, VaultError};
use thiserror::Error;

/// Anything that can go wrong while resolving an answer for a label.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("provider not configured: {0}")]
    NotConfigured(#[from] ConfigError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_config_errors_with_context() {
        let err = ResolveError::from(ConfigError::MissingField("model".to_string()));
        assert!(err.to_string().starts_with("provider not configured"));
        assert!(err.to_string().contains("model"));
    }

    #[test]
    fn passes_provider_errors_through() {
        let err = ResolveError::from(ProviderError::Network("refused".to_string()));
        assert!(err.to_string().contains("refused"));
    }
}
