//! Remote completion provider errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider, model, or credential missing from the saved settings.
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}
