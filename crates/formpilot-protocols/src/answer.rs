//! Answer type produced by the resolution pipeline.

/// Value the model returns when it declines to guess.
pub const UNKNOWN_SENTINEL: &str = "null";

/// Outcome of answering one field label. Never cached - recomputed on
/// every pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// A concrete value to write into the control.
    Value(String),
    /// The model explicitly could not answer.
    Unknown,
}

impl Answer {
    /// Interpret a raw completion response. The response is trimmed; an
    /// empty string or the literal sentinel both mean "unknown".
    pub fn from_response(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == UNKNOWN_SENTINEL {
            Answer::Unknown
        } else {
            Answer::Value(trimmed.to_string())
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Answer::Unknown)
    }
}
