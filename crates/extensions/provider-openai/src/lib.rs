//! OpenAI-compatible chat completions client for FormPilot.
//!
//! Works against any endpoint that speaks the chat-completions interface:
//! OpenAI itself, Gemini's compatibility surface, or a local Ollama.

mod api;
mod client;

pub use api::{ApiMessage, ApiRequest, ApiResponse, Choice, ResponseMessage};
pub use client::ChatClient;
