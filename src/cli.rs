//! CLI definitions for FormPilot.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// FormPilot CLI.
#[derive(Parser)]
#[command(name = "formpilot")]
#[command(about = "Label-aware form filling backed by local context and an LLM")]
#[command(version)]
pub(crate) struct Cli {
    /// Data directory (store, context, vault state)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Initialize the data directory and installation secret
    Init,

    /// Set provider configuration
    Config {
        /// Provider name (OpenAI, Gemini, Ollama)
        #[arg(long)]
        provider: Option<String>,

        /// Model identifier
        #[arg(long)]
        model: Option<String>,

        /// Base URL for self-hosted providers
        #[arg(long)]
        url: Option<String>,

        /// API key, stored encrypted
        #[arg(long, env = "FORMPILOT_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Add text to the local context store
    Ingest {
        /// Text to ingest; reads stdin when omitted
        text: Option<String>,
    },

    /// Search the local context store
    Search {
        /// Query text
        query: String,

        /// Maximum results
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Resolve the value for a field label
    Ask {
        /// Field label
        label: String,
    },

    /// Erase all ingested context
    Reset,

    /// Show configuration and store status
    Status,
}
