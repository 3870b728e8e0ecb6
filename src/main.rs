//! FormPilot - label-aware form filling engine.
//!
//! Main entry point for the FormPilot CLI.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use formpilot_config::{keys, LocalStore, Settings};
use formpilot_context_store::{ContextStore, HashEmbedding};
use formpilot_protocols::Answer;
use formpilot_runtime::AnswerResolver;
use formpilot_vault::CredentialVault;

mod cli;

use cli::{Cli, Commands};

const STORE_FILE: &str = "store.json";
const CONTEXT_NAMESPACE: &str = "context";

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

fn default_data_dir() -> anyhow::Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join("formpilot"))
        .context("no data directory available on this platform")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    let store = Arc::new(LocalStore::open(data_dir.join(STORE_FILE))?);
    let vault = Arc::new(CredentialVault::new(store.clone()));
    let context = Arc::new(ContextStore::open(
        &data_dir,
        CONTEXT_NAMESPACE,
        Arc::new(HashEmbedding::default()),
    ));

    match cli.command {
        Commands::Init => {
            store.install()?;
            info!("initialized data directory at {}", data_dir.display());
        }
        Commands::Config { provider, model, url, api_key } => {
            store.install()?;
            if let Some(provider) = provider {
                store.set(keys::PROVIDER, provider);
            }
            if let Some(model) = model {
                store.set(keys::MODEL, model);
            }
            if let Some(url) = url {
                store.set(keys::URL, url);
            }
            if let Some(api_key) = api_key {
                let encrypted = vault.encrypt(&api_key)?;
                store.set(keys::API_KEY, encrypted);
                info!("api key stored encrypted");
            }
            print_status(&store, &context);
        }
        Commands::Ingest { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("reading text from stdin")?;
                    buf
                }
            };
            let ids = context.ingest(&text).await?;
            println!("ingested {} fragment(s)", ids.len());
        }
        Commands::Search { query, limit } => {
            let hits = context.search(&query, limit).await?;
            if hits.is_empty() {
                println!("no matching context");
            }
            for fragment in hits {
                println!("{}", fragment.text);
            }
        }
        Commands::Ask { label } => {
            let resolver = AnswerResolver::new(store, vault, context);
            match resolver.answer(&label).await? {
                Answer::Value(value) => println!("{value}"),
                Answer::Unknown => println!("no answer in context"),
            }
        }
        Commands::Reset => {
            context.reset();
            println!("context store erased");
        }
        Commands::Status => print_status(&store, &context),
    }

    Ok(())
}

fn print_status(store: &LocalStore, context: &ContextStore) {
    match Settings::load(store) {
        Ok(settings) => {
            println!("provider: {:?}", settings.provider);
            println!("model:    {}", settings.model);
            println!("endpoint: {}", settings.endpoint());
            if settings.provider.needs_api_key() {
                let stored = store.contains(keys::API_KEY);
                println!("api key:  {}", if stored { "stored" } else { "missing" });
            }
        }
        Err(err) => println!("provider: not configured ({err})"),
    }
    println!("context:  {} fragment(s)", context.len());
}
