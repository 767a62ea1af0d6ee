/*
newschat - single-binary main.rs
This binary starts the Rocket HTTP server that fronts the chat workflow.
*/

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use newschat::chatbot::Chatbot;
use newschat::llm::remote::RemoteLlmProvider;
use newschat::news::GoogleNewsSource;
use newschat::server::{launch_rocket, AppState};
use newschat::sessions::SessionStore;

#[derive(Parser, Debug)]
#[command(name = "newschat", about = "Newschat single-binary chat server")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI args
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Resolve config paths
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() {
            Some(p)
        } else {
            None
        }
    };

    // Load configuration with defaults
    let mut config = Config::load_with_defaults(
        if default_path.exists() {
            Some(&default_path)
        } else {
            None
        },
        override_path.as_deref(),
    )
    .await
    .context("failed to load configuration")?;
    info!(default = ?default_path, override_file = ?override_path, "configuration loaded");

    // Optional feed-language override from the environment
    if let Ok(lang) = std::env::var("GOOGLE_NEWS_LANG") {
        if !lang.trim().is_empty() {
            config
                .news
                .get_or_insert_with(Default::default)
                .language = Some(lang);
        }
    }

    // Initialize the LLM provider. The credential env var is resolved here,
    // so a missing key fails at startup rather than mid-conversation.
    let llm_config = config.llm.clone().unwrap_or_default();
    let provider = match RemoteLlmProvider::from_config(&llm_config) {
        Ok(p) => p,
        Err(e) => {
            error!(%e, "failed to initialize LLM provider");
            return Err(e.into());
        }
    };
    info!("LLM provider initialized: {}", provider.model());

    let news = GoogleNewsSource::from_config(config.news.as_ref());

    let state = AppState {
        started_at: Utc::now(),
        config: Arc::new(config),
        chatbot: Arc::new(Mutex::new(Chatbot::new(Arc::new(provider)))),
        news: Arc::new(news),
        store: Arc::new(Mutex::new(SessionStore::new())),
    };

    // Launch the Rocket server (blocking until Rocket shuts down)
    info!("Launching Rocket HTTP server");
    if let Err(e) = launch_rocket(state).await {
        error!(%e, "Rocket server failed");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}
