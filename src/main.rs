//! pitcoach - entry point.
//!
//! `pitcoach serve` runs the relay HTTP server; `pitcoach chat` opens a
//! terminal conversation against a running server or an in-process relay.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pitcoach::adapters::ai::{OpenAIConfig, OpenAIProvider};
use pitcoach::adapters::http::{build_app, AgentAppState};
use pitcoach::adapters::relay_client::{HttpRelayClient, InProcessRelayClient};
use pitcoach::adapters::terminal;
use pitcoach::application::{ConversationController, RelayMessageHandler, RelaySettings};
use pitcoach::config::{AiConfig, AppConfig, ServerConfig};
use pitcoach::domain::model_card::ModelCard;
use pitcoach::ports::{AIProvider, RelayClient};

#[derive(Debug, Parser)]
#[command(name = "pitcoach", version, about = "PitCoach Mint fitness coaching relay")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the relay HTTP server
    Serve,

    /// Chat with the coach in this terminal
    Chat {
        /// Base URL of a running relay server
        #[arg(long, env = "PITCOACH_URL", default_value = "http://127.0.0.1:8080")]
        url: String,

        /// Call the relay in-process instead of over HTTP
        #[arg(long)]
        local: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    // The terminal owns stdout during chat; keep logs quiet unless asked.
    let default_level = match cli.command {
        Command::Serve => config.server.log_level.as_str(),
        Command::Chat { .. } => "warn",
    };
    init_tracing(default_level, config.server.log_json);

    match cli.command {
        Command::Serve => serve(&config).await,
        Command::Chat { url, local } => chat(&config.ai, &url, local).await,
    }
}

fn init_tracing(default_level: &str, json: bool) {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match default_level.parse::<EnvFilter>() {
            Ok(filter) => filter,
            Err(e) => {
                eprintln!(
                    "WARN: log level '{}' is not a valid tracing filter ({}); falling back to 'info'",
                    default_level, e
                );
                EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Builds the relay handler; without an API key the relay answers every
/// request with a configuration error.
fn build_relay(ai: &AiConfig) -> anyhow::Result<Arc<RelayMessageHandler>> {
    let provider: Option<Arc<dyn AIProvider>> = match ai.api_key() {
        Some(key) => {
            let mut openai = OpenAIConfig::new(key)
                .with_model(ai.model.clone())
                .with_base_url(ai.base_url.clone());
            if let Some(timeout) = ai.timeout() {
                openai = openai.with_timeout(timeout);
            }
            let provider =
                OpenAIProvider::new(openai).context("failed to create OpenAI provider")?;
            Some(Arc::new(provider))
        }
        None => {
            warn!("OPENAI_API_KEY is not set; relay requests will fail until it is configured");
            None
        }
    };

    Ok(Arc::new(RelayMessageHandler::new(
        provider,
        RelaySettings::from(ai),
    )))
}

async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let server: &ServerConfig = &config.server;
    info!(version = env!("CARGO_PKG_VERSION"), "pitcoach starting");

    let relay = build_relay(&config.ai)?;
    let state = AgentAppState::new(relay, ModelCard::pitcoach_mint(&server.public_base_url()));
    let app = build_app(state, &server.cors_origins_list());

    let addr = server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, model = %config.ai.model, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("pitcoach stopped");
    Ok(())
}

async fn chat(ai: &AiConfig, url: &str, local: bool) -> anyhow::Result<()> {
    let relay: Arc<dyn RelayClient> = if local {
        Arc::new(InProcessRelayClient::new(build_relay(ai)?))
    } else {
        Arc::new(HttpRelayClient::new(url)?)
    };
    let controller = ConversationController::new(relay);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    terminal::run_chat(&controller, stdin, &mut stdout).await?;
    Ok(())
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
