//! Research Team Server
//!
//! Axum server and command line front end for the four-agent research team.

mod api;
mod error;
mod interactive;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use research_team_core::models::ModelConfig;
use research_team_core::render::render_briefing;
use research_team_core::swarm::Team;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "research_team=info,research_team_core=info";

#[derive(Parser)]
#[command(name = "research-team")]
#[command(about = "Researcher, Analyst, Strategist and Coordinator working a topic together")]
struct Args {
    /// Model id sent to the provider (overrides OPENROUTER_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,
    /// Chat-completions endpoint URL (overrides OPENROUTER_URL)
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Per-call timeout in seconds (overrides OPENROUTER_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Start the HTTP server (default)
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Run the team once on a topic and print the briefing
    Run {
        /// The topic to research
        topic: String,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Prompt for topics in a loop
    Interactive,
}

impl Args {
    /// Environment first, then flags on top
    fn model_config(&self) -> anyhow::Result<ModelConfig> {
        let config = ModelConfig::from_env().context("Failed to load model configuration")?;
        Ok(self.apply_overrides(config))
    }

    /// Blank flags leave the loaded value alone
    fn apply_overrides(&self, mut config: ModelConfig) -> ModelConfig {
        if let Some(model) = self.model.as_deref().filter(|m| !m.trim().is_empty()) {
            config = config.with_model(model);
        }
        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
            config = config.with_endpoint(endpoint);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

fn init_tracing() -> anyhow::Result<()> {
    // JSON logs with LOG_JSON=1, human-readable otherwise
    let json_logs = std::env::var("LOG_JSON").unwrap_or_default() == "1";
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Invalid log filter")?;
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

async fn run_server(config: ModelConfig, host: &str, port: u16) -> anyhow::Result<()> {
    if !config.has_api_key() {
        tracing::warn!("OpenRouter API key not set; every stage will report it missing");
    }

    let model = config.model.clone();
    let api_key_configured = config.has_api_key();
    let team = Team::from_config(config)?;
    let state = api::AppState::new(team, model, api_key_configured);
    let app = api::router(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;
    tracing::info!("Research team server running at http://{}", addr);
    tracing::info!("   Team:    /api/v1/team/run, /events, /graph");
    tracing::info!("   Health:  /api/v1/health");
    tracing::info!("   OpenAPI: /api/v1/openapi.json");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn run_once(config: ModelConfig, topic: &str, json: bool) -> anyhow::Result<()> {
    let team = Team::from_config(config)?;
    tracing::info!(topic = %topic, "Running team");
    let result = team.run_blocking(topic)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render_briefing(topic, &result));
    }

    if !result.is_success() {
        for (stage, err) in result.failures() {
            tracing::warn!(stage = %stage, kind = err.kind(), "Stage failed");
        }
    }
    Ok(())
}

// Not #[tokio::main]: `run` and `interactive` go through the blocking bridge,
// which refuses to start inside an existing runtime.
fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let args = Args::parse();
    let config = args.model_config()?;

    match args.command.clone() {
        Some(CliCommand::Run { topic, json }) => run_once(config, &topic, json),
        Some(CliCommand::Interactive) => {
            let team = Team::from_config(config)?;
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            interactive::run_loop(&team, stdin.lock(), stdout.lock())
        }
        Some(CliCommand::Serve { host, port }) => {
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(run_server(config, &host, port))
        }
        None => {
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(run_server(config, "127.0.0.1", 8080))
        }
    }
}
