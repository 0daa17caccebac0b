//! CLI Command Handlers
//!
//! Implementation of all gpbridge commands.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

use crate::adapters::agent_http::AgentHttpClient;
use crate::application::{BridgeMessages, ChatService, RateService, RequestPollBridge};
use crate::config::{load_config_or_default, Config};
use crate::domain::{JobId, PollPolicy};
use crate::ports::AgentPort;

/// gpbridge - GlobalPay chat agent bridge
#[derive(Parser, Debug)]
#[command(
    name = "gpbridge",
    version = env!("CARGO_PKG_VERSION"),
    about = "Request/poll bridge for the GlobalPay chat agent",
    long_about = "gpbridge submits chat queries to the GlobalPay agent service and polls \
                  for the finished answer, degrading to a fixed apology when the agent \
                  is slow or unreachable."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true, default_value = "config/bridge.toml")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask the agent a question and wait for the answer
    Ask(AskCmd),

    /// Start a job and print its id without waiting
    Submit(SubmitCmd),

    /// Poll an existing job until it finishes
    Await(AwaitCmd),

    /// Probe the agent's health endpoint
    Health,

    /// Look up an exchange rate, optionally converting an amount
    Rate(RateCmd),
}

/// Ask a question
#[derive(Parser, Debug)]
pub struct AskCmd {
    /// The question text
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Print the full response object as JSON
    #[arg(long)]
    pub json: bool,
}

/// Start a job
#[derive(Parser, Debug)]
pub struct SubmitCmd {
    /// The question text
    #[arg(value_name = "QUERY")]
    pub query: String,
}

/// Await a job
#[derive(Parser, Debug)]
pub struct AwaitCmd {
    /// Job id returned by `submit`
    #[arg(value_name = "JOB_ID")]
    pub job_id: String,
}

/// Exchange rate lookup
#[derive(Parser, Debug)]
pub struct RateCmd {
    /// Source currency code (e.g., USD)
    #[arg(value_name = "FROM")]
    pub from: String,

    /// Target currency code (e.g., INR)
    #[arg(value_name = "TO")]
    pub to: String,

    /// Amount to convert
    #[arg(short, long, value_name = "AMOUNT")]
    pub amount: Option<Decimal>,
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    let config = load(&app.config)?;

    // Initialize logging based on flags and config
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Ask(cmd) => ask_command(cmd, &config).await,
        Command::Submit(cmd) => submit_command(cmd, &config).await,
        Command::Await(cmd) => await_command(cmd, &config).await,
        Command::Health => health_command(&config).await,
        Command::Rate(cmd) => rate_command(cmd, &config).await,
    }
}

fn load(path: &Path) -> Result<Config> {
    // Expand ~ in the config path
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    load_config_or_default(&expanded)
        .with_context(|| format!("Failed to load configuration from {}", expanded))
}

/// Initialize logging system
fn init_logging(verbose: bool, debug: bool, config_level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        config_level
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Build the HTTP client when an agent URL is configured
fn agent_client(config: &Config) -> Result<Option<AgentHttpClient>> {
    match config.agent.http_config() {
        Some(http) => {
            let client = AgentHttpClient::with_config(http)
                .context("Failed to create agent client")?;
            Ok(Some(client))
        }
        None => Ok(None),
    }
}

fn bridge(agent: AgentHttpClient, config: &Config) -> RequestPollBridge<AgentHttpClient> {
    RequestPollBridge::new(agent)
        .with_policy(PollPolicy::from(&config.polling))
        .with_messages(BridgeMessages::from(&config.chat))
}

fn require_bridge(config: &Config) -> Result<RequestPollBridge<AgentHttpClient>> {
    match agent_client(config)? {
        Some(agent) => Ok(bridge(agent, config)),
        None => bail!("No agent configured: set [agent].base_url or AGENT_BASE_URL"),
    }
}

/// Chat service for a loaded config: online when an agent URL is set,
/// offline keyword replies otherwise
pub fn chat_service(config: &Config) -> Result<ChatService<AgentHttpClient>> {
    Ok(match agent_client(config)? {
        Some(agent) => ChatService::online(bridge(agent, config)),
        None => ChatService::offline(),
    })
}

/// Handle ask command
async fn ask_command(cmd: AskCmd, config: &Config) -> Result<()> {
    let service = chat_service(config)?;

    let response = service.ask(&cmd.query).await;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", response.response_text);
        if let Some(ref detail) = response.error {
            tracing::warn!("Agent error: {}", detail);
        }
    }

    Ok(())
}

/// Handle submit command
async fn submit_command(cmd: SubmitCmd, config: &Config) -> Result<()> {
    let bridge = require_bridge(config)?;
    let job_id = bridge.submit(&cmd.query).await?;
    println!("{}", job_id);
    Ok(())
}

/// Handle await command
async fn await_command(cmd: AwaitCmd, config: &Config) -> Result<()> {
    if cmd.job_id.trim().is_empty() {
        bail!("Job id cannot be empty");
    }
    let bridge = require_bridge(config)?;
    let text = bridge.await_completion(&JobId::new(cmd.job_id)).await?;
    println!("{}", text);
    Ok(())
}

/// Handle health command
async fn health_command(config: &Config) -> Result<()> {
    let Some(agent) = agent_client(config)? else {
        println!("offline (no agent configured)");
        return Ok(());
    };

    if agent.health_check().await {
        println!("healthy ({})", agent.base_url());
        Ok(())
    } else {
        bail!("Agent at {} is unhealthy or unreachable", agent.base_url())
    }
}

/// Handle rate command
async fn rate_command(cmd: RateCmd, config: &Config) -> Result<()> {
    let service = RateService::new(agent_client(config)?);

    match cmd.amount {
        Some(amount) => {
            let conversion = service.convert(amount, &cmd.from, &cmd.to).await?;
            println!(
                "{} {} = {} {} (rate {}, {})",
                conversion.amount,
                conversion.rate.from,
                conversion.converted,
                conversion.rate.to,
                conversion.rate.rate,
                conversion.rate.source,
            );
        }
        None => {
            let rate = service.rate(&cmd.from, &cmd.to).await?;
            println!(
                "1 {} = {} {} ({}, updated {})",
                rate.from,
                rate.rate,
                rate.to,
                rate.source,
                rate.last_updated.to_rfc3339()
            );
        }
    }

    Ok(())
}
