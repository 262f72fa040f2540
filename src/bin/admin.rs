//! CLI administration tool for json-relay.
//!
//! Talks to the broker directly, without going through the HTTP endpoint.
//!
//! # Usage
//!
//! ```bash
//! # Print the effective configuration
//! cargo run --bin admin -- config
//!
//! # Check the broker connection and queue declaration
//! cargo run --bin admin -- broker check
//!
//! # Publish a JSON object from a file, or from stdin with "-"
//! cargo run --bin admin -- publish payload.json
//! echo '{"a":1}' | cargo run --bin admin -- publish -
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `json_relay::config`.

use json_relay::config::{self, Config};
use json_relay::domain::payload::Payload;
use json_relay::domain::publish_worker::publish_with_retry;
use json_relay::server::connect_sink;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// CLI tool for managing json-relay.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show the effective configuration
    Config,

    /// Broker operations
    Broker {
        #[command(subcommand)]
        action: BrokerAction,
    },

    /// Publish a JSON object straight to the queue
    Publish {
        /// Path to a JSON file, or "-" for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
}

/// Broker subcommands.
#[derive(Subcommand)]
enum BrokerAction {
    /// Connect and declare the queue
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Config => show_config(&config),
        Commands::Broker { action } => match action {
            BrokerAction::Check => check_broker(&config).await?,
        },
        Commands::Publish { input } => publish(&config, input).await?,
    }

    Ok(())
}

fn show_config(config: &Config) {
    println!("{}", "⚙️  Configuration".bright_blue().bold());
    println!();
    println!("  {:<24} {}", "Listen:".bold(), config.listen_addr);
    println!(
        "  {:<24} {}",
        "Broker:".bold(),
        config::mask_connection_string(&config.amqp_url)
    );
    println!("  {:<24} {:?}", "Broker mode:".bold(), config.broker_mode);
    println!("  {:<24} {}", "Queue:".bold(), config.queue_name);
    println!(
        "  {:<24} {}",
        "Content type:".bold(),
        config.publish_content_type
    );
    println!(
        "  {:<24} {} {}",
        "Endpoint:".bold(),
        config.sample_method,
        "/sample".cyan()
    );
    println!(
        "  {:<24} {} ({:?})",
        "Success response:".bold(),
        config.success_status,
        config.response_mode
    );
    println!("  {:<24} {}", "Strict decode:".bold(), config.strict_decode);
    println!(
        "  {:<24} {}",
        "Auth:".bold(),
        if config.api_token.is_some() {
            "Bearer token".green()
        } else {
            "disabled".yellow()
        }
    );
}

async fn check_broker(config: &Config) -> Result<()> {
    config.require_amqp()?;
    println!("{}", "🔌 Checking broker connection...".bright_blue());

    let sink = connect_sink(config).await?;

    if sink.health_check().await {
        println!(
            "{} queue '{}' is declared",
            "✅ Connected:".green().bold(),
            sink.queue_name()
        );
    } else {
        println!("{}", "❌ Connection is not usable".red().bold());
    }

    sink.close().await;
    Ok(())
}

async fn publish(config: &Config, input: PathBuf) -> Result<()> {
    config.require_amqp()?;

    let bytes = if input.as_os_str() == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("Failed to read stdin")?;
        buf
    } else {
        tokio::fs::read(&input)
            .await
            .with_context(|| format!("Failed to read {}", input.display()))?
    };

    let payload = Payload::decode(&bytes).context("Input is not a JSON object")?;

    let sink = connect_sink(config).await?;
    let (result, attempts) =
        publish_with_retry(sink.as_ref(), &payload.encode(), &config.worker_settings()).await;
    sink.close().await;

    match result {
        Ok(_) => {
            println!(
                "{} {} keys to '{}' ({} attempt(s))",
                "📨 Published".green().bold(),
                payload.len(),
                config.queue_name,
                attempts
            );
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "❌ Publish failed:".red().bold(), e);
            Err(e.into())
        }
    }
}
