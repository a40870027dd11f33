//! `slotwise` binary: run the trainer bot on the console or check a config.

use anyhow::Context;
use clap::{Parser, Subcommand};
use slotwise_bot::{BotConfig, BotRuntime, ConsoleChannel, FinalizerConfig, init_tracing};
use slotwise_completion::OpenAiClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Slot-filling personal trainer bot
#[derive(Parser, Debug)]
#[command(name = "slotwise")]
#[command(about = "Slot-filling personal trainer bot", long_about = None)]
#[command(version)]
struct Cli {
    /// Command to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot, reading `conversant: text` lines from stdin
    Run {
        /// Path to the bot TOML file
        #[arg(short, long, env = "SLOTWISE_CONFIG", default_value = "config/slotwise.toml")]
        config: PathBuf,
    },

    /// Validate a config file and print its dialogs and commands
    Check {
        /// Path to the bot TOML file
        #[arg(short, long, env = "SLOTWISE_CONFIG", default_value = "config/slotwise.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs)?;

    match cli.command {
        Commands::Run { config } => run(config).await,
        Commands::Check { config } => check(config),
    }
}

async fn run(path: PathBuf) -> anyhow::Result<()> {
    let config = BotConfig::from_file(&path)
        .with_context(|| format!("loading {}", path.display()))?;

    let mut builder = BotRuntime::builder(config.clone());
    if config.needs_completion() || config.needs_images() {
        let completion = config
            .completion
            .clone()
            .with_overrides_from(|key| std::env::var(key).ok());
        completion.validate().context("completion API settings")?;
        let client = Arc::new(OpenAiClient::new(completion)?);
        info!(model = %client.config().model(), "Completion client ready");
        builder = builder.completion(client.clone()).images(client);
    } else {
        warn!("No dialog or command uses the completion API");
    }

    let runtime = builder.build(Arc::new(ConsoleChannel::stdio()))?;
    tokio::select! {
        result = runtime.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }
    Ok(())
}

fn check(path: PathBuf) -> anyhow::Result<()> {
    let config = BotConfig::from_file(&path)
        .with_context(|| format!("loading {}", path.display()))?;

    println!("{}: ok", path.display());
    for dialog in &config.dialogs {
        let finalizer = match &dialog.finalizer {
            FinalizerConfig::Completion { .. } => "completion",
            FinalizerConfig::Summary { .. } => "summary",
        };
        let fields: Vec<&str> = dialog.slots.iter().map(|s| s.field.as_str()).collect();
        println!(
            "dialog {:<12} trigger {:?}  fields [{}]  finalizer {}",
            dialog.kind,
            dialog.trigger,
            fields.join(", "),
            finalizer
        );
    }
    for command in &config.commands {
        println!("command {:?} -> {:?}", command.trigger, command.action);
    }
    Ok(())
}
