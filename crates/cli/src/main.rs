//! StudyMate CLI — the main entry point.
//!
//! Commands:
//! - `chat`    — Interactive study chat
//! - `ask`     — Single question, single answer
//! - `init`    — Write a starter config file
//! - `config`  — Show, locate or validate the config

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "studymate",
    about = "StudyMate — a subject-aware study assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat
    Chat {
        /// Subject label (文学, 数学, 计算机)
        #[arg(long)]
        subject: Option<String>,

        /// Explanation style label (简洁, 详细)
        #[arg(long)]
        style: Option<String>,
    },

    /// Ask a single question and print the answer
    Ask {
        /// The question
        #[arg(short, long)]
        message: String,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        style: Option<String>,
    },

    /// Write the default config file
    Init,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (API key redacted)
    Show,
    /// Print the config file path
    Path,
    /// Check the configuration for problems
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the chat
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat { subject, style } => commands::chat::run(subject, style).await?,
        Commands::Ask {
            message,
            subject,
            style,
        } => commands::ask::run(message, subject, style).await?,
        Commands::Init => commands::init::run().await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
        },
    }

    Ok(())
}
