//! Assessor - a command-line client for the personality assessment service.
//!
//! Log in, check who you are, and upload a resume for assessment, all
//! against the same backend the web dashboard talks to.

mod commands;
mod view;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use assessor_core::config::TokenStorage;

#[derive(Parser)]
#[command(name = "assessor")]
#[command(version)]
#[command(about = "Personality assessment client")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL (default: from config, then http://localhost:8000)
    #[arg(long, global = true, env = "ASSESSOR_API_URL")]
    api_url: Option<String>,

    /// Where to keep the access token: keyring or file
    #[arg(long, global = true, value_name = "STORE")]
    token_store: Option<TokenStorage>,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and remember the session
    Login {
        /// Account email (default: last used)
        #[arg(short, long, env = "ASSESSOR_EMAIL")]
        email: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in profile and current assessment
    Status,

    /// Create a new account
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,
    },

    /// Upload a PDF resume for assessment
    UploadResume {
        /// Path to the resume (PDF only)
        path: PathBuf,
    },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing();
    info!("Assessor starting");

    let mut ctx = commands::Context::open(cli.api_url, cli.token_store)?;

    match cli.command {
        Command::Login { email } => commands::login(&mut ctx, email).await,
        Command::Logout => commands::logout(&ctx),
        Command::Status => commands::status(&ctx).await,
        Command::Register { username, email } => {
            commands::register(&ctx, username, email).await
        }
        Command::UploadResume { path } => commands::upload_resume(&ctx, &path).await,
    }
}
