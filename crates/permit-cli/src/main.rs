//! Permit Desk terminal front end
//!
//! An interactive shell over the UI core. Every action is POSTed to the
//! proxy's `/api` endpoint.
//!
//! # Usage
//!
//! ```bash
//! # Against a local proxy
//! permit-cli
//!
//! # Somewhere else, signing in straight away
//! PERMIT_API_URL=https://permits.example.com/api permit-cli --user amal
//! ```

mod busy;
mod command;
mod render;
mod shell;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use permit_client::HttpActionClient;
use permit_ui::Controller;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use crate::busy::StderrBusy;
use crate::shell::Shell;

const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Parser)]
#[command(name = "permit-cli")]
#[command(version = "0.1.0")]
#[command(about = "Interactive shell for permits, observations and permit monitoring")]
#[command(long_about = None)]
struct Cli {
    /// Proxy endpoint actions are POSTed to
    #[arg(long, env = "PERMIT_API_URL", default_value = DEFAULT_API_URL)]
    api_url: Url,

    /// Sign in as this user at startup (the password is prompted)
    #[arg(long, short)]
    user: Option<String>,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "permit_cli=warn,permit_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::debug!("Using API endpoint {}", cli.api_url);
    let client =
        HttpActionClient::new(cli.api_url).with_busy_indicator(Arc::new(StderrBusy::default()));
    let (controller, expiries) = Controller::new(client);

    let mut shell = Shell::new(controller, expiries);
    if let Some(user) = cli.user {
        shell.start_login(user);
    }
    shell.run().await
}
