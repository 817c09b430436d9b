use std::io::Write;
use anyhow::{bail, Context};
use dotenv::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod commands;

use app::App;
use commands::Command;
use shared_config::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Logs go to stderr so they never interleave with the console output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting MedConnect console");

    let config = ClientConfig::from_env();
    if !config.is_configured() {
        bail!("MEDCONNECT_API_URL must not be empty");
    }
    info!("Using API at {}", config.api_base_url);

    let mut app = App::new(&config);
    app.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("failed to write prompt")?;

        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };

        match Command::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => app.execute(command).await,
            Ok(None) => {}
            Err(message) => println!("{}", message),
        }
    }

    info!("Bye");
    Ok(())
}
