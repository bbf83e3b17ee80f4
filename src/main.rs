use std::sync::Arc;

use clap::{Parser, Subcommand};
use skywatch::{
    config::AppConfig,
    engine::Scheduler,
    persistence::{JsonFileAlertStore, traits::AlertStore},
    providers::OpenWeatherSource,
    transport::MeshSender,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing app.yaml.
    #[arg(long)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the relay loop.
    Run,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_relay(cli.config_dir.as_deref()).await?,
    }

    Ok(())
}

async fn run_relay(config_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("Loading application configuration...");
    let config = AppConfig::new(config_dir)?;
    tracing::info!(
        location = %config.location,
        channel_index = config.channel_index,
        radio_address = %config.radio_address,
        "Configuration loaded."
    );

    let alert_store = Arc::new(JsonFileAlertStore::new(&config.alerts_file));
    let known_alerts = alert_store.load().await?;
    tracing::info!(entries = known_alerts.len(), "Alert mapping loaded.");

    let data_source = Arc::new(OpenWeatherSource::new(&config)?);
    let sender = Arc::new(MeshSender::new(config.radio_address.clone()));

    let cancellation_token = CancellationToken::new();
    let scheduler = Scheduler::new(
        Arc::new(config),
        data_source,
        alert_store,
        sender,
        known_alerts,
        cancellation_token.clone(),
    );

    tracing::info!("Scheduler initialized, starting relay loop...");
    let handle = tokio::spawn(scheduler.run());

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received.");
    cancellation_token.cancel();
    handle.await?;

    Ok(())
}
