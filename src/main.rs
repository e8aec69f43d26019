use anyhow::Result;
use clap::Parser;
use pulse::{
    config::Config,
    dashboard::{self, AppState},
    data::DataLoader,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "disaster-pulse")]
#[command(about = "Serve The Pulse of Disasters dashboard")]
struct Cli {
    /// Config file (defaults to config/default.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data file, overrides data.path
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Port, overrides server.port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("pulse=info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data) = cli.data {
        config.data.path = data.display().to_string();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    info!("Starting dashboard with data from: {}", config.data.path);

    // Loaded once and shared; every request aggregates over this snapshot
    let dataset = DataLoader::new(config.data_path()).load()?;
    let addr = config.bind_addr();
    let port = config.server.port;

    let state = Arc::new(AppState::new(dataset, config)?);
    let app = dashboard::router(state);

    info!("Dashboard running at http://localhost:{}", port);
    info!("Open your browser to view the charts");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
