use anyhow::Context;
use clap::Parser;
use config::{default_bind_address, DashboardConfig};
use f1core::prelude::RacingData;
use f1core::upstream::{FixtureSource, OpenF1Client, DEFAULT_BASE_URL};
use log::{error, info};
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use web::AppState;

mod config;
mod web;

#[derive(Parser)]
#[command(author, version, about = "F1 driver profiles and tyre-stint charts over HTTP")]
struct Args {
    /// Load the dashboard config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = default_bind_address())]
    bind: SocketAddr,
    /// Base URL of the OpenF1 API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    api_base_url: String,
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
    /// Serve drivers and stints from a JSON fixture instead of the live API
    #[arg(long)]
    fixture: Option<PathBuf>,
}

fn build_source(config: &DashboardConfig) -> anyhow::Result<Arc<dyn RacingData>> {
    if let Some(path) = &config.fixture {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        let fixture = FixtureSource::from_json(&contents)
            .with_context(|| format!("parsing fixture {}", path.display()))?;
        info!(
            "serving {} drivers and {} sessions from {}",
            fixture.drivers.len(),
            fixture.sessions.len(),
            path.display()
        );
        return Ok(Arc::new(fixture));
    }

    let client = OpenF1Client::new(config.api_base_url.clone(), config.request_timeout())
        .context("building OpenF1 client")?;
    info!("reading racing data from {}", client.base_url());
    Ok(Arc::new(client))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        DashboardConfig::load(path)?
    } else {
        DashboardConfig::from_args(args.bind, args.api_base_url, args.timeout_secs, args.fixture)
    };

    let state = AppState::new(build_source(&config)?);
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime for the HTTP server")?;

    runtime.block_on(async move {
        let (address, server) = warp::serve(web::routes(state))
            .try_bind_with_graceful_shutdown(config.bind, async {
                if let Err(err) = signal::ctrl_c().await {
                    error!("awaiting Ctrl+C: {err}");
                }
            })
            .with_context(|| format!("binding {}", config.bind))?;
        info!("dashboard listening on http://{address} (Ctrl+C to stop)");
        server.await;
        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}
