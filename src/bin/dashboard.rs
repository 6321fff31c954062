use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cluster_inventory::dashboard::{
    render::render_text, DashboardPoller, DashboardSession, HttpSnapshotSource,
};
use cluster_inventory::Config;

/// Terminal dashboard. An optional first argument (or DASHBOARD_SEARCH) is
/// used as the global search term.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let source = match HttpSnapshotSource::from_config(&config) {
        Ok(source) => source,
        Err(e) => {
            error!("❌ Failed to create snapshot client: {:#}", e);
            return Err(e.into());
        }
    };
    info!("Polling {} every {}s", source.url(), config.poll_interval_secs);

    let mut session = DashboardSession::new();
    if let Some(term) = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DASHBOARD_SEARCH").ok())
    {
        session.set_global_search(term);
    }
    let session = Arc::new(RwLock::new(session));

    let poller = DashboardPoller::new(config.poll_interval()).spawn(Arc::new(source), session.clone());
    let mut updates = poller.subscribe();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let text = render_text(&*session.read().await);
                println!("{}", text);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping dashboard");
                break;
            }
        }
    }

    poller.shutdown().await;
    Ok(())
}
