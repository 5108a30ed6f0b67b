use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use tracklife::{Config, FileStore, Tracker, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let store = FileStore::open(&config.data_dir)?;
    info!(data_dir = %store.root().display(), "tracker data directory ready");

    let tracker = Tracker::open(Arc::new(store));
    info!(
        sleep = tracker.sleep.get_all().len(),
        period = tracker.period.get_all().len(),
        workout = tracker.workout.get_all().len(),
        habits = tracker.habits.get_all().len(),
        budget = tracker.budget.entries.get_all().len(),
        mood = tracker.mood.get_all().len(),
        water = tracker.water.get_all().len(),
        "loaded tracker data"
    );

    let addr = config.listen_addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
