use std::future::IntoFuture;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showrss_api::config::Config;
use showrss_api::shutdown::{close_within, shutdown_signal};
use showrss_api::{app_router, AppState, HealthService, ShutdownOrchestrator};
use showrss_betaseries_client::BetaseriesClient;
use showrss_torrent_index_client::TorrentIndexClient;
use showrss_worker::adapters::{BetaseriesEpisodeSource, TorrentIndexSearchProvider};
use showrss_worker::repositories::PgEpisodeRepository;
use showrss_worker::Pipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "showrss_api=debug,showrss_worker=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!(
        environment = %config.environment(),
        addr = %config.http_addr,
        "Starting showrss API server"
    );

    // Initialize database pool
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database().max_connections)
        .min_connections(config.database().min_connections)
        .acquire_timeout(config.database().acquire_timeout)
        .idle_timeout(config.database().idle_timeout)
        .connect(&config.database().url)
        .await?;
    tracing::info!("Database connection established");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations completed successfully");

    let repository = Arc::new(PgEpisodeRepository::new(pool.clone()));

    let betaseries = BetaseriesClient::new(&config.common.betaseries)?;
    let torrent_index = TorrentIndexClient::new(&config.common.torrent_index)?;

    let source = Arc::new(BetaseriesEpisodeSource::new(betaseries, repository.clone()));
    let provider = Arc::new(TorrentIndexSearchProvider::new(torrent_index));

    let pipeline =
        Pipeline::new(config.pipeline.clone()).spawn(source, provider, repository.clone());

    let health_service = Arc::new(HealthService::new(
        pool.clone(),
        pipeline.trigger(),
        pipeline.monitor(),
    ));

    let app = app_router(AppState {
        health_service,
        trigger: pipeline.trigger(),
        catalog: repository,
    });

    // Bind failure is fatal
    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    tracing::info!("Listening on {}", config.http_addr);

    let orchestrator = ShutdownOrchestrator::new(config.shutdown_grace);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(orchestrator.drain_signal())
        .into_future();

    let report = orchestrator.run(server, shutdown_signal(), pipeline).await?;

    if report.discarded.discarded_work() > 0 {
        tracing::warn!(
            discarded = report.discarded.discarded_work(),
            "Queued pipeline work was discarded on shutdown"
        );
    }

    close_within("database pool", config.shutdown_grace, pool.close()).await;
    Ok(())
}
