use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flood_forecast_service::api::{create_router, AppState};
use flood_forecast_service::config::Config;
use flood_forecast_service::fetcher::ForecastFetcher;
use flood_forecast_service::services::ForecastService;
use flood_forecast_service::stations::StationRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,flood_forecast_service=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env();
    info!("Starting flood forecast service with config: {:?}", config);

    // Registry is loaded once and shared read-only
    let registry = Arc::new(StationRegistry::load(&config.stations_file)?);

    let fetcher = ForecastFetcher::new(config.forecast_url.clone());
    let forecast_service =
        ForecastService::new(fetcher, registry, config.allowed_stations.clone());

    let app_state = AppState { forecast_service };
    let app = create_router(app_state).layer(TraceLayer::new_for_http());

    let addr = config.server_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
