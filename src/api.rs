use axum::{extract::State, http::StatusCode, response::Html, routing::get, Router};
use tracing::{debug, error, info, instrument};

use crate::page::render_page;
use crate::services::ForecastService;

#[derive(Clone)]
pub struct AppState {
    pub forecast_service: ForecastService,
}

pub fn create_router(state: AppState) -> Router {
    Router::new().route("/", get(index)).with_state(state)
}

#[instrument(skip(state))]
async fn index(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    debug!("Forecast page requested");
    let plots = state.forecast_service.station_plots().await.map_err(|e| {
        error!("Failed to build forecast page: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    info!("Serving forecast page with {} stations", plots.len());
    Ok(Html(render_page(&plots)))
}
