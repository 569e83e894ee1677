use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::chart::{render_station, ChartError, RenderedStationPlot};
use crate::fetch_error::FetchError;
use crate::fetcher::ForecastFetcher;
use crate::normalizer::{normalize, StationSeries};
use crate::stations::StationRegistry;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to fetch forecast: {0}")]
    Fetch(#[from] FetchError),
    #[error("Failed to render chart: {0}")]
    Chart(#[from] ChartError),
    #[error("Render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Fetch, normalize and render the forecast. Holds only read-only state, so
/// clones can serve concurrent requests.
#[derive(Clone)]
pub struct ForecastService {
    fetcher: ForecastFetcher,
    registry: Arc<StationRegistry>,
    allowed_stations: Arc<[String]>,
}

impl ForecastService {
    pub fn new(
        fetcher: ForecastFetcher,
        registry: Arc<StationRegistry>,
        allowed_stations: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            registry,
            allowed_stations: allowed_stations.into(),
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch_station_series(&self) -> Result<Vec<StationSeries>, ServiceError> {
        let payload = self.fetcher.fetch_forecast().await?;
        info!("Fetched forecast for {} upstream stations", payload.len());

        let series = normalize(&payload, &self.registry, &self.allowed_stations);
        info!("Normalized {} allowed stations", series.len());
        Ok(series)
    }

    /// Render one plot per station, in normalized order. Nothing is rendered
    /// if the fetch fails.
    #[instrument(skip(self))]
    pub async fn station_plots(&self) -> Result<Vec<RenderedStationPlot>, ServiceError> {
        let series = self.fetch_station_series().await?;

        debug!("Rendering {} station charts", series.len());
        let plots = tokio::task::spawn_blocking(move || render_all(&series)).await??;

        let charted = plots.iter().filter(|p| p.image.is_some()).count();
        info!("Rendered {} charts for {} stations", charted, plots.len());
        Ok(plots)
    }
}

/// One chart at a time; each render owns its drawing surface.
pub fn render_all(series: &[StationSeries]) -> Result<Vec<RenderedStationPlot>, ChartError> {
    series.iter().map(render_station).collect()
}
