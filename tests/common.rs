#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use flood_forecast_service::api::{create_router, AppState};
use flood_forecast_service::fetcher::ForecastFetcher;
use flood_forecast_service::services::ForecastService;
use flood_forecast_service::stations::StationRegistry;

pub const TEST_REGISTRY: &str = r#"[
    {"id": 5, "name": "Sylhet", "dangerlevel": "3.5"},
    {"id": 7, "name": "Sunamganj", "dangerlevel": null},
    {"id": 9, "name": "Dhaka", "dangerlevel": "6.0"},
    {"id": 12, "name": "Derai"}
]"#;

pub fn test_registry() -> Arc<StationRegistry> {
    Arc::new(StationRegistry::from_json(TEST_REGISTRY).expect("Failed to parse test registry"))
}

pub fn test_allowed() -> Vec<String> {
    vec![
        "Sylhet".to_string(),
        "Sunamganj".to_string(),
        "Derai".to_string(),
    ]
}

/// Service pointed at a mock upstream
pub fn test_service(forecast_url: String) -> ForecastService {
    ForecastService::new(
        ForecastFetcher::new(forecast_url),
        test_registry(),
        test_allowed(),
    )
}

pub fn test_app(forecast_url: String) -> Router {
    create_router(AppState {
        forecast_service: test_service(forecast_url),
    })
}
