#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Upstream returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Failed to parse forecast JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Forecast payload is not a JSON object")]
    UnexpectedShape,
}
