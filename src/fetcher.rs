use serde_json::{Map, Value};
use tracing::{debug, error, instrument};

use crate::fetch_error::FetchError;

/// Raw forecast body: station id -> (MM-DD-YYYY date -> water level).
pub type ForecastPayload = Map<String, Value>;

#[derive(Clone)]
pub struct ForecastFetcher {
    client: reqwest::Client,
    url: String,
}

impl ForecastFetcher {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_forecast(&self) -> Result<ForecastPayload, FetchError> {
        debug!("Sending HTTP request to forecast API");
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if !status.is_success() {
            error!("Forecast API returned {}", status);
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        debug!("Retrieved forecast body, size: {} bytes", body.len());

        parse_payload(&body)
    }
}

pub fn parse_payload(body: &str) -> Result<ForecastPayload, FetchError> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(map) => Ok(map),
        other => {
            error!("Expected a JSON object, got: {}", json_kind(&other));
            Err(FetchError::UnexpectedShape)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
