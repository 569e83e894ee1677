use std::env;

pub const DEFAULT_FORECAST_URL: &str =
    "https://api.ffwc.gov.bd/data_load/seven-days-forecast-waterlevel-24-hours/";

/// Stations shown on the forecast page unless `ALLOWED_STATIONS` overrides them.
pub const DEFAULT_ALLOWED_STATIONS: &[&str] = &[
    "Jamalpur",
    "Durgapur",
    "Mymensingh",
    "B. Baria",
    "Habiganj",
    "Bhairabbazar",
    "Derai",
    "Khaliajuri",
    "Manu-RB",
    "Moulvibazar",
    "Narsingdi",
    "Sheola",
    "Sherpur-Sylhet",
    "Sunamganj",
    "Sylhet",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub forecast_url: String,
    pub stations_file: String,
    pub allowed_stations: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            forecast_url: env::var("FORECAST_URL")
                .unwrap_or_else(|_| DEFAULT_FORECAST_URL.to_string()),
            stations_file: env::var("STATIONS_FILE")
                .unwrap_or_else(|_| "stations.json".to_string()),
            allowed_stations: env::var("ALLOWED_STATIONS")
                .ok()
                .map(|value| parse_station_list(&value))
                .filter(|names| !names.is_empty())
                .unwrap_or_else(default_allowed_stations),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

pub fn default_allowed_stations() -> Vec<String> {
    DEFAULT_ALLOWED_STATIONS
        .iter()
        .map(|name| name.to_string())
        .collect()
}

fn parse_station_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
