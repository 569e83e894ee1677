//! Turns the raw forecast payload into per-station time series.
//!
//! Bad entries are dropped one at a time: an unknown station id drops that
//! station, an unparseable date or a non-numeric level drops that single
//! observation. Nothing here returns an error.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::stations::StationRegistry;

const FORECAST_DATE_FORMAT: &str = "%m-%d-%Y";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedObservation {
    pub date: NaiveDate,
    pub water_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSeries {
    pub station_name: String,
    pub observations: Vec<NormalizedObservation>,
    pub danger_level: Option<f64>,
}

/// Normalize a forecast payload against the registry and allow-list.
///
/// The result is ordered by first appearance of each station in the payload.
/// Stations with no valid observations are kept with an empty series.
#[instrument(skip_all, fields(payload_stations = payload.len()))]
pub fn normalize(
    payload: &Map<String, Value>,
    registry: &StationRegistry,
    allowed_names: &[String],
) -> Vec<StationSeries> {
    let mut all_series: Vec<StationSeries> = Vec::new();

    for (id_str, dates) in payload {
        let Ok(station_id) = id_str.trim().parse::<i64>() else {
            debug!("Skipping non-numeric station key '{}'", id_str);
            continue;
        };

        let Some(station) = registry.get(station_id) else {
            debug!("Skipping station {} not in registry", station_id);
            continue;
        };

        if !allowed_names.iter().any(|name| name == &station.name) {
            debug!("Skipping station {} ({}) not in allow-list", station_id, station.name);
            continue;
        }

        let series = StationSeries {
            station_name: station.name.clone(),
            observations: normalize_observations(&station.name, dates),
            danger_level: station.danger_level,
        };

        // Same name seen again: replace in place, keep first position
        match all_series
            .iter_mut()
            .find(|existing| existing.station_name == series.station_name)
        {
            Some(existing) => *existing = series,
            None => all_series.push(series),
        }
    }

    debug!("Normalized {} stations", all_series.len());
    all_series
}

fn normalize_observations(station_name: &str, dates: &Value) -> Vec<NormalizedObservation> {
    let Some(dates) = dates.as_object() else {
        warn!("Station {} has no date map, treating as empty", station_name);
        return Vec::new();
    };

    let mut observations: Vec<NormalizedObservation> = dates
        .iter()
        .filter_map(|(date_str, value)| normalize_observation(date_str, value))
        .collect();

    let dropped = dates.len() - observations.len();
    if dropped > 0 {
        warn!(
            "Dropped {} of {} observations for station {}",
            dropped,
            dates.len(),
            station_name
        );
    }

    observations.sort_by(|a, b| a.date.cmp(&b.date));
    observations
}

fn normalize_observation(date_str: &str, value: &Value) -> Option<NormalizedObservation> {
    let date = parse_forecast_date(date_str)?;
    let water_level = water_level_value(value)?;
    Some(NormalizedObservation { date, water_level })
}

/// Parse an upstream `MM-DD-YYYY` date. Wrong shape and impossible calendar
/// dates both give `None`.
pub fn parse_forecast_date(value: &str) -> Option<NaiveDate> {
    let re = Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{4}$").ok()?;
    if !re.is_match(value) {
        return None;
    }

    // Year 0000 parses with chrono but is not a calendar year upstream
    NaiveDate::parse_from_str(value, FORECAST_DATE_FORMAT)
        .ok()
        .filter(|date| date.year() >= 1)
}

/// Format a date back into the upstream `MM-DD-YYYY` form.
pub fn to_forecast_date(date: NaiveDate) -> String {
    date.format(FORECAST_DATE_FORMAT).to_string()
}

/// Only JSON numbers count as water levels.
pub fn water_level_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
