use clap::Parser;

use flood_forecast_service::config::{Config, DEFAULT_FORECAST_URL};
use flood_forecast_service::fetcher::ForecastFetcher;
use flood_forecast_service::normalizer::{normalize, to_forecast_date};
use flood_forecast_service::stations::StationRegistry;

#[derive(Parser)]
#[command(name = "check-forecast")]
#[command(about = "Fetch the forecast once and print each station's series", long_about = None)]
struct Cli {
    /// Forecast API URL
    #[arg(long, env, default_value = DEFAULT_FORECAST_URL)]
    forecast_url: String,

    /// Station registry JSON file
    #[arg(long, env, default_value = "stations.json")]
    stations_file: String,

    /// Only show this station
    station: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let registry = StationRegistry::load(&cli.stations_file)?;
    println!("Loaded {} stations from {}", registry.len(), cli.stations_file);

    let fetcher = ForecastFetcher::new(cli.forecast_url.clone());
    let payload = fetcher.fetch_forecast().await?;
    println!("Upstream returned {} stations\n", payload.len());

    let allowed = Config::from_env().allowed_stations;
    let all_series = normalize(&payload, &registry, &allowed);

    for series in all_series
        .iter()
        .filter(|s| cli.station.as_ref().map_or(true, |name| &s.station_name == name))
    {
        match series.danger_level {
            Some(level) => println!("{} (danger level {:.2} m)", series.station_name, level),
            None => println!("{} (no danger level)", series.station_name),
        }

        if series.observations.is_empty() {
            println!("  no valid observations");
        }

        for obs in &series.observations {
            let flag = match series.danger_level {
                Some(level) if obs.water_level > level => "  ABOVE DANGER",
                _ => "",
            };
            println!(
                "  {} ({})  {:>8.2}{}",
                obs.date,
                to_forecast_date(obs.date),
                obs.water_level,
                flag
            );
        }
        println!();
    }

    Ok(())
}
