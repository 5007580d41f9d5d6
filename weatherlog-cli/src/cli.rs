use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use weatherlog_core::{
    Config, FetchRequest, LatestPerCity, RecordStore, WeatherRecord, WeatherService, WeatherStats,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherlog", version, about = "Weather ingestion and statistics CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key (leave empty to use synthetic data).
    Configure,

    /// Fetch the current weather for a city and persist it.
    Fetch {
        /// City name.
        city: String,

        /// Optional ISO country code, e.g. "DE" or "GB".
        #[arg(long)]
        country: Option<String>,
    },

    /// Fetch the current weather for a coordinate pair and persist it.
    FetchAt {
        /// Latitude in decimal degrees.
        lat: f64,

        /// Longitude in decimal degrees.
        lon: f64,
    },

    /// List every stored record, newest first.
    List,

    /// Show a single record by id.
    Show { id: i64 },

    /// Show the most recent record for each city.
    Latest,

    /// Show summary statistics over all records.
    Stats,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        if let Command::Configure = self.command {
            return configure();
        }

        let config = Config::load()?;
        let data_file = config.data_file_path()?;
        let store = Arc::new(
            RecordStore::open(&data_file)
                .with_context(|| format!("Failed to open record log: {}", data_file.display()))?,
        );
        let service = WeatherService::from_config(&config, store);

        match self.command {
            Command::Configure => unreachable!("handled above"),
            Command::Fetch { city, country } => {
                let request = FetchRequest { city, country };
                let record = service.ingest(&request).await?;
                println!("Stored:");
                print_record(&record);
            }
            Command::FetchAt { lat, lon } => {
                let record = service.ingest_at(lat, lon).await?;
                println!("Stored:");
                print_record(&record);
            }
            Command::List => {
                let records = service.list();
                if records.is_empty() {
                    println!("No weather records yet. Try `weatherlog fetch <city>`.");
                }
                for record in records {
                    print_record(&record);
                }
            }
            Command::Show { id } => {
                let record = service.get(id)?;
                print_record(&record);
            }
            Command::Latest => {
                let LatestPerCity { count, data } = service.latest_per_city();
                println!("{count} cities:");
                for record in data {
                    print_record(&record);
                }
            }
            Command::Stats => {
                print_stats(&service.statistics());
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let key = inquire::Text::new("OpenWeather API key:")
        .with_help_message("Leave empty to use the synthetic provider")
        .prompt()?;

    let mut config = Config::load()?;
    let key = key.trim();
    config.api_key = if key.is_empty() { None } else { Some(key.to_owned()) };
    config.save()?;

    if config.api_key.is_some() {
        println!("API key saved; live weather data enabled.");
    } else {
        println!("No API key set; synthetic weather data will be used.");
    }

    Ok(())
}

fn print_record(record: &WeatherRecord) {
    let place = if record.country.is_empty() {
        record.city.clone()
    } else {
        format!("{}, {}", record.city, record.country)
    };

    println!(
        "#{} {}: {:.1}°C (feels like {:.1}°C), {}",
        record.id, place, record.temperature, record.feels_like, record.description
    );

    let visibility = match record.visibility {
        Some(meters) => format!("{meters} m"),
        None => "n/a".to_owned(),
    };
    println!(
        "    humidity {}%, pressure {} hPa, wind {:.1} m/s, visibility {}",
        record.humidity, record.pressure, record.wind_speed, visibility
    );
    println!("    fetched {}", record.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"));
}

fn print_stats(stats: &WeatherStats) {
    println!("Records:        {}", stats.total_records);
    println!("Unique cities:  {}", stats.unique_cities);
    println!("Average temp:   {}", fmt_temp(stats.average_temperature));
    println!("Max temp:       {}", fmt_temp(stats.max_temperature));
    println!("Min temp:       {}", fmt_temp(stats.min_temperature));
}

fn fmt_temp(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}°C"),
        None => "n/a".to_owned(),
    }
}
