use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

use rave_radar::apis::geocode::NominatimGeocoder;
use rave_radar::apis::skiddle::SkiddleClient;
use rave_radar::app::ports::Geocoder;
use rave_radar::app::session::SearchSession;
use rave_radar::config::Config;
use rave_radar::domain::{DateRangeKind, GeocodedLocation, SearchFilters};
use rave_radar::logging::init_logging;
use rave_radar::search::share;
use rave_radar::server;

#[derive(Parser)]
#[command(name = "rave-radar")]
#[command(about = "Location-based underground event discovery")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (events search + geocoding)
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one search from the command line and print the results
    Search {
        /// Free-text location, geocoded before searching
        #[arg(long)]
        location: Option<String>,
        /// Latitude, used together with --lng instead of --location
        #[arg(long)]
        lat: Option<f64>,
        /// Longitude, used together with --lat instead of --location
        #[arg(long)]
        lng: Option<f64>,
        /// Search radius in miles (clamped to 1-250)
        #[arg(long, default_value = "25")]
        radius: u32,
        /// Date range: tonight, weekend, 7days, 14days or custom
        #[arg(long, default_value = "7days")]
        range: String,
        /// Custom range start (YYYY-MM-DD), only with --range custom
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Custom range end (YYYY-MM-DD), only with --range custom
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Comma-separated genre names (e.g. "techno,drum & bass")
        #[arg(long)]
        genres: Option<String>,
        /// Free-text keyword, OR-ed in front of the genre expansion
        #[arg(long, default_value = "")]
        keyword: String,
    },
    /// Encode or decode shareable permalink tokens
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },
}

#[derive(Subcommand)]
enum ShareAction {
    /// Build a token from filter values
    Encode {
        /// Location label (preset city names round-trip to coordinates)
        #[arg(long)]
        location: Option<String>,
        /// Comma-separated genre names
        #[arg(long)]
        genres: Option<String>,
        /// Search radius in miles (clamped to 1-250)
        #[arg(long, default_value = "25")]
        radius: u32,
        /// Date range: tonight, weekend, 7days, 14days or custom
        #[arg(long, default_value = "7days")]
        range: String,
    },
    /// Decode a token and print the filters it carries
    Decode {
        /// Token of the form RADAR/LOCATION/GENRES/RADIUS/DATE
        token: String,
    },
}

fn split_genres(raw: Option<&str>) -> Vec<String> {
    raw.map(|g| g.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            let provider = Arc::new(SkiddleClient::new(
                &config.provider,
                Config::provider_api_key(),
            )?);
            if !provider.has_api_key() {
                info!("SKIDDLE_API_KEY not set; serving the mock catalogue");
            }
            let geocoder = Arc::new(NominatimGeocoder::new(&config.geocoder)?);
            server::run(&config, provider, geocoder).await?;
        }
        Commands::Search {
            location,
            lat,
            lng,
            radius,
            range,
            start,
            end,
            genres,
            keyword,
        } => {
            let resolved = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(GeocodedLocation {
                    lat,
                    lng,
                    display_name: location.clone().unwrap_or_default(),
                }),
                _ => {
                    let Some(query) = location.as_deref() else {
                        anyhow::bail!("pass --location, or both --lat and --lng");
                    };
                    let geocoder = NominatimGeocoder::new(&config.geocoder)?;
                    geocoder.geocode(query).await?
                }
            };
            let Some(resolved) = resolved else {
                anyhow::bail!("location not found");
            };
            println!("location: {} ({:.4}, {:.4})", resolved.display_name, resolved.lat, resolved.lng);

            let filters = SearchFilters {
                location: Some(resolved),
                radius,
                date_range: DateRangeKind::parse(&range),
                custom_start: start,
                custom_end: end,
                genres: split_genres(genres.as_deref()),
                keyword,
            };

            let provider = Arc::new(SkiddleClient::new(
                &config.provider,
                Config::provider_api_key(),
            )?);
            let session = SearchSession::new(provider);
            session.start_search(&filters, Utc::now().date_naive()).await?;

            let state = session.snapshot();
            if let Some(error) = state.error {
                anyhow::bail!(error);
            }
            for event in &state.events {
                let city = event.venue.city.as_deref().unwrap_or("?");
                println!(
                    "{}  {}  @ {} ({})  {}",
                    event.start_date_time,
                    event.title,
                    event.venue.name,
                    city,
                    event.price_text.as_deref().unwrap_or(""),
                );
            }
            println!("\n{} of {} events{}", state.events.len(), state.total,
                if state.mock { " (mock catalogue)" } else { "" });
            println!("share: #{}", share::encode(&filters));
        }
        Commands::Share { action } => match action {
            ShareAction::Encode { location, genres, radius, range } => {
                let filters = SearchFilters {
                    location: location.map(|label| GeocodedLocation {
                        lat: 0.0,
                        lng: 0.0,
                        display_name: label,
                    }),
                    radius,
                    date_range: DateRangeKind::parse(&range),
                    genres: split_genres(genres.as_deref()),
                    ..SearchFilters::default()
                };
                println!("#{}", share::encode(&filters));
            }
            ShareAction::Decode { token } => match share::decode(&token) {
                Some(shared) => {
                    println!("location: {}", shared.location_key);
                    match shared.preset {
                        Some(preset) => println!("coords:   {:.4}, {:.4}", preset.lat, preset.lng),
                        None => println!("coords:   (not a preset city; location does not round-trip)"),
                    }
                    println!("radius:   {} miles", shared.radius);
                    println!("genres:   {}", if shared.genres.is_empty() { "all".to_string() } else { shared.genres.join(", ") });
                    println!("range:    {:?}", shared.date_range);
                }
                None => anyhow::bail!("not a valid share token"),
            },
        },
    }

    Ok(())
}
