use anyhow::Result;
use argh::FromArgs;
use chrono::{Local, NaiveDate};
use futures::StreamExt;
use std::path::PathBuf;
use std::process::ExitCode;

use justweather::{
    BriefWeatherDetails, DateRange, DefaultWeatherRepository, JustWeatherConfig, Location,
    WeatherError, WeatherRepository, logging,
};

/// Weather for the places you care about
#[derive(FromArgs, Debug)]
struct Args {
    /// path to the configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Command {
    Current(CurrentArgs),
    Save(SaveArgs),
    Delete(DeleteArgs),
    Purge(PurgeArgs),
    Restore(RestoreArgs),
    List(ListArgs),
    Watch(WatchArgs),
    Hourly(HourlyArgs),
    Precipitation(PrecipitationArgs),
    Details(DetailsArgs),
}

/// show current conditions for a place
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "current")]
struct CurrentArgs {
    /// display name of the place
    #[argh(option, default = "String::from(\"Current location\")")]
    name: String,
    /// latitude in decimal degrees
    #[argh(option)]
    latitude: String,
    /// longitude in decimal degrees
    #[argh(option)]
    longitude: String,
}

/// save a location
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "save")]
struct SaveArgs {
    /// display name of the place
    #[argh(option)]
    name: String,
    /// latitude in decimal degrees
    #[argh(option)]
    latitude: String,
    /// longitude in decimal degrees
    #[argh(option)]
    longitude: String,
}

/// delete a saved location (can be restored)
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "delete")]
struct DeleteArgs {
    /// latitude of the saved location
    #[argh(option)]
    latitude: String,
    /// longitude of the saved location
    #[argh(option)]
    longitude: String,
}

/// permanently delete a saved location
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "purge")]
struct PurgeArgs {
    /// latitude of the saved location
    #[argh(option)]
    latitude: String,
    /// longitude of the saved location
    #[argh(option)]
    longitude: String,
}

/// restore a deleted location
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "restore")]
struct RestoreArgs {
    /// latitude of the deleted location
    #[argh(option)]
    latitude: String,
    /// longitude of the deleted location
    #[argh(option)]
    longitude: String,
}

/// list saved locations
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "list")]
struct ListArgs {
    /// list deleted locations instead
    #[argh(switch)]
    deleted: bool,
}

/// follow the weather of all saved locations
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "watch")]
struct WatchArgs {
    /// exit after the first snapshot
    #[argh(switch)]
    once: bool,
}

/// show hourly forecasts
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "hourly")]
struct HourlyArgs {
    /// latitude in decimal degrees
    #[argh(option)]
    latitude: String,
    /// longitude in decimal degrees
    #[argh(option)]
    longitude: String,
    /// first day (YYYY-MM-DD, default today)
    #[argh(option, from_str_fn(parse_date))]
    start: Option<NaiveDate>,
    /// last day (YYYY-MM-DD, default the day after start)
    #[argh(option, from_str_fn(parse_date))]
    end: Option<NaiveDate>,
}

/// show hourly precipitation probabilities
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "precipitation")]
struct PrecipitationArgs {
    /// latitude in decimal degrees
    #[argh(option)]
    latitude: String,
    /// longitude in decimal degrees
    #[argh(option)]
    longitude: String,
    /// first day (YYYY-MM-DD, default today)
    #[argh(option, from_str_fn(parse_date))]
    start: Option<NaiveDate>,
    /// last day (YYYY-MM-DD, default the day after start)
    #[argh(option, from_str_fn(parse_date))]
    end: Option<NaiveDate>,
}

/// show additional weather details for today
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "details")]
struct DetailsArgs {
    /// latitude in decimal degrees
    #[argh(option)]
    latitude: String,
    /// longitude in decimal degrees
    #[argh(option)]
    longitude: String,
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{s}'. Expected YYYY-MM-DD"))
}

/// Combine optional bounds; `None` lets the repository pick today and tomorrow
fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<DateRange> {
    match (start, end) {
        (None, None) => None,
        (Some(start), None) => Some(DateRange::starting_at(start)),
        (start, Some(end)) => Some(DateRange::new(
            start.unwrap_or_else(|| Local::now().date_naive()),
            end,
        )),
    }
}

fn print_brief(details: &BriefWeatherDetails) {
    let location = details.location();
    match details.as_populated() {
        Some(brief) => println!(
            "{:<24} {:>4}°  {}",
            location.name, brief.current_temperature_rounded, brief.short_description
        ),
        None => println!("{:<24}    -   unavailable", location.name),
    }
}

fn print_location(location: &Location) {
    println!("{:<24} {}", location.name, location.format_coordinates());
}

/// Find a saved or deleted location by coordinates
async fn find_location(
    repository: &DefaultWeatherRepository,
    latitude: &str,
    longitude: &str,
) -> Result<Location> {
    let target = Location::new("", latitude, longitude);
    let mut known = repository.saved_locations().await?;
    known.extend(repository.deleted_locations().await?);
    known
        .into_iter()
        .find(|location| location.same_place(&target))
        .ok_or_else(|| {
            WeatherError::validation(format!(
                "No saved location at {}",
                target.format_coordinates()
            ))
            .into()
        })
}

async fn run(command: Command, repository: DefaultWeatherRepository) -> Result<()> {
    match command {
        Command::Current(args) => {
            let details = repository
                .fetch_weather_for_location(&args.name, &args.latitude, &args.longitude)
                .await?;
            println!(
                "{}: {}°, feels like {}°, {}",
                details.location.name,
                details.temperature_rounded,
                details.feels_like_rounded,
                details.condition.description()
            );
        }
        Command::Save(args) => {
            repository
                .save_weather_location(&args.name, &args.latitude, &args.longitude)
                .await?;
            println!("Saved {}", args.name.trim());
        }
        Command::Delete(args) => {
            let location = find_location(&repository, &args.latitude, &args.longitude).await?;
            repository
                .delete_weather_location_from_saved_items(&BriefWeatherDetails::empty(
                    location.clone(),
                ))
                .await?;
            println!("Deleted {} (use `restore` to undo)", location.name);
        }
        Command::Purge(args) => {
            let location = find_location(&repository, &args.latitude, &args.longitude).await?;
            repository
                .permanently_delete_weather_location_from_saved_items(&BriefWeatherDetails::empty(
                    location.clone(),
                ))
                .await?;
            println!("Permanently deleted {}", location.name);
        }
        Command::Restore(args) => {
            let location = Location::new("", args.latitude, args.longitude);
            repository
                .restore_weather_location_from_deleted_items(&location)
                .await?;
            println!("Restored {}", location.format_coordinates());
        }
        Command::List(args) => {
            let locations = if args.deleted {
                repository.deleted_locations().await?
            } else {
                repository.saved_locations().await?
            };
            if locations.is_empty() {
                println!("No locations");
            }
            locations.iter().for_each(print_location);
        }
        Command::Watch(args) => {
            let mut snapshots = repository.weather_stream_for_saved_locations();
            while let Some(snapshot) = snapshots.next().await {
                let snapshot = snapshot?;
                println!("--- {} ---", Local::now().format("%H:%M:%S"));
                snapshot.iter().for_each(print_brief);
                if args.once {
                    break;
                }
            }
        }
        Command::Hourly(args) => {
            let forecasts = repository
                .fetch_hourly_forecasts(
                    &args.latitude,
                    &args.longitude,
                    date_range(args.start, args.end),
                )
                .await?;
            for forecast in forecasts {
                println!(
                    "{}  {:>4}°  {}",
                    forecast.date_time.format("%Y-%m-%d %H:%M"),
                    forecast.temperature_rounded,
                    forecast.condition.description()
                );
            }
        }
        Command::Precipitation(args) => {
            let probabilities = repository
                .fetch_hourly_precipitation_probabilities(
                    &args.latitude,
                    &args.longitude,
                    date_range(args.start, args.end),
                )
                .await?;
            for probability in probabilities {
                println!(
                    "{}  {:>3}%",
                    probability.date_time.format("%Y-%m-%d %H:%M"),
                    probability.percentage()
                );
            }
        }
        Command::Details(args) => {
            let details = repository
                .fetch_additional_weather_info_items_list_for_current_day(
                    &args.latitude,
                    &args.longitude,
                )
                .await?;
            for detail in details {
                println!("{:<12} {}", detail.name, detail.value);
            }
        }
    }
    Ok(())
}

fn report(error: &anyhow::Error) {
    match error.downcast_ref::<WeatherError>() {
        Some(weather_error) => {
            tracing::debug!("{}", weather_error);
            eprintln!("Error: {}", weather_error.user_message());
        }
        None => eprintln!("Error: {error:#}"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Args = argh::from_env();

    let config = match JustWeatherConfig::load_from_path(args.config) {
        Ok(config) => config,
        Err(e) => {
            report(&e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Error: {}", e.user_message());
        return ExitCode::FAILURE;
    }

    let result = match DefaultWeatherRepository::from_config(&config) {
        Ok(repository) => run(args.command, repository).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}
