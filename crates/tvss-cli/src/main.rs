//! tvss - PBS TV Schedules Service CLI.

/// Application configuration (TOML).
mod config;
/// Result reporting.
mod report;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use tvss_api::tvss::{
    Feed, ListingsOptions, LocalTvssApi, SearchOptions, TvssClient, format_listing_date,
    get_feeds_by_short_name, get_listings_range, parse_listing_date,
};

use crate::config::{AppConfig, resolve_config_path};

/// Environment variable holding the API key.
const API_KEY_ENV: &str = "TVSS_API_KEY";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Config directory (default: `$TVSS_CONFIG_DIR`, `$XDG_CONFIG_HOME/tvss`, then `~/.config/tvss`).
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Station call sign (overrides `station.call_sign` in config).
    #[arg(long, global = true)]
    call_sign: Option<String>,

    /// Report results as pretty JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Listings for a day (or a range of days).
    Listings(ListingsArgs),
    /// Today's listings.
    Today(TodayArgs),
    /// Upcoming airings of a show (episode).
    Show(IdArgs),
    /// Upcoming episodes of a program.
    Program(IdArgs),
    /// Every program known to the service (large response).
    Programs,
    /// Search programs and shows.
    Search(SearchArgs),
    /// Cable/satellite headends carrying the station.
    Channels(ChannelsArgs),
    /// The station's feeds, without listings.
    Feeds(FeedsArgs),
    /// Show or update the config file.
    Config(ConfigCommand),
}

/// Arguments for the `listings` subcommand.
#[derive(clap::Args)]
struct ListingsArgs {
    /// Day to fetch. Formats: "20190704", "2019-07-04".
    #[arg(long, required = true)]
    date: String,

    /// Last day of a range (inclusive, at most 31 days). Same formats as --date.
    #[arg(long)]
    to: Option<String>,

    /// Only kids listings.
    #[arg(long)]
    kids: bool,

    /// Ask the service to include images.
    #[arg(long)]
    images: bool,
}

/// Arguments for the `today` subcommand.
#[derive(clap::Args)]
struct TodayArgs {
    /// Only kids listings.
    #[arg(long)]
    kids: bool,

    /// Ask the service to include images.
    #[arg(long)]
    images: bool,
}

/// Arguments for the `show` and `program` subcommands.
#[derive(clap::Args)]
struct IdArgs {
    /// Show or program ID (e.g. "episode_57384", "7877").
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search term (e.g. "jamestown").
    #[arg(long, required = true)]
    term: String,

    /// Search every station instead of the configured one.
    #[arg(long)]
    all_stations: bool,

    /// Only kids content (requires the call sign).
    #[arg(long)]
    kids: bool,

    /// Report only matching programs.
    #[arg(long, conflicts_with = "shows_only")]
    programs_only: bool,

    /// Report only matching shows.
    #[arg(long)]
    shows_only: bool,
}

/// Arguments for the `channels` subcommand.
#[derive(clap::Args)]
struct ChannelsArgs {
    /// Limit headends to a zip code (e.g. "98030").
    #[arg(long)]
    zip: Option<String>,
}

/// Arguments for the `feeds` subcommand.
#[derive(clap::Args)]
struct FeedsArgs {
    /// Key feeds by short name.
    #[arg(long)]
    by_short_name: bool,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the resolved config.
    Show,
    /// Update config values.
    Set(ConfigSetArgs),
}

/// Arguments for the `config set` subcommand.
#[derive(clap::Args)]
struct ConfigSetArgs {
    /// Station call sign.
    #[arg(long = "station-call-sign")]
    call_sign: Option<String>,

    /// API base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (0 disables).
    #[arg(long)]
    timeout_secs: Option<u64>,
}

/// Global options shared by the API subcommands.
struct Globals<'a> {
    dir: Option<&'a PathBuf>,
    call_sign: Option<&'a str>,
    json: bool,
}

/// Builds a `TvssClient` from config and the `TVSS_API_KEY` environment variable.
///
/// # Errors
///
/// Returns an error if `TVSS_API_KEY` is not set, the config cannot be loaded,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tvss_client(globals: &Globals<'_>) -> Result<TvssClient> {
    let api_key = std::env::var(API_KEY_ENV)
        .with_context(|| format!("{API_KEY_ENV} environment variable is required"))?;

    let config_path = resolve_config_path(globals.dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let mut builder = TvssClient::builder().api_key(api_key).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(call_sign) = config.resolve_call_sign(globals.call_sign) {
        builder = builder.call_sign(call_sign);
    }
    if let Some(url) = config.base_url()? {
        builder = builder.base_url(url);
    }
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }

    let client = builder.build().context("failed to build TVSS client")?;
    tracing::debug!(
        call_sign = client.call_sign().unwrap_or("-"),
        base_url = %client.base_url(),
        "TVSS client ready"
    );
    Ok(client)
}

/// Parses a `--date`/`--to` argument.
fn parse_date_arg(flag: &str, raw: &str) -> Result<NaiveDate> {
    parse_listing_date(raw).with_context(|| format!("invalid --{flag}"))
}

/// Runs the `listings` subcommand.
///
/// # Errors
///
/// Returns an error if a date is invalid, the client fails to build,
/// or any API request fails.
#[instrument(skip_all)]
async fn run_listings(args: &ListingsArgs, globals: &Globals<'_>) -> Result<()> {
    let date = parse_date_arg("date", &args.date)?;
    let to = args
        .to
        .as_deref()
        .map(|raw| parse_date_arg("to", raw))
        .transpose()?;
    let options = ListingsOptions {
        kids_only: args.kids,
        fetch_images: args.images,
    };
    let client = build_tvss_client(globals)?;

    let Some(end) = to else {
        let feeds = client
            .get_listings(date, options)
            .await
            .context("TVSS day listings request failed")?;
        if globals.json {
            return report::report_json(&feeds);
        }
        report::report_listings(&feeds);
        return Ok(());
    };

    let days = get_listings_range(&client, date, end, options)
        .await
        .context("TVSS listings range request failed")?;
    if globals.json {
        let by_date: BTreeMap<String, &Vec<Feed>> = days
            .iter()
            .map(|(day, feeds)| (format_listing_date(*day), feeds))
            .collect();
        return report::report_json(&by_date);
    }
    for (day, feeds) in &days {
        tracing::info!("Date: {}", day.format("%Y-%m-%d"));
        report::report_listings(feeds);
    }
    Ok(())
}

/// Runs the `today` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_today(args: &TodayArgs, globals: &Globals<'_>) -> Result<()> {
    let client = build_tvss_client(globals)?;
    let options = ListingsOptions {
        kids_only: args.kids,
        fetch_images: args.images,
    };

    let feeds = client
        .get_today(options)
        .await
        .context("TVSS today request failed")?;

    if globals.json {
        return report::report_json(&feeds);
    }
    report::report_listings(&feeds);
    Ok(())
}

/// Runs the `show` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_show(args: &IdArgs, globals: &Globals<'_>) -> Result<()> {
    let client = build_tvss_client(globals)?;

    let show = client
        .get_show(&args.id)
        .await
        .context("TVSS upcoming show request failed")?;

    if globals.json {
        return report::report_json(&show);
    }
    report::report_show_upcoming(&show);
    Ok(())
}

/// Runs the `program` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_program(args: &IdArgs, globals: &Globals<'_>) -> Result<()> {
    let client = build_tvss_client(globals)?;

    let program = client
        .get_program(&args.id)
        .await
        .context("TVSS upcoming program request failed")?;

    if globals.json {
        return report::report_json(&program);
    }
    report::report_program_upcoming(&program);
    Ok(())
}

/// Runs the `programs` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_programs(globals: &Globals<'_>) -> Result<()> {
    let client = build_tvss_client(globals)?;

    let programs = client
        .get_programs()
        .await
        .context("TVSS programs request failed")?;

    if globals.json {
        return report::report_json(&programs);
    }
    report::report_programs(&programs);
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the options are invalid, the client fails to build,
/// or the API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, globals: &Globals<'_>) -> Result<()> {
    let options = SearchOptions::default()
        .include_call_sign(!args.all_stations)
        .kids_only(args.kids);
    options.validate()?;
    if args.term.trim().is_empty() {
        bail!("--term must not be empty");
    }
    let client = build_tvss_client(globals)?;

    if args.programs_only {
        let programs = client
            .search_programs(&args.term, options)
            .await
            .context("TVSS search request failed")?;
        if globals.json {
            return report::report_json(&programs);
        }
        report::report_programs(&programs);
        return Ok(());
    }

    if args.shows_only {
        let shows = client
            .search_shows(&args.term, options)
            .await
            .context("TVSS search request failed")?;
        if globals.json {
            return report::report_json(&shows);
        }
        report::report_shows(&shows);
        return Ok(());
    }

    let results = client
        .search(&args.term, options)
        .await
        .context("TVSS search request failed")?;
    if globals.json {
        return report::report_json(&results);
    }
    report::report_search(&results);
    Ok(())
}

/// Runs the `channels` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_channels(args: &ChannelsArgs, globals: &Globals<'_>) -> Result<()> {
    let client = build_tvss_client(globals)?;

    let headends = client
        .get_channels(args.zip.as_deref())
        .await
        .context("TVSS channels request failed")?;

    if globals.json {
        return report::report_json(&headends);
    }
    report::report_headends(&headends);
    Ok(())
}

/// Runs the `feeds` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_feeds(args: &FeedsArgs, globals: &Globals<'_>) -> Result<()> {
    let client = build_tvss_client(globals)?;

    if args.by_short_name {
        let feeds = get_feeds_by_short_name(&client)
            .await
            .context("TVSS feeds request failed")?;
        if globals.json {
            return report::report_json(&feeds);
        }
        report::report_feed_index(&feeds);
        return Ok(());
    }

    let feeds = client
        .get_feeds()
        .await
        .context("TVSS feeds request failed")?;
    if globals.json {
        return report::report_json(&feeds);
    }
    report::report_feeds(&feeds);
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be resolved or loaded.
#[instrument(skip_all)]
fn run_config_show(globals: &Globals<'_>) -> Result<()> {
    let config_path = resolve_config_path(globals.dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    if globals.json {
        return report::report_json(&config);
    }
    report::report_config(&config_path, &config);
    Ok(())
}

/// Runs the `config set` subcommand.
///
/// # Errors
///
/// Returns an error if no value is given, the base URL is invalid,
/// or the config cannot be loaded or saved.
#[instrument(skip_all)]
fn run_config_set(args: &ConfigSetArgs, globals: &Globals<'_>) -> Result<()> {
    if args.call_sign.is_none() && args.base_url.is_none() && args.timeout_secs.is_none() {
        bail!("nothing to set: pass --station-call-sign, --base-url, or --timeout-secs");
    }

    let config_path = resolve_config_path(globals.dir).context("failed to resolve config path")?;
    let mut config = AppConfig::load(&config_path).context("failed to load config")?;

    if let Some(ref call_sign) = args.call_sign {
        config.station.call_sign = Some(call_sign.trim().to_owned()).filter(|c| !c.is_empty());
    }
    if let Some(ref base_url) = args.base_url {
        config.api.base_url = Some(base_url.clone());
        config.base_url().context("refusing to save an invalid base URL")?;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.api.timeout_secs = Some(timeout_secs);
    }

    config.save(&config_path).context("failed to save config")?;
    tracing::info!("Saved {}", config_path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let globals = Globals {
        dir: cli.dir.as_ref(),
        call_sign: cli.call_sign.as_deref(),
        json: cli.json,
    };
    match cli.command {
        Commands::Listings(ref args) => run_listings(args, &globals).await,
        Commands::Today(ref args) => run_today(args, &globals).await,
        Commands::Show(ref args) => run_show(args, &globals).await,
        Commands::Program(ref args) => run_program(args, &globals).await,
        Commands::Programs => run_programs(&globals).await,
        Commands::Search(ref args) => run_search(args, &globals).await,
        Commands::Channels(ref args) => run_channels(args, &globals).await,
        Commands::Feeds(ref args) => run_feeds(args, &globals).await,
        Commands::Config(ref cmd) => match cmd.command {
            ConfigSubcommands::Show => run_config_show(&globals),
            ConfigSubcommands::Set(ref args) => run_config_set(args, &globals),
        },
    }
}
