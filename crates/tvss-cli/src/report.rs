//! Result reporting through `tracing`.
//!
//! Every command reports either tab-separated rows or pretty JSON.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tvss_api::tvss::{Feed, Headend, Program, ProgramUpcoming, SearchResults, Show, ShowUpcoming};

use crate::config::AppConfig;

/// Placeholder for absent values.
const DASH: &str = "-";

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or(DASH)
}

fn id_or_dash(id: Option<&impl ToString>) -> String {
    id.map_or_else(|| String::from(DASH), ToString::to_string)
}

/// Reads a string field from an untyped upcoming entry.
fn entry_str<'a>(entry: &'a Value, key: &str) -> &'a str {
    entry.get(key).and_then(Value::as_str).unwrap_or(DASH)
}

/// Reads the feed short name nested in an upcoming entry.
fn entry_feed(entry: &Value) -> &str {
    entry
        .get("feed")
        .and_then(|f| f.get("short_name"))
        .and_then(Value::as_str)
        .unwrap_or(DASH)
}

/// Reports any serializable value as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn report_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize result")?;
    tracing::info!("{}", json);
    Ok(())
}

/// Reports feeds without their listings.
pub fn report_feeds(feeds: &[Feed]) {
    tracing::info!("ShortName\tChannel\tTimezone\tFullName");
    for feed in feeds {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            feed.short_name,
            or_dash(feed.digital_channel().as_deref()),
            or_dash(feed.timezone()),
            or_dash(feed.full_name()),
        );
    }
    tracing::info!("Total: {} feeds", feeds.len());
}

/// Reports feeds keyed by short name.
pub fn report_feed_index(feeds: &BTreeMap<String, Feed>) {
    for (short_name, feed) in feeds {
        tracing::info!("{}\t{}", short_name, or_dash(feed.full_name()));
    }
    tracing::info!("Total: {} feeds", feeds.len());
}

/// Reports each feed followed by its listings.
pub fn report_listings(feeds: &[Feed]) {
    let mut total: usize = 0;
    for feed in feeds {
        let listings = feed.listings();
        tracing::info!(
            "{} ({}): {} listings",
            feed.short_name,
            or_dash(feed.full_name()),
            listings.len()
        );
        for listing in listings {
            tracing::info!(
                "  {}\t{}\t{}",
                or_dash(listing.start_time()),
                or_dash(listing.title()),
                or_dash(listing.episode_title()),
            );
        }
        total = total.saturating_add(listings.len());
    }
    tracing::info!("Total: {} listings in {} feeds", total, feeds.len());
}

/// Reports upcoming airings of a show.
pub fn report_show_upcoming(show: &ShowUpcoming) {
    tracing::info!("Show: {}", show.show_id);
    tracing::info!("Day\t\tStart\tFeed");
    for entry in show.upcoming_shows() {
        tracing::info!(
            "{}\t{}\t{}",
            entry_str(entry, "day"),
            entry_str(entry, "start_time"),
            entry_feed(entry),
        );
    }
    tracing::info!("Total: {} upcoming airings", show.upcoming_shows().len());
}

/// Reports upcoming episodes of a program.
pub fn report_program_upcoming(program: &ProgramUpcoming) {
    tracing::info!("Program: {}", program.program_id);
    tracing::info!("Day\t\tStart\tFeed\tEpisode");
    for entry in program.upcoming_episodes() {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            entry_str(entry, "day"),
            entry_str(entry, "start_time"),
            entry_feed(entry),
            entry_str(entry, "episode_title"),
        );
    }
    tracing::info!(
        "Total: {} upcoming episodes",
        program.upcoming_episodes().len()
    );
}

/// Reports programs.
pub fn report_programs(programs: &[Program]) {
    tracing::info!("ProgramID\tTitle");
    for program in programs {
        tracing::info!(
            "{}\t\t{}",
            id_or_dash(program.program_id().as_ref()),
            or_dash(program.title()),
        );
    }
    tracing::info!("Total: {} programs", programs.len());
}

/// Reports shows.
pub fn report_shows(shows: &[Show]) {
    tracing::info!("ShowID\t\tTitle\tEpisode");
    for show in shows {
        tracing::info!(
            "{}\t{}\t{}",
            id_or_dash(show.show_id().as_ref()),
            or_dash(show.title()),
            or_dash(show.episode_title()),
        );
    }
    tracing::info!("Total: {} shows", shows.len());
}

/// Reports both halves of a search result.
pub fn report_search(results: &SearchResults) {
    report_programs(&results.program_results);
    report_shows(&results.show_results);
}

/// Reports headends and the number of station feeds each carries.
pub fn report_headends(headends: &[Headend]) {
    tracing::info!("Feeds\tName");
    for headend in headends {
        tracing::info!(
            "{}\t{}",
            headend.feeds().len(),
            or_dash(headend.name())
        );
    }
    tracing::info!("Total: {} headends", headends.len());
}

/// Reports the resolved config file.
pub fn report_config(path: &Path, config: &AppConfig) {
    tracing::info!("Config: {}", path.display());
    tracing::info!(
        "station.call_sign = {}",
        or_dash(config.station.call_sign.as_deref())
    );
    tracing::info!("api.base_url = {}", or_dash(config.api.base_url.as_deref()));
    tracing::info!(
        "api.timeout_secs = {}",
        id_or_dash(config.api.timeout_secs.as_ref())
    );
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use serde_json::{Map, json};
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};
    use tvss_api::tvss::{Listing, ResourceId};

    use super::*;

    /// Converts a `json!` object literal into a field map.
    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected a JSON object, got {other}"),
        }
    }

    fn make_feed(short_name: &str, listings: Option<Vec<Listing>>) -> Feed {
        Feed {
            short_name: String::from(short_name),
            listings: listings.map(Some),
            extra: object(json!({
                "full_name": "KCTS 9 HD",
                "timezone": "America/Los_Angeles",
                "digital_channel": 9.1
            })),
        }
    }

    fn make_listing(start_time: &str, title: &str) -> Listing {
        Listing {
            fields: object(json!({
                "start_time": start_time,
                "title": title,
                "episode_title": null
            })),
        }
    }

    #[test]
    fn test_report_feeds() {
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg("ShortName\tChannel\tTimezone\tFullName")))
            .event(expect::event().with_fields(expect::msg(
                "KCTSDT\t9.1\tAmerica/Los_Angeles\tKCTS 9 HD",
            )))
            .event(expect::event().with_fields(expect::msg("Total: 1 feeds")))
            .only()
            .run_with_handle();

        with_default(subscriber, || {
            report_feeds(&[make_feed("KCTSDT", None)]);
        });

        handle.assert_finished();
    }

    #[test]
    fn test_report_listings() {
        let feeds = vec![
            make_feed("KCTSDT", Some(vec![make_listing("2000", "Nature")])),
            make_feed("KCTSDT2", None),
        ];
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg("KCTSDT (KCTS 9 HD): 1 listings")))
            .event(expect::event().with_fields(expect::msg("  2000\tNature\t-")))
            .event(expect::event().with_fields(expect::msg("KCTSDT2 (KCTS 9 HD): 0 listings")))
            .event(expect::event().with_fields(expect::msg("Total: 1 listings in 2 feeds")))
            .only()
            .run_with_handle();

        with_default(subscriber, || {
            report_listings(&feeds);
        });

        handle.assert_finished();
    }

    #[test]
    fn test_report_program_upcoming() {
        let program = ProgramUpcoming {
            program_id: ResourceId::Number(7877),
            extra: object(json!({
                "upcoming_episodes": [{
                    "day": "20190704",
                    "start_time": "2000",
                    "episode_title": "Sea Otters",
                    "feed": {"short_name": "KCTSDT"}
                }]
            })),
        };
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg("Program: 7877")))
            .event(expect::event().with_fields(expect::msg("Day\t\tStart\tFeed\tEpisode")))
            .event(expect::event().with_fields(expect::msg("20190704\t2000\tKCTSDT\tSea Otters")))
            .event(expect::event().with_fields(expect::msg("Total: 1 upcoming episodes")))
            .only()
            .run_with_handle();

        with_default(subscriber, || {
            report_program_upcoming(&program);
        });

        handle.assert_finished();
    }

    #[test]
    fn test_report_headends_counts_feeds() {
        let headends = vec![Headend {
            fields: object(json!({
                "name": "DISH Seattle",
                "feeds": [{"short_name": "KCTSDT"}, {}]
            })),
        }];
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg("Feeds\tName")))
            .event(expect::event().with_fields(expect::msg("2\tDISH Seattle")))
            .event(expect::event().with_fields(expect::msg("Total: 1 headends")))
            .only()
            .run_with_handle();

        with_default(subscriber, || {
            report_headends(&headends);
        });

        handle.assert_finished();
    }

    #[test]
    fn test_report_json() {
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg("{\n  \"name\": \"DISH Seattle\"\n}")))
            .only()
            .run_with_handle();

        with_default(subscriber, || {
            report_json(&json!({"name": "DISH Seattle"})).unwrap();
        });

        handle.assert_finished();
    }

    #[test]
    fn test_report_config_defaults() {
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg("Config: /tmp/tvss/config.toml")))
            .event(expect::event().with_fields(expect::msg("station.call_sign = -")))
            .event(expect::event().with_fields(expect::msg("api.base_url = -")))
            .event(expect::event().with_fields(expect::msg("api.timeout_secs = -")))
            .only()
            .run_with_handle();

        with_default(subscriber, || {
            report_config(Path::new("/tmp/tvss/config.toml"), &AppConfig::default());
        });

        handle.assert_finished();
    }
}
