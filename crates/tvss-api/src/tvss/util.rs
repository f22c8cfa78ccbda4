//! TVSS API utility functions.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::instrument;

use super::api::LocalTvssApi;
use super::error::{Result, TvssError};
use super::params::{ListingsOptions, format_listing_date};
use super::types::Feed;

/// Maximum number of days fetched by [`get_listings_range`].
const MAX_RANGE_DAYS: i64 = 31;

/// Keys feeds by `short_name`.
///
/// If two feeds share a short name, the first one is kept.
#[must_use]
pub fn index_feeds_by_short_name(feeds: Vec<Feed>) -> BTreeMap<String, Feed> {
    let mut indexed = BTreeMap::new();
    for feed in feeds {
        if indexed.contains_key(&feed.short_name) {
            tracing::warn!(short_name = %feed.short_name, "duplicate feed short name, skipped");
            continue;
        }
        indexed.insert(feed.short_name.clone(), feed);
    }
    indexed
}

/// Fetches the station's feeds (without listings) keyed by `short_name`.
///
/// # Errors
///
/// Returns any error from [`LocalTvssApi::get_feeds`].
#[instrument(skip_all)]
pub async fn get_feeds_by_short_name(
    api: &(impl LocalTvssApi + Sync),
) -> Result<BTreeMap<String, Feed>> {
    let feeds = api.get_feeds().await?;
    tracing::debug!(count = feeds.len(), "feeds fetched");
    Ok(index_feeds_by_short_name(feeds))
}

/// Fetches listings for every day from `start` to `end` (inclusive), one
/// request per day, in date order.
///
/// Stops at the first failing day.
///
/// # Errors
///
/// Returns `TvssError::InvalidArgument` if `end` is before `start` or the range
/// spans more than 31 days, or any error from [`LocalTvssApi::get_listings`].
#[instrument(skip_all)]
pub async fn get_listings_range(
    api: &(impl LocalTvssApi + Sync),
    start: NaiveDate,
    end: NaiveDate,
    options: ListingsOptions,
) -> Result<Vec<(NaiveDate, Vec<Feed>)>> {
    let span = end.signed_duration_since(start).num_days();
    if span < 0 {
        return Err(TvssError::InvalidArgument(format!(
            "listing range ends before it starts: {start} > {end}"
        )));
    }
    if span >= MAX_RANGE_DAYS {
        return Err(TvssError::InvalidArgument(format!(
            "listing range spans {} days (max {MAX_RANGE_DAYS})",
            span.saturating_add(1)
        )));
    }

    let mut days = Vec::new();
    for date in start.iter_days().take_while(|d| *d <= end) {
        let feeds = api.get_listings(date, options).await?;
        tracing::debug!(
            date = %format_listing_date(date),
            feeds = feeds.len(),
            "listings day completed"
        );
        days.push((date, feeds));
    }

    tracing::info!(days = days.len(), "listings range completed");
    Ok(days)
}
