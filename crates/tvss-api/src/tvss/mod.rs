//! TV Schedules Service API client module.
//!
//! Sends authenticated, call-sign-scoped GET requests to the TVSS REST API
//! and decodes listings, upcoming airings, search results, and headends.

mod api;
mod client;
mod error;
mod params;
mod request;
mod types;
mod util;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTvssApi, TvssApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TVSS_BASE_URL, TvssClient, TvssClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::{Result, TvssError};
pub use params::{ListingsOptions, SearchOptions, format_listing_date, parse_listing_date};
pub use request::ApiRequest;
pub use types::{
    Feed, Headend, Listing, Program, ProgramUpcoming, ResourceId, SearchResults, Show,
    ShowUpcoming,
};
pub use util::{get_feeds_by_short_name, get_listings_range, index_feeds_by_short_name};
