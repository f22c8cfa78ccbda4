//! `TvssApi` trait definition.
#![allow(clippy::future_not_send)]

use chrono::NaiveDate;

use super::error::Result;
use super::params::{ListingsOptions, SearchOptions};
use super::types::{Feed, Headend, Program, ProgramUpcoming, SearchResults, Show, ShowUpcoming};

/// TV Schedules Service API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
/// `TvssClient` implements the `Send` variant; every `TvssApi` type also gets
/// `LocalTvssApi` through the blanket impl.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TvssApi: Send)]
pub trait LocalTvssApi {
    /// Fetches the station's feeds with full listings for a day.
    ///
    /// # Errors
    ///
    /// Returns `CallSignRequired` without a call sign, or any request error.
    async fn get_listings(&self, date: NaiveDate, options: ListingsOptions) -> Result<Vec<Feed>>;

    /// Fetches today's feeds and listings (listings carry no description).
    ///
    /// # Errors
    ///
    /// Returns `CallSignRequired` without a call sign, or any request error.
    async fn get_today(&self, options: ListingsOptions) -> Result<Vec<Feed>>;

    /// Fetches upcoming airings of a show (episode).
    ///
    /// # Errors
    ///
    /// Returns `CallSignRequired` without a call sign, or any request error.
    async fn get_show(&self, show_id: &str) -> Result<ShowUpcoming>;

    /// Fetches upcoming episodes of a program.
    ///
    /// # Errors
    ///
    /// Returns `CallSignRequired` without a call sign, or any request error.
    async fn get_program(&self, program_id: &str) -> Result<ProgramUpcoming>;

    /// Fetches every program known to the service. The response is large.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    async fn get_programs(&self) -> Result<Vec<Program>>;

    /// Searches programs and shows by exact term.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty term or a kids-only search without
    /// the call sign, or any request error.
    async fn search(&self, term: &str, options: SearchOptions) -> Result<SearchResults>;

    /// Searches and returns only the matching programs.
    ///
    /// # Errors
    ///
    /// Same as [`LocalTvssApi::search`].
    async fn search_programs(&self, term: &str, options: SearchOptions) -> Result<Vec<Program>>;

    /// Searches and returns only the matching shows.
    ///
    /// # Errors
    ///
    /// Same as [`LocalTvssApi::search`].
    async fn search_shows(&self, term: &str, options: SearchOptions) -> Result<Vec<Show>>;

    /// Fetches headends carrying the station, optionally limited to a zip code.
    ///
    /// # Errors
    ///
    /// Returns `CallSignRequired` without a call sign, or any request error.
    async fn get_channels(&self, zip: Option<&str>) -> Result<Vec<Headend>>;

    /// Fetches the station's feeds without their listings.
    ///
    /// The service has no feeds endpoint; the data comes from `today`.
    ///
    /// # Errors
    ///
    /// Returns `CallSignRequired` without a call sign, or any request error.
    async fn get_feeds(&self) -> Result<Vec<Feed>>;
}
