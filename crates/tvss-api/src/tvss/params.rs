//! TVSS request option types.

use chrono::NaiveDate;

use super::error::{Result, TvssError};

/// Date format used in `day/<date>` paths.
const LISTING_DATE_FORMAT: &str = "%Y%m%d";

/// Options for the listings endpoints (`day/<date>` and `today`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingsOptions {
    /// Restrict results to kids listings (`/kids` suffix).
    pub kids_only: bool,
    /// Ask the service to include images (`fetch-images=true`).
    pub fetch_images: bool,
}

impl ListingsOptions {
    /// Returns options with `kids_only` set.
    #[must_use]
    pub const fn kids_only() -> Self {
        Self {
            kids_only: true,
            fetch_images: false,
        }
    }

    /// Sets `fetch_images`.
    #[must_use]
    pub const fn with_images(mut self, fetch_images: bool) -> Self {
        self.fetch_images = fetch_images;
        self
    }
}

/// Options for the search endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Scope the search to the configured station (default: `true`).
    pub include_call_sign: bool,
    /// Use the kids-only search endpoint (`search-kids`).
    pub kids_only: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            include_call_sign: true,
            kids_only: false,
        }
    }
}

impl SearchOptions {
    /// Sets whether the call sign scopes the search.
    #[must_use]
    pub const fn include_call_sign(mut self, include: bool) -> Self {
        self.include_call_sign = include;
        self
    }

    /// Sets whether only kids content is searched.
    #[must_use]
    pub const fn kids_only(mut self, kids_only: bool) -> Self {
        self.kids_only = kids_only;
        self
    }

    /// Rejects combinations the service cannot serve.
    ///
    /// The service has no anonymous kids-only search.
    ///
    /// # Errors
    ///
    /// Returns `TvssError::InvalidArgument` for a kids-only search without the call sign.
    pub fn validate(&self) -> Result<()> {
        if self.kids_only && !self.include_call_sign {
            return Err(TvssError::InvalidArgument(String::from(
                "call sign must be included for kids only search",
            )));
        }
        Ok(())
    }
}

/// Formats a date for the `day/<date>` path.
#[must_use]
pub fn format_listing_date(date: NaiveDate) -> String {
    date.format(LISTING_DATE_FORMAT).to_string()
}

/// Parses a listing date.
///
/// Accepts: `%Y%m%d` (`20190704`) and `%Y-%m-%d` (`2019-07-04`).
///
/// # Errors
///
/// Returns `TvssError::InvalidArgument` if the string matches neither format.
pub fn parse_listing_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, LISTING_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|e| TvssError::InvalidArgument(format!("invalid listing date {s:?}: {e}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_search_options_default_includes_call_sign() {
        // Arrange & Act
        let options = SearchOptions::default();

        // Assert
        assert!(options.include_call_sign);
        assert!(!options.kids_only);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_kids_only_without_call_sign_is_invalid() {
        // Arrange
        let options = SearchOptions::default()
            .include_call_sign(false)
            .kids_only(true);

        // Act
        let result = options.validate();

        // Assert
        assert!(matches!(result, Err(TvssError::InvalidArgument(_))));
    }

    #[test]
    fn test_kids_only_with_call_sign_is_valid() {
        // Arrange & Act & Assert
        assert!(SearchOptions::default().kids_only(true).validate().is_ok());
    }

    #[test]
    fn test_format_listing_date() {
        // Arrange
        let date = NaiveDate::from_ymd_opt(2019, 7, 4).unwrap();

        // Act & Assert
        assert_eq!(format_listing_date(date), "20190704");
    }

    #[test]
    fn test_parse_listing_date_compact() {
        // Arrange & Act
        let date = parse_listing_date("20190704").unwrap();

        // Assert
        assert_eq!(date, NaiveDate::from_ymd_opt(2019, 7, 4).unwrap());
    }

    #[test]
    fn test_parse_listing_date_dashed() {
        // Arrange & Act
        let date = parse_listing_date("2019-07-04").unwrap();

        // Assert
        assert_eq!(date, NaiveDate::from_ymd_opt(2019, 7, 4).unwrap());
    }

    #[test]
    fn test_parse_listing_date_invalid() {
        // Arrange & Act
        let result = parse_listing_date("07/04/2019");

        // Assert
        assert!(matches!(result, Err(TvssError::InvalidArgument(_))));
    }

    #[test]
    fn test_listings_options_builders() {
        // Arrange & Act
        let options = ListingsOptions::kids_only().with_images(true);

        // Assert
        assert!(options.kids_only);
        assert!(options.fetch_images);
        assert!(!ListingsOptions::default().kids_only);
    }
}
