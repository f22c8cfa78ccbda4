//! TVSS API response views.
//!
//! The service publishes no schema. Each view types only the fields the
//! client itself relies on and keeps every other field, `null` included, in
//! a JSON map, so serializing a view reproduces the object it was decoded
//! from. Descriptive fields are read through accessors that return `None`
//! when the field is absent, `null`, or of another type.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier that the service emits either as a string or as a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    /// Numeric id (e.g. `program_id: 7877`).
    Number(u64),
    /// Textual id (e.g. `show_id: "episode_57384"`).
    Text(String),
}

impl ResourceId {
    /// Reads an id from a JSON value, if it is a string or an unsigned integer.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq<&str> for ResourceId {
    fn eq(&self, other: &&str) -> bool {
        match self {
            Self::Number(n) => other.parse::<u64>().is_ok_and(|o| o == *n),
            Self::Text(s) => s == other,
        }
    }
}

fn str_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

fn id_field(fields: &Map<String, Value>, key: &str) -> Option<ResourceId> {
    fields.get(key).and_then(ResourceId::from_value)
}

fn list_field<'a>(fields: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    fields
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Keeps an absent field (`None`) apart from an explicit `null` (`Some(None)`).
mod nullable {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[allow(clippy::option_option, clippy::ref_option)]
    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match *value {
            Some(ref inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    #[allow(clippy::option_option)]
    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

// --- Listings / Today / Feeds ---

/// A broadcast feed (channel) of the station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    /// Short feed name (e.g. `KCTSDT4`).
    pub short_name: String,
    /// Scheduled airings: `None` when absent (the feeds view),
    /// `Some(None)` when the service sent `null`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "nullable"
    )]
    #[allow(clippy::option_option)]
    pub listings: Option<Option<Vec<Listing>>>,
    /// Remaining fields as returned by the service.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Feed {
    /// Scheduled airings, empty when absent or `null`.
    #[must_use]
    pub fn listings(&self) -> &[Listing] {
        self.listings
            .as_ref()
            .and_then(Option::as_deref)
            .unwrap_or_default()
    }

    /// Drops the listings so the feed serializes without the field.
    pub fn strip_listings(&mut self) {
        self.listings = None;
    }

    /// Content ID.
    #[must_use]
    pub fn cid(&self) -> Option<&str> {
        str_field(&self.extra, "cid")
    }

    /// Full feed name.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        str_field(&self.extra, "full_name")
    }

    /// IANA timezone of the feed schedule.
    #[must_use]
    pub fn timezone(&self) -> Option<&str> {
        str_field(&self.extra, "timezone")
    }

    /// Digital channel (e.g. `9.1`), sent as a string or a number.
    #[must_use]
    pub fn digital_channel(&self) -> Option<String> {
        match self.extra.get("digital_channel")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// A single scheduled airing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Listing {
    /// Fields as returned by the service.
    pub fields: Map<String, Value>,
}

impl Listing {
    /// Content ID.
    #[must_use]
    pub fn cid(&self) -> Option<&str> {
        str_field(&self.fields, "cid")
    }

    /// Show (episode) ID.
    #[must_use]
    pub fn show_id(&self) -> Option<ResourceId> {
        id_field(&self.fields, "show_id")
    }

    /// Program (series) ID.
    #[must_use]
    pub fn program_id(&self) -> Option<ResourceId> {
        id_field(&self.fields, "program_id")
    }

    /// Program title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        str_field(&self.fields, "title")
    }

    /// Episode title.
    #[must_use]
    pub fn episode_title(&self) -> Option<&str> {
        str_field(&self.fields, "episode_title")
    }

    /// Episode description (only sent on `day/<date>` listings).
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        str_field(&self.fields, "description")
    }

    /// Local start time (`HHMM`).
    #[must_use]
    pub fn start_time(&self) -> Option<&str> {
        str_field(&self.fields, "start_time")
    }
}

// --- Upcoming ---

/// Response from `upcoming/show/<show_id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowUpcoming {
    /// Show ID.
    pub show_id: ResourceId,
    /// Remaining fields as returned by the service.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ShowUpcoming {
    /// Content ID.
    #[must_use]
    pub fn cid(&self) -> Option<&str> {
        str_field(&self.extra, "cid")
    }

    /// Upcoming airings of the show, empty when absent or `null`.
    #[must_use]
    pub fn upcoming_shows(&self) -> &[Value] {
        list_field(&self.extra, "upcoming_shows")
    }
}

/// Response from `upcoming/program/<program_id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramUpcoming {
    /// Program ID.
    pub program_id: ResourceId,
    /// Remaining fields as returned by the service.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProgramUpcoming {
    /// Content ID.
    #[must_use]
    pub fn cid(&self) -> Option<&str> {
        str_field(&self.extra, "cid")
    }

    /// Upcoming episodes of the program, empty when absent or `null`.
    #[must_use]
    pub fn upcoming_episodes(&self) -> &[Value] {
        list_field(&self.extra, "upcoming_episodes")
    }
}

// --- Programs / Search ---

/// A program (series) entry from `programs` or search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program {
    /// Fields as returned by the service.
    pub fields: Map<String, Value>,
}

impl Program {
    /// Content ID.
    #[must_use]
    pub fn cid(&self) -> Option<&str> {
        str_field(&self.fields, "cid")
    }

    /// Program ID.
    #[must_use]
    pub fn program_id(&self) -> Option<ResourceId> {
        id_field(&self.fields, "program_id")
    }

    /// Program title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        str_field(&self.fields, "title")
    }
}

/// A show (episode) entry from search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Show {
    /// Fields as returned by the service.
    pub fields: Map<String, Value>,
}

impl Show {
    /// Content ID.
    #[must_use]
    pub fn cid(&self) -> Option<&str> {
        str_field(&self.fields, "cid")
    }

    /// Show ID.
    #[must_use]
    pub fn show_id(&self) -> Option<ResourceId> {
        id_field(&self.fields, "show_id")
    }

    /// Program title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        str_field(&self.fields, "title")
    }

    /// Episode title.
    #[must_use]
    pub fn episode_title(&self) -> Option<&str> {
        str_field(&self.fields, "episode_title")
    }
}

/// Response from `search/<term>` and `search-kids/<term>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching programs.
    pub program_results: Vec<Program>,
    /// Matching shows.
    pub show_results: Vec<Show>,
    /// Remaining fields as returned by the service.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// --- Channels ---

/// A cable/satellite system from `channels` or `channels/zip/<zip>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headend {
    /// Fields as returned by the service.
    pub fields: Map<String, Value>,
}

impl Headend {
    /// Content ID.
    #[must_use]
    pub fn cid(&self) -> Option<&str> {
        str_field(&self.fields, "cid")
    }

    /// Headend name (e.g. `DISH Seattle`).
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        str_field(&self.fields, "name")
    }

    /// Station feeds carried by the headend.
    #[must_use]
    pub fn feeds(&self) -> &[Value] {
        list_field(&self.fields, "feeds")
    }
}
