use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Placeholder rendered for any record field the backend left empty.
pub const PLACEHOLDER: &str = "N/A";

/// Label for a record whose timestamp cell was blank or unreadable.
pub const UNKNOWN_TIMESTAMP_LABEL: &str = "Unknown date";

/// en-US "medium" date with "short" time, e.g. `Jan 1, 1970, 12:00 AM`.
const TIMESTAMP_LABEL_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

/// Creation time assigned by the backend, in milliseconds since the Unix epoch.
///
/// Spreadsheet-backed endpoints sometimes serialize the cell as text, so the
/// wire form accepts either a JSON number or a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EpochMillis(pub i64);

impl EpochMillis {
    pub fn to_utc(self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }

    /// Selector label in the given time zone.
    pub fn label_in<Tz>(self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        match self.to_utc() {
            Some(utc) => utc
                .with_timezone(tz)
                .format(TIMESTAMP_LABEL_FORMAT)
                .to_string(),
            None => format!("{} ms", self.0),
        }
    }

    /// Selector label in the local time zone.
    pub fn local_label(self) -> String {
        self.label_in(&Local)
    }
}

/// Any JSON value a timestamp cell may hold.
#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampWire {
    Int(i64),
    Float(f64),
    Text(String),
    Other(de::IgnoredAny),
}

impl TimestampWire {
    fn into_millis(self) -> Result<EpochMillis, String> {
        match self {
            Self::Int(value) => Ok(EpochMillis(value)),
            Self::Float(value) if value.is_finite() => Ok(EpochMillis(value.trunc() as i64)),
            Self::Float(value) => Err(format!("timestamp is not a finite number: {value}")),
            Self::Text(text) => text
                .trim()
                .parse::<i64>()
                .map(EpochMillis)
                .map_err(|err| format!("invalid timestamp '{text}': {err}")),
            Self::Other(_) => Err("timestamp must be a number or numeric string".to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for EpochMillis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        TimestampWire::deserialize(deserializer)?
            .into_millis()
            .map_err(de::Error::custom)
    }
}

/// Record timestamps come straight from a spreadsheet cell: blank, null or
/// unreadable values decode as `None` instead of failing the whole response.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<EpochMillis>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(TimestampWire::deserialize(deserializer)?.into_millis().ok())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRecord {
    #[serde(default)]
    pub survey_url: String,
    #[serde(default)]
    pub target_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_details: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<EpochMillis>,
}

impl SurveyRecord {
    pub fn bypass_link(&self) -> Option<&str> {
        present(self.bypass_link.as_deref())
    }

    pub fn additional_details(&self) -> Option<&str> {
        present(self.additional_details.as_deref())
    }

    pub fn target_group(&self) -> Option<&str> {
        present(Some(self.target_group.as_str()))
    }
}

/// Local-time label, or [`UNKNOWN_TIMESTAMP_LABEL`] when the record has none.
pub fn timestamp_label(timestamp: Option<EpochMillis>) -> String {
    timestamp.map_or_else(|| UNKNOWN_TIMESTAMP_LABEL.to_string(), EpochMillis::local_label)
}

/// Empty strings and the placeholder literal both count as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != PLACEHOLDER)
}
