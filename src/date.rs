//! Parses the `date` strings found in article front matter into comparable
//! instants. Authors write dates in whatever form they like (`2023-06-15`,
//! `June 15, 2023`, a full RFC 3339 timestamp, ...), so ordering has to
//! happen on the parsed value rather than on the raw string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Offset-aware layouts that RFC 3339 rejects, such as a space before the
/// offset or an offset without a colon.
const OFFSET_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Naive date-time layouts, tried after the offset-aware formats.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts. These resolve to midnight UTC.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

/// Parses `input` into a UTC instant. Offset-aware inputs are converted to
/// UTC; naive inputs are taken to already be in UTC.
pub fn parse(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(Utc.from_utc_datetime(&midnight));
            }
        }
    }

    Err(Error::Unrecognized(input.to_owned()))
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a `date` value that couldn't be turned into an instant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the front matter has no `date` key at all.
    #[error("missing `date`")]
    Missing,

    /// Returned when the `date` value is blank.
    #[error("`date` is empty")]
    Empty,

    /// Returned when the `date` value matches none of the known formats.
    #[error("unrecognized date `{0}`")]
    Unrecognized(String),
}
