use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

use crate::domain::PubDate;

/// Formats tried, in order, for text carrying an explicit offset.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"];

/// Formats for text without an offset; interpreted as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unrecognized publish date: {0:?}")]
pub struct DateParseError(pub String);

/// Resolve a publish date to UTC.
pub fn normalize(date: &PubDate) -> Result<DateTime<Utc>, DateParseError> {
    match date {
        PubDate::Timestamp(dt) => Ok(*dt),
        PubDate::Unix(secs) => {
            DateTime::<Utc>::from_timestamp(*secs, 0).ok_or_else(|| DateParseError(secs.to_string()))
        }
        PubDate::Text(text) => parse_text(text),
    }
}

/// RFC 822 form used by RSS, e.g. `Mon, 15 Jan 2024 10:30:00 +0000`.
pub fn format_rfc822(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S +0000").to_string()
}

/// `pubDate` text for a publish date, or `None` when it can't be read.
pub fn rfc822(date: &PubDate) -> Option<String> {
    match normalize(date) {
        Ok(dt) => Some(format_rfc822(&dt)),
        Err(e) => {
            tracing::debug!(error = %e, "Omitting pubDate");
            None
        }
    }
}

fn parse_text(text: &str) -> Result<DateTime<Utc>, DateParseError> {
    let s = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DateParseError(text.to_string()))
}
