use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::common::VideoRecord;
use crate::source::base::{GDataText, RawEntry};

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Entry {id:?} is missing field {field}")]
    MissingField { id: String, field: &'static str },

    #[error("Entry {id:?} has unparseable publish date {value:?}")]
    Date { id: String, value: String },

    #[error("Entry {id:?} has invalid view count {value:?}")]
    ViewCount { id: String, value: String },
}

/// Offset-less forms, taken as UTC
const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(input) {
        return Some(d.with_timezone(&Utc));
    }
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|nd| Utc.from_utc_datetime(&nd))
}

fn text(node: &Option<GDataText>) -> Option<&str> {
    node.as_ref().map(|t| t.text.as_str())
}

/// Turn one raw feed entry into a `VideoRecord`
pub fn parse_entry(entry: &RawEntry) -> Result<VideoRecord, ParseError> {
    let id = text(&entry.id).ok_or_else(|| ParseError::MissingField {
        id: "<unknown>".into(),
        field: "id",
    })?;
    let missing = |field| ParseError::MissingField {
        id: id.into(),
        field,
    };

    // Prefer the plain-text media title, as the Atom title may be HTML
    let media = entry.media_group.as_ref();
    let title = media
        .and_then(|m| text(&m.title))
        .or_else(|| text(&entry.title))
        .ok_or_else(|| missing("title"))?;
    let description = media.and_then(|m| text(&m.description)).unwrap_or("");

    let published = text(&entry.published).ok_or_else(|| missing("published"))?;
    let published_at = parse_date(published).ok_or_else(|| ParseError::Date {
        id: id.into(),
        value: published.into(),
    })?;

    let views = entry
        .statistics
        .as_ref()
        .and_then(|s| s.view_count.as_deref())
        .ok_or_else(|| missing("viewCount"))?;
    let view_count = views
        .trim()
        .parse::<u64>()
        .map_err(|_| ParseError::ViewCount {
            id: id.into(),
            value: views.into(),
        })?;

    Ok(VideoRecord {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        published_at,
        view_count,
    })
}
