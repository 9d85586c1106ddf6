//! HTTP cache validators: Cache-Control directives, Last-Modified and ETag

pub mod etag;
pub mod last_modified;

use axum::http::HeaderValue;
use chrono::{DateTime, NaiveDateTime, Utc};

pub use etag::EntityTag;
pub use last_modified::{LastModifiedRegistry, Resource};

/// Cache-Control for book collections
pub const COLLECTION_POLICY: &str = "public, max-age=60";
/// Cache-Control for a single book validated by Last-Modified
pub const ITEM_REVALIDATE_POLICY: &str = "public, max-age=120, must-revalidate";
/// Cache-Control for a single book validated by ETag
pub const ITEM_POLICY: &str = "public, max-age=120";
/// Cache-Control for mutations and errors
pub const NO_CACHE: &str = "no-cache";

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE).to_string()
}

pub fn parse_http_date(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), HTTP_DATE)
        .ok()
        .map(|naive| naive.and_utc())
}

/// `If-Modified-Since` check at whole-second precision.
///
/// An absent or unparsable header never short-circuits.
pub fn not_modified_since(last_modified: DateTime<Utc>, header: Option<&HeaderValue>) -> bool {
    header
        .and_then(|h| h.to_str().ok())
        .and_then(parse_http_date)
        .is_some_and(|since| last_modified.timestamp() <= since.timestamp())
}
