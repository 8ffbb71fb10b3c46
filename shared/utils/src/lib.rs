//! Small shared helpers: pagination, date formatting, lenient JSON,
//! UUID handling, schema validation and tracing setup.

use chrono::{DateTime, Datelike, TimeZone};
use serde_json::Value;

pub mod telemetry;
pub mod uuid;
pub mod validate;

pub use telemetry::{init_tracing, LogFormat};
pub use validate::validate;

/// Offsets for a page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Total number of pages
    pub page_count: u64,
    /// Row offset of the requested page
    pub offset: u64,
}

/// Computes page count and row offset for classic offset pagination
///
/// Pages are 1-based; page 0 and page 1 both start at offset 0. A zero
/// `per_page` is treated as 1 rather than dividing by zero.
#[must_use]
pub fn paginate(total_count: u64, current_page: u64, per_page: u64) -> Pagination {
    let per_page = per_page.max(1);

    Pagination {
        page_count: total_count.div_ceil(per_page),
        offset: if current_page > 1 {
            (current_page - 1) * per_page
        } else {
            0
        },
    }
}

/// Formats a date as `dd/mm/yyyy`
#[must_use]
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    format!(
        "{:02}/{:02}/{}",
        date.day(),
        date.month(),
        date.year()
    )
}

/// Parses JSON, falling back to a string value for non-JSON input
///
/// Mirrors what permissive clients do with response bodies: structured
/// data when possible, the raw text otherwise.
#[must_use]
pub fn parse_json_lenient(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}
