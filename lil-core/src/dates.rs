// lil-core/src/dates.rs
use chrono::{DateTime, NaiveDate, Utc};
use lil_common::model::Issue;
use tracing::warn;

/// Sort position for items without a usable date: after everything else.
pub const DISTANT_FUTURE: DateTime<Utc> = DateTime::<Utc>::MAX_UTC;

/// Parses Linear timestamps (RFC 3339) and plain `YYYY-MM-DD` dates.
/// Empty or unparsable input yields `None`.
pub fn parse_linear_date(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
        Err(e) => {
            warn!("Could not parse date '{}': {}", raw, e);
            None
        }
    }
}

/// Due date when it parses, otherwise creation date.
pub fn effective_date(issue: &Issue) -> Option<DateTime<Utc>> {
    issue
        .due_date()
        .and_then(parse_linear_date)
        .or_else(|| issue.created_at().and_then(parse_linear_date))
}

pub fn sort_key(date: Option<DateTime<Utc>>) -> DateTime<Utc> {
    date.unwrap_or(DISTANT_FUTURE)
}

/// `Jun 1, 2023` style.
pub fn format_short(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}
