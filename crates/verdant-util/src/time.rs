//! Time utilities for verdant
//!
//! Wall-clock reads go through [`now`]. The label helpers cover the
//! display formats used in receipts, export headers, and filenames.

use chrono::{DateTime, Local};

/// Current local time.
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Short display date, e.g. `Aug 23, 2026`.
pub fn date_label(dt: &DateTime<Local>) -> String {
    dt.format("%b %-d, %Y").to_string()
}

/// 12-hour display time, e.g. `04:12 PM`.
pub fn time_label(dt: &DateTime<Local>) -> String {
    dt.format("%I:%M %p").to_string()
}

/// Full timestamp for export headers, e.g. `2026-08-23 16:12:33`.
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Date tag for export filenames, e.g. `2026-08-23`.
pub fn date_tag(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d").to_string()
}
