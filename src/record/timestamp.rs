//! Epoch-to-local timestamp formatting

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, TimeZone};

/// Default presentation format for completion times
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Whether `format` is a strftime string chrono can render
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Formats epoch seconds as local time.
///
/// Returns `None` for seconds outside chrono's representable range or a
/// format chrono cannot render.
pub fn format_local(epoch_secs: i64, format: &str) -> Option<String> {
    let dt = Local.timestamp_opt(epoch_secs, 0).single()?;
    let mut out = String::new();
    write!(out, "{}", dt.format(format)).ok()?;
    Some(out)
}
