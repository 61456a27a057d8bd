//! Human-readable number, date and URL formatting helpers.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};

/// Placeholder for values the backend didn't provide.
pub const MISSING: &str = "—";

/// Group digits in thousands: `1234567` → `"1,234,567"`.
pub fn fmt_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Creation timestamp for tables, e.g. `"12 Mar 2024, 14:05"`.
pub fn fmt_datetime(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || MISSING.to_owned(),
        |t| t.format("%-d %b %Y, %H:%M").to_string(),
    )
}

/// Chart axis date, e.g. `"12 Mar"`.
pub fn fmt_day(date: NaiveDate) -> String {
    date.format("%-d %b").to_string()
}

/// Cut `s` to at most `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_owned();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push_str("...");
    out
}

/// Month-over-month change badge, e.g. `"+12%"` / `"-2%"`.
pub fn fmt_change(pct: i8) -> String {
    if pct > 0 {
        format!("+{pct}%")
    } else {
        format!("{pct}%")
    }
}

/// Compact age for the header, e.g. `"updated 42s ago"`.
pub fn fmt_age(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now
        .signed_duration_since(updated_at)
        .num_seconds()
        .max(0)
        .unsigned_abs();
    format!(
        "updated {} ago",
        humantime::format_duration(Duration::from_secs(secs))
    )
}
