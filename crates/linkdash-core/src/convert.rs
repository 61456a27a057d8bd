// ── API-to-domain type conversions ──
//
// Bridges raw `linkdash_api` records into `linkdash_core::model` types.
// Backends are loose about types, so every field is coerced here once and
// the rest of the crate works with clean values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use linkdash_api::models::{ClickRecord, LinkRecord};

use crate::model::{ClickData, ShortLink};

// ── Helpers ────────────────────────────────────────────────────────

/// Coerce a JSON click counter. Anything that is not a finite,
/// non-negative number counts as zero; fractions truncate.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn coerce_clicks(raw: &Value) -> u64 {
    let Value::Number(n) = raw else {
        return 0;
    };
    if let Some(v) = n.as_u64() {
        return v;
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 => f.trunc() as u64,
        _ => 0,
    }
}

/// Parse a timestamp as RFC 3339, a naive datetime (UTC), a bare date
/// (midnight UTC), or an all-digit epoch in milliseconds.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn string_tags(raw: Value) -> Vec<String> {
    match raw {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

// ── Link ───────────────────────────────────────────────────────────

impl From<LinkRecord> for ShortLink {
    fn from(r: LinkRecord) -> Self {
        Self {
            clicks: coerce_clicks(&r.clicks),
            is_active: matches!(r.is_active, Value::Bool(true)),
            created_at: r.created_at.as_deref().and_then(parse_timestamp),
            tags: string_tags(r.tags),
            id: r.id,
            original_url: r.original_url,
            short_code: r.short_code,
            short_url: r.short_url,
            title: r.title,
            description: r.description,
        }
    }
}

// ── Click ──────────────────────────────────────────────────────────

impl From<ClickRecord> for ClickData {
    fn from(r: ClickRecord) -> Self {
        Self {
            timestamp: r.timestamp.as_deref().and_then(parse_timestamp),
            id: r.id,
            link_id: r.link_id,
            ip_address: r.ip_address,
            user_agent: r.user_agent,
            country: r.country,
            city: r.city,
            referrer: r.referrer,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn record(body: Value) -> ShortLink {
        let record: LinkRecord = serde_json::from_value(body).unwrap();
        ShortLink::from(record)
    }

    #[test]
    fn non_numeric_clicks_are_zero() {
        assert_eq!(record(json!({ "clicks": "12" })).clicks, 0);
        assert_eq!(record(json!({ "clicks": null })).clicks, 0);
        assert_eq!(record(json!({})).clicks, 0);
        assert_eq!(record(json!({ "clicks": -4 })).clicks, 0);
    }

    #[test]
    fn fractional_clicks_truncate() {
        assert_eq!(record(json!({ "clicks": 7.9 })).clicks, 7);
        assert_eq!(record(json!({ "clicks": 42 })).clicks, 42);
    }

    #[test]
    fn only_literal_true_is_active() {
        assert!(record(json!({ "isActive": true })).is_active);
        assert!(!record(json!({ "isActive": 1 })).is_active);
        assert!(!record(json!({ "isActive": "true" })).is_active);
        assert!(!record(json!({})).is_active);
    }

    #[test]
    fn tags_keep_strings_only() {
        let link = record(json!({ "tags": ["news", 3, null, "tech"] }));
        assert_eq!(link.tags, vec!["news", "tech"]);
        assert!(record(json!({ "tags": "news" })).tags.is_empty());
    }

    #[test]
    fn timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-15T10:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15T12:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-15T10:30:00.000"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-15"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("1704067200000"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("99999999999999999999999"), None);
        assert_eq!(parse_timestamp("last tuesday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn full_record_maps_every_field() {
        let link = record(json!({
            "id": "1",
            "originalUrl": "https://example.com/article",
            "shortCode": "abc",
            "shortUrl": "https://sho.rt/abc",
            "title": "Article",
            "description": "Launch post",
            "createdAt": "2024-01-15T10:30:00Z",
            "clicks": 120,
            "isActive": true,
            "tags": ["launch"]
        }));
        assert_eq!(link.id, "1");
        assert_eq!(link.original_url, "https://example.com/article");
        assert_eq!(link.short_code, "abc");
        assert_eq!(link.short_url, "https://sho.rt/abc");
        assert_eq!(link.description.as_deref(), Some("Launch post"));
        assert_eq!(link.clicks, 120);
        assert!(link.is_active);
        assert!(link.created_at.is_some());
    }

    #[test]
    fn loose_description_and_epoch_created_at() {
        let link = record(json!({
            "description": 42,
            "createdAt": 1_704_067_200_000_u64
        }));
        assert_eq!(link.description, None);
        assert_eq!(
            link.created_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(record(json!({ "createdAt": true })).created_at, None);
    }

    #[test]
    fn click_record_timestamp_is_parsed() {
        let click = ClickData::from(ClickRecord {
            id: "c1".into(),
            link_id: "1".into(),
            timestamp: Some("2024-01-15T10:30:00Z".into()),
            ..ClickRecord::default()
        });
        assert!(click.timestamp.is_some());
        assert_eq!(click.link_id, "1");
    }
}
