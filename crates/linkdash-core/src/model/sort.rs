// ── Links table ordering ──
//
// Sort state for the links table and the comparator that applies it.
// Sorting always produces a new sequence; the source slice is untouched.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::link::ShortLink;

/// Column the links table can be sorted by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum SortField {
    Title,
    #[strum(to_string = "Short URL")]
    ShortUrl,
    Clicks,
    #[strum(to_string = "Created")]
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Arrow glyph for column headers.
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

/// Current table ordering. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for LinkSort {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl LinkSort {
    /// Select a column: the active column flips direction, a new column
    /// starts descending.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Desc,
            }
        }
    }

    /// Ordering of two links under this sort.
    pub fn compare(&self, a: &ShortLink, b: &ShortLink) -> Ordering {
        let ord = match self.field {
            SortField::Title => compare_text(&a.title, &b.title),
            SortField::ShortUrl => compare_text(&a.short_url, &b.short_url),
            SortField::Clicks => a.clicks.cmp(&b.clicks),
            // `None < Some`, so undated links lead an ascending sort.
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }

    /// Return a sorted copy of `links`. Stable on ties.
    pub fn apply(&self, links: &[ShortLink]) -> Vec<ShortLink> {
        let mut sorted = links.to_vec();
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }
}

/// Case-insensitive comparison with a byte-wise tiebreak so the order is total.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
