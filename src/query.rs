//! Query parameters for a table view: filters, free-text search, sort, paging.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fmt::{FmtStyle, format_value};
use crate::record::{FieldValue, Record};

/// Sentinel meaning "no filter on this field".
pub const DEFAULT_ALL_SENTINEL: &str = "ALL";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    /// Highest first.
    #[default]
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }

    /// Parses `asc`/`ascending`/`desc`/`descending`, case-insensitively.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("asc"),
            SortDirection::Descending => f.write_str("desc"),
        }
    }
}

/// Sort field and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }
}

/// Parses a sort argument of the form `field`, `field:asc` or `field:desc`.
///
/// The direction is `None` when omitted, so the caller can apply the
/// toggle-or-default rule.
pub fn parse_sort_arg(input: &str) -> Option<(String, Option<SortDirection>)> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    match input.rsplit_once(':') {
        Some((field, dir)) => {
            let direction = SortDirection::parse(dir)?;
            let field = field.trim();
            if field.is_empty() {
                return None;
            }
            Some((field.to_string(), Some(direction)))
        }
        None => Some((input.to_string(), None)),
    }
}

/// Accepted value for one filter field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// The "all" sentinel: no constraint.
    All,
    Is(FieldValue),
}

impl FilterValue {
    /// Converts user text, mapping the sentinel (case-insensitive) to `All`.
    pub fn from_text(text: &str, sentinel: &str) -> Self {
        if text.trim().eq_ignore_ascii_case(sentinel) {
            FilterValue::All
        } else {
            FilterValue::Is(FieldValue::Text(text.to_string()))
        }
    }
}

impl From<FieldValue> for FilterValue {
    fn from(v: FieldValue) -> Self {
        FilterValue::Is(v)
    }
}

/// Plain text is always a literal value; the controller maps its
/// configured sentinel to [`FilterValue::All`].
impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Is(FieldValue::Text(s.to_string()))
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Is(FieldValue::Text(s))
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Is(FieldValue::Integer(v))
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Is(FieldValue::Bool(v))
    }
}

/// Equality constraints per field. Sentinel entries are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    entries: BTreeMap<String, FieldValue>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or removes (for [`FilterValue::All`]) the constraint on `field`.
    pub fn set(&mut self, field: &str, value: FilterValue) {
        match value {
            FilterValue::All => {
                self.entries.remove(field);
            }
            FilterValue::Is(v) => {
                self.entries.insert(field.to_string(), v);
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.entries.get(field)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A record matches iff every constrained field equals the accepted value.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.entries
            .iter()
            .all(|(field, expected)| record.field(field).is_some_and(|v| v == *expected))
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, value) in &self.entries {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", field, value)?;
            first = false;
        }
        Ok(())
    }
}

/// Case-insensitive substring search across designated fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    needle: String,
}

impl SearchQuery {
    pub fn new(text: &str) -> Self {
        Self {
            raw: text.to_string(),
            needle: text.to_lowercase(),
        }
    }

    /// Text as typed by the user.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Empty or whitespace-only queries match everything.
    pub fn is_empty(&self) -> bool {
        self.needle.trim().is_empty()
    }

    /// Matches iff the needle occurs in at least one of `fields`, either in
    /// the value's plain text or in its table cell rendering.
    pub fn matches<'a, R, I>(&self, record: &R, fields: I) -> bool
    where
        R: Record,
        I: IntoIterator<Item = &'a str>,
    {
        if self.is_empty() {
            return true;
        }
        fields.into_iter().any(|name| {
            record.field(name).is_some_and(|v| {
                v.search_text().to_lowercase().contains(&self.needle)
                    || (!v.is_null()
                        && format_value(&v, FmtStyle::Compact)
                            .to_lowercase()
                            .contains(&self.needle))
            })
        })
    }
}

/// Requested page window (pages start at 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn total_pages(&self, total: usize) -> usize {
        if total == 0 {
            0
        } else {
            total.div_ceil(self.per_page)
        }
    }

    /// Index range of the page within a list of `total` rows.
    pub fn window(&self, total: usize) -> std::ops::Range<usize> {
        let start = ((self.page - 1) * self.per_page).min(total);
        let end = (start + self.per_page).min(total);
        start..end
    }
}

/// Pagination metadata, serialized with the same field names the REST
/// list endpoints use. Only `page`, `per_page` and `total` are read back;
/// the rest is always derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPageMeta")]
pub struct PageMeta {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Deserialize)]
struct RawPageMeta {
    page: usize,
    per_page: usize,
    total: usize,
}

impl From<RawPageMeta> for PageMeta {
    fn from(raw: RawPageMeta) -> Self {
        PageMeta::new(raw.page, raw.per_page, raw.total)
    }
}

impl PageMeta {
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let paging = Pagination::new(page, per_page);
        let total_pages = paging.total_pages(total);
        let start = (paging.page - 1) * paging.per_page;
        Self {
            page: paging.page,
            per_page: paging.per_page,
            total,
            total_pages,
            has_next: start + paging.per_page < total,
            has_prev: paging.page > 1,
        }
    }
}
