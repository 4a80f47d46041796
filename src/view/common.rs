//! View model types shared by all frontends.

use crate::query::PageMeta;
use crate::table::DiffStatus;

/// One table row, parameterized by record ID type.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow<Id> {
    pub id: Id,
    pub cells: Vec<String>,
    /// Change since the previous collection (highlighting).
    pub diff: DiffStatus,
    /// Row is under the keyboard cursor.
    pub focused: bool,
    /// Row is the record open in the detail panel.
    pub selected: bool,
}

/// Complete table ready to be rendered by any frontend.
#[derive(Debug, Clone, PartialEq)]
pub struct TableViewModel<Id> {
    pub title: String,
    pub headers: Vec<String>,
    /// Column widths in characters, wide enough for header and content.
    pub widths: Vec<usize>,
    pub rows: Vec<ViewRow<Id>>,
    pub sort_column: Option<usize>,
    pub sort_ascending: bool,
    pub page: Option<PageMeta>,
}

/// Label/value pairs for the detail panel of the selected record.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailViewModel<Id> {
    pub id: Id,
    pub fields: Vec<(String, String)>,
    /// Selected record is hidden by the current filters or search.
    pub hidden_in_list: bool,
}
