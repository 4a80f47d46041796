//! gridview - filter, search, sort, paging and selection state for
//! tabular list screens.
//!
//! The library provides:
//! - `table` - the per-screen controller deriving the visible rows
//! - `schema` - field roles, kinds and per-screen options
//! - `json` - dynamic JSON records and paginated payloads
//! - `view` - view models and plain-text rendering for the `gridview` binary

pub mod error;
pub mod fmt;
pub mod json;
pub mod query;
pub mod record;
pub mod schema;
pub mod table;
pub mod util;
pub mod view;

pub use error::{FieldRole, GridError, LoadError};
pub use query::{FilterSpec, FilterValue, PageMeta, SortDirection, SortSpec};
pub use record::{FieldValue, Record, RecordId};
pub use schema::{FieldKind, FieldSpec, GridOptions, Schema};
pub use table::{
    DiffStatus, NavigableTable, ReplaceOutcome, Selection, SelectionOutcome, TableController,
};
