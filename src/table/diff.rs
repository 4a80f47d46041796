//! Change tracking between successive record collections.

use crate::record::{FieldValue, Record, RecordId};
use crate::schema::Schema;

/// Diff status of a record after the collection was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DiffStatus {
    /// Not present in the previous collection.
    New,
    /// Present before, with these schema fields changed.
    Modified(Vec<String>),
    #[default]
    Unchanged,
}

/// What happened to the open detail record when the collection was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionOutcome {
    #[default]
    NoSelection,
    /// Still present and unchanged.
    Kept,
    /// Still present and still selected; these fields changed.
    Modified(Vec<String>),
    /// Gone from the new collection; the selection was cleared.
    Dropped(RecordId),
}

/// Summary returned by `TableController::replace_records`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplaceOutcome {
    pub added: usize,
    pub modified: usize,
    pub removed: usize,
    pub selection: SelectionOutcome,
}

/// Schema field values of one record, in declaration order.
pub(crate) type FieldSnapshot = Vec<Option<FieldValue>>;

pub(crate) fn snapshot<R: Record>(schema: &Schema, record: &R) -> FieldSnapshot {
    schema.fields.iter().map(|f| record.field(&f.name)).collect()
}

pub(crate) fn compare(schema: &Schema, prev: &FieldSnapshot, next: &FieldSnapshot) -> DiffStatus {
    let changed: Vec<String> = schema
        .fields
        .iter()
        .zip(prev.iter().zip(next.iter()))
        .filter(|(_, (p, n))| p != n)
        .map(|(f, _)| f.name.clone())
        .collect();

    if changed.is_empty() {
        DiffStatus::Unchanged
    } else {
        DiffStatus::Modified(changed)
    }
}
