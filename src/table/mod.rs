//! Table controller: the filtered, searched, sorted and paged view over an
//! in-memory record collection, plus row cursor and detail selection.
//!
//! The derived view is recomputed eagerly whenever records, filters, search
//! or sort change, in this order:
//!
//! 1. filters (keep rows matching every equality constraint)
//! 2. search (keep rows whose searchable fields contain the query)
//! 3. sort (stable; ties keep collection order in both directions)
//! 4. page window, applied on read

mod diff;
mod navigable;
mod selection;

use std::collections::HashMap;
use std::ops::Range;

use tracing::{debug, info, warn};

use crate::error::{FieldRole, GridError};
use crate::query::{FilterSpec, FilterValue, PageMeta, Pagination, SearchQuery, SortDirection, SortSpec};
use crate::record::{FieldValue, Record, RecordId};
use crate::schema::Schema;

pub use diff::{DiffStatus, ReplaceOutcome, SelectionOutcome};
pub use navigable::NavigableTable;
pub use selection::Selection;

use diff::FieldSnapshot;

/// View state of one list screen.
#[derive(Debug, Clone)]
pub struct TableController<R: Record> {
    schema: Schema,
    records: Vec<R>,
    filters: FilterSpec,
    search: SearchQuery,
    sort: Option<SortSpec>,
    paging: Option<Pagination>,
    selection: Selection,
    /// Indices into `records` that pass filters and search, in sort order.
    visible: Vec<usize>,
    /// Cursor row within the current page.
    cursor: usize,
    /// Record the cursor follows across sort/filter changes.
    tracked_id: Option<RecordId>,
    snapshots: HashMap<RecordId, FieldSnapshot>,
    diff_status: HashMap<RecordId, DiffStatus>,
}

impl<R: Record> TableController<R> {
    /// Creates a controller, applying the schema's initial sort and page size.
    pub fn new(schema: Schema, records: Vec<R>) -> Self {
        let sort = schema
            .options
            .initial_sort
            .clone()
            .filter(|s| schema.with_role(&s.field, FieldRole::Sort).is_some());
        let paging = schema.options.page_size.map(|n| Pagination::new(1, n));
        let snapshots = records
            .iter()
            .map(|r| (r.id(), diff::snapshot(&schema, r)))
            .collect();

        let mut controller = Self {
            schema,
            records,
            filters: FilterSpec::new(),
            search: SearchQuery::default(),
            sort,
            paging,
            selection: Selection::NoneSelected,
            visible: Vec::new(),
            cursor: 0,
            tracked_id: None,
            snapshots,
            diff_status: HashMap::new(),
        };
        controller.refresh();
        controller
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Full, unfiltered collection in original order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn search_query(&self) -> &str {
        self.search.as_str()
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    // -----------------------------------------------------------------------
    // Query parameters
    // -----------------------------------------------------------------------

    /// Sets the accepted value for a filterable field; the configured
    /// sentinel (default `"ALL"`) removes the constraint.
    ///
    /// Text values are coerced to the field's declared kind, so `"12"`
    /// matches a numeric field holding 12.
    pub fn set_filter(
        &mut self,
        field: &str,
        value: impl Into<FilterValue>,
    ) -> Result<(), GridError> {
        let Some(spec) = self.schema.with_role(field, FieldRole::Filter) else {
            return Err(invalid_field(field, FieldRole::Filter));
        };

        let value = match value.into() {
            FilterValue::All => FilterValue::All,
            FilterValue::Is(FieldValue::Text(text))
                if text
                    .trim()
                    .eq_ignore_ascii_case(&self.schema.options.all_sentinel) =>
            {
                FilterValue::All
            }
            FilterValue::Is(v) => match spec.coerce(v.clone()) {
                Ok(coerced) => FilterValue::Is(coerced),
                // Uncoercible text stays literal and simply matches nothing.
                Err(_) => FilterValue::Is(v),
            },
        };

        debug!(field, ?value, "filter set");
        self.filters.set(field, value);
        self.rewind();
        self.refresh();
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.rewind();
        self.refresh();
    }

    /// Sets the free-text query. Any text is accepted.
    pub fn set_search_query(&mut self, text: &str) {
        self.search = SearchQuery::new(text);
        self.rewind();
        self.refresh();
    }

    /// Sorts by `field`.
    ///
    /// Without an explicit direction, sorting the current field again flips
    /// the direction and sorting a new field uses the schema's default
    /// direction (descending unless configured otherwise).
    pub fn set_sort(
        &mut self,
        field: &str,
        direction: Option<SortDirection>,
    ) -> Result<SortSpec, GridError> {
        if self.schema.with_role(field, FieldRole::Sort).is_none() {
            return Err(invalid_field(field, FieldRole::Sort));
        }

        let direction = match (direction, &self.sort) {
            (Some(d), _) => d,
            (None, Some(current)) if current.field == field => current.direction.reversed(),
            (None, _) => self.schema.options.default_direction,
        };

        let spec = SortSpec::new(field, direction);
        self.sort = Some(spec.clone());
        self.refresh();
        Ok(spec)
    }

    /// Drops the sort; rows return to collection order.
    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.refresh();
    }

    // -----------------------------------------------------------------------
    // Derived view
    // -----------------------------------------------------------------------

    /// Rows to render: filtered, searched, sorted, then windowed to the
    /// current page when paging is enabled.
    pub fn visible_records(&self) -> Vec<&R> {
        self.page_indices()
            .iter()
            .map(|&i| &self.records[i])
            .collect()
    }

    pub fn visible_ids(&self) -> Vec<RecordId> {
        self.page_indices()
            .iter()
            .map(|&i| self.records[i].id())
            .collect()
    }

    /// All rows passing filters and search, in sort order, ignoring paging.
    pub fn matching_records(&self) -> Vec<&R> {
        self.visible.iter().map(|&i| &self.records[i]).collect()
    }

    /// Row count before paging.
    pub fn matching_count(&self) -> usize {
        self.visible.len()
    }

    // -----------------------------------------------------------------------
    // Paging
    // -----------------------------------------------------------------------

    /// Enables paging with `per_page` rows, or disables it with `None`.
    /// Always returns to the first page.
    pub fn set_page_size(&mut self, per_page: Option<usize>) {
        self.paging = per_page.map(|n| Pagination::new(1, n));
        self.cursor = 0;
        self.tracked_id = None;
        self.resolve_cursor();
    }

    /// Moves to `page`, clamped to the available pages. Returns the page
    /// actually shown (always 1 without paging).
    pub fn set_page(&mut self, page: usize) -> usize {
        let total = self.visible.len();
        let Some(paging) = &mut self.paging else {
            return 1;
        };
        let last = paging.total_pages(total).max(1);
        let page = page.clamp(1, last);
        if page != paging.page {
            paging.page = page;
            self.cursor = 0;
            self.tracked_id = None;
            self.resolve_cursor();
        }
        page
    }

    /// Returns `false` when already on the last page.
    pub fn next_page(&mut self) -> bool {
        match self.paging {
            Some(p) => p.page != self.set_page(p.page + 1),
            None => false,
        }
    }

    /// Returns `false` when already on the first page.
    pub fn prev_page(&mut self) -> bool {
        match self.paging {
            Some(p) if p.page > 1 => p.page != self.set_page(p.page - 1),
            _ => false,
        }
    }

    pub fn page_meta(&self) -> Option<PageMeta> {
        self.paging
            .map(|p| PageMeta::new(p.page, p.per_page, self.visible.len()))
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Opens the detail record `id`, replacing any current selection.
    ///
    /// The id is looked up in the full collection, so a record hidden by the
    /// current filters can still be selected. An unknown id leaves the
    /// selection untouched.
    pub fn select(&mut self, id: impl Into<RecordId>) -> Result<(), GridError> {
        let id = id.into();
        if !self.records.iter().any(|r| r.id() == id) {
            warn!(%id, "select: record not found");
            return Err(GridError::SelectionMiss(id));
        }
        debug!(%id, "record selected");
        self.selection = Selection::Selected(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::NoneSelected;
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_id(&self) -> Option<&RecordId> {
        self.selection.id()
    }

    pub fn selected_record(&self) -> Option<&R> {
        let id = self.selection.id()?;
        self.records.iter().find(|r| r.id() == *id)
    }

    // -----------------------------------------------------------------------
    // Cursor
    // -----------------------------------------------------------------------

    pub fn cursor_record(&self) -> Option<&R> {
        self.page_indices()
            .get(self.cursor)
            .map(|&i| &self.records[i])
    }

    /// Selects the record under the cursor.
    pub fn open_cursor(&mut self) -> Option<RecordId> {
        let id = self.cursor_record()?.id();
        self.selection = Selection::Selected(id.clone());
        Some(id)
    }

    // -----------------------------------------------------------------------
    // Record refresh
    // -----------------------------------------------------------------------

    /// Replaces the collection (e.g. after a refetch) and records per-row
    /// diff status against the previous collection.
    ///
    /// A selected record that disappeared is deselected; one that changed
    /// stays selected. Both cases are reported in the outcome.
    pub fn replace_records(&mut self, records: Vec<R>) -> ReplaceOutcome {
        let mut outcome = ReplaceOutcome::default();
        let mut next_snapshots = HashMap::with_capacity(records.len());
        self.diff_status.clear();

        for record in &records {
            let id = record.id();
            let snap = diff::snapshot(&self.schema, record);
            let status = match self.snapshots.get(&id) {
                Some(prev) => diff::compare(&self.schema, prev, &snap),
                None => DiffStatus::New,
            };
            match status {
                DiffStatus::New => outcome.added += 1,
                DiffStatus::Modified(_) => outcome.modified += 1,
                DiffStatus::Unchanged => {}
            }
            self.diff_status.insert(id.clone(), status);
            next_snapshots.insert(id, snap);
        }

        outcome.removed = self
            .snapshots
            .keys()
            .filter(|id| !next_snapshots.contains_key(*id))
            .count();

        outcome.selection = match self.selection.id().cloned() {
            None => SelectionOutcome::NoSelection,
            Some(id) => match self.diff_status.get(&id) {
                None => {
                    self.selection = Selection::NoneSelected;
                    SelectionOutcome::Dropped(id)
                }
                Some(DiffStatus::Modified(fields)) => SelectionOutcome::Modified(fields.clone()),
                Some(_) => SelectionOutcome::Kept,
            },
        };

        self.snapshots = next_snapshots;
        self.records = records;
        self.refresh();

        info!(
            "records replaced: {} total, {} new, {} modified, {} removed",
            self.records.len(),
            outcome.added,
            outcome.modified,
            outcome.removed
        );
        outcome
    }

    /// Diff status from the last `replace_records` call.
    pub fn diff_status(&self, id: &RecordId) -> DiffStatus {
        self.diff_status.get(id).cloned().unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn page_range(&self) -> Range<usize> {
        match self.paging {
            Some(p) => p.window(self.visible.len()),
            None => 0..self.visible.len(),
        }
    }

    fn page_indices(&self) -> &[usize] {
        &self.visible[self.page_range()]
    }

    /// Back to the first page and the first row. The tracked record is kept
    /// so the cursor can find it again if it is still on that page.
    fn rewind(&mut self) {
        if let Some(p) = &mut self.paging {
            p.page = 1;
        }
        self.cursor = 0;
    }

    fn refresh(&mut self) {
        let searchable: Vec<&str> = self.schema.searchable_fields().collect();
        let mut rows: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.filters.matches(*r))
            .filter(|(_, r)| self.search.matches(*r, searchable.iter().copied()))
            .map(|(i, _)| i)
            .collect();

        if let Some(sort) = &self.sort {
            let asc = sort.direction.is_ascending();
            let mut keyed: Vec<(usize, FieldValue)> = rows
                .iter()
                .map(|&i| {
                    let key = self.records[i]
                        .field(&sort.field)
                        .unwrap_or(FieldValue::Null);
                    (i, key)
                })
                .collect();
            // sort_by is stable; reversing the comparator (not the output)
            // keeps ties in collection order for descending sorts too.
            keyed.sort_by(|a, b| {
                let cmp = a.1.compare(&b.1);
                if asc { cmp } else { cmp.reverse() }
            });
            rows = keyed.into_iter().map(|(i, _)| i).collect();
        }

        self.visible = rows;

        let total = self.visible.len();
        if let Some(p) = &mut self.paging {
            p.page = p.page.clamp(1, p.total_pages(total).max(1));
        }
        self.resolve_cursor();

        debug!(
            total = self.records.len(),
            matching = total,
            filters = %self.filters,
            search = self.search.as_str(),
            "table view recomputed"
        );
    }

    /// Moves the cursor onto the tracked record if it is on the current
    /// page, otherwise clamps it, then tracks whatever row it lands on.
    fn resolve_cursor(&mut self) {
        let ids: Vec<RecordId> = self
            .page_indices()
            .iter()
            .map(|&i| self.records[i].id())
            .collect();
        if ids.is_empty() {
            self.cursor = 0;
            self.tracked_id = None;
            return;
        }

        if let Some(tracked) = self.tracked_id.clone() {
            match ids.iter().position(|id| *id == tracked) {
                Some(pos) => self.cursor = pos,
                None => self.tracked_id = None,
            }
        }

        self.cursor = self.cursor.min(ids.len() - 1);
        self.tracked_id = Some(ids[self.cursor].clone());
    }
}

impl<R: Record> NavigableTable for TableController<R> {
    fn cursor(&self) -> usize {
        self.cursor
    }

    fn cursor_mut(&mut self) -> &mut usize {
        &mut self.cursor
    }

    fn row_count(&self) -> usize {
        self.page_range().len()
    }

    fn retrack(&mut self) {
        self.tracked_id = self.cursor_record().map(|r| r.id());
    }
}

fn invalid_field(field: &str, role: FieldRole) -> GridError {
    warn!(field, %role, "rejected reference to field");
    GridError::InvalidFieldReference {
        field: field.to_string(),
        role,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::schema::FieldSpec;

    #[derive(Debug, Clone, PartialEq)]
    struct Workflow {
        id: String,
        status: String,
        name: String,
        days: i64,
        seq: i64,
    }

    impl Workflow {
        fn new(id: &str, status: &str, name: &str, days: i64) -> Self {
            Self {
                id: id.to_string(),
                status: status.to_string(),
                name: name.to_string(),
                days,
                seq: 0,
            }
        }
    }

    impl Record for Workflow {
        fn id(&self) -> RecordId {
            RecordId::Text(self.id.clone())
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "id" => Some(self.id.as_str().into()),
                "status" => Some(self.status.as_str().into()),
                "name" => Some(self.name.as_str().into()),
                "days" => Some(FieldValue::Integer(self.days)),
                "seq" => Some(FieldValue::Integer(self.seq)),
                _ => None,
            }
        }
    }

    fn schema() -> Schema {
        Schema::new("id")
            .field(FieldSpec::text("id").searchable().sortable())
            .field(FieldSpec::text("status").filterable().sortable())
            .field(FieldSpec::text("name").searchable().sortable())
            .field(FieldSpec::number("days").filterable().sortable())
            .field(FieldSpec::number("seq").sortable())
    }

    fn scenario_records() -> Vec<Workflow> {
        vec![
            Workflow::new("A", "Active", "Annual Leave", 12),
            Workflow::new("B", "Draft", "Sick Pass", 3),
            Workflow::new("C", "Active", "Annual Bonus", 0),
        ]
    }

    fn ids(c: &TableController<Workflow>) -> Vec<String> {
        c.visible_records().iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn leave_workflow_scenario() {
        let mut c = TableController::new(schema(), scenario_records());

        c.set_filter("status", "Active").unwrap();
        assert_eq!(ids(&c), ["A", "C"]);

        c.set_search_query("annual");
        assert_eq!(ids(&c), ["A", "C"]);

        c.set_sort("name", Some(SortDirection::Ascending)).unwrap();
        assert_eq!(ids(&c), ["C", "A"]);

        c.set_filter("status", "ALL").unwrap();
        c.set_search_query("");
        assert_eq!(ids(&c), ["C", "A", "B"]);

        c.select("B").unwrap();
        c.set_search_query("zzz");
        assert!(ids(&c).is_empty());
        assert_eq!(c.selected_id(), Some(&RecordId::from("B")));
        assert_eq!(c.selected_record().map(|r| r.name.as_str()), Some("Sick Pass"));
    }

    #[test]
    fn sentinel_is_case_insensitive_and_configurable() {
        let mut c = TableController::new(schema(), scenario_records());
        c.set_filter("status", "Draft").unwrap();
        assert_eq!(ids(&c), ["B"]);
        c.set_filter("status", "all").unwrap();
        assert_eq!(ids(&c), ["A", "B", "C"]);

        let mut options = schema().options;
        options.all_sentinel = "Any".to_string();
        let mut c = TableController::new(schema().options(options), scenario_records());
        c.set_filter("status", "Active").unwrap();
        c.set_filter("status", "ANY").unwrap();
        assert!(c.filters().is_empty());
    }

    #[test]
    fn numeric_filter_coerces_text() {
        let mut c = TableController::new(schema(), scenario_records());
        c.set_filter("days", "12").unwrap();
        assert_eq!(ids(&c), ["A"]);
        c.set_filter("days", 3i64).unwrap();
        assert_eq!(ids(&c), ["B"]);
        c.set_filter("days", "twelve").unwrap();
        assert!(ids(&c).is_empty());
    }

    #[test]
    fn invalid_field_references_leave_state_untouched() {
        let mut c = TableController::new(schema(), scenario_records());
        c.set_filter("status", "Active").unwrap();
        c.set_sort("days", None).unwrap();
        let before = ids(&c);

        let err = c.set_filter("name", "Annual Leave").unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidFieldReference {
                field: "name".to_string(),
                role: FieldRole::Filter,
            }
        );
        assert!(c.set_filter("salary", "1").is_err());
        assert!(c.set_sort("salary", None).is_err());
        assert_eq!(ids(&c), before);
        assert_eq!(c.sort(), Some(&SortSpec::descending("days")));
    }

    #[test]
    fn sort_defaults_to_descending_then_toggles() {
        let mut c = TableController::new(schema(), scenario_records());
        let spec = c.set_sort("days", None).unwrap();
        assert_eq!(spec.direction, SortDirection::Descending);
        assert_eq!(ids(&c), ["A", "B", "C"]);

        let spec = c.set_sort("days", None).unwrap();
        assert_eq!(spec.direction, SortDirection::Ascending);
        assert_eq!(ids(&c), ["C", "B", "A"]);

        // New field starts from the default again.
        let spec = c.set_sort("name", None).unwrap();
        assert_eq!(spec.direction, SortDirection::Descending);
        assert_eq!(ids(&c), ["B", "A", "C"]);

        c.clear_sort();
        assert_eq!(ids(&c), ["A", "B", "C"]);
    }

    #[test]
    fn ascending_default_is_configurable() {
        let schema = schema().default_direction(SortDirection::Ascending);
        let mut c = TableController::new(schema, scenario_records());
        c.set_sort("days", None).unwrap();
        assert_eq!(ids(&c), ["C", "B", "A"]);
    }

    #[test]
    fn initial_sort_and_page_size_from_schema() {
        let schema = schema()
            .initial_sort(SortSpec::ascending("name"))
            .page_size(2);
        let c = TableController::new(schema, scenario_records());
        assert_eq!(ids(&c), ["C", "A"]);
        assert_eq!(c.matching_count(), 3);
        let meta = c.page_meta().unwrap();
        assert_eq!((meta.page, meta.total_pages, meta.total), (1, 2, 3));
    }

    #[test]
    fn missing_sort_values_sort_lowest() {
        #[derive(Debug)]
        struct Punch(i64, Option<i64>);
        impl Record for Punch {
            fn id(&self) -> RecordId {
                RecordId::Int(self.0)
            }
            fn field(&self, name: &str) -> Option<FieldValue> {
                match name {
                    "minutes" => self.1.map(FieldValue::Integer),
                    _ => None,
                }
            }
        }
        let schema = Schema::new("id").field(FieldSpec::number("minutes").sortable());
        let rows = vec![Punch(1, Some(5)), Punch(2, None), Punch(3, Some(-1))];
        let mut c = TableController::new(schema, rows);
        c.set_sort("minutes", Some(SortDirection::Ascending)).unwrap();
        assert_eq!(c.visible_ids(), [RecordId::Int(2), RecordId::Int(3), RecordId::Int(1)]);
        c.set_sort("minutes", None).unwrap();
        assert_eq!(c.visible_ids(), [RecordId::Int(1), RecordId::Int(3), RecordId::Int(2)]);
    }

    #[test]
    fn selection_miss_keeps_selection() {
        let mut c = TableController::new(schema(), scenario_records());
        assert_eq!(c.selection(), &Selection::NoneSelected);

        assert_eq!(
            c.select("Z"),
            Err(GridError::SelectionMiss(RecordId::from("Z")))
        );
        assert_eq!(c.selection(), &Selection::NoneSelected);

        c.select("A").unwrap();
        c.select("C").unwrap();
        assert_eq!(c.selection(), &Selection::Selected(RecordId::from("C")));

        assert!(c.select("Z").is_err());
        assert_eq!(c.selected_id(), Some(&RecordId::from("C")));

        c.clear_selection();
        assert!(!c.selection().is_selected());
    }

    #[test]
    fn hidden_records_can_be_selected() {
        let mut c = TableController::new(schema(), scenario_records());
        c.set_filter("status", "Draft").unwrap();
        c.select("A").unwrap();
        assert_eq!(c.selected_record().map(|r| r.id.as_str()), Some("A"));
    }

    #[test]
    fn paging_walks_and_clamps() {
        let records: Vec<Workflow> = (0..5)
            .map(|i| Workflow::new(&format!("R{}", i), "Active", "Shift", i))
            .collect();
        let mut c = TableController::new(schema(), records);
        c.set_page_size(Some(2));
        assert_eq!(ids(&c), ["R0", "R1"]);
        assert!(!c.prev_page());

        assert!(c.next_page());
        assert_eq!(ids(&c), ["R2", "R3"]);
        assert!(c.next_page());
        assert_eq!(ids(&c), ["R4"]);
        assert!(!c.next_page());

        assert_eq!(c.set_page(99), 3);
        assert_eq!(c.set_page(0), 1);

        c.set_page(3);
        c.set_search_query("shift");
        assert_eq!(c.page_meta().unwrap().page, 1);

        c.set_filter("days", 4i64).unwrap();
        let meta = c.page_meta().unwrap();
        assert_eq!((meta.page, meta.total, meta.has_next), (1, 1, false));

        c.set_page_size(None);
        assert!(c.page_meta().is_none());
        assert_eq!(c.set_page(2), 1);
    }

    #[test]
    fn shrinking_view_clamps_page() {
        let records: Vec<Workflow> = (0..6)
            .map(|i| Workflow::new(&format!("R{}", i), "Active", "Shift", i))
            .collect();
        let mut c = TableController::new(schema().page_size(2), records.clone());
        c.set_page(3);
        c.replace_records(records[..3].to_vec());
        assert_eq!(c.page_meta().unwrap().page, 2);
        assert_eq!(ids(&c), ["R2"]);
    }

    #[test]
    fn cursor_follows_record_across_sort() {
        let mut c = TableController::new(schema(), scenario_records());
        c.set_sort("days", Some(SortDirection::Descending)).unwrap();
        // A(12), B(3), C(0)
        c.select_down();
        assert_eq!(c.cursor_record().map(|r| r.id.as_str()), Some("B"));

        c.set_sort("name", Some(SortDirection::Ascending)).unwrap();
        // C, A, B
        assert_eq!(c.cursor(), 2);
        assert_eq!(c.cursor_record().map(|r| r.id.as_str()), Some("B"));
    }

    #[test]
    fn cursor_clamps_and_moves_within_rows() {
        let mut c = TableController::new(schema(), scenario_records());
        c.end();
        assert_eq!(c.cursor(), 2);
        c.select_down();
        assert_eq!(c.cursor(), 2);
        c.page_up(10);
        assert_eq!(c.cursor(), 0);
        c.page_down(1);
        assert_eq!(c.cursor(), 1);
        c.home();
        assert_eq!(c.cursor(), 0);
        c.select_up();
        assert_eq!(c.cursor(), 0);

        // Cursor record still visible: cursor follows it.
        c.end();
        c.set_filter("status", "Active").unwrap();
        assert_eq!(c.cursor_record().map(|r| r.id.as_str()), Some("C"));

        // Cursor record filtered out: cursor lands on the first remaining row.
        c.set_filter("status", "Draft").unwrap();
        assert_eq!(c.cursor_record().map(|r| r.id.as_str()), Some("B"));

        c.set_search_query("nothing matches");
        assert_eq!(c.cursor(), 0);
        assert!(c.cursor_record().is_none());
        assert!(c.open_cursor().is_none());
    }

    #[test]
    fn open_cursor_selects_row() {
        let mut c = TableController::new(schema(), scenario_records());
        c.select_down();
        assert_eq!(c.open_cursor(), Some(RecordId::from("B")));
        assert_eq!(c.selected_id(), Some(&RecordId::from("B")));
    }

    #[test]
    fn replace_records_reports_diff() {
        let mut c = TableController::new(schema(), scenario_records());
        c.select("B").unwrap();

        let mut next = scenario_records();
        next[1].status = "Active".to_string();
        next.remove(2);
        next.push(Workflow::new("D", "Draft", "Comp Off", 1));

        let outcome = c.replace_records(next);
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.modified, 1);
        assert_eq!(outcome.removed, 1);
        assert_eq!(
            outcome.selection,
            SelectionOutcome::Modified(vec!["status".to_string()])
        );
        assert_eq!(c.selected_id(), Some(&RecordId::from("B")));
        assert_eq!(c.diff_status(&RecordId::from("D")), DiffStatus::New);
        assert_eq!(c.diff_status(&RecordId::from("A")), DiffStatus::Unchanged);
    }

    #[test]
    fn replace_records_drops_removed_selection() {
        let mut c = TableController::new(schema(), scenario_records());
        c.select("C").unwrap();
        let outcome = c.replace_records(scenario_records()[..2].to_vec());
        assert_eq!(outcome.selection, SelectionOutcome::Dropped(RecordId::from("C")));
        assert_eq!(c.selection(), &Selection::NoneSelected);

        c.select("A").unwrap();
        let outcome = c.replace_records(scenario_records());
        assert_eq!(outcome.selection, SelectionOutcome::Kept);
    }

    #[test]
    fn replace_records_keeps_query() {
        let mut c = TableController::new(schema(), scenario_records());
        c.set_filter("status", "Active").unwrap();
        c.set_sort("days", Some(SortDirection::Ascending)).unwrap();
        let mut next = scenario_records();
        next.push(Workflow::new("D", "Active", "Bereavement", 5));
        c.replace_records(next);
        assert_eq!(ids(&c), ["C", "D", "A"]);
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    const STATUSES: &[&str] = &["Active", "Draft", "Archived"];

    fn arb_records() -> impl Strategy<Value = Vec<Workflow>> {
        prop::collection::vec(
            (0..STATUSES.len(), "[A-Za-z ]{1,10}", 0i64..5),
            0..24,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (status, name, days))| Workflow {
                    id: format!("W{}", i),
                    status: STATUSES[status].to_string(),
                    name,
                    days,
                    seq: i as i64,
                })
                .collect()
        })
    }

    fn position_of(records: &[Workflow], id: &str) -> usize {
        records.iter().position(|r| r.id == id).unwrap()
    }

    proptest! {
        #[test]
        fn filter_is_idempotent(records in arb_records(), status in 0..STATUSES.len()) {
            let mut once = TableController::new(schema(), records.clone());
            once.set_filter("status", STATUSES[status]).unwrap();

            let mut twice = TableController::new(schema(), records);
            twice.set_filter("status", STATUSES[status]).unwrap();
            twice.set_filter("status", STATUSES[status]).unwrap();

            prop_assert_eq!(ids(&once), ids(&twice));
        }

        #[test]
        fn search_finds_any_case_variant_of_a_substring(
            records in arb_records(),
            pick in any::<prop::sample::Index>(),
            start in any::<prop::sample::Index>(),
            len in 1usize..6,
            upper in any::<bool>(),
        ) {
            prop_assume!(!records.is_empty());
            let target = &records[pick.index(records.len())];
            let chars: Vec<char> = target.name.chars().collect();
            let from = start.index(chars.len());
            let to = (from + len).min(chars.len());
            let needle: String = chars[from..to].iter().collect();
            prop_assume!(!needle.trim().is_empty());
            let needle = if upper { needle.to_uppercase() } else { needle.to_lowercase() };

            let mut c = TableController::new(schema(), records.clone());
            c.set_search_query(&needle);
            prop_assert!(ids(&c).contains(&target.id));
        }

        #[test]
        fn sort_is_stable_under_any_filter(
            records in arb_records(),
            status in 0..=STATUSES.len(),
            query in "[a-z]?",
            ascending in any::<bool>(),
        ) {
            let mut c = TableController::new(schema(), records.clone());
            if status < STATUSES.len() {
                c.set_filter("status", STATUSES[status]).unwrap();
            }
            c.set_search_query(&query);
            let dir = if ascending { SortDirection::Ascending } else { SortDirection::Descending };
            c.set_sort("days", Some(dir)).unwrap();

            let visible = c.visible_records();
            for pair in visible.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if ascending {
                    prop_assert!(a.days <= b.days);
                } else {
                    prop_assert!(a.days >= b.days);
                }
                if a.days == b.days {
                    prop_assert!(position_of(&records, &a.id) < position_of(&records, &b.id));
                }
            }
        }

        #[test]
        fn sorting_twice_reverses_distinct_keys(records in arb_records()) {
            let mut once = TableController::new(schema(), records.clone());
            once.set_sort("seq", None).unwrap();

            let mut twice = TableController::new(schema(), records);
            twice.set_sort("seq", None).unwrap();
            twice.set_sort("seq", None).unwrap();

            let mut reversed = ids(&once);
            reversed.reverse();
            prop_assert_eq!(ids(&twice), reversed);
        }

        #[test]
        fn filter_and_search_intersect(
            records in arb_records(),
            status in 0..STATUSES.len(),
            query in "[a-z]{0,2}",
        ) {
            let mut filtered = TableController::new(schema(), records.clone());
            filtered.set_filter("status", STATUSES[status]).unwrap();
            let by_filter: HashSet<String> = ids(&filtered).into_iter().collect();

            let mut searched = TableController::new(schema(), records.clone());
            searched.set_search_query(&query);
            let by_search: HashSet<String> = ids(&searched).into_iter().collect();

            let mut both = TableController::new(schema(), records.clone());
            both.set_search_query(&query);
            both.set_filter("status", STATUSES[status]).unwrap();

            let expected: Vec<String> = records
                .iter()
                .filter(|r| by_filter.contains(&r.id) && by_search.contains(&r.id))
                .map(|r| r.id.clone())
                .collect();
            prop_assert_eq!(ids(&both), expected);
        }

        #[test]
        fn view_changes_never_touch_selection(
            records in arb_records(),
            pick in any::<prop::sample::Index>(),
            status in 0..STATUSES.len(),
            query in "[a-z]{0,3}",
            page_size in 1usize..5,
        ) {
            prop_assume!(!records.is_empty());
            let target = records[pick.index(records.len())].id.clone();
            let mut c = TableController::new(schema(), records);
            c.select(target.as_str()).unwrap();

            c.set_filter("status", STATUSES[status]).unwrap();
            c.set_search_query(&query);
            c.set_sort("name", None).unwrap();
            c.set_sort("name", None).unwrap();
            c.set_page_size(Some(page_size));
            c.next_page();
            c.end();
            c.clear_filters();

            prop_assert_eq!(c.selected_id(), Some(&RecordId::Text(target)));
        }

        #[test]
        fn empty_query_is_identity(records in arb_records()) {
            let mut c = TableController::new(schema(), records.clone());
            c.set_filter("status", "ALL").unwrap();
            c.set_search_query("   ");
            let expected: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
            prop_assert_eq!(ids(&c), expected);
        }
    }
}
