//! Builds view models from controller state.

use crate::fmt::{FmtStyle, format_opt_value, truncate};
use crate::record::{Record, RecordId};
use crate::table::TableController;
use crate::view::common::{DetailViewModel, TableViewModel, ViewRow};

/// Cells longer than this are truncated in table view.
const MAX_CELL_WIDTH: usize = 40;

/// Builds the table for the current page.
///
/// The title carries the active filters, search text and matching row count,
/// e.g. ` Leave Workflows (filter: status=Active) (search: annual) [2 rows] `.
pub fn build_table_view<R: Record>(
    title: &str,
    controller: &TableController<R>,
) -> TableViewModel<RecordId> {
    let schema = controller.schema();
    let headers: Vec<String> = schema.fields.iter().map(|f| f.header()).collect();
    let cursor_id = controller.cursor_record().map(|r| r.id());
    let selected_id = controller.selected_id();

    let rows: Vec<ViewRow<RecordId>> = controller
        .visible_records()
        .into_iter()
        .map(|record| {
            let id = record.id();
            let cells = schema
                .fields
                .iter()
                .map(|f| {
                    let value = record.field(&f.name);
                    truncate(&format_opt_value(value.as_ref(), FmtStyle::Compact), MAX_CELL_WIDTH)
                })
                .collect();
            ViewRow {
                diff: controller.diff_status(&id),
                focused: cursor_id.as_ref() == Some(&id),
                selected: selected_id == Some(&id),
                cells,
                id,
            }
        })
        .collect();

    let widths = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .map(|r| r.cells[col].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let sort = controller.sort();
    let sort_column = sort.and_then(|s| schema.fields.iter().position(|f| f.name == s.field));
    let sort_ascending = sort.is_some_and(|s| s.direction.is_ascending());

    let mut full_title = format!(" {} ", title);
    if !controller.filters().is_empty() {
        full_title.push_str(&format!("(filter: {}) ", controller.filters()));
    }
    let search = controller.search_query().trim();
    if !search.is_empty() {
        full_title.push_str(&format!("(search: {}) ", search));
    }
    full_title.push_str(&format!("[{} rows] ", controller.matching_count()));

    TableViewModel {
        title: full_title,
        headers,
        widths,
        rows,
        sort_column,
        sort_ascending,
        page: controller.page_meta(),
    }
}

/// Builds the detail panel for the selected record, if any.
pub fn build_detail_view<R: Record>(
    controller: &TableController<R>,
) -> Option<DetailViewModel<RecordId>> {
    let record = controller.selected_record()?;
    let id = record.id();
    let fields = controller
        .schema()
        .fields
        .iter()
        .map(|f| {
            let value = record.field(&f.name);
            (f.header(), format_opt_value(value.as_ref(), FmtStyle::Detail))
        })
        .collect();
    let hidden_in_list = !controller
        .matching_records()
        .iter()
        .any(|r| r.id() == id);

    Some(DetailViewModel {
        id,
        fields,
        hidden_in_list,
    })
}
