//! Plain-text rendering of view models.

use std::fmt::Write as _;

use crate::table::DiffStatus;
use crate::view::common::{DetailViewModel, TableViewModel, ViewRow};

const SORT_ASC: &str = " ▲";
const SORT_DESC: &str = " ▼";
const COLUMN_GAP: &str = "  ";

/// Renders a table as aligned text.
///
/// Each row starts with a three-character marker: `>` for the cursor row,
/// `*` for the selected record, then `+` (new) or `~` (modified).
pub fn render_table<Id>(view: &TableViewModel<Id>) -> String {
    let headers: Vec<String> = view
        .headers
        .iter()
        .enumerate()
        .map(|(col, h)| match view.sort_column {
            Some(sc) if sc == col && view.sort_ascending => format!("{}{}", h, SORT_ASC),
            Some(sc) if sc == col => format!("{}{}", h, SORT_DESC),
            _ => h.clone(),
        })
        .collect();
    let widths: Vec<usize> = view
        .widths
        .iter()
        .zip(&headers)
        .map(|(&w, h)| w.max(h.chars().count()))
        .collect();

    let mut out = String::new();
    out.push_str(view.title.trim());
    out.push('\n');

    out.push_str("   ");
    push_cells(&mut out, &headers, &widths);

    if view.rows.is_empty() {
        out.push_str("   (no matching records)\n");
    }
    for row in &view.rows {
        out.push_str(&row_marker(row));
        push_cells(&mut out, &row.cells, &widths);
    }

    if let Some(page) = &view.page {
        let _ = writeln!(
            out,
            "page {}/{} ({} rows)",
            page.page,
            page.total_pages.max(1),
            page.total
        );
    }
    out
}

/// Renders the detail panel as `label: value` lines.
pub fn render_detail<Id: std::fmt::Display>(detail: &DetailViewModel<Id>) -> String {
    let mut out = String::new();
    let _ = write!(out, "Record {}", detail.id);
    if detail.hidden_in_list {
        out.push_str(" (hidden by current filters)");
    }
    out.push('\n');

    let label_width = detail
        .fields
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    for (label, value) in &detail.fields {
        let _ = writeln!(out, "  {:<width$}  {}", label, value, width = label_width);
    }
    out
}

fn row_marker<Id>(row: &ViewRow<Id>) -> String {
    let focus = if row.focused { '>' } else { ' ' };
    let selected = if row.selected { '*' } else { ' ' };
    let diff = match row.diff {
        DiffStatus::New => '+',
        DiffStatus::Modified(_) => '~',
        DiffStatus::Unchanged => ' ',
    };
    format!("{}{}{}", focus, selected, diff)
}

fn push_cells(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
        .collect();
    out.push_str(line.join(COLUMN_GAP).trim_end());
    out.push('\n');
}
