//! Keyboard cursor navigation over the rows of the current page.

/// Navigation trait for tables with a row cursor that follows a record.
///
/// Every movement clamps the cursor to the row range and then calls
/// [`NavigableTable::retrack`] so later sort/filter changes follow the record
/// now under the cursor instead of the previous one.
pub trait NavigableTable {
    fn cursor(&self) -> usize;
    fn cursor_mut(&mut self) -> &mut usize;
    /// Number of rows the cursor can move over.
    fn row_count(&self) -> usize;
    /// Anchor follow-tracking on the row currently under the cursor.
    fn retrack(&mut self);

    fn last_row(&self) -> usize {
        self.row_count().saturating_sub(1)
    }

    fn select_up(&mut self) {
        *self.cursor_mut() = self.cursor().saturating_sub(1);
        self.retrack();
    }

    fn select_down(&mut self) {
        *self.cursor_mut() = self.cursor().saturating_add(1).min(self.last_row());
        self.retrack();
    }

    fn page_up(&mut self, n: usize) {
        *self.cursor_mut() = self.cursor().saturating_sub(n);
        self.retrack();
    }

    fn page_down(&mut self, n: usize) {
        *self.cursor_mut() = self.cursor().saturating_add(n).min(self.last_row());
        self.retrack();
    }

    fn home(&mut self) {
        *self.cursor_mut() = 0;
        self.retrack();
    }

    fn end(&mut self) {
        *self.cursor_mut() = self.last_row();
        self.retrack();
    }
}
