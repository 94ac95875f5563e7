//! Local state of one data table instance.
//!
//! Sorting and selection are pure transitions on [`TableState`]; the widget
//! calls them in response to clicks and reports the outcome upward.

use std::collections::{HashMap, HashSet};

use oam_business::Sort;

use super::record::TableRecord;

/// How the leading selection column behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Radio buttons; every selection replaces the previous one.
    #[default]
    Single,
    /// Checkboxes; selections accumulate in click order.
    Multiple,
}

/// The selection after a change, as full rows and as parallel keys.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange<T: TableRecord> {
    pub rows: Vec<T>,
    pub keys: Vec<T::Key>,
}

/// An active column-resize drag.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeDrag {
    pub column: String,
    /// Pointer x at the last applied move.
    pub start_x: f32,
    pub min_width: f32,
}

#[derive(Debug)]
pub struct TableState<T: TableRecord> {
    sort: Option<Sort>,
    selection_mode: SelectionMode,
    selected_rows: Vec<T>,
    selected_keys: Vec<T::Key>,
    checked: HashSet<T::Key>,
    widths: HashMap<String, f32>,
    initial_table_width: Option<f32>,
    pub(crate) last_table_width: f32,
    resize: Option<ResizeDrag>,
    pub(crate) scroll_to_top: bool,
}

impl<T: TableRecord> Default for TableState<T> {
    fn default() -> Self {
        Self {
            sort: None,
            selection_mode: SelectionMode::default(),
            selected_rows: Vec::new(),
            selected_keys: Vec::new(),
            checked: HashSet::new(),
            widths: HashMap::new(),
            initial_table_width: None,
            last_table_width: 0.0,
            resize: None,
            scroll_to_top: false,
        }
    }
}

impl<T: TableRecord + Clone> TableState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the sort the owner already applies to its data.
    pub fn with_sort(mut self, sort: Option<Sort>) -> Self {
        self.sort = sort;
        self
    }

    /// Rows whose selection control starts checked.
    ///
    /// Only the visual state is seeded: the reported selection starts empty
    /// and later changes to the owner's key list are not picked up.
    pub fn with_default_selected_keys(mut self, keys: impl IntoIterator<Item = T::Key>) -> Self {
        self.checked = keys.into_iter().collect();
        self
    }

    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection_mode
    }

    pub(crate) fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection_mode = mode;
    }

    pub fn selected_rows(&self) -> &[T] {
        &self.selected_rows
    }

    pub fn selected_keys(&self) -> &[T::Key] {
        &self.selected_keys
    }

    pub fn is_checked(&self, key: &T::Key) -> bool {
        self.checked.contains(key)
    }

    /// Header click on a sortable column.
    pub fn toggle_sort(&mut self, key: &str) -> Sort {
        let sort = Sort::toggled_on(self.sort.as_ref(), key);
        log::debug!("Table sort changed to {} {}", sort.key, sort.order);
        self.sort = Some(sort.clone());
        sort
    }

    /// Checks `row`.
    ///
    /// In multiple mode a row that is already selected leaves the selection
    /// as it is.
    pub fn select(&mut self, row: &T) -> SelectionChange<T> {
        let key = row.row_key();
        match self.selection_mode {
            SelectionMode::Single => {
                self.selected_rows = vec![row.clone()];
                self.selected_keys = vec![key.clone()];
                self.checked.clear();
                self.checked.insert(key);
            }
            SelectionMode::Multiple => {
                if !self.selected_keys.contains(&key) {
                    self.selected_rows.push(row.clone());
                    self.selected_keys.push(key.clone());
                }
                self.checked.insert(key);
            }
        }
        self.selection_change()
    }

    /// Unchecks `row`, matching by key.
    pub fn unselect(&mut self, row: &T) -> SelectionChange<T> {
        let key = row.row_key();
        self.selected_rows.retain(|selected| selected.row_key() != key);
        self.selected_keys.retain(|selected| *selected != key);
        self.checked.remove(&key);
        self.selection_change()
    }

    fn selection_change(&self) -> SelectionChange<T> {
        SelectionChange {
            rows: self.selected_rows.clone(),
            keys: self.selected_keys.clone(),
        }
    }

    /// Width a column was resized to, if it was.
    pub fn column_width(&self, key: &str) -> Option<f32> {
        self.widths.get(key).copied()
    }

    pub fn resize_drag(&self) -> Option<&ResizeDrag> {
        self.resize.as_ref()
    }

    pub fn initial_table_width(&self) -> Option<f32> {
        self.initial_table_width
    }

    /// Remembers the first rendered table width; later calls are ignored.
    pub fn record_table_width(&mut self, width: f32) {
        if self.initial_table_width.is_none() && width > 0.0 {
            self.initial_table_width = Some(width);
        }
        self.last_table_width = width;
    }

    /// Pointer pressed on the resize handle of `column`.
    pub fn begin_resize(&mut self, column: impl Into<String>, pointer_x: f32, min_width: f32) {
        let column = column.into();
        log::trace!("Resize of column {column} started at x={pointer_x}");
        self.resize = Some(ResizeDrag {
            column,
            start_x: pointer_x,
            min_width,
        });
    }

    /// Pointer moved during a resize.
    ///
    /// `rendered_width` is the column's current width and `table_width` the
    /// table's current total width. The new width is applied only when it
    /// stays above the column minimum and the table is not wider than it was
    /// when first shown; the drag origin then moves to `pointer_x`. A
    /// pointer that has not moved changes nothing.
    pub fn drag_resize(
        &mut self,
        pointer_x: f32,
        rendered_width: f32,
        table_width: f32,
    ) -> Option<f32> {
        let initial = *self.initial_table_width.get_or_insert(table_width);
        let drag = self.resize.as_mut()?;

        let delta = pointer_x - drag.start_x;
        if delta.abs() <= f32::EPSILON {
            return None;
        }
        let new_width = rendered_width + delta;
        if new_width > drag.min_width && table_width <= initial {
            drag.start_x = pointer_x;
            self.widths.insert(drag.column.clone(), new_width);
            Some(new_width)
        } else {
            None
        }
    }

    /// Pointer released.
    pub fn end_resize(&mut self) {
        if let Some(drag) = self.resize.take() {
            log::trace!("Resize of column {} ended", drag.column);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oam_business::SortOrder;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: &'static str,
    }

    impl TableRecord for Row {
        type Key = &'static str;

        fn row_key(&self) -> &'static str {
            self.id
        }

        fn field_text(&self, key: &str) -> Option<String> {
            (key == "id").then(|| self.id.to_owned())
        }
    }

    const A: Row = Row { id: "a" };
    const B: Row = Row { id: "b" };
    const C: Row = Row { id: "c" };

    #[test]
    fn test_sort_cycle() {
        let mut state = TableState::<Row>::new();

        assert_eq!(state.toggle_sort("name"), Sort::new("name", SortOrder::Desc));
        assert_eq!(state.toggle_sort("name"), Sort::new("name", SortOrder::Asc));
        assert_eq!(state.toggle_sort("name"), Sort::new("name", SortOrder::Desc));
        assert_eq!(state.toggle_sort("code"), Sort::new("code", SortOrder::Desc));
        assert_eq!(state.sort(), Some(&Sort::new("code", SortOrder::Desc)));
    }

    #[test]
    fn test_sort_starts_from_given_sort() {
        let mut state = TableState::<Row>::new().with_sort(Some(Sort::asc("name")));

        assert_eq!(state.toggle_sort("name"), Sort::desc("name"));
    }

    #[test]
    fn test_single_selection_replaces() {
        let mut state = TableState::<Row>::new();

        state.select(&A);
        let change = state.select(&B);

        assert_eq!(change.keys, vec!["b"]);
        assert_eq!(change.rows, vec![B]);
        assert!(!state.is_checked(&"a"));
        assert!(state.is_checked(&"b"));
    }

    #[test]
    fn test_single_reselect_is_replace() {
        let mut state = TableState::<Row>::new();

        state.select(&A);
        let change = state.select(&A);

        assert_eq!(change.keys, vec!["a"]);
    }

    #[test]
    fn test_multiple_selection_appends_and_removes() {
        let mut state = TableState::<Row>::new().with_selection_mode(SelectionMode::Multiple);

        state.select(&A);
        state.select(&B);
        let change = state.unselect(&A);

        assert_eq!(change.keys, vec!["b"]);
        assert_eq!(change.rows, vec![B]);
    }

    #[test]
    fn test_multiple_selection_keeps_click_order_without_duplicates() {
        let mut state = TableState::<Row>::new().with_selection_mode(SelectionMode::Multiple);

        state.select(&C);
        state.select(&A);
        let change = state.select(&C);

        assert_eq!(change.keys, vec!["c", "a"]);
        assert_eq!(state.selected_rows(), &[C, A]);
    }

    #[test]
    fn test_default_keys_only_seed_checked_state() {
        let state = TableState::<Row>::new()
            .with_selection_mode(SelectionMode::Multiple)
            .with_default_selected_keys(["b"]);

        assert!(state.is_checked(&"b"));
        assert!(state.selected_keys().is_empty());
    }

    #[test]
    fn test_resize_respects_min_width() {
        let mut state = TableState::<Row>::new();
        state.record_table_width(600.0);
        state.begin_resize("name", 200.0, 100.0);

        // 150 - 60 = 90 would go below the minimum.
        assert_eq!(state.drag_resize(140.0, 150.0, 600.0), None);
        assert_eq!(state.column_width("name"), None);
        // Exactly the minimum is rejected too.
        assert_eq!(state.drag_resize(150.0, 150.0, 600.0), None);

        assert_eq!(state.drag_resize(170.0, 150.0, 600.0), Some(120.0));
        assert_eq!(state.column_width("name"), Some(120.0));
    }

    #[test]
    fn test_resize_moves_origin_after_each_applied_step() {
        let mut state = TableState::<Row>::new();
        state.record_table_width(600.0);
        state.begin_resize("name", 100.0, 100.0);

        assert_eq!(state.drag_resize(120.0, 200.0, 600.0), Some(220.0));
        assert_eq!(state.resize_drag().map(|drag| drag.start_x), Some(120.0));
        assert_eq!(state.drag_resize(130.0, 220.0, 600.0), Some(230.0));
    }

    #[test]
    fn test_resize_never_grows_past_initial_table_width() {
        let mut state = TableState::<Row>::new();
        state.record_table_width(600.0);
        state.begin_resize("name", 100.0, 100.0);

        assert_eq!(state.drag_resize(150.0, 200.0, 620.0), None);
        assert_eq!(state.resize_drag().map(|drag| drag.start_x), Some(100.0));
    }

    #[test]
    fn test_resize_without_drag_is_ignored() {
        let mut state = TableState::<Row>::new();
        state.record_table_width(600.0);

        assert_eq!(state.drag_resize(150.0, 200.0, 600.0), None);

        state.begin_resize("name", 100.0, 100.0);
        state.end_resize();
        assert!(state.resize_drag().is_none());
        assert_eq!(state.drag_resize(150.0, 200.0, 600.0), None);
    }

    #[test]
    fn test_still_pointer_changes_nothing() {
        let mut state = TableState::<Row>::new();
        state.record_table_width(600.0);
        state.begin_resize("name", 100.0, 100.0);

        assert_eq!(state.drag_resize(100.0, 200.0, 600.0), None);
        assert_eq!(state.column_width("name"), None);

        assert_eq!(state.drag_resize(90.0, 200.0, 600.0), Some(190.0));
        assert_eq!(state.drag_resize(90.0, 190.0, 600.0), None);
        assert_eq!(state.column_width("name"), Some(190.0));
    }

    #[test]
    fn test_initial_width_is_recorded_once() {
        let mut state = TableState::<Row>::new();
        state.record_table_width(0.0);
        assert_eq!(state.initial_table_width(), None);

        state.record_table_width(640.0);
        state.record_table_width(700.0);
        assert_eq!(state.initial_table_width(), Some(640.0));
    }
}
