//! Generic data table.
//!
//! The table tracks sort, selection and column widths in a caller-owned
//! [`TableState`] and reports what changed in a [`TableResponse`]. It never
//! sorts or pages `data` itself; the owner refetches and shows it again.
//!
//! - `columns`: column descriptors and layout constants
//! - `header`: titles, sort indicators and resize handles
//! - `row`: body layout and record rows
//! - `cells`: small shared cell renderers
//! - `state`: sort, selection and resize transitions

mod cells;
pub mod columns;
pub mod header;
mod record;
pub mod row;
mod state;

use std::hash::Hash;

use egui::{Id, Layout, Ui};
use egui_extras::{Column, TableBuilder};
use oam_business::Sort;

use super::pagination::{PageInfo, pagination};
use cells::render_message_row;
use header::{HeaderContext, HeaderResult, render_table_header};
use row::{BodyLayout, RecordRow, RowContext, render_record_row};

pub use columns::{Align, CellRenderer, ColumnWidth, MIN_COLUMN_WIDTH, TableColumn};
pub use record::TableRecord;
pub use state::{ResizeDrag, SelectionChange, SelectionMode, TableState};

/// Events raised by a table during one frame.
#[derive(Debug)]
pub struct TableResponse<T: TableRecord> {
    pub sort_changed: Option<Sort>,
    pub selection_changed: Option<SelectionChange<T>>,
    pub page_changed: Option<u32>,
}

impl<T: TableRecord> Default for TableResponse<T> {
    fn default() -> Self {
        Self {
            sort_changed: None,
            selection_changed: None,
            page_changed: None,
        }
    }
}

/// Builder for one frame of a data table.
pub struct DataTable<'a, T> {
    id: Id,
    columns: &'a [TableColumn<T>],
    data: &'a [T],
    highlighted: &'a [T],
    resizable: bool,
    count_column: bool,
    selection: Option<SelectionMode>,
    loading: bool,
    pagination: Option<PageInfo>,
    row_height: f32,
}

impl<'a, T: TableRecord + Clone> DataTable<'a, T> {
    pub fn new(id_salt: impl Hash, columns: &'a [TableColumn<T>], data: &'a [T]) -> Self {
        Self {
            id: Id::new(id_salt),
            columns,
            data,
            highlighted: &[],
            resizable: false,
            count_column: false,
            selection: None,
            loading: false,
            pagination: None,
            row_height: columns::ROW_HEIGHT,
        }
    }

    /// Rows shown first with a highlight fill, e.g. a just-edited record.
    /// The owner keeps them out of `data`.
    pub fn highlighted_rows(mut self, rows: &'a [T]) -> Self {
        self.highlighted = rows;
        self
    }

    /// Drag handles on every column edge except the last.
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Leading "No." column numbering the rows.
    pub fn count_column(mut self, count_column: bool) -> Self {
        self.count_column = count_column;
        self
    }

    /// Leading selection column.
    pub fn row_selection(mut self, mode: SelectionMode) -> Self {
        self.selection = Some(mode);
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Pagination footer.
    pub fn pagination(mut self, info: PageInfo) -> Self {
        self.pagination = Some(info);
        self
    }

    pub fn row_height(mut self, row_height: f32) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn show(self, ui: &mut Ui, state: &mut TableState<T>) -> TableResponse<T> {
        let mut response = TableResponse::default();

        if let Some(mode) = self.selection {
            state.set_selection_mode(mode);
        }
        // A drag whose release happened while the table was not shown.
        if state.resize_drag().is_some() && !ui.input(|i| i.pointer.primary_down()) {
            state.end_resize();
        }

        let layout = BodyLayout::new(self.loading, self.highlighted.len(), self.data.len());
        let header_ctx = HeaderContext {
            table_id: self.id,
            columns: self.columns,
            selectable: self.selection.is_some(),
            count_column: self.count_column,
            resizable: self.resizable,
        };
        let row_ctx = RowContext {
            columns: self.columns,
            selection: self.selection,
            count_column: self.count_column,
        };

        let mut builder = TableBuilder::new(ui)
            .id_salt(self.id)
            .striped(true)
            .cell_layout(Layout::left_to_right(egui::Align::Center))
            .min_scrolled_height(0.0);
        if self.selection.is_some() {
            builder = builder.column(Column::exact(columns::SELECT_WIDTH));
        }
        if self.count_column {
            builder = builder.column(Column::exact(columns::COUNT_WIDTH));
        }
        for column in self.columns {
            builder = builder.column(column.layout(state.column_width(&column.key)));
        }
        if std::mem::take(&mut state.scroll_to_top) {
            builder = builder.vertical_scroll_offset(0.0);
        }

        let mut header_result = HeaderResult::default();
        let table = builder.header(columns::HEADER_HEIGHT, |mut header| {
            header_result = render_table_header(&mut header, &header_ctx, state);
        });

        let highlighted = self.highlighted;
        let data = self.data;
        let row_height = self.row_height;
        table.body(|body| {
            if let BodyLayout::Rows { .. } = layout {
                body.rows(row_height, layout.row_count(), |mut row| {
                    let index = row.index();
                    let record = match highlighted.get(index) {
                        Some(record) => RecordRow {
                            record,
                            number: index + 1,
                            highlighted: true,
                        },
                        None => {
                            let Some(record) = data.get(index - highlighted.len()) else {
                                return;
                            };
                            RecordRow {
                                record,
                                number: index + 1,
                                highlighted: false,
                            }
                        }
                    };
                    if let Some(change) = render_record_row(&mut row, &row_ctx, &record, state) {
                        response.selection_changed = Some(change);
                    }
                });
            }
        });

        state.record_table_width(header_result.table_width);

        if let Some(message) = layout.message() {
            render_message_row(ui, header_result.table_width, row_height, message);
        }

        if let Some(key) = header_result.sort_clicked {
            response.sort_changed = Some(state.toggle_sort(&key));
        }

        if let Some(info) = self.pagination {
            ui.add_space(8.0);
            let paged = pagination(ui, &info);
            if paged.scroll_to_top {
                state.scroll_to_top = true;
                ui.ctx().request_repaint();
            }
            response.page_changed = paged.page_changed;
        }

        response
    }
}
