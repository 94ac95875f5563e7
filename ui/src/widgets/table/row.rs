//! Body rows of the data table.

use egui_extras::TableRow;

use super::cells::{paint_highlight, render_count_cell, render_selection_cell};
use super::columns::TableColumn;
use super::record::TableRecord;
use super::state::{SelectionChange, SelectionMode, TableState};

pub const LOADING_TEXT: &str = "Loading";
pub const NO_RESULTS_TEXT: &str = "No results were found";

/// What the body shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLayout {
    /// A single "Loading" row.
    Loading,
    /// A single "No results were found" row.
    Empty,
    /// Highlighted rows first, then the normal rows.
    Rows { highlighted: usize, normal: usize },
}

impl BodyLayout {
    pub fn new(loading: bool, highlighted: usize, normal: usize) -> Self {
        if loading {
            Self::Loading
        } else if highlighted + normal == 0 {
            Self::Empty
        } else {
            Self::Rows {
                highlighted,
                normal,
            }
        }
    }

    /// Number of body rows, counting a message row as one.
    pub fn row_count(self) -> usize {
        match self {
            Self::Loading | Self::Empty => 1,
            Self::Rows {
                highlighted,
                normal,
            } => highlighted + normal,
        }
    }

    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::Loading => Some(LOADING_TEXT),
            Self::Empty => Some(NO_RESULTS_TEXT),
            Self::Rows { .. } => None,
        }
    }
}

pub(crate) struct RowContext<'c, T> {
    pub columns: &'c [TableColumn<T>],
    pub selection: Option<SelectionMode>,
    pub count_column: bool,
}

/// One record row.
pub(crate) struct RecordRow<'r, T> {
    pub record: &'r T,
    /// 1-based position shown in the count column.
    pub number: usize,
    pub highlighted: bool,
}

/// Renders one record row and applies a selection click to `state`.
pub(crate) fn render_record_row<T: TableRecord + Clone>(
    row: &mut TableRow<'_, '_>,
    ctx: &RowContext<'_, T>,
    data: &RecordRow<'_, T>,
    state: &mut TableState<T>,
) -> Option<SelectionChange<T>> {
    let key = data.record.row_key();
    let mut change = None;

    if let Some(mode) = ctx.selection {
        let checked = state.is_checked(&key);
        row.col(|ui| {
            if data.highlighted {
                paint_highlight(ui);
            }
            change = match render_selection_cell(ui, mode, checked) {
                Some(true) => Some(state.select(data.record)),
                Some(false) => Some(state.unselect(data.record)),
                None => None,
            };
        });
    }

    if ctx.count_column {
        row.col(|ui| {
            if data.highlighted {
                paint_highlight(ui);
            }
            render_count_cell(ui, data.number);
        });
    }

    for column in ctx.columns {
        row.col(|ui| {
            if data.highlighted {
                paint_highlight(ui);
            }
            ui.push_id(&key, |ui| column.show_cell(ui, data.record));
        });
    }

    if let Some(change) = &change {
        log::debug!("Row {key} selection now holds {} rows", change.keys.len());
    }
    change
}
