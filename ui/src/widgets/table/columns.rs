//! Column descriptors and the layout constants of the data table.

use egui::{Layout, Ui};
use egui_extras::Column;

use super::record::TableRecord;

/// Lower bound for resizing a column that declares no minimum of its own.
pub const MIN_COLUMN_WIDTH: f32 = 100.0;
pub const SELECT_WIDTH: f32 = 48.0;
pub const COUNT_WIDTH: f32 = 48.0;
pub const ROW_HEIGHT: f32 = 32.0;
pub const HEADER_HEIGHT: f32 = 32.0;
/// Half-width of the grab area at the trailing edge of a header cell.
pub const RESIZE_HANDLE_HALF_WIDTH: f32 = 3.0;

/// Declared width of a column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ColumnWidth {
    /// Share the remaining space with the other auto columns.
    #[default]
    Auto,
    Px(f32),
}

/// Horizontal alignment of cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn layout(self) -> Layout {
        match self {
            Self::Left => Layout::left_to_right(egui::Align::Center),
            Self::Center => Layout::centered_and_justified(egui::Direction::LeftToRight),
            Self::Right => Layout::right_to_left(egui::Align::Center),
        }
    }
}

/// Custom cell content. Receives the field text (if any) and the record.
pub type CellRenderer<T> = Box<dyn Fn(&mut Ui, Option<&str>, &T)>;

/// One column of a [`super::DataTable`].
pub struct TableColumn<T> {
    /// Field name passed to [`TableRecord::field_text`] and used as the sort
    /// key. Unique within a table.
    pub key: String,
    pub title: String,
    pub sortable: bool,
    pub width: ColumnWidth,
    pub min_width: Option<f32>,
    pub align: Align,
    renderer: Option<CellRenderer<T>>,
}

impl<T> std::fmt::Debug for TableColumn<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableColumn")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("width", &self.width)
            .field("min_width", &self.min_width)
            .field("align", &self.align)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

impl<T> TableColumn<T> {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            sortable: false,
            width: ColumnWidth::Auto,
            min_width: None,
            align: Align::Left,
            renderer: None,
        }
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = ColumnWidth::Px(width);
        self
    }

    pub fn min_width(mut self, min_width: f32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn render(mut self, renderer: impl Fn(&mut Ui, Option<&str>, &T) + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn effective_min_width(&self) -> f32 {
        self.min_width.unwrap_or(MIN_COLUMN_WIDTH)
    }

    /// egui layout for this column. A width set by resizing wins over the
    /// declared one.
    pub(crate) fn layout(&self, resized: Option<f32>) -> Column {
        match (resized, self.width) {
            (Some(width), _) | (None, ColumnWidth::Px(width)) => Column::exact(width),
            (None, ColumnWidth::Auto) => Column::remainder()
                .at_least(self.effective_min_width())
                .clip(true),
        }
    }
}

impl<T: TableRecord> TableColumn<T> {
    /// Cell text for `record`. Columns without a key have none.
    pub fn cell_text(&self, record: &T) -> Option<String> {
        if self.key.is_empty() {
            None
        } else {
            record.field_text(&self.key)
        }
    }

    pub(crate) fn show_cell(&self, ui: &mut Ui, record: &T) {
        let text = self.cell_text(record);
        ui.with_layout(self.align.layout(), |ui| match &self.renderer {
            Some(renderer) => renderer(ui, text.as_deref(), record),
            None => {
                if let Some(text) = text {
                    ui.label(text);
                }
            }
        });
    }
}
