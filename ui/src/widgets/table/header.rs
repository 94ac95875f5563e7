//! Header row: column titles, sort indicators and resize handles.

use egui::{Button, CursorIcon, Id, Rect, RichText, Sense, Ui, WidgetInfo, WidgetType};
use egui_extras::TableRow;
use oam_business::SortOrder;

use super::columns::{RESIZE_HANDLE_HALF_WIDTH, TableColumn};
use super::record::TableRecord;
use super::state::TableState;

/// Title of the row-number column.
pub const COUNT_HEADER: &str = "No.";

pub(crate) struct HeaderContext<'c, T> {
    pub table_id: Id,
    pub columns: &'c [TableColumn<T>],
    pub selectable: bool,
    pub count_column: bool,
    pub resizable: bool,
}

#[derive(Debug, Default)]
pub(crate) struct HeaderResult {
    /// Key of the sortable column whose title was clicked.
    pub sort_clicked: Option<String>,
    /// Horizontal extent of the whole header.
    pub table_width: f32,
}

/// Renders the header row.
pub(crate) fn render_table_header<T: TableRecord + Clone>(
    header: &mut TableRow<'_, '_>,
    ctx: &HeaderContext<'_, T>,
    state: &mut TableState<T>,
) -> HeaderResult {
    let mut result = HeaderResult::default();
    let mut extent: Option<Rect> = None;
    let mut grow = |rect: Rect| {
        extent = Some(extent.map_or(rect, |known| known.union(rect)));
    };

    if ctx.selectable {
        let (rect, _) = header.col(|_| {});
        grow(rect);
    }
    if ctx.count_column {
        let (rect, _) = header.col(|ui| {
            ui.centered_and_justified(|ui| {
                ui.strong(COUNT_HEADER);
            });
        });
        grow(rect);
    }

    let last = ctx.columns.len().saturating_sub(1);
    for (index, column) in ctx.columns.iter().enumerate() {
        let active = state
            .sort()
            .filter(|sort| sort.key == column.key)
            .map(|sort| sort.order);

        let (rect, _) = header.col(|ui| {
            if render_header_title(ui, column, active) {
                result.sort_clicked = Some(column.key.clone());
            }
            if ctx.resizable && index < last {
                render_resize_handle(ui, ctx.table_id, column, state);
            }
        });
        grow(rect);
    }

    result.table_width = extent.map_or(0.0, |rect| rect.width());
    result
}

/// Title plus sort indicator. Returns `true` when a sortable title was
/// clicked.
fn render_header_title<T>(ui: &mut Ui, column: &TableColumn<T>, active: Option<SortOrder>) -> bool {
    ui.horizontal(|ui| {
        if !column.sortable {
            ui.strong(&column.title);
            return false;
        }

        let clicked = ui
            .add(Button::new(RichText::new(&column.title).strong()).frame(false))
            .clicked();
        render_sort_indicator(ui, active);
        clicked
    })
    .inner
}

/// Up arrow is emphasised while sorted descending, down arrow while
/// ascending.
fn render_sort_indicator(ui: &mut Ui, active: Option<SortOrder>) {
    let strong = ui.visuals().strong_text_color();
    let weak = ui.visuals().weak_text_color();
    let (up, down) = match active {
        Some(SortOrder::Desc) => (strong, weak),
        Some(SortOrder::Asc) => (weak, strong),
        None => (weak, weak),
    };

    ui.spacing_mut().item_spacing.x = 0.0;
    ui.label(RichText::new("⬆").small().color(up));
    ui.label(RichText::new("⬇").small().color(down));
}

/// Accessible name of the resize handle after the column titled `title`.
pub fn resize_handle_label(title: &str) -> String {
    format!("Resize {title}")
}

fn render_resize_handle<T: TableRecord + Clone>(
    ui: &mut Ui,
    table_id: Id,
    column: &TableColumn<T>,
    state: &mut TableState<T>,
) {
    let cell = ui.max_rect();
    let handle = Rect::from_x_y_ranges(
        cell.right() - 2.0 * RESIZE_HANDLE_HALF_WIDTH..=cell.right(),
        cell.y_range(),
    );
    let id = table_id.with(("resize", column.key.as_str()));
    let response = ui
        .interact(handle, id, Sense::drag())
        .on_hover_and_drag_cursor(CursorIcon::ResizeColumn);
    response.widget_info(|| {
        WidgetInfo::labeled(WidgetType::Other, true, resize_handle_label(&column.title))
    });

    let stroke = if response.hovered() || response.dragged() {
        ui.visuals().widgets.active.bg_stroke
    } else {
        ui.visuals().widgets.noninteractive.bg_stroke
    };
    ui.painter()
        .vline(cell.right() - RESIZE_HANDLE_HALF_WIDTH, cell.y_range(), stroke);

    if response.drag_started()
        && let Some(pos) = response.interact_pointer_pos()
    {
        state.begin_resize(column.key.clone(), pos.x, column.effective_min_width());
    }
    if response.dragged()
        && let Some(pos) = response.interact_pointer_pos()
    {
        let table_width = state.last_table_width;
        // Only an applied width needs another frame to lay out.
        if state.drag_resize(pos.x, cell.width(), table_width).is_some() {
            ui.ctx().request_repaint();
        }
    }
    if response.drag_stopped() {
        state.end_resize();
    }
}
