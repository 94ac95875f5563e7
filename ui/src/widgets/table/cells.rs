//! Small cell renderers shared by the header and the body.

use egui::{Color32, RichText, Ui};

use super::state::SelectionMode;

/// Background of highlighted rows.
pub const HIGHLIGHT_FILL: Color32 = Color32::from_rgb(254, 249, 195);
/// Text color on highlighted rows, which keep a light fill in dark mode.
pub const HIGHLIGHT_TEXT: Color32 = Color32::from_rgb(31, 41, 55);

#[inline]
pub fn render_count_cell(ui: &mut Ui, number: usize) {
    ui.centered_and_justified(|ui| {
        ui.label(RichText::new(number.to_string()).monospace());
    });
}

/// Radio (single) or checkbox (multiple) selection input.
///
/// Returns `Some(true)` when the row was checked and `Some(false)` when it
/// was unchecked this frame.
#[inline]
pub fn render_selection_cell(ui: &mut Ui, mode: SelectionMode, checked: bool) -> Option<bool> {
    ui.centered_and_justified(|ui| match mode {
        SelectionMode::Single => (ui.radio(checked, "").clicked() && !checked).then_some(true),
        SelectionMode::Multiple => {
            let mut now_checked = checked;
            ui.checkbox(&mut now_checked, "")
                .changed()
                .then_some(now_checked)
        }
    })
    .inner
}

/// Fills the cell behind a highlighted row.
#[inline]
pub fn paint_highlight(ui: &mut Ui) {
    let rect = ui.max_rect();
    ui.painter().rect_filled(rect, 0.0, HIGHLIGHT_FILL);
    ui.visuals_mut().override_text_color = Some(HIGHLIGHT_TEXT);
}

/// Single message row shown instead of records ("Loading", no results).
#[inline]
pub fn render_message_row(ui: &mut Ui, width: f32, height: f32, message: &str) {
    ui.allocate_ui_with_layout(
        egui::vec2(width, height),
        egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
        |ui| {
            ui.weak(message);
        },
    );
}
