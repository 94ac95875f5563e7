//! Page-number strip with previous/next controls.
//!
//! The strip is a pure function of `(current_page, total_pages)`: at most
//! five page buttons plus the first and last page, with ellipsis markers
//! where pages are collapsed.

use egui::{Button, Response, RichText, Ui, vec2};

/// Page counts up to this value list every page without ellipses.
const MAX_PAGES_WITHOUT_ELLIPSIS: u32 = 5;

/// One entry of the page strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    EllipsisStart,
    EllipsisEnd,
}

/// Button size variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonSize {
    Small,
    #[default]
    Medium,
}

impl ButtonSize {
    pub fn height(self) -> f32 {
        match self {
            Self::Small => 28.0,
            Self::Medium => 36.0,
        }
    }
}

/// What a paginated view is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based.
    pub current_page: u32,
    pub total_pages: u32,
    pub button_size: ButtonSize,
}

impl PageInfo {
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        Self {
            current_page,
            total_pages,
            button_size: ButtonSize::default(),
        }
    }

    pub fn with_button_size(mut self, button_size: ButtonSize) -> Self {
        self.button_size = button_size;
        self
    }
}

/// Result of rendering the strip for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationResponse {
    /// The page the user moved to, if any.
    pub page_changed: Option<u32>,
    /// Set together with `page_changed`; the owner scrolls its content back
    /// to the top.
    pub scroll_to_top: bool,
}

/// Computes the entries of the page strip.
///
/// Returns an empty list when there is at most one page.
pub fn page_items(current: u32, total: u32) -> Vec<PageItem> {
    if total <= 1 {
        return Vec::new();
    }
    if total <= MAX_PAGES_WITHOUT_ELLIPSIS {
        return (1..=total).map(PageItem::Page).collect();
    }

    let mut start = current.saturating_sub(1).max(2);
    let mut end = (current + 1).min(total - 1);
    if current <= 3 {
        end = (total - 1).min(4);
    }
    if current >= total - 2 {
        start = (total - 3).max(2);
    }

    let mut items = vec![PageItem::Page(1)];
    if start > 2 {
        items.push(PageItem::EllipsisStart);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total - 1 {
        items.push(PageItem::EllipsisEnd);
    }
    items.push(PageItem::Page(total));
    items
}

/// Validates a page change request.
///
/// Returns the target only when it differs from `current` and lies within
/// `1..=total`.
pub fn request_page(current: u32, total: u32, target: u32) -> Option<u32> {
    (target != current && (1..=total).contains(&target)).then_some(target)
}

/// Renders the pagination strip.
///
/// Nothing is drawn when `info.total_pages <= 1`.
pub fn pagination(ui: &mut Ui, info: &PageInfo) -> PaginationResponse {
    let PageInfo {
        current_page: current,
        total_pages: total,
        button_size,
    } = *info;

    if total <= 1 {
        return PaginationResponse::default();
    }

    let height = button_size.height();
    let mut target = None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        if nav_button(ui, "Previous", height, current > 1).clicked() {
            target = Some(current.saturating_sub(1));
        }

        for item in page_items(current, total) {
            match item {
                PageItem::Page(page) => {
                    let is_current = page == current;
                    let text = if is_current {
                        RichText::new(page.to_string()).strong()
                    } else {
                        RichText::new(page.to_string())
                    };
                    let button = Button::new(text)
                        .selected(is_current)
                        .min_size(vec2(height, height));
                    if ui.add(button).clicked() {
                        target = Some(page);
                    }
                }
                PageItem::EllipsisStart | PageItem::EllipsisEnd => {
                    ui.weak("...");
                }
            }
        }

        if nav_button(ui, "Next", height, current < total).clicked() {
            target = Some(current + 1);
        }
    });

    match target.and_then(|target| request_page(current, total, target)) {
        Some(page) => {
            log::debug!("Pagination moved from page {current} to {page}");
            PaginationResponse {
                page_changed: Some(page),
                scroll_to_top: true,
            }
        }
        None => PaginationResponse::default(),
    }
}

fn nav_button(ui: &mut Ui, label: &str, height: f32, enabled: bool) -> Response {
    ui.add_enabled(enabled, Button::new(label).min_size(vec2(0.0, height)))
}

#[cfg(test)]
mod tests {
    use egui_kittest::Harness;
    use kittest::Queryable;

    use super::PageItem::{EllipsisEnd, EllipsisStart, Page};
    use super::*;

    #[test]
    fn test_no_items_for_single_page() {
        assert!(page_items(1, 1).is_empty());
        assert!(page_items(1, 0).is_empty());
    }

    #[test]
    fn test_all_pages_up_to_five() {
        for total in 2..=5 {
            for current in 1..=total {
                let expected: Vec<PageItem> = (1..=total).map(Page).collect();
                assert_eq!(page_items(current, total), expected, "current={current}");
            }
        }
    }

    #[test]
    fn test_window_at_first_page() {
        assert_eq!(
            page_items(1, 10),
            vec![Page(1), Page(2), Page(3), Page(4), EllipsisEnd, Page(10)]
        );
    }

    #[test]
    fn test_window_in_the_middle() {
        assert_eq!(
            page_items(5, 10),
            vec![
                Page(1),
                EllipsisStart,
                Page(4),
                Page(5),
                Page(6),
                EllipsisEnd,
                Page(10)
            ]
        );
    }

    #[test]
    fn test_window_at_last_page() {
        assert_eq!(
            page_items(10, 10),
            vec![Page(1), EllipsisStart, Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_window_edges_around_the_clamps() {
        assert_eq!(
            page_items(3, 10),
            vec![Page(1), Page(2), Page(3), Page(4), EllipsisEnd, Page(10)]
        );
        assert_eq!(
            page_items(4, 10),
            vec![
                Page(1),
                EllipsisStart,
                Page(3),
                Page(4),
                Page(5),
                EllipsisEnd,
                Page(10)
            ]
        );
        assert_eq!(
            page_items(8, 10),
            vec![Page(1), EllipsisStart, Page(7), Page(8), Page(9), Page(10)]
        );
        // Six pages: page 5 still collapses while page 3 is current.
        assert_eq!(
            page_items(3, 6),
            vec![Page(1), Page(2), Page(3), Page(4), EllipsisEnd, Page(6)]
        );
        assert_eq!(
            page_items(4, 6),
            vec![Page(1), EllipsisStart, Page(3), Page(4), Page(5), Page(6)]
        );
    }

    #[test]
    fn test_request_page_bounds() {
        assert_eq!(request_page(1, 5, 0), None);
        assert_eq!(request_page(5, 5, 6), None);
        assert_eq!(request_page(3, 5, 3), None);
        assert_eq!(request_page(3, 5, 4), Some(4));
        assert_eq!(request_page(3, 5, 1), Some(1));
    }

    #[test]
    fn test_button_heights() {
        assert!((ButtonSize::Small.height() - 28.0).abs() < f32::EPSILON);
        assert!((ButtonSize::default().height() - 36.0).abs() < f32::EPSILON);
    }

    struct PagerState {
        info: PageInfo,
        changes: Vec<u32>,
        scroll_requests: usize,
    }

    impl PagerState {
        fn new(current: u32, total: u32) -> Self {
            Self {
                info: PageInfo::new(current, total),
                changes: Vec::new(),
                scroll_requests: 0,
            }
        }
    }

    fn pager_harness(state: PagerState) -> Harness<'static, PagerState> {
        Harness::new_ui_state(
            |ui, state: &mut PagerState| {
                let response = pagination(ui, &state.info);
                if let Some(page) = response.page_changed {
                    state.changes.push(page);
                    state.info.current_page = page;
                }
                if response.scroll_to_top {
                    state.scroll_requests += 1;
                }
            },
            state,
        )
    }

    #[test]
    fn test_renders_nothing_for_one_page() {
        let harness = pager_harness(PagerState::new(1, 1));

        assert!(
            harness.query_by_label("Previous").is_none(),
            "Previous should not render for a single page"
        );
        assert!(
            harness.query_by_label("Next").is_none(),
            "Next should not render for a single page"
        );
    }

    #[test]
    fn test_renders_ellipses() {
        let harness = pager_harness(PagerState::new(5, 10));

        assert_eq!(harness.query_all_by_label("...").count(), 2);
        assert!(harness.query_by_label("10").is_some(), "last page shown");
        assert!(harness.query_by_label("2").is_none(), "page 2 collapsed");
    }

    #[test]
    fn test_next_moves_forward_and_requests_scroll() {
        let mut harness = pager_harness(PagerState::new(1, 10));

        harness.get_by_label("Next").click();
        harness.run();

        assert_eq!(harness.state().changes, vec![2]);
        assert_eq!(harness.state().scroll_requests, 1);
    }

    #[test]
    fn test_page_button_moves_to_page() {
        let mut harness = pager_harness(PagerState::new(1, 10));

        harness.get_by_label("4").click();
        harness.run();

        assert_eq!(harness.state().changes, vec![4]);
        assert_eq!(harness.state().info.current_page, 4);
    }

    #[test]
    fn test_previous_on_first_page_is_inert() {
        let mut harness = pager_harness(PagerState::new(1, 3));

        harness.get_by_label("Previous").click();
        harness.run();

        assert!(harness.state().changes.is_empty());
        assert_eq!(harness.state().scroll_requests, 0);
    }

    #[test]
    fn test_next_on_last_page_is_inert() {
        let mut harness = pager_harness(PagerState::new(3, 3));

        harness.get_by_label("Next").click();
        harness.run();

        assert!(harness.state().changes.is_empty());
    }

    #[test]
    fn test_clicking_current_page_is_inert() {
        let mut harness = pager_harness(PagerState::new(2, 3));

        harness.get_by_label("2").click();
        harness.run();

        assert!(harness.state().changes.is_empty());
    }
}
