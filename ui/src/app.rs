use oam_business::{BusinessConfig, ListClient, RequestCache};

use crate::pages::{AssetsPage, AssignmentsPage, ReportPage, ReturnRequestsPage, UsersPage};

/// Management page on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePage {
    #[default]
    Users,
    Assets,
    Assignments,
    ReturnRequests,
    Report,
}

impl ActivePage {
    pub const ALL: [Self; 5] = [
        Self::Users,
        Self::Assets,
        Self::Assignments,
        Self::ReturnRequests,
        Self::Report,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Users => "Manage User",
            Self::Assets => "Manage Asset",
            Self::Assignments => "Manage Assignment",
            Self::ReturnRequests => "Request for Returning",
            Self::Report => "Report",
        }
    }
}

pub struct OamApp {
    config: BusinessConfig,
    active: ActivePage,
    users: UsersPage,
    assets: AssetsPage,
    assignments: AssignmentsPage,
    returns: ReturnRequestsPage,
    report: ReportPage,
}

impl OamApp {
    /// Called once before the first frame. All pages share one cache.
    pub fn new(config: BusinessConfig) -> Self {
        let client = ListClient::new(config.clone(), RequestCache::new());
        Self {
            users: UsersPage::new(client.clone(), ""),
            assets: AssetsPage::new(client.clone(), ""),
            assignments: AssignmentsPage::new(client.clone(), ""),
            returns: ReturnRequestsPage::new(client.clone(), ""),
            report: ReportPage::new(client, ""),
            config,
            active: ActivePage::default(),
        }
    }

    pub fn with_active_page(mut self, active: ActivePage) -> Self {
        self.active = active;
        self
    }

    pub fn active_page(&self) -> ActivePage {
        self.active
    }

    /// Draws one frame into `ctx`.
    pub fn ui(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                for page in ActivePage::ALL {
                    if ui
                        .selectable_value(&mut self.active, page, page.title())
                        .clicked()
                    {
                        log::info!("Switched to {}", page.title());
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(self.config.api_url().as_str());
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.active {
            ActivePage::Users => self.users.show(ui),
            ActivePage::Assets => self.assets.show(ui),
            ActivePage::Assignments => self.assignments.show(ui),
            ActivePage::ReturnRequests => self.returns.show(ui),
            ActivePage::Report => self.report.show(ui),
        });
    }
}

impl eframe::App for OamApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}

#[cfg(test)]
mod tests {
    use egui_kittest::Harness;
    use kittest::Queryable;

    use super::*;

    fn app() -> OamApp {
        OamApp::new(BusinessConfig::new("http://test".to_owned()))
    }

    #[test]
    fn test_starts_on_users() {
        let harness = Harness::new_state(|ctx, app: &mut OamApp| app.ui(ctx), app());

        assert!(harness.query_by_label("User List").is_some());
        assert!(harness.query_by_label("Asset List").is_none());
    }

    #[test]
    fn test_switch_to_assets() {
        let mut harness = Harness::new_state(|ctx, app: &mut OamApp| app.ui(ctx), app());

        harness.get_by_label("Manage Asset").click();
        harness.run();

        assert_eq!(harness.state().active_page(), ActivePage::Assets);
        assert!(harness.query_by_label("Asset List").is_some());
    }

    #[test]
    fn test_every_page_has_a_menu_entry() {
        let mut harness = Harness::new_state(|ctx, app: &mut OamApp| app.ui(ctx), app());

        for (page, heading) in ActivePage::ALL.into_iter().zip([
            "User List",
            "Asset List",
            "Assignment List",
            "Request List",
            "Report",
        ]) {
            if let Some(entry) = harness.get_all_by_label(page.title()).next() {
                entry.click();
            }
            harness.run();

            assert_eq!(harness.state().active_page(), page);
            assert!(
                harness.query_all_by_label(heading).next().is_some(),
                "{heading} should be shown"
            );
        }
    }

    #[test]
    fn test_api_url_is_shown() {
        let harness = Harness::new_state(
            |ctx, app: &mut OamApp| app.ui(ctx),
            app().with_active_page(ActivePage::Assets),
        );

        assert!(harness.query_by_label_contains("http://test").is_some());
    }
}
