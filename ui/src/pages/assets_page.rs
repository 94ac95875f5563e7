//! Asset management page.

use egui::{Button, Color32, Id, Key, TextEdit, Ui, Window};
use flume::{Receiver, Sender};
use oam_business::{ApiResult, AssetState, AssetTableItem, Category, ListClient, Sort, keys};

use super::list_page::{ListPage, OptimisticEdit};
use super::{put_row_request, spawn, take_row_request};
use crate::widgets::{Align, TableColumn, TableRecord};

pub const ASSETS_ENDPOINT: &str = "assets";
pub const CATEGORIES_ENDPOINT: &str = "categories";
const DEFAULT_SORT_KEY: &str = "name";
/// State filter applied when the URL carries none.
const DEFAULT_STATES: [AssetState; 3] = [
    AssetState::Available,
    AssetState::NotAvailable,
    AssetState::Assigned,
];

impl TableRecord for AssetTableItem {
    type Key = String;

    fn row_key(&self) -> String {
        self.id.clone()
    }

    fn field_text(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "code" => Some(self.code.clone()),
            "name" => Some(self.name.clone()),
            "categoryName" => Some(self.category_name.clone()),
            "state" => Some(self.state.as_str().to_owned()),
            _ => None,
        }
    }
}

fn delete_request_id() -> Id {
    Id::new("assets_delete_request")
}

fn asset_columns() -> Vec<TableColumn<AssetTableItem>> {
    vec![
        TableColumn::new("code", "Asset Code").sortable(true).width(150.0),
        TableColumn::new("name", "Asset Name")
            .sortable(true)
            .min_width(150.0),
        TableColumn::new("categoryName", "Category").sortable(true),
        TableColumn::new("state", "State")
            .sortable(true)
            .render(|ui, value, _| {
                ui.label(AssetState::parse(value.unwrap_or_default()).label());
            }),
        TableColumn::new("actions", "Actions")
            .width(150.0)
            .align(Align::Center)
            .render(|ui, _, asset: &AssetTableItem| {
                let delete = Button::new("Delete");
                if ui
                    .add_enabled(!asset.is_locked(), delete)
                    .on_disabled_hover_text("Assigned assets cannot be deleted")
                    .clicked()
                {
                    put_row_request(ui.ctx(), delete_request_id(), asset.clone());
                }
            }),
    ]
}

pub struct AssetsPage {
    pub(crate) list: ListPage<AssetTableItem>,
    columns: Vec<TableColumn<AssetTableItem>>,
    pub(crate) search_input: String,
    pub pending_delete: Option<AssetTableItem>,
    pub(crate) delete_in_progress: bool,
    pub(crate) delete_error: Option<String>,
    /// The row hidden while its delete request is in flight.
    removed: Option<OptimisticEdit<AssetTableItem>>,
    delete_sender: Sender<ApiResult<()>>,
    delete_receiver: Receiver<ApiResult<()>>,
    /// Options of the category filter, loaded once.
    pub(crate) categories: Vec<Category>,
    categories_requested: bool,
    categories_sender: Sender<ApiResult<Vec<Category>>>,
    categories_receiver: Receiver<ApiResult<Vec<Category>>>,
}

impl AssetsPage {
    pub fn new(client: ListClient, query_string: &str) -> Self {
        let mut list = ListPage::new(
            ASSETS_ENDPOINT,
            client,
            query_string,
            Sort::asc(DEFAULT_SORT_KEY),
        );
        if list.query().filter(keys::STATES).is_empty() {
            let states = DEFAULT_STATES.iter().map(|s| s.as_str().to_owned()).collect();
            list.set_query(list.query().clone().with_filter(keys::STATES, states));
        }
        let search_input = list.query().search.clone();
        let (delete_sender, delete_receiver) = flume::unbounded();
        let (categories_sender, categories_receiver) = flume::unbounded();

        Self {
            list,
            columns: asset_columns(),
            search_input,
            pending_delete: None,
            delete_in_progress: false,
            delete_error: None,
            removed: None,
            delete_sender,
            delete_receiver,
            categories: Vec::new(),
            categories_requested: false,
            categories_sender,
            categories_receiver,
        }
    }

    pub fn list(&self) -> &ListPage<AssetTableItem> {
        &self.list
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Marks an asset that was just edited elsewhere.
    pub fn highlight(&mut self, asset: AssetTableItem) {
        self.list.highlight(asset);
    }

    pub fn show(&mut self, ui: &mut Ui) {
        self.poll_delete();
        self.poll_categories();
        self.ensure_categories(ui.ctx());

        ui.heading("Asset List");
        ui.add_space(8.0);
        self.toolbar(ui);

        if let Some(error) = self.list.error() {
            ui.colored_label(Color32::RED, format!("Error: {error}"));
        }
        ui.add_space(8.0);

        let columns = &self.columns;
        self.list
            .show_table(ui, columns, |table| table.resizable(true));

        if let Some(asset) = take_row_request(ui.ctx(), delete_request_id()) {
            self.pending_delete = Some(asset);
            self.delete_error = None;
        }
        self.delete_modal(ui);
    }

    fn toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.menu_button("State", |ui| {
                let selected = self.list.query().filter(keys::STATES).to_vec();
                for state in AssetState::ALL {
                    let mut checked = selected.iter().any(|s| s == state.as_str());
                    if ui.checkbox(&mut checked, state.label()).changed() {
                        let values = AssetState::ALL
                            .into_iter()
                            .filter(|other| {
                                if *other == state {
                                    checked
                                } else {
                                    selected.iter().any(|s| s == other.as_str())
                                }
                            })
                            .map(|other| other.as_str().to_owned())
                            .collect();
                        self.list
                            .set_query(self.list.query().clone().with_filter(keys::STATES, values));
                    }
                }
            });

            ui.menu_button("Category", |ui| {
                if self.categories.is_empty() {
                    ui.weak("No categories");
                }
                let selected = self.list.query().filter(keys::CATEGORIES).to_vec();
                for category in &self.categories {
                    let mut checked = selected.contains(&category.name);
                    if ui.checkbox(&mut checked, &category.name).changed() {
                        let values = self
                            .categories
                            .iter()
                            .filter(|other| {
                                if other.name == category.name {
                                    checked
                                } else {
                                    selected.contains(&other.name)
                                }
                            })
                            .map(|other| other.name.clone())
                            .collect();
                        self.list.set_query(
                            self.list.query().clone().with_filter(keys::CATEGORIES, values),
                        );
                    }
                }
            });

            let search = ui.add(
                TextEdit::singleline(&mut self.search_input)
                    .hint_text("Search by Asset Code or Asset Name")
                    .desired_width(280.0),
            );
            let submitted = search.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            if ui.button("Search").clicked() || submitted {
                self.list
                    .set_query(self.list.query().clone().with_search(self.search_input.clone()));
            }

            if ui.button("Refresh").clicked() {
                self.list.refresh();
            }
            if self.list.is_fetching() {
                ui.spinner();
            }
        });
    }

    fn ensure_categories(&mut self, ctx: &egui::Context) {
        if self.categories_requested {
            return;
        }
        self.categories_requested = true;

        let client = self.list.client().clone();
        let sender = self.categories_sender.clone();
        let ctx = ctx.clone();
        let task = async move {
            let result = client.fetch_list::<Category>(CATEGORIES_ENDPOINT).await;
            if sender.send(result).is_err() {
                log::debug!("Asset page closed before categories loaded");
            }
            ctx.request_repaint();
        };

        if let Err(err) = spawn(task) {
            log::warn!("Cannot load categories: {err}");
        }
    }

    fn poll_categories(&mut self) {
        while let Ok(result) = self.categories_receiver.try_recv() {
            match result {
                Ok(categories) => self.categories = categories,
                Err(err) => log::warn!("Failed to load categories: {err}"),
            }
        }
    }

    fn delete_modal(&mut self, ui: &Ui) {
        let Some(asset) = self.pending_delete.clone() else {
            return;
        };

        let mut open = true;
        Window::new("Are you sure?")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ui.ctx(), |ui| {
                ui.label(format!("Do you want to delete asset {}?", asset.name));
                if let Some(error) = &self.delete_error {
                    ui.colored_label(Color32::RED, format!("Error: {error}"));
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let confirm = ui.add_enabled(!self.delete_in_progress, Button::new("Delete"));
                    if confirm.clicked() {
                        self.start_delete(&asset, ui.ctx());
                    }
                    if ui.button("Cancel").clicked() {
                        self.pending_delete = None;
                    }
                    if self.delete_in_progress {
                        ui.spinner();
                    }
                });
            });

        if !open {
            self.pending_delete = None;
        }
    }

    fn start_delete(&mut self, asset: &AssetTableItem, ctx: &egui::Context) {
        self.delete_in_progress = true;
        self.delete_error = None;
        self.removed = Some(self.list.remove_optimistic(&asset.id));

        let client = self.list.client().clone();
        let id = asset.id.clone();
        let sender = self.delete_sender.clone();
        let ctx = ctx.clone();
        let task = async move {
            let result = client.delete(ASSETS_ENDPOINT, &id).await;
            if sender.send(result).is_err() {
                log::debug!("Asset page closed before deleting {id}");
            }
            ctx.request_repaint();
        };

        if let Err(err) = spawn(task) {
            self.delete_in_progress = false;
            self.delete_error = Some(format!("No async runtime: {err}"));
            self.restore_removed();
        }
    }

    fn restore_removed(&mut self) {
        if let Some(edit) = self.removed.take() {
            self.list.restore(edit);
        }
    }

    fn poll_delete(&mut self) {
        while let Ok(result) = self.delete_receiver.try_recv() {
            self.delete_in_progress = false;
            match result {
                Ok(()) => {
                    if let Some(asset) = self.pending_delete.take() {
                        log::info!("Deleted asset {}", asset.code);
                    }
                    self.removed = None;
                    self.list.reload();
                }
                Err(err) => {
                    log::warn!("Failed to delete asset: {err}");
                    self.delete_error = Some(err.to_string());
                    self.restore_removed();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use egui_kittest::Harness;
    use kittest::Queryable;
    use oam_business::{BusinessConfig, Page, Pageable, RequestCache};

    use super::*;
    use crate::pages::test_support::{MIN_WINDOW_CONTENT_WIDTH, min_table_width};

    fn client() -> ListClient {
        ListClient::new(BusinessConfig::new("http://test".to_owned()), RequestCache::new())
    }

    fn asset(id: &str, code: &str, state: AssetState) -> AssetTableItem {
        AssetTableItem {
            id: id.to_owned(),
            code: code.to_owned(),
            name: format!("Asset {code}"),
            category_name: "Laptop".to_owned(),
            state,
        }
    }

    /// A page that already holds data. Without a runtime its fetch fails
    /// fast and the rows stay on screen.
    fn loaded_page(content: Vec<AssetTableItem>, total_pages: u32) -> AssetsPage {
        let mut page = AssetsPage::new(client(), "");
        page.list.update_page(Page {
            content,
            pageable: Pageable {
                total_pages,
                ..Pageable::default()
            },
        });
        page
    }

    #[test]
    fn test_default_state_filter_is_applied() {
        let page = AssetsPage::new(client(), "");

        assert_eq!(
            page.list().query().filter(keys::STATES),
            ["AVAILABLE", "NOT_AVAILABLE", "ASSIGNED"]
        );
        assert_eq!(page.list().query().sort, Some(Sort::asc("name")));
    }

    #[test]
    fn test_url_state_filter_is_kept() {
        let page = AssetsPage::new(client(), "states=RECYCLED&sort=code&sortOrder=desc");

        assert_eq!(page.list().query().filter(keys::STATES), ["RECYCLED"]);
        assert_eq!(page.list().query().sort, Some(Sort::desc("code")));
    }

    #[test]
    fn test_state_column_shows_label() {
        let page = loaded_page(
            vec![asset("1", "LA000001", AssetState::WaitingForRecycling)],
            1,
        );
        let harness = Harness::new_ui_state(|ui, page: &mut AssetsPage| page.show(ui), page);

        assert!(harness.query_by_label("LA000001").is_some());
        assert!(
            harness
                .query_by_label(AssetState::WaitingForRecycling.label())
                .is_some(),
            "state label should be rendered"
        );
    }

    #[test]
    fn test_highlighted_asset_is_not_duplicated() {
        let mut page = loaded_page(
            vec![
                asset("1", "LA000001", AssetState::Available),
                asset("2", "LA000002", AssetState::Available),
            ],
            1,
        );
        page.highlight(asset("2", "LA000002", AssetState::Available));
        let harness = Harness::new_ui_state(|ui, page: &mut AssetsPage| page.show(ui), page);

        assert_eq!(harness.query_all_by_label("LA000002").count(), 1);
        assert!(harness.query_by_label("LA000001").is_some());
    }

    #[test]
    fn test_sort_click_updates_query() {
        let page = loaded_page(vec![asset("1", "LA000001", AssetState::Available)], 1);
        let mut harness = Harness::new_ui_state(|ui, page: &mut AssetsPage| page.show(ui), page);

        harness.get_by_label("Asset Code").click();
        harness.run();

        assert_eq!(harness.state().list().query().sort, Some(Sort::desc("code")));
        assert!(
            harness.state().list().query_string().contains("sort=code&sortOrder=desc"),
            "query string: {}",
            harness.state().list().query_string()
        );
    }

    #[test]
    fn test_delete_opens_confirmation() {
        let page = loaded_page(vec![asset("1", "LA000001", AssetState::Available)], 1);
        let mut harness = Harness::new_ui_state(|ui, page: &mut AssetsPage| page.show(ui), page);

        harness.get_by_label("Delete").click();
        harness.run();

        assert_eq!(
            harness.state().pending_delete.as_ref().map(|a| a.id.as_str()),
            Some("1")
        );
        assert!(harness.query_by_label_contains("Do you want to delete").is_some());
    }

    #[test]
    fn test_assigned_asset_cannot_be_deleted() {
        let page = loaded_page(vec![asset("1", "LA000001", AssetState::Assigned)], 1);
        let mut harness = Harness::new_ui_state(|ui, page: &mut AssetsPage| page.show(ui), page);

        harness.get_by_label("Delete").click();
        harness.run();

        assert!(harness.state().pending_delete.is_none());
    }

    #[test]
    fn test_cancel_closes_confirmation_for_good() {
        let page = loaded_page(vec![asset("1", "LA000001", AssetState::Available)], 1);
        let mut harness = Harness::new_ui_state(|ui, page: &mut AssetsPage| page.show(ui), page);

        harness.get_by_label("Delete").click();
        harness.run();
        harness.get_by_label("Cancel").click();
        harness.run();
        harness.run();

        assert!(harness.state().pending_delete.is_none());
        assert!(harness.query_by_label_contains("Do you want to delete").is_none());
    }

    #[test]
    fn test_delete_request_is_taken_once() {
        let ctx = egui::Context::default();
        put_row_request(&ctx, delete_request_id(), asset("1", "LA000001", AssetState::Available));

        let first: Option<AssetTableItem> = take_row_request(&ctx, delete_request_id());
        let second: Option<AssetTableItem> = take_row_request(&ctx, delete_request_id());

        assert_eq!(first.map(|a| a.id), Some("1".to_owned()));
        assert!(second.is_none());
    }

    #[test]
    fn test_columns_fit_minimum_window() {
        let width = min_table_width(&asset_columns(), 0);
        assert!(width <= MIN_WINDOW_CONTENT_WIDTH, "{width}");
    }
}
