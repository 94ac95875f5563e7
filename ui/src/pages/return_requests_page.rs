//! Requests for returning assets.

use egui::{Button, Color32, Id, Key, TextEdit, Ui, Window};
use flume::{Receiver, Sender};
use oam_business::{
    ApiResult, AssetReturnTableItem, ListClient, ReturnState, Sort, day_label, keys, resource_path,
};

use super::list_page::ListPage;
use super::{put_row_request, spawn, take_row_request};
use crate::widgets::{Align, ButtonSize, TableColumn, TableRecord};

pub const RETURNS_ENDPOINT: &str = "asset-returns";
const DEFAULT_SORT_KEY: &str = "assetName";
const RETURNED_DATE_FIELD: &str = "returnedDate";

/// A return request and the state the admin moves it to.
type StateChange = (AssetReturnTableItem, ReturnState);

impl TableRecord for AssetReturnTableItem {
    type Key = String;

    fn row_key(&self) -> String {
        self.id.clone()
    }

    fn field_text(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "assetCode" => Some(self.asset_code.clone()),
            "assetName" => Some(self.asset_name.clone()),
            "createdBy" => Some(self.created_by.clone()),
            "assignedDate" => Some(day_label(self.assigned_date)),
            "updatedBy" => self.updated_by.clone(),
            "returnedDate" => self.returned_date.map(day_label),
            "state" => Some(self.state.label().to_owned()),
            _ => None,
        }
    }
}

fn state_change_id() -> Id {
    Id::new("returns_state_change")
}

fn return_columns() -> Vec<TableColumn<AssetReturnTableItem>> {
    vec![
        TableColumn::new("assetCode", "Asset Code")
            .sortable(true)
            .min_width(80.0),
        TableColumn::new("assetName", "Asset Name")
            .sortable(true)
            .min_width(90.0),
        TableColumn::new("createdBy", "Requested by")
            .sortable(true)
            .min_width(80.0),
        TableColumn::new("assignedDate", "Assigned Date")
            .sortable(true)
            .min_width(90.0),
        TableColumn::new("updatedBy", "Accepted by")
            .sortable(true)
            .min_width(80.0),
        TableColumn::new("returnedDate", "Returned Date")
            .sortable(true)
            .min_width(90.0),
        TableColumn::new("state", "State").sortable(true).min_width(90.0),
        TableColumn::new("actions", "Actions")
            .width(70.0)
            .align(Align::Center)
            .render(|ui, _, request: &AssetReturnTableItem| {
                let open = request.is_open();
                ui.horizontal(|ui| {
                    let complete = ui
                        .add_enabled(open, Button::new("✔"))
                        .on_hover_text("Complete");
                    if complete.clicked() {
                        let change = (request.clone(), ReturnState::Completed);
                        put_row_request(ui.ctx(), state_change_id(), change);
                    }
                    let cancel = ui
                        .add_enabled(open, Button::new("✖"))
                        .on_hover_text("Cancel");
                    if cancel.clicked() {
                        let change = (request.clone(), ReturnState::Canceled);
                        put_row_request(ui.ctx(), state_change_id(), change);
                    }
                });
            }),
    ]
}

fn confirmation_text(target: ReturnState) -> &'static str {
    match target {
        ReturnState::Completed => "Do you want to mark this returning request as 'Completed'?",
        ReturnState::Canceled | ReturnState::WaitingForReturning => {
            "Do you want to cancel this returning request?"
        }
    }
}

pub struct ReturnRequestsPage {
    pub(crate) list: ListPage<AssetReturnTableItem>,
    columns: Vec<TableColumn<AssetReturnTableItem>>,
    pub(crate) search_input: String,
    pub(crate) date_input: String,
    pub(crate) date_error: Option<String>,
    pub pending_change: Option<StateChange>,
    pub(crate) change_in_progress: bool,
    pub(crate) change_error: Option<String>,
    change_sender: Sender<ApiResult<()>>,
    change_receiver: Receiver<ApiResult<()>>,
}

impl ReturnRequestsPage {
    pub fn new(client: ListClient, query_string: &str) -> Self {
        let mut list = ListPage::new(
            RETURNS_ENDPOINT,
            client,
            query_string,
            Sort::asc(DEFAULT_SORT_KEY),
        )
        .with_day_param(keys::RETURNED_DATE, RETURNED_DATE_FIELD)
        .with_button_size(ButtonSize::Small);
        if list.query().filter(keys::STATES).is_empty() {
            let states = ReturnState::FILTER_OPTIONS
                .iter()
                .map(|s| s.as_str().to_owned())
                .collect();
            list.set_query(list.query().clone().with_filter(keys::STATES, states));
        }
        let search_input = list.query().search.clone();
        let date_input = list
            .query()
            .filter(keys::RETURNED_DATE)
            .first()
            .cloned()
            .unwrap_or_default();
        let (change_sender, change_receiver) = flume::unbounded();

        Self {
            list,
            columns: return_columns(),
            search_input,
            date_input,
            date_error: None,
            pending_change: None,
            change_in_progress: false,
            change_error: None,
            change_sender,
            change_receiver,
        }
    }

    pub fn list(&self) -> &ListPage<AssetReturnTableItem> {
        &self.list
    }

    pub fn show(&mut self, ui: &mut Ui) {
        self.poll_change();

        ui.heading("Request List");
        ui.add_space(8.0);
        self.toolbar(ui);

        if let Some(error) = &self.date_error {
            ui.colored_label(Color32::RED, error);
        }
        if let Some(error) = self.list.error() {
            ui.colored_label(Color32::RED, format!("Error: {error}"));
        }
        ui.add_space(8.0);

        let columns = &self.columns;
        self.list
            .show_table(ui, columns, |table| table.count_column(true));

        if let Some(change) = take_row_request(ui.ctx(), state_change_id()) {
            self.pending_change = Some(change);
            self.change_error = None;
        }
        self.change_modal(ui);
    }

    pub(crate) fn apply_date(&mut self) {
        match self
            .list
            .query()
            .clone()
            .with_day(keys::RETURNED_DATE, &self.date_input)
        {
            Ok(query) => {
                self.date_error = None;
                self.list.set_query(query);
            }
            Err(err) => {
                log::debug!("Rejected returned date {:?}: {err}", self.date_input);
                self.date_error = Some("Returned Date must be a date like 2024-03-05".to_owned());
            }
        }
    }

    fn toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.menu_button("State", |ui| {
                let selected = self.list.query().filter(keys::STATES).to_vec();
                for state in ReturnState::FILTER_OPTIONS {
                    let mut checked = selected.iter().any(|s| s == state.as_str());
                    if ui.checkbox(&mut checked, state.label()).changed() {
                        let values = ReturnState::FILTER_OPTIONS
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

            let date = ui.add(
                TextEdit::singleline(&mut self.date_input)
                    .hint_text("Returned Date (YYYY-MM-DD)")
                    .desired_width(180.0),
            );
            if date.lost_focus() {
                self.apply_date();
            }

            let search = ui.add(
                TextEdit::singleline(&mut self.search_input)
                    .hint_text("Search by Asset or Requester")
                    .desired_width(220.0),
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

    fn change_modal(&mut self, ui: &Ui) {
        let Some((request, target)) = self.pending_change.clone() else {
            return;
        };

        let mut open = true;
        Window::new("Are you sure?")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ui.ctx(), |ui| {
                ui.label(confirmation_text(target));
                ui.weak(format!("{} {}", request.asset_code, request.asset_name));
                if let Some(error) = &self.change_error {
                    ui.colored_label(Color32::RED, format!("Error: {error}"));
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let confirm = ui.add_enabled(!self.change_in_progress, Button::new("Yes"));
                    if confirm.clicked() {
                        self.start_change(&request, target, ui.ctx());
                    }
                    if ui.button("No").clicked() {
                        self.pending_change = None;
                    }
                    if self.change_in_progress {
                        ui.spinner();
                    }
                });
            });

        if !open {
            self.pending_change = None;
        }
    }

    fn start_change(
        &mut self,
        request: &AssetReturnTableItem,
        target: ReturnState,
        ctx: &egui::Context,
    ) {
        self.change_in_progress = true;
        self.change_error = None;

        let client = self.list.client().clone();
        let path = resource_path(&[RETURNS_ENDPOINT, &request.id]);
        let body = serde_json::json!({ "state": target.as_str() });
        let sender = self.change_sender.clone();
        let ctx = ctx.clone();
        let task = async move {
            let result = client.patch(&path, body).await;
            if sender.send(result).is_err() {
                log::debug!("Return request page closed before {path} finished");
            }
            ctx.request_repaint();
        };

        if let Err(err) = spawn(task) {
            self.change_in_progress = false;
            self.change_error = Some(format!("No async runtime: {err}"));
        }
    }

    fn poll_change(&mut self) {
        while let Ok(result) = self.change_receiver.try_recv() {
            self.change_in_progress = false;
            match result {
                Ok(()) => {
                    if let Some((request, target)) = self.pending_change.take() {
                        log::info!("Return request {} is now {target}", request.asset_code);
                    }
                    self.list.reload();
                }
                Err(err) => {
                    log::warn!("Failed to update return request: {err}");
                    self.change_error = Some(err.to_string());
                }
            }
        }
    }
}
