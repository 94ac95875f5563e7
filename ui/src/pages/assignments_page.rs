//! Assignment management page.

use egui::{Button, Color32, Id, Key, TextEdit, Ui, Window};
use flume::{Receiver, Sender};
use oam_business::{
    ApiResult, AssignmentState, AssignmentTableItem, ListClient, Sort, keys, resource_path,
};

use super::list_page::ListPage;
use super::return_requests_page::RETURNS_ENDPOINT;
use super::{put_row_request, spawn, take_row_request};
use crate::widgets::{Align, TableColumn, TableRecord};

pub const ASSIGNMENTS_ENDPOINT: &str = "assignments";
const DEFAULT_SORT_KEY: &str = "assetName";
/// Backend field the assigned-date filter expands to.
const ASSIGNED_DATE_FIELD: &str = "assignedDate";

impl TableRecord for AssignmentTableItem {
    type Key = String;

    fn row_key(&self) -> String {
        self.id.clone()
    }

    fn field_text(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "assetCode" => Some(self.asset_code.clone()),
            "assetName" => Some(self.asset_name.clone()),
            "userId" => Some(self.user_id.clone()),
            "createdBy" => Some(self.created_by.clone()),
            "assignedDate" => Some(self.assigned_date_label()),
            "status" => Some(self.status.state().label().to_owned()),
            _ => None,
        }
    }
}

fn return_request_id() -> Id {
    Id::new("assignments_return_request")
}

fn assignment_columns() -> Vec<TableColumn<AssignmentTableItem>> {
    vec![
        TableColumn::new("assetCode", "Asset Code")
            .sortable(true)
            .min_width(90.0),
        TableColumn::new("assetName", "Asset Name")
            .sortable(true)
            .min_width(100.0),
        TableColumn::new("userId", "Assigned to")
            .sortable(true)
            .min_width(80.0),
        TableColumn::new("createdBy", "Assigned by")
            .sortable(true)
            .min_width(80.0),
        TableColumn::new("assignedDate", "Assigned Date")
            .sortable(true)
            .min_width(90.0),
        TableColumn::new("status", "State").sortable(true),
        TableColumn::new("actions", "Actions")
            .width(80.0)
            .align(Align::Center)
            .render(|ui, _, assignment: &AssignmentTableItem| {
                let button = Button::new("Return");
                if ui
                    .add_enabled(assignment.can_request_return(), button)
                    .on_disabled_hover_text("Only accepted assignments can be returned")
                    .clicked()
                {
                    put_row_request(ui.ctx(), return_request_id(), assignment.clone());
                }
            }),
    ]
}

pub struct AssignmentsPage {
    pub(crate) list: ListPage<AssignmentTableItem>,
    columns: Vec<TableColumn<AssignmentTableItem>>,
    pub(crate) search_input: String,
    pub(crate) date_input: String,
    pub(crate) date_error: Option<String>,
    pub pending_return: Option<AssignmentTableItem>,
    pub(crate) return_in_progress: bool,
    pub(crate) return_error: Option<String>,
    return_sender: Sender<ApiResult<()>>,
    return_receiver: Receiver<ApiResult<()>>,
}

impl AssignmentsPage {
    pub fn new(client: ListClient, query_string: &str) -> Self {
        let mut list = ListPage::new(
            ASSIGNMENTS_ENDPOINT,
            client,
            query_string,
            Sort::asc(DEFAULT_SORT_KEY),
        )
        .with_day_param(keys::DATES, ASSIGNED_DATE_FIELD);
        if list.query().filter(keys::STATES).is_empty() {
            let states = AssignmentState::ALL.iter().map(|s| s.label().to_owned()).collect();
            list.set_query(list.query().clone().with_filter(keys::STATES, states));
        }
        let search_input = list.query().search.clone();
        let date_input = list.query().filter(keys::DATES).first().cloned().unwrap_or_default();
        let (return_sender, return_receiver) = flume::unbounded();

        Self {
            list,
            columns: assignment_columns(),
            search_input,
            date_input,
            date_error: None,
            pending_return: None,
            return_in_progress: false,
            return_error: None,
            return_sender,
            return_receiver,
        }
    }

    pub fn list(&self) -> &ListPage<AssignmentTableItem> {
        &self.list
    }

    pub fn highlight(&mut self, assignment: AssignmentTableItem) {
        self.list.highlight(assignment);
    }

    pub fn show(&mut self, ui: &mut Ui) {
        self.poll_return();

        ui.heading("Assignment List");
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
            .show_table(ui, columns, |table| table.count_column(true).resizable(true));

        if let Some(assignment) = take_row_request(ui.ctx(), return_request_id()) {
            self.pending_return = Some(assignment);
            self.return_error = None;
        }
        self.return_modal(ui);
    }

    /// Applies the assigned-date input. A blank input clears the filter.
    pub(crate) fn apply_date(&mut self) {
        match self.list.query().clone().with_day(keys::DATES, &self.date_input) {
            Ok(query) => {
                self.date_error = None;
                self.list.set_query(query);
            }
            Err(err) => {
                log::debug!("Rejected assigned date {:?}: {err}", self.date_input);
                self.date_error = Some("Assigned Date must be a date like 2024-03-05".to_owned());
            }
        }
    }

    fn toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.menu_button("State", |ui| {
                let selected = self.list.query().filter(keys::STATES).to_vec();
                for state in AssignmentState::ALL {
                    let mut checked = selected.iter().any(|s| s == state.label());
                    if ui.checkbox(&mut checked, state.label()).changed() {
                        let values = AssignmentState::ALL
                            .into_iter()
                            .filter(|other| {
                                if *other == state {
                                    checked
                                } else {
                                    selected.iter().any(|s| s == other.label())
                                }
                            })
                            .map(|other| other.label().to_owned())
                            .collect();
                        self.list
                            .set_query(self.list.query().clone().with_filter(keys::STATES, values));
                    }
                }
            });

            let date = ui.add(
                TextEdit::singleline(&mut self.date_input)
                    .hint_text("Assigned Date (YYYY-MM-DD)")
                    .desired_width(180.0),
            );
            if date.lost_focus() {
                self.apply_date();
            }

            let search = ui.add(
                TextEdit::singleline(&mut self.search_input)
                    .hint_text("Search by Asset or Assignee")
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

    fn return_modal(&mut self, ui: &Ui) {
        let Some(assignment) = self.pending_return.clone() else {
            return;
        };

        let mut open = true;
        Window::new("Are you sure?")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ui.ctx(), |ui| {
                ui.label("Do you want to create a return request for this asset?");
                ui.weak(format!("{} {}", assignment.asset_code, assignment.asset_name));
                if let Some(error) = &self.return_error {
                    ui.colored_label(Color32::RED, format!("Error: {error}"));
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let confirm = ui.add_enabled(!self.return_in_progress, Button::new("Yes"));
                    if confirm.clicked() {
                        self.start_return(&assignment, ui.ctx());
                    }
                    if ui.button("No").clicked() {
                        self.pending_return = None;
                    }
                    if self.return_in_progress {
                        ui.spinner();
                    }
                });
            });

        if !open {
            self.pending_return = None;
        }
    }

    fn start_return(&mut self, assignment: &AssignmentTableItem, ctx: &egui::Context) {
        self.return_in_progress = true;
        self.return_error = None;

        let client = self.list.client().clone();
        let path = resource_path(&[ASSIGNMENTS_ENDPOINT, &assignment.id, RETURNS_ENDPOINT]);
        let sender = self.return_sender.clone();
        let ctx = ctx.clone();
        let task = async move {
            let result = client.post(&path, serde_json::json!({})).await;
            if sender.send(result).is_err() {
                log::debug!("Assignment page closed before {path} finished");
            }
            ctx.request_repaint();
        };

        if let Err(err) = spawn(task) {
            self.return_in_progress = false;
            self.return_error = Some(format!("No async runtime: {err}"));
        }
    }

    fn poll_return(&mut self) {
        while let Ok(result) = self.return_receiver.try_recv() {
            self.return_in_progress = false;
            match result {
                Ok(()) => {
                    if let Some(assignment) = self.pending_return.take() {
                        log::info!("Requested return of {}", assignment.asset_code);
                    }
                    self.list.client().cache().invalidate_prefix(RETURNS_ENDPOINT);
                    self.list.reload();
                }
                Err(err) => {
                    log::warn!("Failed to request return: {err}");
                    self.return_error = Some(err.to_string());
                }
            }
        }
    }
}
