//! User management page.

use egui::{Color32, Key, TextEdit, Ui};
use oam_business::{ListClient, Sort, UserTableItem, keys};

use super::list_page::ListPage;
use crate::widgets::{SelectionMode, TableColumn, TableRecord};

pub const USERS_ENDPOINT: &str = "users";
const DEFAULT_SORT_KEY: &str = "fullName";
const ROLE_OPTIONS: [&str; 2] = ["Admin", "Staff"];

impl TableRecord for UserTableItem {
    type Key = String;

    fn row_key(&self) -> String {
        self.id.clone()
    }

    fn field_text(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "staffCode" => Some(self.staff_code.clone()),
            "fullName" => Some(self.full_name.clone()),
            "username" => Some(self.username.clone()),
            "joinedDate" => Some(self.joined_date_label()),
            "type" => Some(self.type_label()),
            _ => None,
        }
    }
}

fn user_columns() -> Vec<TableColumn<UserTableItem>> {
    vec![
        TableColumn::new("staffCode", "Staff Code")
            .sortable(true)
            .width(110.0),
        TableColumn::new("fullName", "Full Name")
            .sortable(true)
            .min_width(150.0),
        TableColumn::new("username", "Username").sortable(true),
        TableColumn::new("joinedDate", "Joined Date").sortable(true),
        TableColumn::new("type", "Type").sortable(true).width(110.0),
    ]
}

pub struct UsersPage {
    pub(crate) list: ListPage<UserTableItem>,
    columns: Vec<TableColumn<UserTableItem>>,
    pub(crate) search_input: String,
}

impl UsersPage {
    pub fn new(client: ListClient, query_string: &str) -> Self {
        let list = ListPage::new(
            USERS_ENDPOINT,
            client,
            query_string,
            Sort::asc(DEFAULT_SORT_KEY),
        );
        let search_input = list.query().search.clone();
        Self {
            list,
            columns: user_columns(),
            search_input,
        }
    }

    pub fn list(&self) -> &ListPage<UserTableItem> {
        &self.list
    }

    pub fn highlight(&mut self, user: UserTableItem) {
        self.list.highlight(user);
    }

    /// Keys of the checked users, in selection order.
    pub fn selected_keys(&self) -> &[String] {
        self.list.table_state().selected_keys()
    }

    pub fn show(&mut self, ui: &mut Ui) {
        ui.heading("User List");
        ui.add_space(8.0);
        self.toolbar(ui);

        if let Some(error) = self.list.error() {
            ui.colored_label(Color32::RED, format!("Error: {error}"));
        }
        ui.add_space(8.0);

        let columns = &self.columns;
        let response = self.list.show_table(ui, columns, |table| {
            table
                .row_selection(SelectionMode::Multiple)
                .count_column(true)
                .resizable(true)
        });
        if let Some(change) = response.selection_changed {
            log::debug!("{} users selected", change.keys.len());
        }
    }

    fn toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.menu_button("Type", |ui| {
                let selected = self.list.query().filter(keys::ROLES).to_vec();
                for role in ROLE_OPTIONS {
                    let mut checked = selected.iter().any(|s| s == role);
                    if ui.checkbox(&mut checked, role).changed() {
                        let values = ROLE_OPTIONS
                            .iter()
                            .filter(|other| {
                                if **other == role {
                                    checked
                                } else {
                                    selected.iter().any(|s| s == *other)
                                }
                            })
                            .map(|other| (*other).to_owned())
                            .collect();
                        self.list
                            .set_query(self.list.query().clone().with_filter(keys::ROLES, values));
                    }
                }
            });

            let search = ui.add(
                TextEdit::singleline(&mut self.search_input)
                    .hint_text("Search by Staff Code or Full Name")
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

            let selected = self.selected_keys().len();
            if selected > 0 {
                ui.label(format!("{selected} selected"));
            }
            if self.list.is_fetching() {
                ui.spinner();
            }
        });
    }
}
