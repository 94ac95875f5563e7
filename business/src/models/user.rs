use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleType {
    pub id: String,
    pub name: String,
}

/// One row of the user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTableItem {
    pub id: String,
    pub staff_code: String,
    pub full_name: String,
    pub username: String,
    pub joined_date: NaiveDate,
    #[serde(rename = "type", default)]
    pub types: Vec<RoleType>,
}

impl UserTableItem {
    /// Joined date as shown in tables: `dd/mm/yyyy`.
    pub fn joined_date_label(&self) -> String {
        super::day_label(self.joined_date)
    }

    /// Primary role with each word capitalised, e.g. `ADMIN` → `Admin`.
    pub fn type_label(&self) -> String {
        self.types
            .first()
            .map(|role| capitalize_each_word(&role.name))
            .unwrap_or_default()
    }
}

fn capitalize_each_word(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
