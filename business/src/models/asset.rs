use serde::{Deserialize, Serialize};
use std::fmt;

/// Decoding goes through [`AssetState::parse`], so a state the backend adds
/// later does not fail the whole page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum AssetState {
    Available,
    NotAvailable,
    WaitingForRecycling,
    Recycled,
    Assigned,
}

impl AssetState {
    pub const ALL: [Self; 5] = [
        Self::Assigned,
        Self::Available,
        Self::NotAvailable,
        Self::WaitingForRecycling,
        Self::Recycled,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::NotAvailable => "Not available",
            Self::WaitingForRecycling => "Waiting for recycling",
            Self::Recycled => "Recycled",
            Self::Assigned => "Assigned",
        }
    }

    /// Wire value, e.g. `WAITING_FOR_RECYCLING`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::NotAvailable => "NOT_AVAILABLE",
            Self::WaitingForRecycling => "WAITING_FOR_RECYCLING",
            Self::Recycled => "RECYCLED",
            Self::Assigned => "ASSIGNED",
        }
    }

    /// Lenient parse: unknown values are treated as not available.
    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == value)
            .unwrap_or(Self::NotAvailable)
    }
}

impl From<String> for AssetState {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl fmt::Display for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the asset list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTableItem {
    pub id: String,
    pub code: String,
    pub name: String,
    pub category_name: String,
    pub state: AssetState,
}

impl AssetTableItem {
    /// Assigned assets cannot be edited or deleted.
    pub fn is_locked(&self) -> bool {
        self.state == AssetState::Assigned
    }
}

/// Asset category, offered by the category filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub prefix: String,
}
