use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::day_label;

/// Acceptance state of an assignment. The backend sends the display label,
/// which is also the value the `states` filter expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentState {
    Accepted,
    Declined,
    WaitingForAcceptance,
}

impl AssignmentState {
    pub const ALL: [Self; 3] = [Self::Accepted, Self::Declined, Self::WaitingForAcceptance];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Declined => "Declined",
            Self::WaitingForAcceptance => "Waiting for acceptance",
        }
    }

    const fn key(self) -> &'static str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
            Self::WaitingForAcceptance => "WAITING_FOR_ACCEPTANCE",
        }
    }

    /// Accepts the label or the upper-case key. Anything else is declined.
    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|state| state.label() == value || state.key() == value)
            .unwrap_or(Self::Declined)
    }
}

impl fmt::Display for AssignmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentStatus {
    pub id: String,
    pub name: String,
}

impl AssignmentStatus {
    pub fn state(&self) -> AssignmentState {
        AssignmentState::parse(&self.name)
    }
}

/// State of a request to return an assigned asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum ReturnState {
    WaitingForReturning,
    Completed,
    Canceled,
}

impl ReturnState {
    pub const ALL: [Self; 3] = [Self::WaitingForReturning, Self::Completed, Self::Canceled];
    /// Canceled requests are never listed, so the filter does not offer them.
    pub const FILTER_OPTIONS: [Self; 2] = [Self::WaitingForReturning, Self::Completed];

    pub const fn label(self) -> &'static str {
        match self {
            Self::WaitingForReturning => "Waiting for returning",
            Self::Completed => "Completed",
            Self::Canceled => "Canceled",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WaitingForReturning => "WAITING_FOR_RETURNING",
            Self::Completed => "COMPLETED",
            Self::Canceled => "CANCELED",
        }
    }

    /// Lenient parse: unknown values are treated as canceled.
    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == value)
            .unwrap_or(Self::Canceled)
    }
}

impl From<String> for ReturnState {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl fmt::Display for ReturnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the assignment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentTableItem {
    pub id: String,
    pub asset_code: String,
    pub asset_name: String,
    /// Username of the assignee.
    pub user_id: String,
    pub created_by: String,
    pub assigned_date: NaiveDate,
    pub status: AssignmentStatus,
    #[serde(default)]
    pub return_state: Option<ReturnState>,
}

impl AssignmentTableItem {
    pub fn assigned_date_label(&self) -> String {
        day_label(self.assigned_date)
    }

    /// A return can be requested for an accepted assignment that has no
    /// open request. A canceled request may be replaced.
    pub fn can_request_return(&self) -> bool {
        self.status.state() == AssignmentState::Accepted
            && matches!(self.return_state, None | Some(ReturnState::Canceled))
    }
}

/// One row of the return request list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetReturnTableItem {
    pub id: String,
    pub asset_code: String,
    pub asset_name: String,
    /// Username of the requester.
    pub created_by: String,
    pub assigned_date: NaiveDate,
    /// Username of the admin who completed the request.
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub returned_date: Option<NaiveDate>,
    pub state: ReturnState,
}

impl AssetReturnTableItem {
    /// Only requests still waiting can be completed or canceled.
    pub fn is_open(&self) -> bool {
        self.state == ReturnState::WaitingForReturning
    }
}
