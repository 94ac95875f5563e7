//! Table items listed by the management pages.

mod asset;
mod assignment;
mod report;
mod user;

use chrono::NaiveDate;

pub use asset::{AssetState, AssetTableItem, Category};
pub use assignment::{
    AssetReturnTableItem, AssignmentState, AssignmentStatus, AssignmentTableItem, ReturnState,
};
pub use report::ReportItem;
pub use user::{RoleType, UserTableItem};

/// Dates as tables show them: `dd/mm/yyyy`.
pub fn day_label(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
