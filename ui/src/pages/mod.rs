//! Management pages.
//!
//! - `list_page`: shared query, fetch and table plumbing
//! - `assets_page`: asset list with state filter and deletion
//! - `users_page`: user list with type filter and multi-row selection
//! - `assignments_page`: assignment list and return request creation
//! - `return_requests_page`: return requests, completed or canceled in place
//! - `report_page`: asset counts per category and the spreadsheet export

mod assets_page;
mod assignments_page;
mod list_page;
mod report_page;
mod return_requests_page;
mod users_page;

use std::future::Future;

use egui::Id;

pub use assets_page::{ASSETS_ENDPOINT, AssetsPage, CATEGORIES_ENDPOINT};
pub use assignments_page::{ASSIGNMENTS_ENDPOINT, AssignmentsPage};
pub use list_page::{ListPage, ListRecord, OptimisticEdit};
pub use report_page::{
    EXPORT_ENDPOINT, ExportSaver, REPORT_ENDPOINT, ReportPage, SaveError, SystemExportSaver,
};
pub use return_requests_page::{RETURNS_ENDPOINT, ReturnRequestsPage};
pub use users_page::{USERS_ENDPOINT, UsersPage};

/// Takes the value a row button stored under `id`, so one click opens
/// one confirmation.
pub(crate) fn take_row_request<T>(ctx: &egui::Context, id: Id) -> Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    ctx.memory_mut(|mem| {
        let requested = mem.data.get_temp::<T>(id);
        if requested.is_some() {
            mem.data.remove::<T>(id);
        }
        requested
    })
}

/// Stores `value` for [`take_row_request`].
pub(crate) fn put_row_request<T>(ctx: &egui::Context, id: Id, value: T)
where
    T: Clone + Send + Sync + 'static,
{
    ctx.memory_mut(|mem| mem.data.insert_temp(id, value));
}

/// Runs `task` on the tokio runtime the app was started in.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn spawn<F>(task: F) -> Result<(), tokio::runtime::TryCurrentError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::runtime::Handle::try_current()?;
    handle.spawn(task);
    Ok(())
}

/// Runs `task` on the browser's event loop.
#[cfg(target_arch = "wasm32")]
pub(crate) fn spawn<F>(task: F) -> Result<(), std::convert::Infallible>
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(task);
    Ok(())
}
