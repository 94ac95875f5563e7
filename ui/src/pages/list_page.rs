//! Shared state and plumbing of the paginated management pages.
//!
//! A [`ListPage`] owns the list query (mirrored to URL query parameters),
//! the table state, and the last loaded page. Table events become query
//! transitions; a changed query triggers a fetch whose result comes back
//! over a flume channel and is picked up by [`ListPage::poll`].

use flume::{Receiver, Sender};
use oam_business::{ApiResult, ListClient, ListQuery, Page, Rollback, Sort};
use serde::de::DeserializeOwned;

use super::spawn;
use crate::widgets::{
    ButtonSize, DataTable, PageInfo, TableColumn, TableRecord, TableResponse, TableState,
};

/// Records a list page can fetch and show.
pub trait ListRecord: TableRecord + Clone + DeserializeOwned + Send + Sync + 'static {}

impl<T> ListRecord for T where T: TableRecord + Clone + DeserializeOwned + Send + Sync + 'static {}

type FetchResult<T> = (ListQuery, ApiResult<Page<T>>);

/// A local edit made ahead of the request that confirms it.
#[must_use = "an optimistic edit is undone with `ListPage::restore`"]
pub struct OptimisticEdit<T> {
    query: ListQuery,
    previous: Page<T>,
    rollback: Option<Rollback>,
}

pub struct ListPage<T: ListRecord> {
    endpoint: &'static str,
    client: ListClient,
    /// URL day filter and the backend field it expands to.
    day_param: Option<(&'static str, &'static str)>,
    button_size: ButtonSize,
    pub(crate) query: ListQuery,
    pub(crate) table: TableState<T>,
    pub(crate) page: Page<T>,
    /// `page.content` without the highlighted record.
    rows: Vec<T>,
    pub(crate) highlighted: Option<T>,
    pub(crate) is_fetching: bool,
    pub(crate) error: Option<String>,
    needs_fetch: bool,
    force_refetch: bool,
    sender: Sender<FetchResult<T>>,
    receiver: Receiver<FetchResult<T>>,
}

impl<T: ListRecord> ListPage<T> {
    /// Builds the page from the URL query string it was opened with. The
    /// sort key and order each fall back to `default_sort` when missing.
    pub fn new(
        endpoint: &'static str,
        client: ListClient,
        query_string: &str,
        default_sort: Sort,
    ) -> Self {
        let query = ListQuery::from_query_string_or(query_string, default_sort);
        let (sender, receiver) = flume::unbounded();
        Self {
            endpoint,
            client,
            day_param: None,
            button_size: ButtonSize::default(),
            table: TableState::new().with_sort(query.sort.clone()),
            query,
            page: Page::default(),
            rows: Vec::new(),
            highlighted: None,
            is_fetching: false,
            error: None,
            needs_fetch: true,
            force_refetch: false,
            sender,
            receiver,
        }
    }

    /// Sends the single-day filter under `key` as `{field}From`/`{field}To`.
    pub fn with_day_param(mut self, key: &'static str, field: &'static str) -> Self {
        self.day_param = Some((key, field));
        self
    }

    pub fn with_button_size(mut self, button_size: ButtonSize) -> Self {
        self.button_size = button_size;
        self
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// URL form of the current query.
    pub fn query_string(&self) -> String {
        self.query.to_query_string()
    }

    pub fn client(&self) -> &ListClient {
        &self.client
    }

    pub fn table_state(&self) -> &TableState<T> {
        &self.table
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn highlighted(&self) -> Option<&T> {
        self.highlighted.as_ref()
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(self.query.page, self.page.total_pages()).with_button_size(self.button_size)
    }

    /// The query as the backend receives it.
    pub fn api_query(&self) -> ListQuery {
        match self.day_param {
            Some((key, field)) => self.query.clone().with_day_range(key, field),
            None => self.query.clone(),
        }
    }

    /// Cache key of the page on screen.
    pub fn cache_key(&self) -> String {
        ListClient::page_key(self.endpoint, &self.api_query())
    }

    /// Moves to `query`. Any change clears the highlighted record and
    /// schedules a fetch.
    pub fn set_query(&mut self, query: ListQuery) {
        if query == self.query {
            return;
        }
        log::debug!("{} query changed to {}", self.endpoint, query.to_query_string());
        self.query = query;
        self.highlighted = None;
        self.refresh_rows();
        self.needs_fetch = true;
    }

    /// Shows `record` above the list until the query changes.
    pub fn highlight(&mut self, record: T) {
        self.highlighted = Some(record);
        self.refresh_rows();
    }

    /// Drops every cached page of this endpoint and fetches again. Used
    /// after writes, which may move rows between pages.
    pub fn reload(&mut self) {
        let dropped = self.client.cache().invalidate_prefix(self.endpoint);
        log::debug!("Reloading {}, dropped {dropped} cached pages", self.endpoint);
        self.needs_fetch = true;
    }

    /// Fetches the page on screen again, bypassing the cache.
    pub fn refresh(&mut self) {
        self.force_refetch = true;
        self.needs_fetch = true;
    }

    /// Removes the row with `key` from the page and its cache entry until
    /// the edit is restored or the page is fetched again.
    pub fn remove_optimistic(&mut self, key: &T::Key) -> OptimisticEdit<T> {
        let previous = self.page.clone();
        let rollback = self
            .client
            .cache()
            .mutate_optimistic::<Page<T>>(&self.cache_key(), |page| {
                page.content.retain(|row| row.row_key() != *key);
            });
        self.page.content.retain(|row| row.row_key() != *key);
        self.refresh_rows();

        OptimisticEdit {
            query: self.query.clone(),
            previous,
            rollback,
        }
    }

    /// Undoes an optimistic edit whose request failed.
    pub fn restore(&mut self, edit: OptimisticEdit<T>) {
        if let Some(rollback) = edit.rollback {
            self.client.cache().rollback(rollback);
        }
        if edit.query == self.query {
            self.page = edit.previous;
            self.refresh_rows();
        }
    }

    /// Maps table events onto the query.
    pub fn apply_table_response(&mut self, response: &TableResponse<T>) {
        if let Some(sort) = &response.sort_changed {
            self.set_query(self.query.clone().with_sort(sort.clone()));
        }
        if let Some(page) = response.page_changed {
            self.set_query(self.query.clone().with_page(page));
        }
    }

    pub fn set_fetching(&mut self) {
        self.is_fetching = true;
        self.error = None;
    }

    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
        self.is_fetching = false;
    }

    /// Stores a loaded page.
    pub fn update_page(&mut self, page: Page<T>) {
        self.page = page;
        self.is_fetching = false;
        self.error = None;
        self.refresh_rows();
    }

    fn refresh_rows(&mut self) {
        let hidden = self.highlighted.as_ref().map(TableRecord::row_key);
        self.rows = self
            .page
            .content
            .iter()
            .filter(|row| hidden.as_ref() != Some(&row.row_key()))
            .cloned()
            .collect();
    }

    /// Applies finished fetches. Results for a query that is no longer
    /// current are dropped.
    pub fn poll(&mut self) {
        while let Ok((query, result)) = self.receiver.try_recv() {
            if query != self.query {
                log::debug!("Dropping stale {} result", self.endpoint);
                continue;
            }
            match result {
                Ok(page) => self.update_page(page),
                Err(err) => {
                    log::warn!("Failed to load {}: {err}", self.endpoint);
                    self.set_error(err.to_string());
                }
            }
        }
    }

    /// Starts a fetch when the query changed since the last one.
    pub fn ensure_fetched(&mut self, ctx: &egui::Context) {
        if !self.needs_fetch {
            return;
        }
        self.needs_fetch = false;
        let force = std::mem::take(&mut self.force_refetch);
        self.set_fetching();

        let client = self.client.clone();
        let endpoint = self.endpoint;
        let query = self.query.clone();
        let api_query = self.api_query();
        let sender = self.sender.clone();
        let ctx = ctx.clone();
        let task = async move {
            let result = if force {
                client.refetch_page::<T>(endpoint, &api_query).await
            } else {
                client.fetch_page::<T>(endpoint, &api_query).await
            };
            if sender.send((query, result)).is_err() {
                log::debug!("{endpoint} page was closed before its fetch finished");
            }
            ctx.request_repaint();
        };

        if let Err(err) = spawn(task) {
            log::error!("Cannot fetch {endpoint}: {err}");
            self.set_error(format!("No async runtime: {err}"));
        }
    }

    /// Polls, fetches if needed, and shows the table. Table events have
    /// already been applied to the query when this returns.
    pub fn show_table(
        &mut self,
        ui: &mut egui::Ui,
        columns: &[TableColumn<T>],
        configure: impl FnOnce(DataTable<'_, T>) -> DataTable<'_, T>,
    ) -> TableResponse<T> {
        self.poll();
        self.ensure_fetched(ui.ctx());

        let highlighted = self.highlighted.as_slice();
        let table = DataTable::new(self.endpoint, columns, &self.rows)
            .highlighted_rows(highlighted)
            .loading(self.is_fetching)
            .pagination(self.page_info());
        let response = configure(table).show(ui, &mut self.table);

        self.apply_table_response(&response);
        response
    }
}

#[cfg(test)]
mod tests {
    use oam_business::{
        AssetState, AssetTableItem, BusinessConfig, Pageable, RequestCache, SortOrder, keys,
    };

    use super::*;

    fn asset(id: &str, name: &str) -> AssetTableItem {
        AssetTableItem {
            id: id.to_owned(),
            code: format!("LA{id}"),
            name: name.to_owned(),
            category_name: "Laptop".to_owned(),
            state: AssetState::Available,
        }
    }

    fn page_of(content: Vec<AssetTableItem>, total_pages: u32) -> Page<AssetTableItem> {
        Page {
            content,
            pageable: Pageable {
                total_pages,
                ..Pageable::default()
            },
        }
    }

    fn list_page(query_string: &str) -> ListPage<AssetTableItem> {
        let client =
            ListClient::new(BusinessConfig::new("http://test".to_owned()), RequestCache::new());
        ListPage::new("assets", client, query_string, Sort::asc("name"))
    }

    #[test]
    fn test_initial_query_comes_from_url() {
        let page = list_page("page=3&size=10&sortOrder=desc&search=dell");

        assert_eq!(page.query().page, 3);
        assert_eq!(page.query().size, 10);
        assert_eq!(page.query().search, "dell");
        assert_eq!(page.query().sort, Some(Sort::new("name", SortOrder::Desc)));
        assert_eq!(page.table_state().sort(), Some(&Sort::new("name", SortOrder::Desc)));
    }

    #[test]
    fn test_sort_event_resets_page() {
        let mut page = list_page("page=4");
        let response = TableResponse {
            sort_changed: Some(Sort::desc("code")),
            ..TableResponse::default()
        };

        page.apply_table_response(&response);

        assert_eq!(page.query().page, 1);
        assert_eq!(page.query().sort, Some(Sort::desc("code")));
    }

    #[test]
    fn test_page_event_moves_page() {
        let mut page = list_page("");
        let response = TableResponse {
            page_changed: Some(2),
            ..TableResponse::default()
        };

        page.apply_table_response(&response);

        assert_eq!(page.query().page, 2);
        assert!(page.query_string().contains("page=2"));
    }

    #[test]
    fn test_highlighted_record_is_removed_from_rows() {
        let mut page = list_page("");
        page.update_page(page_of(vec![asset("1", "Laptop A"), asset("2", "Laptop B")], 1));

        page.highlight(asset("2", "Laptop B (edited)"));

        assert_eq!(page.rows().len(), 1);
        assert_eq!(page.rows()[0].id, "1");
        assert_eq!(page.highlighted().map(|a| a.id.as_str()), Some("2"));
    }

    #[test]
    fn test_query_change_clears_highlight() {
        let mut page = list_page("");
        page.update_page(page_of(vec![asset("1", "Laptop A"), asset("2", "Laptop B")], 2));
        page.highlight(asset("2", "Laptop B"));

        page.set_query(page.query().clone().with_page(2));

        assert!(page.highlighted().is_none());
        assert_eq!(page.rows().len(), 2);
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut page = list_page("");
        let stale_query = page.query().clone();
        page.set_query(stale_query.clone().with_page(2));

        page.sender
            .send((stale_query, Ok(page_of(vec![asset("9", "Old")], 3))))
            .expect("channel open");
        page.poll();

        assert!(page.rows().is_empty());

        let current = page.query().clone();
        page.sender
            .send((current, Ok(page_of(vec![asset("1", "New")], 3))))
            .expect("channel open");
        page.poll();

        assert_eq!(page.rows().len(), 1);
        assert_eq!(page.page_info(), PageInfo::new(2, 3));
    }

    #[test]
    fn test_fetch_error_is_kept() {
        let mut page = list_page("");
        page.set_fetching();
        let query = page.query().clone();
        page.sender
            .send((
                query,
                Err(oam_business::ApiError::from_status(500, None)),
            ))
            .expect("channel open");

        page.poll();

        assert!(!page.is_fetching());
        assert!(page.error().is_some_and(|e| e.contains("500")));
    }

    #[test]
    fn test_order_only_url_keeps_default_key() {
        let page = list_page("sortOrder=desc");

        assert_eq!(page.query().sort, Some(Sort::desc("name")));
        assert!(page.query_string().contains("sort=name&sortOrder=desc"));
    }

    #[test]
    fn test_optimistic_removal_and_restore() {
        let mut page = list_page("");
        let loaded = page_of(vec![asset("1", "Laptop A"), asset("2", "Laptop B")], 1);
        page.client().cache().insert(page.cache_key(), loaded.clone());
        page.update_page(loaded);

        let edit = page.remove_optimistic(&"1".to_owned());

        assert_eq!(page.rows().len(), 1);
        let cached = page.client().cache().get::<Page<AssetTableItem>>(&page.cache_key());
        assert_eq!(cached.map(|p| p.content.len()), Some(1));

        page.restore(edit);

        assert_eq!(page.rows().len(), 2);
        let cached = page.client().cache().get::<Page<AssetTableItem>>(&page.cache_key());
        assert_eq!(cached.map(|p| p.content.len()), Some(2));
    }

    #[test]
    fn test_restore_after_query_change_keeps_new_page() {
        let mut page = list_page("");
        page.update_page(page_of(vec![asset("1", "Laptop A")], 2));
        let edit = page.remove_optimistic(&"1".to_owned());

        page.set_query(page.query().clone().with_page(2));
        page.update_page(page_of(vec![asset("3", "Laptop C")], 2));
        page.restore(edit);

        assert_eq!(page.rows().len(), 1);
        assert_eq!(page.rows()[0].id, "3");
    }

    #[test]
    fn test_day_param_expands_for_backend() {
        let page = list_page("assignedDate=2024-03-05").with_day_param(keys::DATES, "assignedDate");

        assert!(page.query_string().contains("assignedDate=2024-03-05"));
        let key = page.cache_key();
        assert!(key.contains("assignedDateFrom=2024-03-05"), "{key}");
        assert!(key.contains("assignedDateTo=2024-03-05"), "{key}");
    }

    #[test]
    fn test_button_size_reaches_pagination() {
        let page = list_page("").with_button_size(ButtonSize::Small);
        assert_eq!(page.page_info().button_size, ButtonSize::Small);
    }
}
