//! Asset report per category, with a spreadsheet export.
//!
//! The export is downloaded through [`ListClient::download`] and handed to an
//! [`ExportSaver`]. The system saver asks for a path with a native save
//! dialog, or triggers a browser download on the web. Tests inject a saver
//! that records what it was given.

use egui::{Color32, Ui};
use flume::{Receiver, Sender};
use oam_business::{ApiResult, Download, ListClient, ReportItem, Sort};

use super::list_page::ListPage;
use super::spawn;
use crate::widgets::{Align, TableColumn, TableRecord};

pub const REPORT_ENDPOINT: &str = "reports/assets";
pub const EXPORT_ENDPOINT: &str = "reports/assets/export";
const DEFAULT_SORT_KEY: &str = "category";
const EXPORT_TYPE: &str = "standard";

/// Count columns, in display order.
const COUNT_COLUMNS: [(&str, &str); 6] = [
    ("total", "Total"),
    ("assigned", "Assigned"),
    ("available", "Available"),
    ("notAvailable", "Not Available"),
    ("waitingForRecycling", "Waiting for recycling"),
    ("recycled", "Recycled"),
];

impl TableRecord for ReportItem {
    type Key = String;

    fn row_key(&self) -> String {
        self.category.clone()
    }

    fn field_text(&self, key: &str) -> Option<String> {
        match key {
            "category" => Some(self.category.clone()),
            _ => self.count(key).map(|count| count.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Browser refused the download: {0}")]
    Browser(String),
}

/// Hands an exported file to the user.
pub trait ExportSaver {
    /// Returns where the file went, or `None` when the user canceled.
    fn save(&self, download: &Download) -> Result<Option<String>, SaveError>;
}

/// Saves through the platform: a native save dialog, or a browser download.
#[derive(Debug, Default)]
pub struct SystemExportSaver;

#[cfg(not(target_arch = "wasm32"))]
impl ExportSaver for SystemExportSaver {
    fn save(&self, download: &Download) -> Result<Option<String>, SaveError> {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save report")
            .set_file_name(&download.file_name)
            .save_file()
        else {
            return Ok(None);
        };

        std::fs::write(&path, &download.bytes).map_err(|source| SaveError::Write {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(path.display().to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl ExportSaver for SystemExportSaver {
    fn save(&self, download: &Download) -> Result<Option<String>, SaveError> {
        use eframe::wasm_bindgen::{JsCast as _, JsValue};
        use web_sys::js_sys::{Array, Uint8Array};

        let browser = |err: JsValue| SaveError::Browser(format!("{err:?}"));

        let bytes = Uint8Array::from(download.bytes.as_slice());
        let parts = Array::of1(&bytes);
        let options = web_sys::BlobPropertyBag::new();
        if let Some(content_type) = &download.content_type {
            options.set_type(content_type);
        }
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(browser)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(browser)?;

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| SaveError::Browser("no document".to_owned()))?;
        let anchor = document
            .create_element("a")
            .map_err(browser)?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|element| SaveError::Browser(format!("{element:?} is not a link")))?;
        anchor.set_href(&url);
        anchor.set_download(&download.file_name);
        anchor.click();
        web_sys::Url::revoke_object_url(&url).map_err(browser)?;

        Ok(Some(download.file_name.clone()))
    }
}

fn report_columns() -> Vec<TableColumn<ReportItem>> {
    let mut columns = vec![
        TableColumn::new("category", "Category")
            .sortable(true)
            .min_width(120.0),
    ];
    columns.extend(COUNT_COLUMNS.iter().map(|(key, title)| {
        TableColumn::new(*key, *title)
            .sortable(true)
            .min_width(80.0)
            .align(Align::Right)
    }));
    columns
}

pub struct ReportPage {
    pub(crate) list: ListPage<ReportItem>,
    columns: Vec<TableColumn<ReportItem>>,
    saver: Box<dyn ExportSaver>,
    pub(crate) exporting: bool,
    pub(crate) export_message: Option<String>,
    pub(crate) export_error: Option<String>,
    export_sender: Sender<ApiResult<Download>>,
    export_receiver: Receiver<ApiResult<Download>>,
}

impl ReportPage {
    pub fn new(client: ListClient, query_string: &str) -> Self {
        let list = ListPage::new(
            REPORT_ENDPOINT,
            client,
            query_string,
            Sort::asc(DEFAULT_SORT_KEY),
        );
        let (export_sender, export_receiver) = flume::unbounded();

        Self {
            list,
            columns: report_columns(),
            saver: Box::new(SystemExportSaver),
            exporting: false,
            export_message: None,
            export_error: None,
            export_sender,
            export_receiver,
        }
    }

    pub fn with_saver(mut self, saver: Box<dyn ExportSaver>) -> Self {
        self.saver = saver;
        self
    }

    pub fn list(&self) -> &ListPage<ReportItem> {
        &self.list
    }

    pub fn show(&mut self, ui: &mut Ui) {
        self.poll_export();

        ui.heading("Report");
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if self.exporting {
                ui.spinner();
                ui.label("Exporting…");
            } else if ui.button("Export").clicked() {
                self.start_export(ui.ctx());
            }
            if let Some(message) = &self.export_message {
                ui.weak(message);
            }
        });

        if let Some(error) = &self.export_error {
            ui.colored_label(Color32::RED, format!("Export failed: {error}"));
        }
        if let Some(error) = self.list.error() {
            ui.colored_label(Color32::RED, format!("Error: {error}"));
        }
        ui.add_space(8.0);

        let columns = &self.columns;
        self.list.show_table(ui, columns, |table| table);
    }

    fn start_export(&mut self, ctx: &egui::Context) {
        self.exporting = true;
        self.export_error = None;
        self.export_message = None;

        let client = self.list.client().clone();
        let sender = self.export_sender.clone();
        let ctx = ctx.clone();
        let task = async move {
            let params = [("exportType".to_owned(), EXPORT_TYPE.to_owned())];
            let result = client.download(EXPORT_ENDPOINT, &params).await;
            if sender.send(result).is_err() {
                log::debug!("Report page closed before the export finished");
            }
            ctx.request_repaint();
        };

        if let Err(err) = spawn(task) {
            self.exporting = false;
            self.export_error = Some(format!("No async runtime: {err}"));
        }
    }

    fn poll_export(&mut self) {
        while let Ok(result) = self.export_receiver.try_recv() {
            self.exporting = false;
            match result.map_err(|err| err.to_string()).and_then(|download| {
                self.saver.save(&download).map_err(|err| err.to_string())
            }) {
                Ok(Some(place)) => {
                    log::info!("Saved report to {place}");
                    self.export_message = Some(format!("Saved {place}"));
                }
                Ok(None) => log::debug!("Report export was not saved"),
                Err(err) => {
                    log::warn!("Report export failed: {err}");
                    self.export_error = Some(err);
                }
            }
        }
    }
}
