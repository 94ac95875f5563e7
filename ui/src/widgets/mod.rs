pub mod pagination;
pub mod table;

pub use pagination::{ButtonSize, PageInfo, PageItem, PaginationResponse, page_items, pagination};
pub use table::{
    Align, ColumnWidth, DataTable, SelectionChange, SelectionMode, TableColumn, TableRecord,
    TableResponse, TableState,
};
