//! Business layer of the OAM admin console.
//!
//! Owns everything the management pages need besides rendering: list query
//! state mirrored to URL parameters, page DTOs, table item models, and a
//! cached list client with the writes and downloads the pages issue.

pub mod api;
pub mod cache;
pub mod config;
pub mod download;
pub mod error;
pub mod http;
pub mod models;
pub mod page;
pub mod query;

pub use api::{ListClient, resource_path};
pub use cache::{RequestCache, Rollback};
pub use config::BusinessConfig;
pub use download::Download;
pub use error::{ApiError, ApiResult};
pub use models::{
    AssetReturnTableItem, AssetState, AssetTableItem, AssignmentState, AssignmentStatus,
    AssignmentTableItem, Category, ReportItem, ReturnState, RoleType, UserTableItem, day_label,
};
pub use page::{ErrorBody, ErrorDetail, ExpectedResponse, FieldError, Page, Pageable};
pub use query::{ListQuery, Sort, SortOrder, keys};
