//! Response envelopes and pagination DTOs returned by the backend.

use serde::{Deserialize, Serialize};

/// Pagination metadata attached to every list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    /// 0-based page index as reported by the backend.
    pub page_number: u32,
    pub page_size: u32,
    pub offset: u64,
    pub number_of_elements: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub sorted: bool,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

/// One page of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pageable: Pageable,
}

impl<T> Page<T> {
    /// Total page count, never less than 1 so an empty list still shows one page.
    pub fn total_pages(&self) -> u32 {
        self.pageable.total_pages.max(1)
    }

    /// 1-based number of this page.
    pub fn current_page(&self) -> u32 {
        self.pageable.page_number + 1
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            pageable: Pageable::default(),
        }
    }
}

/// Success envelope: `{ "message": ..., "data": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedResponse<T> {
    pub message: String,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    pub code: String,
    #[serde(default)]
    pub details: Vec<FieldError>,
}

/// Error envelope: `{ "message": ..., "error": { "message", "code", "details" } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub error: ErrorDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_decodes_camel_case() {
        let page: Page<String> = serde_json::from_value(serde_json::json!({
            "content": ["a", "b"],
            "pageable": {
                "pageNumber": 1,
                "pageSize": 2,
                "offset": 2,
                "numberOfElements": 2,
                "totalElements": 6,
                "totalPages": 3,
                "sorted": true,
                "first": false,
                "last": false,
                "empty": false
            }
        }))
        .expect("page should decode");

        assert_eq!(page.content.len(), 2);
        assert_eq!(page.current_page(), 2);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_empty_page_still_has_one_page() {
        let page: Page<String> = Page::default();
        assert_eq!(page.total_pages(), 1);
        assert_eq!(page.current_page(), 1);
    }

    #[test]
    fn test_error_body_details_default_to_empty() {
        let body: ErrorBody = serde_json::from_value(serde_json::json!({
            "message": "Validation failed",
            "error": { "message": "Invalid", "code": "VALIDATION_ERROR" }
        }))
        .expect("error body should decode");

        assert!(body.error.details.is_empty());
        assert_eq!(body.error.code, "VALIDATION_ERROR");
    }
}
