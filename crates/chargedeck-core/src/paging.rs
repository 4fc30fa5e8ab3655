//! Server-side paging contract
//!
//! The backend exposes one paging shape for every resource:
//! `POST {resource}/Paging` with a [`PageRequest`] body, answered by a
//! [`PageResponse`]. Filter entries are backend-specific predicate strings
//! (`"field=value"` or `"field op value"`); the client treats them as
//! opaque and never parses them back.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Paging parameters sent to `POST {resource}/Paging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,

    /// Rows per page. The server never returns more than this.
    #[serde(rename = "pageSize")]
    pub page_size: u32,

    #[serde(rename = "sortField")]
    pub sort_field: String,

    #[serde(rename = "sortAscending")]
    pub sort_ascending: bool,

    /// Ordered predicate strings, applied server-side. Order matters to the
    /// backend, so callers append rather than merge.
    pub filter: Vec<String>,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32, sort_field: impl Into<String>) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            sort_field: sort_field.into(),
            sort_ascending: true,
            filter: Vec::new(),
        }
    }

    pub fn descending(mut self) -> Self {
        self.sort_ascending = false;
        self
    }

    pub fn with_filters(mut self, filter: Vec<String>) -> Self {
        self.filter = filter;
        self
    }
}

/// Wire shape of `Pagination` in a paging response.
///
/// `length` is the *total* number of matching rows, not a page count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub length: u64,
}

/// One page of records plus the total matching count.
///
/// Missing `result` or `Pagination` deserialize to empty/zero so a sparse
/// backend response degrades instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub result: Vec<Record>,

    #[serde(rename = "Pagination", default)]
    pub pagination: Pagination,
}

/// The `{rows, total_items}` pair a paged-list controller exposes to views.
#[derive(Debug, Clone, Default)]
pub struct PageData {
    pub rows: Vec<Record>,
    pub total_items: u64,
}

impl From<PageResponse> for PageData {
    fn from(resp: PageResponse) -> Self {
        Self {
            rows: resp.result,
            total_items: resp.pagination.length,
        }
    }
}

impl PageData {
    /// Number of pages at the given page size (0 when empty).
    pub fn total_pages(&self, page_size: u32) -> u32 {
        total_pages(self.total_items, page_size)
    }
}

/// `ceil(total_items / page_size)`, saturating at u32.
pub fn total_pages(total_items: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_items.div_ceil(page_size as u64);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps_to_one_based() {
        let req = PageRequest::new(0, 0, "id");
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 1);
    }

    #[test]
    fn test_page_request_wire_names() {
        let req = PageRequest::new(2, 25, "name").descending();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["page"], 2);
        assert_eq!(json["pageSize"], 25);
        assert_eq!(json["sortField"], "name");
        assert_eq!(json["sortAscending"], false);
        assert!(json["filter"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_page_response_full_shape() {
        let resp: PageResponse = serde_json::from_str(
            r#"{"result":[{"id":1,"code":"A"},{"id":2,"code":"B"}],"Pagination":{"length":2}}"#,
        )
        .unwrap();
        assert_eq!(resp.result.len(), 2);
        assert_eq!(resp.pagination.length, 2);
    }

    #[test]
    fn test_page_response_missing_fields_degrade() {
        let resp: PageResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.result.is_empty());
        assert_eq!(resp.pagination.length, 0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn test_total_pages_zero_page_size() {
        assert_eq!(total_pages(100, 0), 0);
    }

    #[test]
    fn test_page_data_from_response() {
        let resp: PageResponse = serde_json::from_str(
            r#"{"result":[{"id":7}],"Pagination":{"length":41}}"#,
        )
        .unwrap();
        let data = PageData::from(resp);
        assert_eq!(data.rows.len(), 1);
        assert_eq!(data.total_items, 41);
        assert_eq!(data.total_pages(10), 5);
    }
}
